//! Remote fingerprinting relay.
//!
//! Some widget generations do not fingerprint locally at all: they POST a
//! request (or a raw visitorId/components capture) to an external analysis
//! service and display whatever comes back. The relay is its own strategy,
//! not a consumer of the local digest.
//!
//! Failure policy is fixed-text, no-retry: a non-2xx status or an unparsable
//! body surfaces [`RELAY_ERROR_TEXT`] through the sink and nothing else.
//!
//! Protocol parsing is target-independent; only the fetch plumbing is
//! browser-bound.

use serde_json::Value;

use crate::error::{FingerprintError, Result};

/// Default relay endpoint for fingerprint requests.
pub const DEFAULT_ENDPOINT: &str = "https://creepjs-api.web.app/fp";
/// Companion endpoint for follow-up analysis of a known fingerprint.
pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "https://creepjs-api.web.app/analysis";

/// Fixed user-visible text for any relay failure.
pub const RELAY_ERROR_TEXT: &str = "Error fetching fingerprint data";

/// A fetch that has not answered by then counts as failed.
#[cfg(target_arch = "wasm32")]
const RELAY_TIMEOUT_MS: u32 = 10_000;

/// Parsed relay answer: the fingerprint plus whatever auxiliary analysis
/// fields the service attached, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayReport {
    pub fingerprint: String,
    pub fields: Vec<(String, Value)>,
}

pub struct RemoteRelay {
    endpoint: String,
    analysis_endpoint: String,
}

impl RemoteRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        RemoteRelay {
            endpoint: endpoint.into(),
            analysis_endpoint: DEFAULT_ANALYSIS_ENDPOINT.to_string(),
        }
    }

    pub fn with_analysis_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.analysis_endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn analysis_endpoint(&self) -> &str {
        &self.analysis_endpoint
    }

    fn into_report(answer: Value) -> Result<RelayReport> {
        let map = match answer {
            Value::Object(map) => map,
            other => {
                return Err(FingerprintError::RelayMalformed(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };
        let mut fingerprint = None;
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            if key == "fingerprint" {
                fingerprint = value.as_str().map(|s| s.to_string());
            } else {
                fields.push((key, value));
            }
        }
        match fingerprint {
            Some(fingerprint) => Ok(RelayReport { fingerprint, fields }),
            None => Err(FingerprintError::RelayMalformed(
                "no fingerprint field in response".to_string(),
            )),
        }
    }

    fn analysis_fields(answer: Value) -> Result<Vec<(String, Value)>> {
        match answer {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(FingerprintError::RelayMalformed(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}

impl Default for RemoteRelay {
    fn default() -> Self {
        RemoteRelay::new(DEFAULT_ENDPOINT)
    }
}

#[cfg(target_arch = "wasm32")]
impl RemoteRelay {
    /// Ask the service to fingerprint this client itself.
    pub async fn request_fingerprint(&self) -> Result<RelayReport> {
        let body = serde_json::json!({ "request": "fingerprint" });
        let answer = self.post_json(&self.endpoint, &body).await?;
        Self::into_report(answer)
    }

    /// Submit a locally captured visitorId/components structure.
    pub async fn submit_components(&self, visitor_id: &str, components: &Value) -> Result<RelayReport> {
        let body = serde_json::json!({
            "visitorId": visitor_id,
            "components": components,
        });
        let answer = self.post_json(&self.endpoint, &body).await?;
        Self::into_report(answer)
    }

    /// Follow-up analysis for a fingerprint the service already knows.
    pub async fn request_analysis(&self, fingerprint: &str) -> Result<Vec<(String, Value)>> {
        let body = serde_json::json!({ "fingerprint": fingerprint });
        let answer = self.post_json(&self.analysis_endpoint, &body).await?;
        Self::analysis_fields(answer)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        let payload = serde_json::to_string(body)
            .map_err(|e| FingerprintError::RelayMalformed(e.to_string()))?;
        opts.set_body(&wasm_bindgen::JsValue::from_str(&payload));

        let request = Request::new_with_str_and_init(url, &opts)?;
        request.headers().set("Content-Type", "application/json")?;

        let window = web_sys::window()
            .ok_or_else(|| FingerprintError::Js("no window object".to_string()))?;

        let fetched = fetch_bounded(window.fetch_with_request(&request)).await?;
        let resp: Response = fetched
            .dyn_into()
            .map_err(|_| FingerprintError::Js("response is not a Response".to_string()))?;

        if !resp.ok() {
            log::warn!("relay {} answered HTTP {}", url, resp.status());
            return Err(FingerprintError::RelayStatus(resp.status()));
        }

        let text = JsFuture::from(resp.text()?)
            .await?
            .as_string()
            .ok_or_else(|| FingerprintError::RelayMalformed("body is not text".to_string()))?;
        serde_json::from_str(&text).map_err(|e| FingerprintError::RelayMalformed(e.to_string()))
    }
}

/// Race the fetch against the relay timeout.
#[cfg(target_arch = "wasm32")]
async fn fetch_bounded(promise: js_sys::Promise) -> Result<wasm_bindgen::JsValue> {
    use futures::future::Either;
    use wasm_bindgen_futures::JsFuture;

    let fut = JsFuture::from(promise);
    let timeout = gloo_timers::future::TimeoutFuture::new(RELAY_TIMEOUT_MS);
    futures::pin_mut!(fut);
    futures::pin_mut!(timeout);
    match futures::future::select(fut, timeout).await {
        Either::Left((result, _)) => Ok(result?),
        Either::Right(_) => Err(FingerprintError::Js("relay fetch timed out".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_splits_the_fingerprint_from_auxiliary_fields() {
        let answer = json!({
            "lies": 0,
            "fingerprint": "abc123",
            "trustScore": "99%",
            "bot": false,
        });
        let report = RemoteRelay::into_report(answer).unwrap();
        assert_eq!(report.fingerprint, "abc123");
        let keys: Vec<_> = report.fields.iter().map(|(k, _)| k.as_str()).collect();
        // Response order survives, minus the fingerprint itself.
        assert_eq!(keys, ["lies", "trustScore", "bot"]);
    }

    #[test]
    fn missing_fingerprint_field_is_malformed() {
        let err = RemoteRelay::into_report(json!({ "trustScore": "99%" })).unwrap_err();
        assert!(matches!(err, FingerprintError::RelayMalformed(_)));
    }

    #[test]
    fn non_object_answers_are_malformed() {
        for answer in [json!("abc123"), json!(42), json!(["abc123"])] {
            assert!(matches!(
                RemoteRelay::into_report(answer),
                Err(FingerprintError::RelayMalformed(_))
            ));
        }
        assert!(matches!(
            RemoteRelay::analysis_fields(json!(null)),
            Err(FingerprintError::RelayMalformed(_))
        ));
    }

    #[test]
    fn analysis_fields_keep_response_order() {
        let fields = RemoteRelay::analysis_fields(json!({
            "crowdBlendingScore": "A",
            "botLevel": 0,
        }))
        .unwrap();
        let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["crowdBlendingScore", "botLevel"]);
    }

    #[test]
    fn failure_text_is_fixed() {
        assert_eq!(RELAY_ERROR_TEXT, "Error fetching fingerprint data");
    }

    #[test]
    fn default_relay_targets_the_stock_endpoints() {
        let relay = RemoteRelay::default();
        assert_eq!(relay.endpoint(), "https://creepjs-api.web.app/fp");
        assert_eq!(
            relay.analysis_endpoint(),
            "https://creepjs-api.web.app/analysis"
        );

        let custom = RemoteRelay::new("https://example.test/fp")
            .with_analysis_endpoint("https://example.test/analysis");
        assert_eq!(custom.endpoint(), "https://example.test/fp");
        assert_eq!(custom.analysis_endpoint(), "https://example.test/analysis");
    }
}
