//! Browser fingerprinting widget.
//!
//! Compiled to WebAssembly, the widget collects an ordered set of device
//! signals, canonicalizes them to a deterministic JSON string, hashes that
//! string with SHA-256, and either returns the result to JS or renders it
//! into host-page elements. A separate relay mode defers the fingerprinting
//! to a remote analysis service instead.
//!
//! The pipeline is collectors -> record -> canonical string -> digest. Every
//! collector is total: unsupported capabilities resolve to documented
//! sentinel values, so two runs on an unchanged device under a deterministic
//! profile always produce the same digest.

pub mod canonical;
pub mod collectors;
pub mod digest;
pub mod env;
pub mod error;
pub mod profile;
pub mod signal;

pub mod relay;
#[cfg(target_arch = "wasm32")]
pub mod sink;

pub use canonical::{canonicalize, CanonicalPolicy};
pub use digest::digest;
pub use env::Environment;
pub use error::{FingerprintError, Result};
pub use profile::WidgetProfile;
pub use signal::{FingerprintRecord, SignalValue};

use serde::Deserialize;

/// Options accepted by the JS entry points. All fields optional; defaults
/// reproduce the widget's stock markup and profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetOptions {
    /// Profile name: `baseline`, `extended`, `exhaustive`,
    /// `exhaustive-jittered`.
    pub profile: String,
    /// Id of the element that receives the digest.
    pub hash_element: String,
    /// Id of the table (or tbody) that receives signal rows.
    pub table_element: String,
    /// Relay endpoint override for the remote mode.
    pub endpoint: Option<String>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        WidgetOptions {
            profile: WidgetProfile::default().name().to_string(),
            hash_element: "fingerprintHash".to_string(),
            table_element: "fingerprintTable".to_string(),
            endpoint: None,
        }
    }
}

impl WidgetOptions {
    /// Resolve the requested profile, falling back to the default on an
    /// unrecognized name.
    pub fn widget_profile(&self) -> WidgetProfile {
        match WidgetProfile::from_name(&self.profile) {
            Some(profile) => profile,
            None => {
                log::warn!("unknown profile {:?}, using default", self.profile);
                WidgetProfile::default()
            }
        }
    }
}

/// Run a profile against an environment and digest the outcome.
pub async fn collect_digest(
    env: &dyn Environment,
    profile: WidgetProfile,
) -> (FingerprintRecord, String) {
    let record = collectors::collect_all(env, &profile.collectors()).await;
    let canonical = canonicalize(&record, profile.policy());
    let hash = digest(&canonical);
    (record, hash)
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use serde::Serialize;
    use wasm_bindgen::prelude::*;

    use super::*;
    use crate::env::browser::BrowserEnv;
    use crate::relay::{RemoteRelay, RELAY_ERROR_TEXT};
    use crate::sink::DomSink;

    /// One row of the structured result handed back to JS.
    #[derive(Debug, Clone, Serialize)]
    struct SignalRow {
        key: String,
        label: String,
        value: String,
    }

    /// The structured result handed back to JS.
    #[derive(Debug, Clone, Serialize)]
    struct CollectionResult {
        profile: &'static str,
        digest: String,
        signals: Vec<SignalRow>,
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        let _ = console_log::init_with_level(log::Level::Info);
    }

    fn parse_options(options: JsValue) -> Result<WidgetOptions> {
        if options.is_undefined() || options.is_null() {
            return Ok(WidgetOptions::default());
        }
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| FingerprintError::Js(e.to_string()))
    }

    /// Collect locally and return `{ profile, digest, signals }` to JS.
    #[wasm_bindgen(js_name = collectFingerprint)]
    pub async fn collect_fingerprint(options: JsValue) -> std::result::Result<JsValue, JsValue> {
        let options = parse_options(options)?;
        let profile = options.widget_profile();
        let env = BrowserEnv::new();
        let (record, hash) = collect_digest(&env, profile).await;

        let signals = record
            .entries()
            .iter()
            .zip(record.display_pairs())
            .map(|((key, _), (label, value))| SignalRow {
                key: (*key).to_string(),
                label,
                value,
            })
            .collect();
        let result = CollectionResult {
            profile: profile.name(),
            digest: hash,
            signals,
        };
        serde_wasm_bindgen::to_value(&result)
            .map_err(|e| FingerprintError::Js(e.to_string()).into())
    }

    /// Collect locally and render digest plus signal table into the page.
    #[wasm_bindgen(js_name = renderFingerprint)]
    pub async fn render_fingerprint(options: JsValue) -> std::result::Result<(), JsValue> {
        let options = parse_options(options)?;
        let profile = options.widget_profile();
        let env = BrowserEnv::new();
        let (record, hash) = collect_digest(&env, profile).await;

        let sink = DomSink::new(&options.hash_element, &options.table_element);
        sink.render(&record, &hash)?;
        Ok(())
    }

    /// Collect locally, submit the digest and raw components to the relay,
    /// and render the service's answer.
    #[wasm_bindgen(js_name = submitFingerprint)]
    pub async fn submit_fingerprint(options: JsValue) -> std::result::Result<(), JsValue> {
        let options = parse_options(options)?;
        let profile = options.widget_profile();
        let env = BrowserEnv::new();
        let (record, hash) = collect_digest(&env, profile).await;

        let relay = match &options.endpoint {
            Some(endpoint) => RemoteRelay::new(endpoint.clone()),
            None => RemoteRelay::default(),
        };
        let sink = DomSink::new(&options.hash_element, &options.table_element);

        let components = serde_json::to_value(&record)
            .map_err(|e| FingerprintError::RelayMalformed(e.to_string()))?;
        match relay.submit_components(&hash, &components).await {
            Ok(report) => {
                sink.render_report(&report)?;
                // Follow-up analysis rows go below the submission's; the
                // submitted report stays on screen if this round fails.
                match relay.request_analysis(&report.fingerprint).await {
                    Ok(fields) => sink.append_fields(&fields)?,
                    Err(err) => log::warn!("analysis follow-up failed: {}", err),
                }
                Ok(())
            }
            Err(err) => {
                log::warn!("fingerprint submission failed: {}", err);
                sink.render_error(RELAY_ERROR_TEXT);
                Ok(())
            }
        }
    }

    /// Ask the remote relay for a fingerprint and render its answer. Relay
    /// failures degrade to the fixed error text in the hash element.
    #[wasm_bindgen(js_name = renderRemoteFingerprint)]
    pub async fn render_remote_fingerprint(options: JsValue) -> std::result::Result<(), JsValue> {
        let options = parse_options(options)?;
        let relay = match &options.endpoint {
            Some(endpoint) => RemoteRelay::new(endpoint.clone()),
            None => RemoteRelay::default(),
        };
        let sink = DomSink::new(&options.hash_element, &options.table_element);

        match relay.request_fingerprint().await {
            Ok(report) => {
                sink.render_report(&report)?;
                Ok(())
            }
            Err(err) => {
                log::warn!("relay request failed: {}", err);
                sink.render_error(RELAY_ERROR_TEXT);
                Ok(())
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    collect_fingerprint, render_fingerprint, render_remote_fingerprint, submit_fingerprint,
};
