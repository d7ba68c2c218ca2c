//! Error types for the fingerprint widget
//!
//! The error surface here is deliberately small. The collection pipeline has
//! no fatal error class: a collector that cannot read its capability resolves
//! to a sentinel value locally and never surfaces an error. What remains is
//! the remote relay (HTTP status / malformed body) and the DOM sink (missing
//! mount points), both of which degrade to a fixed user-visible message.

use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Errors that can escape the widget's outer surfaces.
#[derive(Error, Debug, Clone)]
pub enum FingerprintError {
    /// The remote relay answered with a non-2xx status.
    #[error("relay returned HTTP {0}")]
    RelayStatus(u16),

    /// The relay body could not be parsed, or lacked the `fingerprint` field.
    #[error("relay response malformed: {0}")]
    RelayMalformed(String),

    /// A sink mount point (hash node or table body) is absent from the page.
    #[error("missing element #{0}")]
    MissingElement(String),

    /// An unexpected browser API failure outside any collector boundary.
    #[error("browser API error: {0}")]
    Js(String),
}

impl From<JsValue> for FingerprintError {
    fn from(value: JsValue) -> Self {
        let msg = value.as_string().unwrap_or_else(|| format!("{:?}", value));
        FingerprintError::Js(msg)
    }
}

impl From<FingerprintError> for JsValue {
    fn from(err: FingerprintError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
