//! Installed-font detection via text-measurement.
//!
//! A fixed sample string is rendered at 16px in the generic fallback family,
//! then in `"<candidate>, <fallback>"`; a strict width mismatch means the
//! candidate resolved to a real font. False negatives are possible when a
//! candidate shares metrics with the fallback; that approximation is part of
//! the signal's definition and is preserved as-is.

use crate::env::Environment;
use crate::signal::SignalValue;

/// Candidate list, in detection order. The order is part of the signal.
pub const CANDIDATE_FONTS: &[&str] = &[
    "Arial",
    "Verdana",
    "Times New Roman",
    "Courier New",
    "Comic Sans MS",
    "Georgia",
    "Impact",
    "Trebuchet MS",
    "Palatino Linotype",
    "Tahoma",
    "Century Gothic",
    "Lucida Console",
    "Lucida Sans",
    "Garamond",
    "Franklin Gothic Medium",
];

pub const FALLBACK_FONT: &str = "sans-serif";

pub const SAMPLE_TEXT: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The ordered subsequence of candidates whose measured width differs from
/// the fallback's.
pub fn detect(env: &dyn Environment) -> Vec<String> {
    CANDIDATE_FONTS
        .iter()
        .filter_map(|candidate| {
            let (base, with_candidate) =
                env.probe_font_widths(candidate, FALLBACK_FONT, SAMPLE_TEXT)?;
            (with_candidate != base).then(|| candidate.to_string())
        })
        .collect()
}

pub fn installed_fonts(env: &dyn Environment) -> SignalValue {
    SignalValue::List(detect(env))
}

/// Browser-side measurement: one hidden span per probe, created and removed
/// before the probe returns so nothing leaks into the page.
#[cfg(target_arch = "wasm32")]
pub(crate) mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlElement;

    pub fn probe_widths(candidate: &str, fallback: &str, sample: &str) -> Option<(f64, f64)> {
        let document = web_sys::window()?.document()?;
        let body = document.body()?;

        let span: HtmlElement = document.create_element("span").ok()?.dyn_into().ok()?;
        let style = span.style();
        style.set_property("font-family", fallback).ok()?;
        style.set_property("font-size", "16px").ok()?;
        style.set_property("position", "absolute").ok()?;
        style.set_property("visibility", "hidden").ok()?;
        span.set_text_content(Some(sample));

        body.append_child(&span).ok()?;
        let base = span.offset_width() as f64;

        let stacked = format!("{}, {}", candidate, fallback);
        let result = style
            .set_property("font-family", &stacked)
            .ok()
            .map(|_| (base, span.offset_width() as f64));

        let _ = body.remove_child(&span);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FakeEnv;
    use std::collections::HashMap;

    #[test]
    fn width_mismatch_means_installed() {
        let mut env = FakeEnv::default();
        env.font_widths = HashMap::from([
            ("sans-serif".to_string(), 120.0),
            ("Arial, sans-serif".to_string(), 140.0),
            ("FakeFontXYZ, sans-serif".to_string(), 120.0),
        ]);
        let detected = detect(&env);
        assert_eq!(detected, vec!["Arial".to_string()]);
    }

    #[test]
    fn no_measurement_surface_means_no_fonts() {
        let mut env = FakeEnv::default();
        env.font_widths.clear();
        assert!(detect(&env).is_empty());
    }

    #[test]
    fn detection_preserves_candidate_order() {
        let mut env = FakeEnv::default();
        env.font_widths = HashMap::from([
            ("sans-serif".to_string(), 100.0),
            ("Georgia, sans-serif".to_string(), 111.0),
            ("Arial, sans-serif".to_string(), 108.0),
            ("Tahoma, sans-serif".to_string(), 102.0),
        ]);
        let detected = detect(&env);
        // Arial precedes Georgia precedes Tahoma in the candidate list.
        assert_eq!(detected, vec!["Arial", "Georgia", "Tahoma"]);
    }
}
