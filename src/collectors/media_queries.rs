//! Preference media queries plus the colorGamut/monochrome navigator hints.
//!
//! The media-query collectors fold "matchMedia absent" into the non-matching
//! branch: the signal is a preference string, not an availability report.

use super::UNKNOWN;
use crate::env::Environment;
use crate::signal::SignalValue;

pub const CONTRAST_QUERY: &str = "(prefers-contrast: more)";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const COLOR_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub fn preferred_contrast(env: &dyn Environment) -> SignalValue {
    let matches = env.media_query_matches(CONTRAST_QUERY).unwrap_or(false);
    SignalValue::str(if matches { "High" } else { "Normal" })
}

pub fn prefers_reduced_motion(env: &dyn Environment) -> SignalValue {
    let matches = env.media_query_matches(REDUCED_MOTION_QUERY).unwrap_or(false);
    SignalValue::str(if matches { "Reduce" } else { "No-preference" })
}

pub fn prefers_color_scheme(env: &dyn Environment) -> SignalValue {
    let matches = env.media_query_matches(COLOR_SCHEME_QUERY).unwrap_or(false);
    SignalValue::str(if matches { "Dark" } else { "Light" })
}

pub fn color_gamut(env: &dyn Environment) -> SignalValue {
    match env.color_gamut() {
        Some(g) => SignalValue::Str(g),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn monochrome_depth(env: &dyn Environment) -> SignalValue {
    match env.monochrome_depth() {
        Some(d) => SignalValue::Num(d),
        None => SignalValue::str(UNKNOWN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FakeEnv;

    #[test]
    fn preferences_report_the_non_matching_branch_by_default() {
        let env = FakeEnv::default();
        assert_eq!(preferred_contrast(&env), SignalValue::str("Normal"));
        assert_eq!(prefers_reduced_motion(&env), SignalValue::str("No-preference"));
        assert_eq!(prefers_color_scheme(&env), SignalValue::str("Light"));
    }

    #[test]
    fn matching_queries_flip_the_preference() {
        let mut env = FakeEnv::default();
        env.matching_media_queries.insert(COLOR_SCHEME_QUERY.to_string());
        env.matching_media_queries.insert(REDUCED_MOTION_QUERY.to_string());
        assert_eq!(prefers_color_scheme(&env), SignalValue::str("Dark"));
        assert_eq!(prefers_reduced_motion(&env), SignalValue::str("Reduce"));
    }

    #[test]
    fn absent_match_media_degrades_like_a_non_match() {
        let mut env = FakeEnv::default();
        env.match_media_available = false;
        assert_eq!(preferred_contrast(&env), SignalValue::str("Normal"));
    }
}
