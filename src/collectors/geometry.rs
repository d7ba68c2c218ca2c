//! Display geometry collectors: resolution, depths, orientation, pixel ratio.
//!
//! These properties are always defined in a real browser; the sentinels only
//! show up under stubbed or headless environments.

use super::UNKNOWN;
use crate::env::Environment;
use crate::signal::SignalValue;

pub fn screen_resolution(env: &dyn Environment) -> SignalValue {
    match env.screen_metrics() {
        Some(m) => SignalValue::str(format!("{}x{}", m.width, m.height)),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn available_screen_size(env: &dyn Environment) -> SignalValue {
    match env.screen_metrics() {
        Some(m) => SignalValue::str(format!("{}x{}", m.avail_width, m.avail_height)),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn color_depth(env: &dyn Environment) -> SignalValue {
    match env.screen_metrics() {
        Some(m) => SignalValue::Num(m.color_depth as f64),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn max_color_depth(env: &dyn Environment) -> SignalValue {
    match env.screen_metrics() {
        Some(m) => SignalValue::Num(m.pixel_depth as f64),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn device_pixel_ratio(env: &dyn Environment) -> SignalValue {
    match env.device_pixel_ratio() {
        Some(r) => SignalValue::Num(r),
        None => SignalValue::str(UNKNOWN),
    }
}

/// width / height to two decimal places, as a string.
pub fn aspect_ratio(env: &dyn Environment) -> SignalValue {
    match env.screen_metrics() {
        Some(m) if m.height > 0 => {
            SignalValue::str(format!("{:.2}", m.width as f64 / m.height as f64))
        }
        _ => SignalValue::str(UNKNOWN),
    }
}

pub fn orientation_type(env: &dyn Environment) -> SignalValue {
    match env.orientation() {
        Some(o) => SignalValue::Str(o.kind),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn orientation_angle(env: &dyn Environment) -> SignalValue {
    match env.orientation() {
        Some(o) => SignalValue::Num(o.angle),
        None => SignalValue::str(UNKNOWN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FakeEnv;

    #[test]
    fn aspect_ratio_formats_to_two_decimals() {
        let env = FakeEnv::default();
        assert_eq!(aspect_ratio(&env), SignalValue::str("1.78"));
    }

    #[test]
    fn missing_screen_degrades_to_unknown() {
        let mut env = FakeEnv::default();
        env.screen = None;
        assert_eq!(screen_resolution(&env), SignalValue::str(UNKNOWN));
        assert_eq!(color_depth(&env), SignalValue::str(UNKNOWN));
        assert_eq!(aspect_ratio(&env), SignalValue::str(UNKNOWN));
    }
}
