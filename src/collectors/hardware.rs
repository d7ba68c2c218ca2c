//! Hardware and locale collectors: concurrency, memory, touch, languages,
//! timezone, and the capability flags the exhaustive profile records.

use super::UNKNOWN;
use crate::env::Environment;
use crate::signal::SignalValue;

/// First whitespace-separated token of `navigator.platform`.
pub fn platform(env: &dyn Environment) -> SignalValue {
    match env.platform() {
        Some(p) => match p.split_whitespace().next() {
            Some(token) => SignalValue::str(token),
            None => SignalValue::str(UNKNOWN),
        },
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn device_memory(env: &dyn Environment) -> SignalValue {
    match env.device_memory_gb() {
        Some(gb) => SignalValue::Num(gb),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn hardware_concurrency(env: &dyn Environment) -> SignalValue {
    match env.hardware_concurrency() {
        Some(n) => SignalValue::Num(n as f64),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn max_touch_points(env: &dyn Environment) -> SignalValue {
    match env.max_touch_points() {
        Some(n) => SignalValue::Num(n as f64),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn touch_support(env: &dyn Environment) -> SignalValue {
    let points = env.max_touch_points().unwrap_or(0);
    SignalValue::Bool(env.window_has("ontouchstart") || points > 0)
}

pub fn pointer_capabilities(env: &dyn Environment) -> SignalValue {
    if env.max_touch_points().unwrap_or(0) > 0 {
        SignalValue::str("Touch")
    } else {
        SignalValue::str("Mouse")
    }
}

/// "Mobile" when the UA carries a mobile marker, "Desktop" otherwise.
pub fn device_type(env: &dyn Environment) -> SignalValue {
    let mobile = env
        .user_agent()
        .map(|ua| {
            let ua = ua.to_ascii_lowercase();
            ua.contains("mobi") || ua.contains("android")
        })
        .unwrap_or(false);
    SignalValue::str(if mobile { "Mobile" } else { "Desktop" })
}

/// First entry of `navigator.languages`, then `navigator.language`.
pub fn navigator_language(env: &dyn Environment) -> SignalValue {
    if let Some(first) = env.languages().into_iter().next() {
        return SignalValue::Str(first);
    }
    match env.language() {
        Some(lang) => SignalValue::Str(lang),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn system_language(env: &dyn Environment) -> SignalValue {
    match env.language() {
        Some(lang) => SignalValue::Str(lang),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn keyboard_locale(env: &dyn Environment) -> SignalValue {
    match env.keyboard_locale() {
        Some(locale) => SignalValue::Str(locale),
        None => SignalValue::str(UNKNOWN),
    }
}

pub fn timezone_offset(env: &dyn Environment) -> SignalValue {
    SignalValue::Num(env.timezone_offset_minutes() as f64)
}

/// Four fixed math expressions at 15 decimal places; libm rounding differences
/// between engines are the signal.
pub fn math_fingerprint() -> SignalValue {
    let values = [
        0.123456789_f64.acos(),
        (-1e300_f64).sin(),
        2.0_f64.sqrt(),
        1000.0_f64.log10(),
    ];
    let joined = values
        .iter()
        .map(|v| format!("{:.15}", v))
        .collect::<Vec<_>>()
        .join(",");
    SignalValue::Str(joined)
}

pub fn motion_support(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(env.global_defined("DeviceMotionEvent"))
}

pub fn orientation_support(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(env.global_defined("DeviceOrientationEvent"))
}

pub fn webrtc_supported(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(env.global_defined("RTCPeerConnection"))
}

pub fn virtual_keyboard_support(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(env.navigator_has("virtualKeyboard"))
}

pub fn force_touch_support(env: &dyn Environment) -> SignalValue {
    SignalValue::Bool(
        env.window_has("ontouchforcechange") || env.window_has("onwebkitmouseforcechanged"),
    )
}
