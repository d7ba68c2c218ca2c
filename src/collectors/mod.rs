//! Signal collectors.
//!
//! One parameterized collector set replaces the duplicated probe code the
//! historical widget scripts carried: every probe is a [`CollectorKind`], and
//! a profile is just an ordered list of (key, kind) registrations. Collectors
//! are total: a missing capability or a failed probe resolves to a sentinel
//! inside the collector, never an error in the pipeline.

pub mod audio;
pub mod canvas;
pub mod fonts;
pub mod geometry;
pub mod hardware;
pub mod media_queries;
pub mod network;
pub mod webgl;

use crate::env::Environment;
use crate::signal::{FingerprintRecord, SignalValue};

/// Sentinel for scalar capabilities the runtime does not expose.
pub const UNKNOWN: &str = "Unknown";

/// Every probe the widget knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorKind {
    Platform,
    DeviceMemory,
    ScreenResolution,
    AvailableScreenSize,
    ColorDepth,
    MaxColorDepth,
    TimezoneOffset,
    HardwareConcurrency,
    MaxTouchPoints,
    DevicePixelRatio,
    TouchSupport,
    ScreenOrientation,
    ScreenOrientationAngle,
    ColorGamut,
    MonochromeDepth,
    PointerCapabilities,
    DeviceType,
    NavigatorLanguage,
    SystemLanguage,
    DeviceAspectRatio,
    PreferredContrast,
    PrefersReducedMotion,
    PrefersColorScheme,
    MotionSupport,
    OrientationSupport,
    CookiesEnabled,
    LocalStorageAvailable,
    KeyboardLocale,
    MathFingerprint,
    VirtualKeyboardSupport,
    ForceTouchSupport,
    WebRtcSupported,
    NetworkInfo,
    GpuModel,
    InstalledFonts,
    CanvasPixel,
    WebGlReport,
    AudioAnalyser,
    AudioOffline,
    AudioOfflineJittered,
    MediaDevicesCount,
}

/// One entry of a profile: the record key plus the probe behind it. Several
/// legacy keys (`cpuThreads`, `logicalProcessors`, ...) deliberately map to
/// the same kind.
#[derive(Debug, Clone, Copy)]
pub struct RegisteredCollector {
    pub key: &'static str,
    pub kind: CollectorKind,
}

/// Run one collector against the environment.
pub async fn run(kind: CollectorKind, env: &dyn Environment) -> SignalValue {
    use CollectorKind::*;
    match kind {
        Platform => hardware::platform(env),
        DeviceMemory => hardware::device_memory(env),
        ScreenResolution => geometry::screen_resolution(env),
        AvailableScreenSize => geometry::available_screen_size(env),
        ColorDepth => geometry::color_depth(env),
        MaxColorDepth => geometry::max_color_depth(env),
        TimezoneOffset => hardware::timezone_offset(env),
        HardwareConcurrency => hardware::hardware_concurrency(env),
        MaxTouchPoints => hardware::max_touch_points(env),
        DevicePixelRatio => geometry::device_pixel_ratio(env),
        TouchSupport => hardware::touch_support(env),
        ScreenOrientation => geometry::orientation_type(env),
        ScreenOrientationAngle => geometry::orientation_angle(env),
        ColorGamut => media_queries::color_gamut(env),
        MonochromeDepth => media_queries::monochrome_depth(env),
        PointerCapabilities => hardware::pointer_capabilities(env),
        DeviceType => hardware::device_type(env),
        NavigatorLanguage => hardware::navigator_language(env),
        SystemLanguage => hardware::system_language(env),
        DeviceAspectRatio => geometry::aspect_ratio(env),
        PreferredContrast => media_queries::preferred_contrast(env),
        PrefersReducedMotion => media_queries::prefers_reduced_motion(env),
        PrefersColorScheme => media_queries::prefers_color_scheme(env),
        MotionSupport => hardware::motion_support(env),
        OrientationSupport => hardware::orientation_support(env),
        CookiesEnabled => network::cookies_enabled(env),
        LocalStorageAvailable => network::local_storage_available(env),
        KeyboardLocale => hardware::keyboard_locale(env),
        MathFingerprint => hardware::math_fingerprint(),
        VirtualKeyboardSupport => hardware::virtual_keyboard_support(env),
        ForceTouchSupport => hardware::force_touch_support(env),
        WebRtcSupported => hardware::webrtc_supported(env),
        NetworkInfo => network::connection_signal(env),
        GpuModel => webgl::gpu_model_signal(env),
        InstalledFonts => fonts::installed_fonts(env),
        CanvasPixel => canvas::pixel_signal(env),
        WebGlReport => webgl::report_signal(env.webgl_report()),
        AudioAnalyser => audio::analyser_signal(env).await,
        AudioOffline => audio::offline_signal(env).await,
        AudioOfflineJittered => audio::jittered_signal(env).await,
        MediaDevicesCount => network::media_devices_signal(env).await,
    }
}

/// Run a profile's collectors sequentially and assemble the ordered record.
/// Collectors own their scaffolding exclusively while they run, so there is
/// nothing to coordinate between them.
pub async fn collect_all(
    env: &dyn Environment,
    collectors: &[RegisteredCollector],
) -> FingerprintRecord {
    let mut record = FingerprintRecord::new();
    for registered in collectors {
        let value = run(registered.kind, env).await;
        record.push(registered.key, value);
    }
    log::debug!("collected {} signals", record.len());
    record
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn js_err(e: wasm_bindgen::JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}
