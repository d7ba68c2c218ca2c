//! Widget profiles.
//!
//! Each historical generation of the widget shipped a different ordered set
//! of signals, and key order is part of a generation's identity: the digest
//! of a device under `Baseline` has nothing to do with its digest under
//! `Extended`. A profile is therefore the ordered collector registrations
//! plus the canonicalization policy its generation used.

use crate::canonical::CanonicalPolicy;
use crate::collectors::{CollectorKind as K, RegisteredCollector};

/// One widget generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetProfile {
    /// Scalar hardware/locale signals, fonts, GPU model, connection hints.
    Baseline,
    /// Adds the WebGL report, live audio probe, and color-scheme preference.
    #[default]
    Extended,
    /// Capability flags, canvas pixel, math fingerprint, offline audio, plus
    /// the baseline tail. Structured canonicalization.
    Exhaustive,
    /// `Exhaustive` with the timing-jittered audio probe: more entropy, at
    /// the cost of run-to-run determinism.
    ExhaustiveJittered,
}

const fn c(key: &'static str, kind: K) -> RegisteredCollector {
    RegisteredCollector { key, kind }
}

static BASELINE: &[RegisteredCollector] = &[
    c("platform", K::Platform),
    c("deviceMemory", K::DeviceMemory),
    c("screenResolution", K::ScreenResolution),
    c("colorDepth", K::ColorDepth),
    c("timezoneOffset", K::TimezoneOffset),
    c("hardwareConcurrency", K::HardwareConcurrency),
    c("maxTouchPoints", K::MaxTouchPoints),
    c("devicePixelRatio", K::DevicePixelRatio),
    c("logicalProcessors", K::HardwareConcurrency),
    c("touchSupport", K::TouchSupport),
    c("screenOrientation", K::ScreenOrientation),
    c("colorGamut", K::ColorGamut),
    c("monochromeDepth", K::MonochromeDepth),
    c("pointerCapabilities", K::PointerCapabilities),
    c("deviceType", K::DeviceType),
    c("navigatorLanguage", K::NavigatorLanguage),
    c("cpuThreads", K::HardwareConcurrency),
    c("hardwareConcurrencyLevel", K::HardwareConcurrency),
    c("deviceAspectRatio", K::DeviceAspectRatio),
    c("maxColorDepth", K::MaxColorDepth),
    c("preferredContrast", K::PreferredContrast),
    c("prefersReducedMotion", K::PrefersReducedMotion),
    c("installedFonts", K::InstalledFonts),
    c("gpuModel", K::GpuModel),
    c("networkInfo", K::NetworkInfo),
];

static EXTENDED: &[RegisteredCollector] = &[
    c("screenResolution", K::ScreenResolution),
    c("colorDepth", K::ColorDepth),
    c("timezoneOffset", K::TimezoneOffset),
    c("hardwareConcurrency", K::HardwareConcurrency),
    c("devicePixelRatio", K::DevicePixelRatio),
    c("availableScreenSize", K::AvailableScreenSize),
    c("touchSupport", K::TouchSupport),
    c("maxTouchPoints", K::MaxTouchPoints),
    c("deviceMemory", K::DeviceMemory),
    c("screenOrientation", K::ScreenOrientation),
    c("deviceAspectRatio", K::DeviceAspectRatio),
    c("systemLanguage", K::SystemLanguage),
    c("preferredContrast", K::PreferredContrast),
    c("prefersReducedMotion", K::PrefersReducedMotion),
    c("prefersColorScheme", K::PrefersColorScheme),
    c("installedFonts", K::InstalledFonts),
    c("webglFingerprint", K::WebGlReport),
    c("audioFingerprint", K::AudioAnalyser),
];

static EXHAUSTIVE_HEAD: &[RegisteredCollector] = &[
    c("motionSupport", K::MotionSupport),
    c("orientationSupport", K::OrientationSupport),
];

static EXHAUSTIVE_TAIL: &[RegisteredCollector] = &[
    c("mediaDevicesCount", K::MediaDevicesCount),
    c("cookiesEnabled", K::CookiesEnabled),
    c("localStorageAvailable", K::LocalStorageAvailable),
    c("imageRendering", K::CanvasPixel),
    c("webRTCSupported", K::WebRtcSupported),
    c("keyboardLocale", K::KeyboardLocale),
    c("mathFingerprint", K::MathFingerprint),
    c("virtualKeyboardSupport", K::VirtualKeyboardSupport),
    c("forceTouchSupport", K::ForceTouchSupport),
    c("platform", K::Platform),
    c("screenOrientationAngle", K::ScreenOrientationAngle),
    c("deviceMemory", K::DeviceMemory),
    c("screenResolution", K::ScreenResolution),
    c("colorDepth", K::ColorDepth),
    c("timezoneOffset", K::TimezoneOffset),
    c("hardwareConcurrency", K::HardwareConcurrency),
    c("maxTouchPoints", K::MaxTouchPoints),
    c("devicePixelRatio", K::DevicePixelRatio),
    c("logicalProcessors", K::HardwareConcurrency),
    c("touchSupport", K::TouchSupport),
    c("screenOrientation", K::ScreenOrientation),
    c("colorGamut", K::ColorGamut),
    c("monochromeDepth", K::MonochromeDepth),
    c("pointerCapabilities", K::PointerCapabilities),
    c("deviceType", K::DeviceType),
    c("navigatorLanguage", K::NavigatorLanguage),
    c("cpuThreads", K::HardwareConcurrency),
    c("hardwareConcurrencyLevel", K::HardwareConcurrency),
    c("deviceAspectRatio", K::DeviceAspectRatio),
    c("maxColorDepth", K::MaxColorDepth),
    c("preferredContrast", K::PreferredContrast),
    c("prefersReducedMotion", K::PrefersReducedMotion),
    c("installedFonts", K::InstalledFonts),
    c("gpuModel", K::GpuModel),
];

impl WidgetProfile {
    /// Parse a profile name from the JS options object.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "baseline" => Some(WidgetProfile::Baseline),
            "extended" => Some(WidgetProfile::Extended),
            "exhaustive" => Some(WidgetProfile::Exhaustive),
            "exhaustive-jittered" => Some(WidgetProfile::ExhaustiveJittered),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WidgetProfile::Baseline => "baseline",
            WidgetProfile::Extended => "extended",
            WidgetProfile::Exhaustive => "exhaustive",
            WidgetProfile::ExhaustiveJittered => "exhaustive-jittered",
        }
    }

    /// Ordered collector registrations for this generation.
    pub fn collectors(&self) -> Vec<RegisteredCollector> {
        match self {
            WidgetProfile::Baseline => BASELINE.to_vec(),
            WidgetProfile::Extended => EXTENDED.to_vec(),
            WidgetProfile::Exhaustive | WidgetProfile::ExhaustiveJittered => {
                let audio = if *self == WidgetProfile::Exhaustive {
                    K::AudioOffline
                } else {
                    K::AudioOfflineJittered
                };
                let mut list = Vec::with_capacity(
                    EXHAUSTIVE_HEAD.len() + 1 + EXHAUSTIVE_TAIL.len(),
                );
                list.extend_from_slice(EXHAUSTIVE_HEAD);
                list.push(c("audioFingerprint", audio));
                list.extend_from_slice(EXHAUSTIVE_TAIL);
                list
            }
        }
    }

    pub fn policy(&self) -> CanonicalPolicy {
        match self {
            WidgetProfile::Baseline | WidgetProfile::Extended => CanonicalPolicy::JoinedLists,
            WidgetProfile::Exhaustive | WidgetProfile::ExhaustiveJittered => {
                CanonicalPolicy::Structured
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for profile in [
            WidgetProfile::Baseline,
            WidgetProfile::Extended,
            WidgetProfile::Exhaustive,
            WidgetProfile::ExhaustiveJittered,
        ] {
            assert_eq!(WidgetProfile::from_name(profile.name()), Some(profile));
        }
        assert_eq!(WidgetProfile::from_name("nope"), None);
    }

    #[test]
    fn extended_registers_webgl_and_audio_last() {
        let collectors = WidgetProfile::Extended.collectors();
        let keys: Vec<_> = collectors.iter().map(|r| r.key).collect();
        assert_eq!(keys.first(), Some(&"screenResolution"));
        assert_eq!(
            &keys[keys.len() - 2..],
            &["webglFingerprint", "audioFingerprint"]
        );
    }

    #[test]
    fn jittered_variant_differs_only_in_the_audio_kind() {
        let plain = WidgetProfile::Exhaustive.collectors();
        let jittered = WidgetProfile::ExhaustiveJittered.collectors();
        assert_eq!(plain.len(), jittered.len());
        for (a, b) in plain.iter().zip(jittered.iter()) {
            assert_eq!(a.key, b.key);
        }
        let audio = |list: &[RegisteredCollector]| {
            list.iter()
                .find(|r| r.key == "audioFingerprint")
                .map(|r| r.kind)
        };
        assert_eq!(audio(&plain), Some(K::AudioOffline));
        assert_eq!(audio(&jittered), Some(K::AudioOfflineJittered));
    }
}
