//! Deterministic stub environment.
//!
//! Every capability returns a fixed, configurable value, which makes the full
//! collect → canonicalize → digest pipeline reproducible outside a browser.
//! Defaults model a plain 1920x1080 Linux desktop.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::{
    ConnectionInfo, Environment, OfflineAudioRendering, OfflineGraphSpec, OrientationInfo,
    ScreenMetrics, WebGlProbe,
};

#[derive(Debug, Clone)]
pub struct FakeEnv {
    pub screen: Option<ScreenMetrics>,
    pub orientation: Option<OrientationInfo>,
    pub device_pixel_ratio: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub device_memory_gb: Option<f64>,
    pub max_touch_points: Option<i32>,
    pub platform: Option<String>,
    pub user_agent: Option<String>,
    pub language: Option<String>,
    pub languages: Vec<String>,
    pub keyboard_locale: Option<String>,
    pub timezone_offset_minutes: i32,
    /// Media queries that match; anything absent reports `false`.
    pub matching_media_queries: HashSet<String>,
    /// When false, `media_query_matches` reports the capability as absent.
    pub match_media_available: bool,
    pub color_gamut: Option<String>,
    pub monochrome_depth: Option<f64>,
    pub globals: HashSet<String>,
    pub window_properties: HashSet<String>,
    pub navigator_properties: HashSet<String>,
    pub cookies_enabled: Option<bool>,
    pub local_storage_writable: bool,
    pub connection: Option<ConnectionInfo>,
    /// Font-family stack → measured width in px.
    pub font_widths: HashMap<String, f64>,
    pub gpu_model: Option<String>,
    pub canvas_pixel: Option<[u8; 4]>,
    pub webgl: WebGlProbe,
    pub media_device_count: Option<u32>,
    pub live_audio_bins: std::result::Result<Vec<u8>, String>,
    pub offline_audio: std::result::Result<OfflineAudioRendering, String>,
    now_ms: Cell<f64>,
}

impl Default for FakeEnv {
    fn default() -> Self {
        let mut font_widths = HashMap::new();
        font_widths.insert("sans-serif".to_string(), 120.0);
        font_widths.insert("Arial, sans-serif".to_string(), 140.0);
        font_widths.insert("Georgia, sans-serif".to_string(), 131.0);

        FakeEnv {
            screen: Some(ScreenMetrics {
                width: 1920,
                height: 1080,
                avail_width: 1920,
                avail_height: 1040,
                color_depth: 24,
                pixel_depth: 24,
            }),
            orientation: Some(OrientationInfo {
                kind: "landscape-primary".to_string(),
                angle: 0.0,
            }),
            device_pixel_ratio: Some(1.0),
            hardware_concurrency: Some(8),
            device_memory_gb: Some(8.0),
            max_touch_points: Some(0),
            platform: Some("Linux x86_64".to_string()),
            user_agent: Some(
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                 Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            language: Some("en-US".to_string()),
            languages: vec!["en-US".to_string(), "en".to_string()],
            keyboard_locale: Some("en-US".to_string()),
            timezone_offset_minutes: 0,
            matching_media_queries: HashSet::new(),
            match_media_available: true,
            color_gamut: None,
            monochrome_depth: None,
            globals: ["DeviceMotionEvent", "DeviceOrientationEvent", "RTCPeerConnection"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            window_properties: HashSet::new(),
            navigator_properties: HashSet::new(),
            cookies_enabled: Some(true),
            local_storage_writable: true,
            connection: Some(ConnectionInfo {
                effective_type: "4g".to_string(),
                downlink: 10.0,
                rtt: 50.0,
                save_data: false,
            }),
            font_widths,
            gpu_model: Some("ANGLE (Intel, Mesa Intel(R) UHD Graphics)".to_string()),
            canvas_pixel: Some([255, 0, 0, 255]),
            webgl: WebGlProbe::Report {
                vendor: Some("Google Inc. (Intel)".to_string()),
                renderer: Some("ANGLE (Intel, Mesa Intel(R) UHD Graphics)".to_string()),
                image_hash: "AAAB9JZUAABJRU5ErkJggg==".to_string(),
            },
            media_device_count: Some(3),
            live_audio_bins: Ok(vec![0, 12, 48, 96, 48, 12, 0, 0]),
            offline_audio: Ok(OfflineAudioRendering {
                samples: vec![0.0, 0.25, -0.5, 0.125],
                compressor: [-24.0, 30.0, 12.0, 0.003, 0.25],
                base_latency: 0.0001,
            }),
            now_ms: Cell::new(1000.0),
        }
    }
}

#[async_trait(?Send)]
impl Environment for FakeEnv {
    fn screen_metrics(&self) -> Option<ScreenMetrics> {
        self.screen
    }

    fn orientation(&self) -> Option<OrientationInfo> {
        self.orientation.clone()
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn hardware_concurrency(&self) -> Option<u32> {
        self.hardware_concurrency
    }

    fn device_memory_gb(&self) -> Option<f64> {
        self.device_memory_gb
    }

    fn max_touch_points(&self) -> Option<i32> {
        self.max_touch_points
    }

    fn platform(&self) -> Option<String> {
        self.platform.clone()
    }

    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn languages(&self) -> Vec<String> {
        self.languages.clone()
    }

    fn keyboard_locale(&self) -> Option<String> {
        self.keyboard_locale.clone()
    }

    fn timezone_offset_minutes(&self) -> i32 {
        self.timezone_offset_minutes
    }

    fn media_query_matches(&self, query: &str) -> Option<bool> {
        if !self.match_media_available {
            return None;
        }
        Some(self.matching_media_queries.contains(query))
    }

    fn color_gamut(&self) -> Option<String> {
        self.color_gamut.clone()
    }

    fn monochrome_depth(&self) -> Option<f64> {
        self.monochrome_depth
    }

    fn global_defined(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    fn window_has(&self, name: &str) -> bool {
        self.window_properties.contains(name)
    }

    fn navigator_has(&self, name: &str) -> bool {
        self.navigator_properties.contains(name)
    }

    fn cookies_enabled(&self) -> Option<bool> {
        self.cookies_enabled
    }

    fn local_storage_writable(&self) -> bool {
        self.local_storage_writable
    }

    fn connection(&self) -> Option<ConnectionInfo> {
        self.connection.clone()
    }

    fn performance_now(&self) -> f64 {
        // Advances a little per read so elapsed-time math stays sane.
        let now = self.now_ms.get();
        self.now_ms.set(now + 0.5);
        now
    }

    fn probe_font_widths(
        &self,
        candidate: &str,
        fallback: &str,
        _sample: &str,
    ) -> Option<(f64, f64)> {
        let base = *self.font_widths.get(fallback)?;
        let stacked = format!("{}, {}", candidate, fallback);
        let with_candidate = self.font_widths.get(&stacked).copied().unwrap_or(base);
        Some((base, with_candidate))
    }

    fn gpu_model(&self) -> Option<String> {
        self.gpu_model.clone()
    }

    fn canvas_pixel(&self) -> Option<[u8; 4]> {
        self.canvas_pixel
    }

    fn webgl_report(&self) -> WebGlProbe {
        self.webgl.clone()
    }

    async fn media_device_count(&self) -> Option<u32> {
        self.media_device_count
    }

    async fn live_audio_bins(&self) -> std::result::Result<Vec<u8>, String> {
        self.live_audio_bins.clone()
    }

    async fn render_offline_audio(
        &self,
        _spec: &OfflineGraphSpec,
    ) -> std::result::Result<OfflineAudioRendering, String> {
        self.offline_audio.clone()
    }
}
