//! Environment capability seam.
//!
//! Collectors never touch `window`/`navigator`/`document` directly; they read
//! through the [`Environment`] trait. [`BrowserEnv`] backs the trait with real
//! browser APIs, [`FakeEnv`] with fixed values so the whole pipeline can run
//! deterministically outside a browser.
//!
//! Every method follows the same availability contract: `Option`/`Result`
//! communicates "capability absent" or "probe failed", and the collector that
//! called it owns the sentinel substitution. Nothing here throws past the
//! trait boundary.

use async_trait::async_trait;

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod fake;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserEnv;
pub use fake::FakeEnv;

/// Raw screen geometry as the platform reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
    pub color_depth: u32,
    pub pixel_depth: u32,
}

/// `screen.orientation` type string plus angle.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationInfo {
    pub kind: String,
    pub angle: f64,
}

/// Experimental connection-information hints.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionInfo {
    pub effective_type: String,
    pub downlink: f64,
    pub rtt: f64,
    pub save_data: bool,
}

/// Outcome of the WebGL probe, before it is shaped into a signal.
#[derive(Debug, Clone, PartialEq)]
pub enum WebGlProbe {
    /// No WebGL context could be acquired.
    Unsupported,
    /// Context existed but setup or draw threw.
    Failed(String),
    /// Vendor/renderer are absent when the debug-renderer-info extension is
    /// withheld by the browser; the probe still succeeds without them.
    Report {
        vendor: Option<String>,
        renderer: Option<String>,
        image_hash: String,
    },
}

/// Oscillator waveforms used by the offline audio graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscShape {
    Triangle,
    Sawtooth,
}

/// One oscillator in an offline graph. `schedule_offset` is added to the
/// context's current time when scheduling the frequency ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct OscSpec {
    pub shape: OscShape,
    pub frequency: f32,
    pub schedule_offset: f64,
}

/// Fixed offline audio graph: oscillators into a shared gain stage, then a
/// dynamics compressor, then the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineGraphSpec {
    pub oscillators: Vec<OscSpec>,
    /// Gain value for the merge stage; `None` leaves the default (1.0).
    pub gain: Option<f32>,
}

/// What an offline render yields back to the reducing collector.
#[derive(Debug, Clone, PartialEq)]
pub struct OfflineAudioRendering {
    pub samples: Vec<f32>,
    /// threshold, knee, ratio, attack, release.
    pub compressor: [f32; 5],
    pub base_latency: f64,
}

/// The read-only view of the platform that collectors are allowed.
#[async_trait(?Send)]
pub trait Environment {
    fn screen_metrics(&self) -> Option<ScreenMetrics>;
    fn orientation(&self) -> Option<OrientationInfo>;
    fn device_pixel_ratio(&self) -> Option<f64>;

    fn hardware_concurrency(&self) -> Option<u32>;
    fn device_memory_gb(&self) -> Option<f64>;
    fn max_touch_points(&self) -> Option<i32>;
    fn platform(&self) -> Option<String>;
    fn user_agent(&self) -> Option<String>;
    fn language(&self) -> Option<String>;
    fn languages(&self) -> Vec<String>;
    fn keyboard_locale(&self) -> Option<String>;
    fn timezone_offset_minutes(&self) -> i32;

    /// `window.matchMedia(query).matches`; `None` when matchMedia is absent.
    fn media_query_matches(&self, query: &str) -> Option<bool>;
    fn color_gamut(&self) -> Option<String>;
    fn monochrome_depth(&self) -> Option<f64>;

    /// Whether a global constructor (e.g. `RTCPeerConnection`) is defined.
    fn global_defined(&self, name: &str) -> bool;
    /// Whether `window` carries the named property (e.g. `ontouchstart`).
    fn window_has(&self, name: &str) -> bool;
    /// Whether `navigator` carries the named property.
    fn navigator_has(&self, name: &str) -> bool;

    fn cookies_enabled(&self) -> Option<bool>;
    fn local_storage_writable(&self) -> bool;
    fn connection(&self) -> Option<ConnectionInfo>;
    fn performance_now(&self) -> f64;

    /// Render `sample` at 16px in `fallback`, then in `"candidate, fallback"`,
    /// returning both widths. The measurement element is created and removed
    /// per probe. `None` when there is no DOM to measure in.
    fn probe_font_widths(&self, candidate: &str, fallback: &str, sample: &str)
        -> Option<(f64, f64)>;

    /// Unmasked renderer string via the debug-renderer-info extension.
    fn gpu_model(&self) -> Option<String>;
    /// RGBA of the fixed canvas-2D probe pixel.
    fn canvas_pixel(&self) -> Option<[u8; 4]>;
    fn webgl_report(&self) -> WebGlProbe;

    async fn media_device_count(&self) -> Option<u32>;
    /// Live analyser probe: byte frequency bins after the fixed graph runs.
    async fn live_audio_bins(&self) -> std::result::Result<Vec<u8>, String>;
    /// Render the given offline graph to completion.
    async fn render_offline_audio(
        &self,
        spec: &OfflineGraphSpec,
    ) -> std::result::Result<OfflineAudioRendering, String>;
}
