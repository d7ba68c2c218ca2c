//! Real-browser environment.
//!
//! Scalar reads go through web-sys where the binding is stable and through
//! `Reflect` for the fringe properties (`deviceMemory`, `connection`, vendor
//! prefixes) that only some engines expose. Awaiting probes are raced against
//! a timer so a stalled browser API degrades to a sentinel instead of hanging
//! the pipeline.

use async_trait::async_trait;
use futures::future::Either;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

use crate::collectors;

use super::{
    ConnectionInfo, Environment, OfflineAudioRendering, OfflineGraphSpec, OrientationInfo,
    ScreenMetrics, WebGlProbe,
};

/// Audio rendering that has not completed by then counts as unsupported.
pub const AUDIO_RENDER_TIMEOUT_MS: u32 = 3_000;
/// Device enumeration gets less: it normally answers within a frame.
pub const DEVICE_ENUM_TIMEOUT_MS: u32 = 2_000;

const LOCAL_STORAGE_PROBE_KEY: &str = "__fp_probe";

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEnv;

impl BrowserEnv {
    pub fn new() -> Self {
        BrowserEnv
    }
}

fn window() -> Option<Window> {
    web_sys::window()
}

/// Pin down the `AsRef<JsValue>` impl; web-sys types carry one per ancestor.
fn as_js<T: AsRef<JsValue>>(value: &T) -> &JsValue {
    value.as_ref()
}

fn get(target: &JsValue, name: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn get_f64(target: &JsValue, name: &str) -> Option<f64> {
    get(target, name)?.as_f64()
}

fn screen_object() -> Option<JsValue> {
    get(as_js(&window()?), "screen")
}

/// Race a future against a timer; `None` on timeout.
async fn bounded<F, T>(fut: F, timeout_ms: u32) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    let timeout = TimeoutFuture::new(timeout_ms);
    futures::pin_mut!(fut);
    futures::pin_mut!(timeout);
    match futures::future::select(fut, timeout).await {
        Either::Left((value, _)) => Some(value),
        Either::Right(_) => None,
    }
}

#[async_trait(?Send)]
impl Environment for BrowserEnv {
    fn screen_metrics(&self) -> Option<ScreenMetrics> {
        let screen = screen_object()?;
        Some(ScreenMetrics {
            width: get_f64(&screen, "width")? as u32,
            height: get_f64(&screen, "height")? as u32,
            avail_width: get_f64(&screen, "availWidth").unwrap_or(0.0) as u32,
            avail_height: get_f64(&screen, "availHeight").unwrap_or(0.0) as u32,
            color_depth: get_f64(&screen, "colorDepth").unwrap_or(0.0) as u32,
            pixel_depth: get_f64(&screen, "pixelDepth").unwrap_or(0.0) as u32,
        })
    }

    fn orientation(&self) -> Option<OrientationInfo> {
        let orientation = get(&screen_object()?, "orientation")?;
        Some(OrientationInfo {
            kind: get(&orientation, "type")?.as_string()?,
            angle: get_f64(&orientation, "angle").unwrap_or(0.0),
        })
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        Some(window()?.device_pixel_ratio())
    }

    fn hardware_concurrency(&self) -> Option<u32> {
        let n = window()?.navigator().hardware_concurrency();
        (n > 0.0).then(|| n as u32)
    }

    fn device_memory_gb(&self) -> Option<f64> {
        get_f64(as_js(&window()?.navigator()), "deviceMemory")
    }

    fn max_touch_points(&self) -> Option<i32> {
        Some(window()?.navigator().max_touch_points())
    }

    fn platform(&self) -> Option<String> {
        window()?.navigator().platform().ok()
    }

    fn user_agent(&self) -> Option<String> {
        window()?.navigator().user_agent().ok()
    }

    fn language(&self) -> Option<String> {
        window()?.navigator().language()
    }

    fn languages(&self) -> Vec<String> {
        match window() {
            Some(w) => w
                .navigator()
                .languages()
                .iter()
                .filter_map(|v| v.as_string())
                .collect(),
            None => Vec::new(),
        }
    }

    fn keyboard_locale(&self) -> Option<String> {
        let format = js_sys::Intl::DateTimeFormat::new(&js_sys::Array::new(), &Object::new());
        get(as_js(&format.resolved_options()), "locale")?.as_string()
    }

    fn timezone_offset_minutes(&self) -> i32 {
        js_sys::Date::new_0().get_timezone_offset() as i32
    }

    fn media_query_matches(&self, query: &str) -> Option<bool> {
        Some(window()?.match_media(query).ok()??.matches())
    }

    fn color_gamut(&self) -> Option<String> {
        get(as_js(&window()?.navigator()), "colorGamut")?.as_string()
    }

    fn monochrome_depth(&self) -> Option<f64> {
        get_f64(as_js(&window()?.navigator()), "monochrome")
    }

    fn global_defined(&self, name: &str) -> bool {
        get(&js_sys::global().into(), name).is_some()
    }

    fn window_has(&self, name: &str) -> bool {
        match window() {
            Some(w) => Reflect::has(as_js(&w), &JsValue::from_str(name)).unwrap_or(false),
            None => false,
        }
    }

    fn navigator_has(&self, name: &str) -> bool {
        match window() {
            Some(w) => {
                Reflect::has(as_js(&w.navigator()), &JsValue::from_str(name)).unwrap_or(false)
            }
            None => false,
        }
    }

    fn cookies_enabled(&self) -> Option<bool> {
        Some(window()?.navigator().cookie_enabled())
    }

    fn local_storage_writable(&self) -> bool {
        let storage = match window().and_then(|w| w.local_storage().ok().flatten()) {
            Some(s) => s,
            None => return false,
        };
        if storage.set_item(LOCAL_STORAGE_PROBE_KEY, "1").is_err() {
            return false;
        }
        let _ = storage.remove_item(LOCAL_STORAGE_PROBE_KEY);
        true
    }

    fn connection(&self) -> Option<ConnectionInfo> {
        let navigator: JsValue = window()?.navigator().into();
        let connection = get(&navigator, "connection")
            .or_else(|| get(&navigator, "mozConnection"))
            .or_else(|| get(&navigator, "webkitConnection"))?;
        Some(ConnectionInfo {
            effective_type: get(&connection, "effectiveType")
                .and_then(|v| v.as_string())
                .unwrap_or_else(|| "unknown".to_string()),
            downlink: get_f64(&connection, "downlink").unwrap_or(0.0),
            rtt: get_f64(&connection, "rtt").unwrap_or(0.0),
            save_data: get(&connection, "saveData")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        })
    }

    fn performance_now(&self) -> f64 {
        window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn probe_font_widths(
        &self,
        candidate: &str,
        fallback: &str,
        sample: &str,
    ) -> Option<(f64, f64)> {
        collectors::fonts::dom::probe_widths(candidate, fallback, sample)
    }

    fn gpu_model(&self) -> Option<String> {
        collectors::webgl::dom::gpu_model()
    }

    fn canvas_pixel(&self) -> Option<[u8; 4]> {
        collectors::canvas::dom::sample_pixel()
    }

    fn webgl_report(&self) -> WebGlProbe {
        collectors::webgl::dom::probe()
    }

    async fn media_device_count(&self) -> Option<u32> {
        let devices = window()?.navigator().media_devices().ok()?;
        let promise = devices.enumerate_devices().ok()?;
        let listed = bounded(JsFuture::from(promise), DEVICE_ENUM_TIMEOUT_MS)
            .await?
            .ok()?;
        let devices: js_sys::Array = listed.dyn_into().ok()?;
        Some(devices.length())
    }

    async fn live_audio_bins(&self) -> std::result::Result<Vec<u8>, String> {
        match bounded(collectors::audio::dom::live_bins(), AUDIO_RENDER_TIMEOUT_MS).await {
            Some(result) => result,
            None => Err("audio probe timed out".to_string()),
        }
    }

    async fn render_offline_audio(
        &self,
        spec: &OfflineGraphSpec,
    ) -> std::result::Result<OfflineAudioRendering, String> {
        match bounded(
            collectors::audio::dom::render_offline(spec),
            AUDIO_RENDER_TIMEOUT_MS,
        )
        .await
        {
            Some(result) => result,
            None => Err("offline rendering timed out".to_string()),
        }
    }
}
