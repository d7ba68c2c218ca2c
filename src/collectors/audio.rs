//! Audio-graph collectors.
//!
//! Three variants share the environment's rendering primitives:
//!
//! - `analyser_signal`: live context, oscillator through a compressor into an
//!   analyser; the signal is the summed byte frequency bins, in hex.
//! - `offline_signal`: offline render of a two-oscillator graph; the signal is
//!   the sum of absolute sample magnitudes. Deterministic for a fixed device.
//! - `jittered_signal`: offline render whose gain and output mix in
//!   performance-timing. That breaks run-to-run determinism on purpose: the
//!   extra entropy makes replaying a recorded value detectable. Profiles that
//!   use it give up the reproducible-digest property.

use crate::env::{Environment, OfflineGraphSpec, OscShape, OscSpec};
use crate::signal::SignalValue;

pub const AUDIO_NOT_SUPPORTED: &str = "Not supported";

/// Graph for the deterministic offline variant: triangle 1000Hz plus sawtooth
/// 1500Hz (scheduled 10ms later) through a unity merge stage.
pub fn offline_graph() -> OfflineGraphSpec {
    OfflineGraphSpec {
        oscillators: vec![
            OscSpec {
                shape: OscShape::Triangle,
                frequency: 1000.0,
                schedule_offset: 0.0,
            },
            OscSpec {
                shape: OscShape::Sawtooth,
                frequency: 1500.0,
                schedule_offset: 0.01,
            },
        ],
        gain: None,
    }
}

pub async fn analyser_signal(env: &dyn Environment) -> SignalValue {
    match env.live_audio_bins().await {
        Ok(bins) => {
            let sum: u64 = bins.iter().map(|b| *b as u64).sum();
            SignalValue::str(format!("{:x}", sum))
        }
        Err(msg) => SignalValue::str(format!("Audio fingerprinting failed: {}", msg)),
    }
}

pub async fn offline_signal(env: &dyn Environment) -> SignalValue {
    match env.render_offline_audio(&offline_graph()).await {
        Ok(rendering) => {
            let sum: f64 = rendering.samples.iter().map(|s| s.abs() as f64).sum();
            SignalValue::str(format!("{:.3}", sum))
        }
        Err(_) => SignalValue::str(AUDIO_NOT_SUPPORTED),
    }
}

pub async fn jittered_signal(env: &dyn Environment) -> SignalValue {
    let start = env.performance_now();
    let gain = ((start % 1000.0).sin() * 0.3 + 0.7) as f32;
    let spec = OfflineGraphSpec {
        oscillators: vec![OscSpec {
            shape: OscShape::Triangle,
            frequency: 950.0,
            schedule_offset: 0.0,
        }],
        gain: Some(gain),
    };

    match env.render_offline_audio(&spec).await {
        Ok(rendering) => {
            let sum: f64 = rendering
                .samples
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let weight = if i % 2 == 0 { 1.1 } else { 0.9 };
                    (*s as f64 * weight).abs()
                })
                .sum();
            let elapsed = env.performance_now() - start;
            let compressor = rendering
                .compressor
                .iter()
                .map(|v| format!("{:.2}", v))
                .collect::<Vec<_>>()
                .join(",");
            let screen_factor = env
                .screen_metrics()
                .map(|m| m.width as u64 * m.height as u64)
                .unwrap_or(0);
            SignalValue::str(format!(
                "{:.3}-{:.2}-{}-{}-{}",
                sum, elapsed, compressor, screen_factor, rendering.base_latency
            ))
        }
        Err(_) => SignalValue::str(AUDIO_NOT_SUPPORTED),
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) mod dom {
    use super::super::js_err;
    use crate::env::{OfflineAudioRendering, OfflineGraphSpec, OscShape};
    use js_sys::Reflect;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioContext, OfflineAudioContext, OscillatorType};

    const SAMPLE_RATE: f32 = 44_100.0;
    const RENDER_FRAMES: u32 = 44_100;
    const ANALYSER_FFT_SIZE: u32 = 1024;
    const OSCILLATOR_STOP_AT: f64 = 0.1;
    const DEFAULT_BASE_LATENCY: f64 = 0.0001;

    pub async fn render_offline(
        spec: &OfflineGraphSpec,
    ) -> Result<OfflineAudioRendering, String> {
        let ctx = OfflineAudioContext::new_with_number_of_channels_and_length_and_sample_rate(
            1,
            RENDER_FRAMES,
            SAMPLE_RATE,
        )
        .map_err(js_err)?;

        let gain = ctx.create_gain().map_err(js_err)?;
        if let Some(value) = spec.gain {
            gain.gain()
                .set_value_at_time(value, ctx.current_time())
                .map_err(js_err)?;
        }
        let compressor = ctx.create_dynamics_compressor().map_err(js_err)?;

        for osc_spec in &spec.oscillators {
            let osc = ctx.create_oscillator().map_err(js_err)?;
            osc.set_type(match osc_spec.shape {
                OscShape::Triangle => OscillatorType::Triangle,
                OscShape::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.frequency()
                .set_value_at_time(
                    osc_spec.frequency,
                    ctx.current_time() + osc_spec.schedule_offset,
                )
                .map_err(js_err)?;
            osc.connect_with_audio_node(&gain).map_err(js_err)?;
            osc.start().map_err(js_err)?;
        }

        gain.connect_with_audio_node(&compressor).map_err(js_err)?;
        compressor
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        let rendered = JsFuture::from(ctx.start_rendering().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let buffer: AudioBuffer = rendered
            .dyn_into()
            .map_err(|_| "rendering did not produce an AudioBuffer".to_string())?;
        let samples = buffer.get_channel_data(0).map_err(js_err)?;

        let compressor_params = [
            compressor.threshold().value(),
            compressor.knee().value(),
            compressor.ratio().value(),
            compressor.attack().value(),
            compressor.release().value(),
        ];
        let base_latency = Reflect::get(ctx.as_ref(), &JsValue::from_str("baseLatency"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_BASE_LATENCY);

        Ok(OfflineAudioRendering {
            samples,
            compressor: compressor_params,
            base_latency,
        })
    }

    pub async fn live_bins() -> Result<Vec<u8>, String> {
        let ctx = AudioContext::new().map_err(js_err)?;
        let result = sample_graph(&ctx);
        // Release the context whether or not the graph built.
        if let Ok(promise) = ctx.close() {
            let _ = JsFuture::from(promise).await;
        }
        result
    }

    fn sample_graph(ctx: &AudioContext) -> Result<Vec<u8>, String> {
        let analyser = ctx.create_analyser().map_err(js_err)?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);

        let compressor = ctx.create_dynamics_compressor().map_err(js_err)?;
        let now = ctx.current_time();
        compressor.threshold().set_value_at_time(-50.0, now).map_err(js_err)?;
        compressor.knee().set_value_at_time(40.0, now).map_err(js_err)?;
        compressor.ratio().set_value_at_time(12.0, now).map_err(js_err)?;
        compressor.attack().set_value_at_time(0.0, now).map_err(js_err)?;
        compressor.release().set_value_at_time(0.25, now).map_err(js_err)?;

        let osc = ctx.create_oscillator().map_err(js_err)?;
        osc.set_type(OscillatorType::Triangle);
        osc.frequency().set_value_at_time(10_000.0, now).map_err(js_err)?;

        osc.connect_with_audio_node(&compressor).map_err(js_err)?;
        compressor.connect_with_audio_node(&analyser).map_err(js_err)?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;

        osc.start().map_err(js_err)?;
        osc.stop_with_when(OSCILLATOR_STOP_AT).map_err(js_err)?;

        let mut bins = vec![0u8; analyser.frequency_bin_count() as usize];
        analyser.get_byte_frequency_data(&mut bins);
        Ok(bins)
    }
}
