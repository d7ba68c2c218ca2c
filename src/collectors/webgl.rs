//! WebGL collectors.
//!
//! Two probes share the context-acquisition path: `gpuModel` only reads the
//! unmasked renderer string, while the full report also runs a fixed
//! deterministic draw and keeps a suffix of the encoded canvas image as an
//! `imageHash`. The debug-renderer-info extension is withheld by some
//! browsers; its absence drops the vendor/renderer fields without failing
//! the probe.

use super::UNKNOWN;
use crate::env::{Environment, WebGlProbe};
use crate::signal::SignalValue;

pub const WEBGL_UNSUPPORTED: &str = "WebGL not supported";

/// Shape the raw probe outcome into the record value.
pub fn report_signal(probe: WebGlProbe) -> SignalValue {
    match probe {
        WebGlProbe::Unsupported => SignalValue::str(WEBGL_UNSUPPORTED),
        WebGlProbe::Failed(msg) => {
            SignalValue::str(format!("WebGL fingerprinting failed: {}", msg))
        }
        WebGlProbe::Report {
            vendor,
            renderer,
            image_hash,
        } => {
            let mut entries = Vec::with_capacity(3);
            if let Some(v) = vendor {
                entries.push(("vendor".to_string(), SignalValue::Str(v)));
            }
            if let Some(r) = renderer {
                entries.push(("renderer".to_string(), SignalValue::Str(r)));
            }
            entries.push(("imageHash".to_string(), SignalValue::Str(image_hash)));
            SignalValue::Map(entries)
        }
    }
}

pub fn gpu_model_signal(env: &dyn Environment) -> SignalValue {
    match env.gpu_model() {
        Some(model) => SignalValue::Str(model),
        None => SignalValue::str(UNKNOWN),
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) mod dom {
    use super::super::js_err;
    use crate::env::WebGlProbe;
    use wasm_bindgen::JsCast;
    use web_sys::{HtmlCanvasElement, WebGlRenderingContext as Gl, WebGlShader};

    const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
    const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

    const CANVAS_WIDTH: u32 = 256;
    const CANVAS_HEIGHT: u32 = 128;
    const CLEAR_COLOR: (f32, f32, f32, f32) = (0.2, 0.4, 0.6, 0.8);
    const PROBE_VERTICES: [f32; 6] = [-0.7, -0.1, 0.0, 0.4, -0.3, 0.8];
    const IMAGE_HASH_LEN: usize = 32;

    const VERTEX_SHADER_SRC: &str = r#"
        attribute vec2 position;
        void main() {
          gl_Position = vec4(position, 0.0, 1.0);
          gl_PointSize = 10.0;
        }
    "#;

    const FRAGMENT_SHADER_SRC: &str = r#"
        precision mediump float;
        void main() {
          gl_FragColor = vec4(0.9, 0.3, 0.7, 1.0);
        }
    "#;

    fn acquire(canvas: &HtmlCanvasElement) -> Option<Gl> {
        for context_id in ["webgl", "experimental-webgl"] {
            if let Ok(Some(obj)) = canvas.get_context(context_id) {
                if let Ok(gl) = obj.dyn_into::<Gl>() {
                    return Some(gl);
                }
            }
        }
        None
    }

    pub fn probe() -> WebGlProbe {
        let canvas = match create_canvas() {
            Some(c) => c,
            None => return WebGlProbe::Unsupported,
        };
        let gl = match acquire(&canvas) {
            Some(gl) => gl,
            None => return WebGlProbe::Unsupported,
        };

        let (vendor, renderer) = unmasked_strings(&gl);

        match draw_and_hash(&canvas, &gl) {
            Ok(image_hash) => WebGlProbe::Report {
                vendor,
                renderer,
                image_hash,
            },
            Err(msg) => WebGlProbe::Failed(msg),
        }
    }

    pub fn gpu_model() -> Option<String> {
        let canvas = create_canvas()?;
        let gl = acquire(&canvas)?;
        let (_, renderer) = unmasked_strings(&gl);
        renderer
    }

    fn create_canvas() -> Option<HtmlCanvasElement> {
        web_sys::window()?
            .document()?
            .create_element("canvas")
            .ok()?
            .dyn_into()
            .ok()
    }

    /// Vendor/renderer via the debug-renderer-info extension; `None`s when
    /// the browser withholds it.
    fn unmasked_strings(gl: &Gl) -> (Option<String>, Option<String>) {
        match gl.get_extension("WEBGL_debug_renderer_info") {
            Ok(Some(_)) => {
                let vendor = gl
                    .get_parameter(UNMASKED_VENDOR_WEBGL)
                    .ok()
                    .and_then(|v| v.as_string());
                let renderer = gl
                    .get_parameter(UNMASKED_RENDERER_WEBGL)
                    .ok()
                    .and_then(|v| v.as_string());
                (vendor, renderer)
            }
            _ => (None, None),
        }
    }

    fn compile(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, String> {
        let shader = gl
            .create_shader(kind)
            .ok_or_else(|| "shader allocation failed".to_string())?;
        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);
        Ok(shader)
    }

    fn draw_and_hash(canvas: &HtmlCanvasElement, gl: &Gl) -> Result<String, String> {
        canvas.set_width(CANVAS_WIDTH);
        canvas.set_height(CANVAS_HEIGHT);

        gl.clear_color(CLEAR_COLOR.0, CLEAR_COLOR.1, CLEAR_COLOR.2, CLEAR_COLOR.3);
        gl.clear(Gl::COLOR_BUFFER_BIT);

        let buffer = gl
            .create_buffer()
            .ok_or_else(|| "buffer allocation failed".to_string())?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        let vertices = js_sys::Float32Array::from(PROBE_VERTICES.as_slice());
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &vertices, Gl::STATIC_DRAW);

        let vertex_shader = compile(gl, Gl::VERTEX_SHADER, VERTEX_SHADER_SRC)?;
        let fragment_shader = compile(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER_SRC)?;

        let program = gl
            .create_program()
            .ok_or_else(|| "program allocation failed".to_string())?;
        gl.attach_shader(&program, &vertex_shader);
        gl.attach_shader(&program, &fragment_shader);
        gl.link_program(&program);
        gl.use_program(Some(&program));

        let position = gl.get_attrib_location(&program, "position");
        if position < 0 {
            return Err("position attribute missing".to_string());
        }
        gl.enable_vertex_attrib_array(position as u32);
        gl.vertex_attrib_pointer_with_i32(position as u32, 2, Gl::FLOAT, false, 0, 0);

        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        let data_url = canvas.to_data_url().map_err(js_err)?;
        let start = data_url.len().saturating_sub(IMAGE_HASH_LEN);
        Ok(data_url[start..].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_context_yields_the_exact_sentinel() {
        assert_eq!(
            report_signal(WebGlProbe::Unsupported),
            SignalValue::str("WebGL not supported")
        );
    }

    #[test]
    fn probe_failure_is_described_not_propagated() {
        assert_eq!(
            report_signal(WebGlProbe::Failed("shader allocation failed".into())),
            SignalValue::str("WebGL fingerprinting failed: shader allocation failed")
        );
    }

    #[test]
    fn report_omits_vendor_fields_when_the_extension_is_withheld() {
        let value = report_signal(WebGlProbe::Report {
            vendor: None,
            renderer: None,
            image_hash: "abcd".into(),
        });
        assert_eq!(
            value,
            SignalValue::Map(vec![("imageHash".into(), SignalValue::str("abcd"))])
        );
    }

    #[test]
    fn report_keeps_vendor_renderer_image_hash_order() {
        let value = report_signal(WebGlProbe::Report {
            vendor: Some("Acme".into()),
            renderer: Some("Acme GPU".into()),
            image_hash: "abcd".into(),
        });
        if let SignalValue::Map(entries) = value {
            let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
            assert_eq!(keys, ["vendor", "renderer", "imageHash"]);
        } else {
            panic!("expected a map");
        }
    }
}
