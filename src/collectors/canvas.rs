//! Canvas 2D pixel probe: fill a fixed rectangle offscreen and sample one
//! pixel's RGBA channels. Anti-aliasing and color-management differences show
//! up in the sampled values.

use crate::env::Environment;
use crate::signal::SignalValue;

pub const CANVAS_UNSUPPORTED: &str = "Canvas not supported";

pub fn pixel_signal(env: &dyn Environment) -> SignalValue {
    match env.canvas_pixel() {
        Some([r, g, b, a]) => SignalValue::str(format!("rgba({},{},{},{})", r, g, b, a)),
        None => SignalValue::str(CANVAS_UNSUPPORTED),
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) mod dom {
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    const CANVAS_SIZE: u32 = 100;
    const FILL_COLOR: &str = "#f00";
    const RECT: (f64, f64, f64, f64) = (10.0, 10.0, 80.0, 80.0);
    const SAMPLE_AT: (f64, f64) = (50.0, 50.0);

    pub fn sample_pixel() -> Option<[u8; 4]> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .ok()?
            .dyn_into()
            .ok()?;
        canvas.set_width(CANVAS_SIZE);
        canvas.set_height(CANVAS_SIZE);

        let ctx: CanvasRenderingContext2d =
            canvas.get_context("2d").ok().flatten()?.dyn_into().ok()?;

        ctx.set_fill_style_str(FILL_COLOR);
        ctx.fill_rect(RECT.0, RECT.1, RECT.2, RECT.3);

        let image = ctx
            .get_image_data(SAMPLE_AT.0, SAMPLE_AT.1, 1.0, 1.0)
            .ok()?;
        let data = image.data();
        if data.len() < 4 {
            return None;
        }
        Some([data[0], data[1], data[2], data[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FakeEnv;

    #[test]
    fn pixel_formats_as_rgba() {
        let mut env = FakeEnv::default();
        env.canvas_pixel = Some([255, 0, 0, 255]);
        assert_eq!(pixel_signal(&env), SignalValue::str("rgba(255,0,0,255)"));
    }

    #[test]
    fn missing_canvas_uses_the_sentinel() {
        let mut env = FakeEnv::default();
        env.canvas_pixel = None;
        assert_eq!(pixel_signal(&env), SignalValue::str(CANVAS_UNSUPPORTED));
    }
}
