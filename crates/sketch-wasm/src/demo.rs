//! Bundled example: a circle on a translucent grey background that moves
//! with the up/down arrow keys.

use sketch_core::{Circle, OptionsPatch, Point, Size};
use wasm_bindgen::prelude::*;

use crate::{Sketch, to_js};

const STEP: f64 = 2.0;

/// Mount the demo sketch on `document.body` and start it.
#[wasm_bindgen]
pub fn demo() -> Result<Sketch, JsValue> {
    let sketch = Sketch::new()?;
    sketch
        .session
        .configure(OptionsPatch::new().surface(Size::new(400.0, 300.0)));

    let mut position = Point::new(200.0, 150.0);
    sketch
        .session
        .register(move |ops| {
            ops.clear();
            ops.fill("rgba(100, 100, 100, 0.5)");
            ops.draw_circle(Circle {
                location: position,
                radius: 20.0,
            });

            if ops.is_key_pressed(&["ArrowUp"]) {
                position.y -= STEP;
            }
            if ops.is_key_pressed(&["ArrowDown"]) {
                position.y += STEP;
            }
        })
        .map_err(to_js)?;

    Ok(sketch)
}
