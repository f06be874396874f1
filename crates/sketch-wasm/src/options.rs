//! JSON options accepted by `Sketch.init`.

use serde::Deserialize;
use sketch_core::{OptionsPatch, Size};

/// `{"canvas": {"width": 400, "height": 300}}`; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsJson {
    canvas: Option<Size>,
}

/// Decode `source` into a patch. An empty string means "change nothing".
pub fn parse_options<R>(source: &str) -> Result<OptionsPatch<R>, String> {
    if source.trim().is_empty() {
        return Ok(OptionsPatch::new());
    }
    let parsed: OptionsJson =
        serde_json::from_str(source).map_err(|e| format!("invalid sketch options: {e}"))?;
    let mut patch = OptionsPatch::new();
    if let Some(size) = parsed.canvas {
        patch = patch.surface(size);
    }
    Ok(patch)
}
