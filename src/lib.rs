pub mod config;
pub mod dsp;
pub mod error;

use std::path::Path;

use crate::config::{RenderConfig, SignalSpec};
use crate::dsp::special;
use crate::error::SynthError;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn to_js(e: SynthError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: return the ellipsynth-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Primary signal at a raw phase angle: normalized Jacobi `sn` with `m = 0.95`.
pub fn signal_at(theta: f64) -> Result<f64, SynthError> {
    special::jacobi_sn_normalized(config::DEFAULT_ELLIPTIC_PARAMETER, theta)
}

/// Alternate signal at a raw phase angle: Bessel `J0`.
pub fn alternate_signal_at(theta: f64) -> f64 {
    special::besselj(0, theta)
}

/// The default tone (10 s, 44100 Hz, max level 8192, `sn` with `m = 0.95`)
/// at `frequency` Hz.
pub fn tone_config(frequency: f64) -> RenderConfig {
    RenderConfig {
        signal: SignalSpec::elliptic(config::DEFAULT_ELLIPTIC_PARAMETER, frequency),
        ..RenderConfig::default()
    }
}

/// Render the default tone at `frequency` Hz to a WAV file at `path`.
pub fn render_to_file(path: impl AsRef<Path>, frequency: f64) -> Result<(), SynthError> {
    let request = tone_config(frequency).into_request()?;
    dsp::renderer::render_file(&request, path)?;
    Ok(())
}

/// WASM-exposed: primary signal value at phase `theta`.
#[wasm_bindgen]
pub fn evaluate_signal(theta: f64) -> Result<f64, JsValue> {
    signal_at(theta).map_err(to_js)
}

/// WASM-exposed: Bessel-based alternate signal value at phase `theta`.
#[wasm_bindgen]
pub fn evaluate_alternate_signal(theta: f64) -> f64 {
    alternate_signal_at(theta)
}

/// WASM-exposed: render the default tone at `frequency` Hz to WAV bytes.
#[wasm_bindgen]
pub fn render_tone_wav(frequency: f64) -> Result<Vec<u8>, JsValue> {
    let request = tone_config(frequency).into_request().map_err(to_js)?;
    dsp::renderer::render_wav(&request).map_err(to_js)
}

/// WASM-exposed: render from a `RenderConfig`-shaped JS object to WAV bytes.
/// Missing fields take their defaults.
#[wasm_bindgen]
pub fn render_config_wav(config: JsValue) -> Result<Vec<u8>, JsValue> {
    let config: RenderConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| to_js(SynthError::Config(e.to_string())))?;
    let request = config.into_request().map_err(to_js)?;
    dsp::renderer::render_wav(&request).map_err(to_js)
}
