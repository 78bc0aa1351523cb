//! Float amplitude to 16-bit integer quantization.

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// What to do with a scaled sample that does not fit in an `i16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Keep the low 16 bits (raw narrowing). Out-of-range values wrap around.
    #[default]
    Wrap,
    /// Clamp to `[i16::MIN, i16::MAX]`.
    Saturate,
    /// Fail with `SynthError::QuantizationOverflow`.
    Reject,
}

fn scaled(value: f64, max_level: i32) -> i64 {
    // `as` saturates at the i64 bounds and maps NaN to 0
    (value * max_level as f64).trunc() as i64
}

/// `trunc(value * max_level)` narrowed to 16 bits without clamping.
pub fn quantize(value: f64, max_level: i32) -> i16 {
    scaled(value, max_level) as i16
}

/// Quantize under an explicit overflow policy.
pub fn quantize_with(value: f64, max_level: i32, policy: OverflowPolicy) -> Result<i16, SynthError> {
    let level = scaled(value, max_level);
    if let Ok(sample) = i16::try_from(level) {
        return Ok(sample);
    }
    match policy {
        OverflowPolicy::Wrap => Ok(level as i16),
        OverflowPolicy::Saturate => Ok(level.clamp(i16::MIN as i64, i16::MAX as i64) as i16),
        OverflowPolicy::Reject => Err(SynthError::QuantizationOverflow { value, max_level }),
    }
}

/// True if `quantize` would wrap this value.
pub fn overflows(value: f64, max_level: i32) -> bool {
    i16::try_from(scaled(value, max_level)).is_err()
}
