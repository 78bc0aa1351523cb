//! Render configuration.
//!
//! `RenderConfig` is the serde-facing shape (camelCase JSON, every field
//! defaulted). `RenderRequest` is the validated, immutable form the
//! renderer consumes.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::dsp::generator::Generator;
use crate::dsp::quantizer::OverflowPolicy;
use crate::dsp::wav::{self, AudioFormat, HEADER_LEN};
use crate::error::SynthError;

// ── Pitch presets (Hz) ──────────────────────────────────────

pub mod pitch {
    /// Concert A.
    pub const A4: f64 = 440.0;
    pub const CS5: f64 = 554.365;
    pub const E5: f64 = 659.255;
}

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_DURATION_SECONDS: f64 = 10.0;
pub const DEFAULT_MAX_LEVEL: i32 = 2 << 12;
pub const DEFAULT_ELLIPTIC_PARAMETER: f64 = 0.95;

// ── Signal selection ────────────────────────────────────────

/// Special function backing a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Waveform {
    /// Jacobi `sn` with period normalized to one cycle per `2π`.
    EllipticSn { m: f64 },
    /// Bessel `J_order`.
    Bessel { order: i32 },
    /// Folded Legendre polynomial of the given degree.
    Legendre { degree: u32 },
    /// `sin(θ) / cosh(decay·θ)`.
    SincEnvelope { decay: f64 },
    /// `sin(θ) / θ`.
    Sinc,
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::EllipticSn {
            m: DEFAULT_ELLIPTIC_PARAMETER,
        }
    }
}

/// A waveform at a base frequency. The generator evaluates the waveform at
/// phase `ω·t` with `ω = 2π·frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSpec {
    #[serde(default)]
    pub waveform: Waveform,
    /// Base frequency in Hz.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

fn default_frequency() -> f64 {
    pitch::A4
}

impl SignalSpec {
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        SignalSpec {
            waveform,
            frequency,
        }
    }

    pub fn elliptic(m: f64, frequency: f64) -> Self {
        Self::new(Waveform::EllipticSn { m }, frequency)
    }

    /// Angular frequency `ω` in radians per second.
    pub fn angular_frequency(&self) -> f64 {
        TAU * self.frequency
    }
}

impl Default for SignalSpec {
    fn default() -> Self {
        SignalSpec::new(Waveform::default(), pitch::A4)
    }
}

// ── Render configuration ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    /// Quantization ceiling: a signal value of 1.0 maps to this level.
    pub max_level: i32,
    pub signal: SignalSpec,
    pub overflow: OverflowPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            duration_seconds: DEFAULT_DURATION_SECONDS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_level: DEFAULT_MAX_LEVEL,
            signal: SignalSpec::default(),
            overflow: OverflowPolicy::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self, SynthError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_request(self) -> Result<RenderRequest, SynthError> {
        RenderRequest::new(
            self.duration_seconds,
            AudioFormat::stereo_pcm16(self.sample_rate),
            self.max_level,
            self.signal,
        )
        .map(|request| request.with_overflow(self.overflow))
    }
}

// ── Validated request ───────────────────────────────────────

/// Largest frame count whose data and RIFF sizes still fit in 32 bits.
const MAX_FRAMES: u64 = (u32::MAX as u64 - (HEADER_LEN as u64 - 8)) / 4;

/// A validated render job. The signal is resolved to a `Generator` once,
/// here, so per-sample evaluation never re-checks parameters.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    duration_seconds: f64,
    format: AudioFormat,
    max_level: i32,
    signal: SignalSpec,
    overflow: OverflowPolicy,
    generator: Generator,
    frame_count: u32,
}

impl RenderRequest {
    pub fn new(
        duration_seconds: f64,
        format: AudioFormat,
        max_level: i32,
        signal: SignalSpec,
    ) -> Result<Self, SynthError> {
        if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
            return Err(SynthError::invalid(
                "duration_seconds",
                duration_seconds,
                "must be finite and positive",
            ));
        }
        if format.sample_rate == 0 {
            return Err(SynthError::invalid("sample_rate", 0.0, "must be positive"));
        }
        if format
            .sample_rate
            .checked_mul(format.bytes_per_frame() as u32)
            .is_none()
        {
            return Err(SynthError::invalid(
                "sample_rate",
                format.sample_rate as f64,
                "byte rate exceeds the 32-bit header field",
            ));
        }
        if !(1..=i16::MAX as i32).contains(&max_level) {
            return Err(SynthError::invalid(
                "max_level",
                max_level as f64,
                "must be in 1..=32767",
            ));
        }
        let frames = wav::frame_count(duration_seconds, format.sample_rate);
        if frames > MAX_FRAMES {
            return Err(SynthError::invalid(
                "duration_seconds",
                duration_seconds,
                "data size exceeds the 32-bit RIFF limit",
            ));
        }
        let generator = Generator::new(&signal)?;

        Ok(RenderRequest {
            duration_seconds,
            format,
            max_level,
            signal,
            overflow: OverflowPolicy::default(),
            generator,
            frame_count: frames as u32,
        })
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn max_level(&self) -> i32 {
        self.max_level
    }

    pub fn signal(&self) -> &SignalSpec {
        &self.signal
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// `floor(duration_seconds * sample_rate)`.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tone() {
        let config = RenderConfig::default();
        assert_eq!(config.duration_seconds, 10.0);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.max_level, 8192);
        assert_eq!(config.signal.waveform, Waveform::EllipticSn { m: 0.95 });
        assert_eq!(config.overflow, OverflowPolicy::Wrap);
        assert!((config.signal.angular_frequency() - 2.0 * std::f64::consts::PI * 440.0).abs() < 1e-9);
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = RenderConfig::from_json(
            r#"{ "durationSeconds": 0.5, "signal": { "waveform": { "kind": "bessel", "order": 2 } } }"#,
        )
        .unwrap();
        assert_eq!(config.duration_seconds, 0.5);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.signal.waveform, Waveform::Bessel { order: 2 });
        assert_eq!(config.signal.frequency, pitch::A4);
    }

    #[test]
    fn json_round_trip() {
        let config = RenderConfig {
            signal: SignalSpec::new(Waveform::SincEnvelope { decay: 0.01 }, pitch::E5),
            overflow: OverflowPolicy::Saturate,
            ..RenderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kind\":\"sincEnvelope\""), "{json}");
        assert!(json.contains("\"overflow\":\"saturate\""), "{json}");
        assert_eq!(RenderConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = RenderConfig::from_json("{ \"sampleRate\": \"fast\" }").unwrap_err();
        assert!(matches!(err, SynthError::Config(_)));
    }

    #[test]
    fn request_frame_count() {
        let request = RenderRequest::new(
            1.0,
            AudioFormat::stereo_pcm16(44100),
            4096,
            SignalSpec::default(),
        )
        .unwrap();
        assert_eq!(request.frame_count(), 44100);
        assert_eq!(request.overflow(), OverflowPolicy::Wrap);
    }

    #[test]
    fn highest_sample_rate_keeps_byte_rate_exact() {
        let rate = u32::MAX / 4;
        let format = AudioFormat::stereo_pcm16(rate);
        let request = RenderRequest::new(1e-9, format, 4096, SignalSpec::default()).unwrap();
        assert_eq!(request.format().byte_rate() as u64, rate as u64 * 4);
        assert_eq!(request.duration_seconds(), 1e-9);
    }

    #[test]
    fn request_rejects_bad_parameters() {
        let format = AudioFormat::stereo_pcm16(44100);
        let signal = SignalSpec::default();
        assert!(RenderRequest::new(0.0, format, 4096, signal).is_err());
        assert!(RenderRequest::new(-1.0, format, 4096, signal).is_err());
        assert!(RenderRequest::new(f64::INFINITY, format, 4096, signal).is_err());
        assert!(RenderRequest::new(1.0, AudioFormat::stereo_pcm16(0), 4096, signal).is_err());
        assert!(matches!(
            RenderRequest::new(1e-9, AudioFormat::stereo_pcm16(2_000_000_000), 4096, signal),
            Err(SynthError::InvalidParameter { name: "sample_rate", .. })
        ));
        assert!(RenderRequest::new(1.0, format, 0, signal).is_err());
        assert!(RenderRequest::new(1.0, format, 40000, signal).is_err());
        assert!(RenderRequest::new(1.0e6, format, 4096, signal).is_err());
        assert!(RenderRequest::new(1.0, format, 4096, SignalSpec::elliptic(1.0, pitch::A4)).is_err());
        let falling = SignalSpec::new(Waveform::Legendre { degree: 2 }, -pitch::A4);
        assert!(RenderRequest::new(0.01, AudioFormat::stereo_pcm16(8000), 4096, falling).is_err());
    }
}
