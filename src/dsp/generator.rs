//! Waveform generator: a special function driven at a base angular frequency.
//!
//! A `Generator` is a pure function of time. It holds no phase state, so
//! samples can be evaluated in any order and are exactly reproducible.

use crate::config::{SignalSpec, Waveform};
use crate::error::SynthError;

use super::special;

/// A `Waveform` with its parameters checked and any constants precomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Kernel {
    /// `scale` is `2K(m)/π`.
    EllipticSn { m: f64, scale: f64 },
    Bessel { order: i32 },
    Legendre { degree: u32 },
    SincEnvelope { decay: f64 },
    Sinc,
}

impl Kernel {
    fn resolve(waveform: Waveform) -> Result<Self, SynthError> {
        Ok(match waveform {
            Waveform::EllipticSn { m } => Kernel::EllipticSn {
                m,
                scale: special::sn_period_scale(m)?,
            },
            Waveform::Bessel { order } => Kernel::Bessel { order },
            Waveform::Legendre { degree } => Kernel::Legendre { degree },
            Waveform::SincEnvelope { decay } => {
                if !decay.is_finite() {
                    return Err(SynthError::invalid("decay", decay, "must be finite"));
                }
                Kernel::SincEnvelope { decay }
            }
            Waveform::Sinc => Kernel::Sinc,
        })
    }

    fn eval(&self, theta: f64) -> Result<f64, SynthError> {
        match *self {
            Kernel::EllipticSn { m, scale } => {
                let (sn, _, _) = special::jacobi_elliptic(theta * scale, m)?;
                Ok(sn)
            }
            Kernel::Bessel { order } => Ok(special::besselj(order, theta)),
            Kernel::Legendre { degree } => special::legendre(degree, theta),
            Kernel::SincEnvelope { decay } => Ok(special::sinlet(theta, decay)),
            Kernel::Sinc => Ok(special::sinc(theta)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Generator {
    omega: f64,
    kernel: Kernel,
}

impl Generator {
    pub fn new(signal: &SignalSpec) -> Result<Self, SynthError> {
        if !signal.frequency.is_finite() {
            return Err(SynthError::invalid(
                "frequency",
                signal.frequency,
                "must be finite",
            ));
        }
        // The Legendre fold is only defined for non-negative phase
        if matches!(signal.waveform, Waveform::Legendre { .. }) && signal.frequency < 0.0 {
            return Err(SynthError::invalid(
                "frequency",
                signal.frequency,
                "Legendre waveform needs a non-negative frequency",
            ));
        }
        Ok(Generator {
            omega: signal.angular_frequency(),
            kernel: Kernel::resolve(signal.waveform)?,
        })
    }

    /// Angular frequency in radians per second.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Signal value at time `t` seconds, nominally in `[-1, 1]`.
    pub fn generate(&self, t: f64) -> Result<f64, SynthError> {
        self.at_phase(self.omega * t)
    }

    /// Signal value at a raw phase angle, bypassing the base frequency.
    pub fn at_phase(&self, theta: f64) -> Result<f64, SynthError> {
        self.kernel.eval(theta)
    }
}

/// One-shot evaluation of `signal` at time `t`.
pub fn generate(signal: &SignalSpec, t: f64) -> Result<f64, SynthError> {
    Generator::new(signal)?.generate(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::pitch;

    #[test]
    fn deterministic() {
        let signal = SignalSpec::default();
        let generator = Generator::new(&signal).unwrap();
        for i in 0..100 {
            let t = i as f64 * 1.0e-4;
            let a = generator.generate(t).unwrap();
            let b = generator.generate(t).unwrap();
            assert_eq!(a.to_bits(), b.to_bits());
            assert_eq!(a.to_bits(), generate(&signal, t).unwrap().to_bits());
        }
    }

    #[test]
    fn order_independent() {
        let generator = Generator::new(&SignalSpec::default()).unwrap();
        let times: Vec<f64> = (0..50).map(|i| i as f64 / 44100.0).collect();
        let forward: Vec<f64> = times.iter().map(|&t| generator.generate(t).unwrap()).collect();
        let backward: Vec<f64> = times.iter().rev().map(|&t| generator.generate(t).unwrap()).collect();
        assert!(forward.iter().eq(backward.iter().rev()));
    }

    #[test]
    fn elliptic_default_has_concert_pitch_period() {
        let generator = Generator::new(&SignalSpec::default()).unwrap();
        assert!((generator.omega() - std::f64::consts::TAU * pitch::A4).abs() < 1e-9);
        let period = 1.0 / pitch::A4;
        for i in 0..20 {
            let t = i as f64 * 1.3e-4;
            let a = generator.generate(t).unwrap();
            let b = generator.generate(t + period).unwrap();
            assert!((a - b).abs() < 1e-9, "t={t}: {a} vs {b}");
        }
        // Quarter period is the crest
        let crest = generator.generate(period / 4.0).unwrap();
        assert!((crest - 1.0).abs() < 1e-9, "crest {crest}");
    }

    #[test]
    fn elliptic_stays_bounded() {
        let generator = Generator::new(&SignalSpec::elliptic(0.99, pitch::CS5)).unwrap();
        for i in 0..2000 {
            let v = generator.generate(i as f64 / 44100.0).unwrap();
            assert!(v.abs() <= 1.0 + 1e-12, "out of range: {v}");
        }
    }

    #[test]
    fn kernels_dispatch_to_special_functions() {
        let theta = 1.7;
        let at = |waveform| {
            Generator::new(&SignalSpec::new(waveform, pitch::A4))
                .unwrap()
                .at_phase(theta)
                .unwrap()
        };
        assert_eq!(at(Waveform::Bessel { order: 0 }), special::besselj(0, theta));
        assert_eq!(at(Waveform::Legendre { degree: 3 }), special::legendre(3, theta).unwrap());
        assert_eq!(at(Waveform::SincEnvelope { decay: 0.2 }), special::sinlet(theta, 0.2));
        assert_eq!(at(Waveform::Sinc), special::sinc(theta));
        let sn = at(Waveform::EllipticSn { m: 0.95 });
        assert!((sn - special::jacobi_sn_normalized(0.95, theta).unwrap()).abs() < 1e-15);
    }

    #[test]
    fn invalid_signals_fail_at_construction() {
        assert!(Generator::new(&SignalSpec::elliptic(1.0, pitch::A4)).is_err());
        assert!(Generator::new(&SignalSpec::elliptic(-0.2, pitch::A4)).is_err());
        assert!(Generator::new(&SignalSpec::elliptic(0.5, f64::NAN)).is_err());
        assert!(
            Generator::new(&SignalSpec::new(Waveform::SincEnvelope { decay: f64::INFINITY }, 1.0))
                .is_err()
        );
        assert!(Generator::new(&SignalSpec::new(Waveform::Legendre { degree: 2 }, -pitch::A4)).is_err());
        // Other waveforms are defined for negative phase
        assert!(Generator::new(&SignalSpec::new(Waveform::Bessel { order: 1 }, -pitch::A4)).is_ok());
    }

    #[test]
    fn legendre_rejects_negative_time() {
        let generator =
            Generator::new(&SignalSpec::new(Waveform::Legendre { degree: 2 }, pitch::A4)).unwrap();
        assert!(generator.generate(0.001).is_ok());
        assert!(generator.generate(-0.001).is_err());
    }
}
