use std::fmt;

#[derive(Debug)]
pub enum SynthError {
    /// A special-function or render parameter is outside its valid domain.
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// A scaled sample does not fit in 16 bits and the policy rejects it.
    QuantizationOverflow { value: f64, max_level: i32 },
    /// The render configuration could not be decoded.
    Config(String),
    Io(std::io::Error),
}

impl SynthError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SynthError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
            SynthError::QuantizationOverflow { value, max_level } => {
                write!(f, "Sample {value} scaled by {max_level} overflows 16 bits")
            }
            SynthError::Config(msg) => write!(f, "Config error: {msg}"),
            SynthError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SynthError {
    fn from(e: std::io::Error) -> Self {
        SynthError::Io(e)
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(e: serde_json::Error) -> Self {
        SynthError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let err = SynthError::invalid("m", 1.0, "must be in [0, 1)");
        assert_eq!(err.to_string(), "Invalid parameter m = 1: must be in [0, 1)");
    }

    #[test]
    fn io_error_keeps_source() {
        let err: SynthError = std::io::Error::other("disk full").into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("disk full"));
    }
}
