use std::error::Error;
use std::io;

/// Error returned by the encoder chain while handling one line.
///
/// Parsing itself never fails; every variant here comes from a hook or
/// from the terminal encoder.
#[derive(thiserror::Error, Debug)]
pub enum PlugError {
    #[error("write to sink failed: {0}")]
    Io(#[from] io::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}

impl PlugError {
    /// Shorthand for hooks and custom encoders that fail with a message.
    pub fn encode(msg: impl Into<String>) -> Self {
        PlugError::Encode(msg.into())
    }
}

impl From<PlugError> for io::Error {
    fn from(err: PlugError) -> Self {
        match err {
            PlugError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}

/// Error type returned when parsing [`LogFlags`](crate::flags::LogFlags) from text.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FlagsParseError {
    #[error("unknown log flag: {0:?}")]
    UnknownFlag(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_round_trips_through_plug_error() {
        let err = PlugError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn other_errors_become_io_other() {
        let back: io::Error = PlugError::encode("nope").into();
        assert_eq!(back.kind(), io::ErrorKind::Other);
        assert!(back.to_string().contains("nope"));
    }
}
