use crate::bind::value::ValueKind;
use thiserror::Error;

/// Main error type for flagenv operations
#[derive(Debug, Error)]
pub enum FlagenvError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cannot coerce {raw:?} into {kind} for binding '{name}': {reason}")]
    CoercionError {
        name: String,
        raw: String,
        kind: ValueKind,
        reason: String,
    },

    #[error("Flag parsing error: {0}")]
    FlagParseError(#[from] clap::Error),

    #[error("Logging setup error: {0}")]
    LoggingError(String),
}

impl FlagenvError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn coercion<S: Into<String>>(name: S, raw: S, kind: ValueKind, reason: S) -> Self {
        Self::CoercionError {
            name: name.into(),
            raw: raw.into(),
            kind,
            reason: reason.into(),
        }
    }

    pub fn logging<S: Into<String>>(msg: S) -> Self {
        Self::LoggingError(msg.into())
    }
}

/// Result type alias for flagenv operations
pub type Result<T> = std::result::Result<T, FlagenvError>;
