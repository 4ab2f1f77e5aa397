use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwissError {
    /// A constructed or mutated field violates one of its invariants.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// Textual score input does not follow `<digits>` or `<letter><digits>`.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Every merge and re-pairing attempt failed to pair the whole round.
    #[error("Pairing incomplete: {0}")]
    PairingIncomplete(String),
    #[error("Pairing timed out after {elapsed:?} (deadline {deadline:?})")]
    PairingTimeout { elapsed: Duration, deadline: Duration },
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SwissError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub(crate) fn invalid(msg: impl Into<String>) -> SwissError {
    SwissError::InvalidValue(msg.into())
}
