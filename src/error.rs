use thiserror::Error;

/// Errors raised by the scoring core.
///
/// Every variant is returned to the caller as soon as it is detected; the
/// core never retries or substitutes a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// A mark string is not a plain number or a 2/3-segment colon time
    #[error("invalid mark '{input}': {reason}")]
    Format { input: String, reason: String },

    /// The event key is not a column of the table (or not a key at all)
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    /// The event column has no tabulated marks to fit against
    #[error("no tabulated marks for event '{0}'")]
    InsufficientData(String),

    /// The raw table breaks the `Points` column or column length invariants
    #[error("malformed table: {0}")]
    MalformedTable(String),
}

impl ScoringError {
    pub(crate) fn format(input: &str, reason: impl Into<String>) -> Self {
        ScoringError::Format {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = ScoringError> = std::result::Result<T, E>;
