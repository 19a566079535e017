use chrono::NaiveDate;
use thiserror::Error;

use crate::rates::RateKey;

/// Result alias for calculator operations.
pub type CalcResult<T> = Result<T, CalcError>;

/// Errors that abort a calculation call. No partial strategy set is
/// returned when one of these is raised.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("bank rates are missing required entry '{key}'")]
    MissingRate { key: RateKey },

    #[error("no strategy could be constructed for the requested period")]
    NoValidStrategy,
}

impl CalcError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            message: message.into(),
        }
    }
}

/// Failure local to a single strategy template. The affected strategy is
/// marked invalid and excluded from selection; other strategies in the same
/// call are unaffected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
    #[error("no business day available for a roll date between {start} and {end}")]
    UnresolvableBoundary { start: NaiveDate, end: NaiveDate },
}
