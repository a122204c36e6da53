use thiserror::Error;

/// Reasons a simulation is rejected before any schedule is computed.
///
/// Every variant is a validation failure: bad caller input, never a
/// transient condition worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmortizationError {
    #[error("Invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("Invalid annual rate: {0}")]
    InvalidRate(String),

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Invalid grace period: {0}")]
    InvalidGracePeriod(String),

    #[error("{field} out of bounds: {value} is not within [{min}, {max}]")]
    OutOfBounds {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("Amount too large: {0} overflows")]
    Overflow(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid limits configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::Config(e.to_string())
    }
}

/// Result type shared by every fallible operation of the crate.
pub type AmortizationResult<T> = Result<T, AmortizationError>;
