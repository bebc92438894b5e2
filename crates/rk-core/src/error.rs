use thiserror::Error;

use crate::quantity::DimensionError;

pub type RkResult<T> = Result<T, RkError>;

/// Invalid scalar input to a core constructor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}
