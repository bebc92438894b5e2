//! Material property errors.

use rk_core::{DimensionError, RkError};
use thiserror::Error;

/// Result type for material operations.
pub type MaterialResult<T> = Result<T, MaterialError>;

/// Errors that can occur while configuring or evaluating a material.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Conductivity model kind outside the implemented set.
    #[error("Conductivity model type '{kind}' is not implemented (options: {options})")]
    UnknownModel { kind: String, options: &'static str },

    /// Material name not present in the catalog.
    #[error("Unknown material '{name}'")]
    UnknownMaterial { name: String },

    /// Non-physical property value (non-positive density, specific heat, …).
    #[error("Non-physical value for {what} of material '{material}': {value}")]
    NonPhysical {
        material: String,
        what: &'static str,
        value: f64,
    },

    /// Coefficient with the wrong physical dimension.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

impl From<MaterialError> for RkError {
    fn from(err: MaterialError) -> Self {
        match err {
            MaterialError::Dimension(e) => RkError::Dimension(e),
            MaterialError::UnknownModel { .. } => RkError::InvalidArg {
                what: "unknown conductivity model",
            },
            MaterialError::UnknownMaterial { .. } => RkError::InvalidArg {
                what: "unknown material",
            },
            MaterialError::NonPhysical { what, .. } => RkError::InvalidArg { what },
        }
    }
}
