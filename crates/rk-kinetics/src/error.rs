//! Error types for kinetics setup.

use thiserror::Error;

use crate::data::{FissionIsotope, Spectrum};

/// Configuration errors raised while selecting kinetics data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KineticsError {
    #[error("Unknown fission isotope '{name}' (expected one of: u235, pu239)")]
    UnknownIsotope { name: String },

    #[error("Unknown neutron spectrum '{name}' (expected one of: thermal, fast)")]
    UnknownSpectrum { name: String },

    #[error("Unsupported {what} group count {count} (expected one of: {options})")]
    UnsupportedGroupCount {
        what: &'static str,
        count: i64,
        options: &'static str,
    },

    #[error("No {what} data for {isotope} in a {spectrum} spectrum")]
    MissingData {
        what: &'static str,
        isotope: FissionIsotope,
        spectrum: Spectrum,
    },

    #[error("Invalid reactivity schedule: {what}")]
    InvalidSchedule { what: &'static str },

    #[error("State slice has {actual} entries, kinetics expects {expected}")]
    StateLength { expected: usize, actual: usize },
}

pub type KineticsResult<T> = Result<T, KineticsError>;

impl KineticsError {
    /// True for errors detected while assembling the model.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, KineticsError::StateLength { .. })
    }
}
