//! Error types for simulation runs.

use std::fmt;

use rk_core::{DimensionError, RkError};
use rk_graph::GraphError;
use rk_kinetics::KineticsError;
use rk_materials::MaterialError;
use thiserror::Error;

/// Errors encountered while assembling or integrating a reactor model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Convergence failed at t = {t} s: {nsteps} attempted steps did not reach the next output time")]
    ConvergenceFailed { t: f64, nsteps: usize },

    #[error("Step size underflow at t = {t} s (h = {h})")]
    StepUnderflow { t: f64, h: f64 },

    #[error("Non-finite state at t = {t} s")]
    NonFinite { t: f64 },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Kinetics(#[from] KineticsError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error(transparent)]
    Core(#[from] RkError),
}

pub type SimResult<T> = Result<T, SimError>;

/// Coarse error taxonomy shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid model detected before integration.
    Configuration,
    /// Incompatible physical dimensions combined.
    Dimension,
    /// Step ceiling exceeded or step size collapsed.
    Convergence,
    /// NaN/inf produced while integrating.
    Numerical,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Dimension => "dimension error",
            ErrorKind::Convergence => "convergence error",
            ErrorKind::Numerical => "numerical error",
        })
    }
}

impl SimError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimError::InvalidArg { .. } => ErrorKind::Configuration,
            SimError::ConvergenceFailed { .. } | SimError::StepUnderflow { .. } => {
                ErrorKind::Convergence
            }
            SimError::NonFinite { .. } => ErrorKind::Numerical,
            SimError::Graph(GraphError::Material {
                source: MaterialError::Dimension(_),
                ..
            }) => ErrorKind::Dimension,
            SimError::Graph(e) if e.is_configuration() => ErrorKind::Configuration,
            SimError::Graph(_) => ErrorKind::Numerical,
            SimError::Kinetics(e) if e.is_configuration() => ErrorKind::Configuration,
            SimError::Kinetics(_) => ErrorKind::Numerical,
            SimError::Material(MaterialError::Dimension(_)) => ErrorKind::Dimension,
            SimError::Material(_) => ErrorKind::Configuration,
            SimError::Dimension(_) | SimError::Core(RkError::Dimension(_)) => ErrorKind::Dimension,
            SimError::Core(_) => ErrorKind::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_core::Dimension;

    #[test]
    fn taxonomy() {
        assert_eq!(
            SimError::ConvergenceFailed { t: 0.0, nsteps: 1 }.kind(),
            ErrorKind::Convergence
        );
        assert_eq!(
            SimError::from(GraphError::SelfLoop {
                component: "a".into()
            })
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            SimError::from(GraphError::NonFinite {
                component: "a".into(),
                what: "temperature derivative"
            })
            .kind(),
            ErrorKind::Numerical
        );
        let dim = DimensionError {
            op: "add",
            left: Dimension::LENGTH,
            right: Dimension::TIME,
        };
        assert_eq!(SimError::from(dim).kind(), ErrorKind::Dimension);
        assert_eq!(
            SimError::from(RkError::InvalidArg { what: "dt" }).kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn messages_are_readable() {
        let msg = SimError::ConvergenceFailed { t: 0.5, nsteps: 500 }.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("0.5"));
    }
}
