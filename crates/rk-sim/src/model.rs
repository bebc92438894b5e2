//! TransientModel trait for pluggable ODE systems.

use crate::error::SimResult;

/// An ODE system `dx/dt = f(t, x)` over a flat `f64` state vector.
///
/// `rhs` takes `&self`: derivative evaluation is a pure function of
/// `(t, x)` and the model's read-only parameters.
pub trait TransientModel {
    /// Length of the state vector.
    fn dim(&self) -> usize;

    /// State at the start of the run.
    fn initial_state(&self) -> Vec<f64>;

    /// Write `f(t, x)` into `dxdt` (same length as `x`).
    fn rhs(&self, t: f64, x: &[f64], dxdt: &mut [f64]) -> SimResult<()>;
}
