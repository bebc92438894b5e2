//! Transient simulation for reactorkin.
//!
//! Provides:
//! - `TransientModel`: flat-state ODE systems
//! - Adaptive Dormand–Prince 5(4) plus fixed-step RK4 and forward Euler
//! - `ReactorModel`: the thermal network coupled to point kinetics
//! - `run_sim` / `run_reactor` over a `Timer` grid, producing a `ReactorTrace`

pub mod error;
pub mod integrator;
pub mod model;
pub mod reactor;
pub mod sim;
pub mod trace;

// Re-exports for public API
pub use error::{ErrorKind, SimError, SimResult};
pub use integrator::{DormandPrince, ForwardEuler, Integrator, RK4, StepStats};
pub use model::TransientModel;
pub use reactor::ReactorModel;
pub use sim::{
    IntegratorType, SimOptions, SimProgress, SimRecord, run_reactor, run_sim,
    run_sim_with_progress,
};
pub use trace::ReactorTrace;
