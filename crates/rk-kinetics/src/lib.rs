//! rk-kinetics: point reactor kinetics for reactorkin.
//!
//! Provides:
//! - Six-group delayed-neutron and eleven-group decay-heat reference data
//! - `ReactivityInsertion`: external reactivity as a function of time
//! - `KineticsSolver`: the point-kinetics right-hand side and power fraction

pub mod data;
pub mod error;
pub mod insertion;
pub mod solver;

pub use data::{
    DECAY_HEAT_GROUPS, DecayHeatData, FissionIsotope, PRECURSOR_GROUPS, PrecursorData, Spectrum,
};
pub use error::{KineticsError, KineticsResult};
pub use insertion::{ReactivityInsertion, ReactivitySchedule};
pub use solver::{KineticsConfig, KineticsSolver, KineticsState};
