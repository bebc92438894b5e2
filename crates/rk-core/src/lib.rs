//! rk-core: stable foundation for reactorkin.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - quantity (runtime dimension-checked `UnitValue` + text parsing)
//! - numeric (finiteness checks and error norms)
//! - ids (component handles)
//! - timer (simulation time grid)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod quantity;
pub mod timer;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RkError, RkResult};
pub use ids::*;
pub use numeric::*;
pub use quantity::{Dimension, DimensionError, FromUnitValue, UnitValue};
pub use timer::Timer;
pub use units::*;
