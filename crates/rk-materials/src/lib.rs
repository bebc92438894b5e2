//! rk-materials: material property models for reactorkin.
//!
//! Provides:
//! - `ConductivityModel`: thermal conductivity k(T) as a tagged variant
//! - `Material` trait: density, specific heat and conductivity as functions of temperature
//! - `ConstantMaterial` for user-specified properties
//! - A small catalog of built-in core materials (fuel kernel, graphite, FLiBe, sodium)
//!
//! # Example
//!
//! ```
//! use rk_core::units::k;
//! use rk_materials::{Material, builtin};
//!
//! let flibe = builtin("flibe").unwrap();
//! let rho = flibe.density(k(900.0));
//! assert!(rho.value > 1900.0);
//! ```

pub mod catalog;
pub mod conductivity;
pub mod error;
pub mod material;

// Re-exports for ergonomics
pub use catalog::{MaterialCatalogEntry, builtin, catalog};
pub use conductivity::{ConductivityKind, ConductivityModel};
pub use error::{MaterialError, MaterialResult};
pub use material::{ConstantMaterial, LinearDensityMaterial, Material, validate_at};
