//! rk-graph: thermal network layer for reactorkin.
//!
//! Provides:
//! - `ThermalLink`: conduction / convection / advection edges
//! - `ThermalComponent`: a lumped node with material, volume and outgoing links
//! - `RegistryBuilder`: incremental assembly with build-time validation
//! - `ComponentRegistry`: the closed graph, state-vector packing and heat balances
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rk_core::units::{j_per_kg_k, k, kg_per_m3, m, m2, m3, w_per_m_k};
//! use rk_graph::{RegistryBuilder, ThermalComponent};
//! use rk_materials::{ConductivityModel, ConstantMaterial};
//!
//! let mat = Arc::new(ConstantMaterial::new(
//!     "unit",
//!     kg_per_m3(1.0),
//!     j_per_kg_k(1.0),
//!     ConductivityModel::constant(w_per_m_k(1.0)),
//! ));
//!
//! let mut builder = RegistryBuilder::new();
//! builder.add_component(ThermalComponent::new("a", mat.clone(), m3(1.0), k(400.0)));
//! builder.add_component(ThermalComponent::new("b", mat, m3(1.0), k(300.0)));
//! builder.add_conduction("a", "b", m2(1.0), m(1.0)).unwrap();
//! builder.add_conduction("b", "a", m2(1.0), m(1.0)).unwrap();
//! let registry = builder.build().unwrap();
//!
//! assert_eq!(registry.len(), 2);
//! assert_eq!(registry.initial_state(), vec![400.0, 300.0]);
//! ```

pub mod builder;
pub mod component;
pub mod error;
pub mod link;
pub mod registry;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::RegistryBuilder;
pub use component::{HeatSource, ThermalComponent};
pub use error::{GraphError, GraphResult};
pub use link::{LinkLaw, ThermalLink};
pub use registry::ComponentRegistry;
