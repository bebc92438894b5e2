//! Model file schema.
//!
//! Physical quantities are strings with units (`"0.5 m^2"`, `"900 K"`,
//! `"25 C"`, `"100 pcm"`) and are dimension-checked during validation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDef {
    pub version: u32,
    pub name: String,
    pub timer: TimerDef,
    #[serde(default)]
    pub kinetics: KineticsDef,
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub links: Vec<LinkDef>,
    #[serde(default)]
    pub reactivity: ReactivityDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerDef {
    #[serde(default = "default_t0")]
    pub t0: String,
    pub tf: String,
    pub dt: String,
}

fn default_t0() -> String {
    "0 s".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KineticsDef {
    #[serde(default = "default_isotope")]
    pub fission_isotope: String,
    #[serde(default = "default_spectrum")]
    pub spectrum: String,
    #[serde(default = "default_precursor_groups")]
    pub n_precursor_groups: i64,
    #[serde(default = "default_decay_groups")]
    pub n_decay_groups: i64,
    #[serde(default)]
    pub feedback: bool,
}

fn default_isotope() -> String {
    "u235".to_string()
}

fn default_spectrum() -> String {
    "thermal".to_string()
}

fn default_precursor_groups() -> i64 {
    6
}

fn default_decay_groups() -> i64 {
    11
}

impl Default for KineticsDef {
    fn default() -> Self {
        Self {
            fission_isotope: default_isotope(),
            spectrum: default_spectrum(),
            n_precursor_groups: default_precursor_groups(),
            n_decay_groups: default_decay_groups(),
            feedback: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegratorDef {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default = "default_nsteps")]
    pub nsteps: i64,
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    #[serde(default)]
    pub parallel: bool,
}

fn default_method() -> String {
    "dopri5".to_string()
}

fn default_nsteps() -> i64 {
    500
}

fn default_rtol() -> f64 {
    1e-6
}

fn default_atol() -> f64 {
    1e-9
}

impl Default for IntegratorDef {
    fn default() -> Self {
        Self {
            method: default_method(),
            nsteps: default_nsteps(),
            rtol: default_rtol(),
            atol: default_atol(),
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDef {
    /// Entry from the built-in catalog.
    Builtin { id: String, name: String },
    /// Explicit properties. `density_slope` makes density linear in T.
    Custom {
        id: String,
        density: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        density_slope: Option<String>,
        specific_heat: String,
        #[serde(default)]
        conductivity: ConductivityDef,
    },
}

impl MaterialDef {
    pub fn id(&self) -> &str {
        match self {
            MaterialDef::Builtin { id, .. } | MaterialDef::Custom { id, .. } => id,
        }
    }
}

/// Conductivity model. `constant` is the 1 W/(m·K) baseline; a different
/// fixed value is written as `linear` with `b: "0 W/(m*K^2)"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConductivityDef {
    #[serde(default = "default_conductivity_kind")]
    pub kind: String,
    #[serde(default = "default_conductivity_a")]
    pub a: String,
    #[serde(default = "default_conductivity_b")]
    pub b: String,
}

fn default_conductivity_kind() -> String {
    "constant".to_string()
}

fn default_conductivity_a() -> String {
    "1 W/(m*K)".to_string()
}

fn default_conductivity_b() -> String {
    "0 W/(m*K^2)".to_string()
}

impl Default for ConductivityDef {
    fn default() -> Self {
        Self {
            kind: default_conductivity_kind(),
            a: default_conductivity_a(),
            b: default_conductivity_b(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    pub material: String,
    pub volume: String,
    pub initial_temperature: String,
    /// Reactivity per kelvin, e.g. `"-3.8 pcm/K"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_coefficient: Option<String>,
    /// Nominal power generated in this component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_generation: Option<String>,
}

fn default_reciprocal() -> bool {
    true
}

/// A heat-transfer link owned by `from` and pointing at `to`.
///
/// Conduction and convection are mirrored onto `to` unless `reciprocal` is
/// false; advection is always one-way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LinkDef {
    Conduction {
        from: String,
        to: String,
        area: String,
        length: String,
        #[serde(default = "default_reciprocal")]
        reciprocal: bool,
    },
    Convection {
        from: String,
        to: String,
        h: String,
        area: String,
        #[serde(default = "default_reciprocal")]
        reciprocal: bool,
    },
    Advection {
        from: String,
        to: String,
        mass_flow: String,
    },
}

impl LinkDef {
    pub fn endpoints(&self) -> (&str, &str) {
        match self {
            LinkDef::Conduction { from, to, .. }
            | LinkDef::Convection { from, to, .. }
            | LinkDef::Advection { from, to, .. } => (from, to),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactivityDef {
    #[default]
    None,
    Step {
        time: String,
        rho: String,
    },
    Ramp {
        start: String,
        end: String,
        rho: String,
    },
    Impulse {
        start: String,
        duration: String,
        rho: String,
    },
}
