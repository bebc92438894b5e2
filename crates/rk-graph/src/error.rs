//! Thermal network error types.

use rk_materials::MaterialError;

pub type GraphResult<T> = Result<T, GraphError>;

/// Network construction and evaluation errors.
///
/// Everything except `StateLength` and `NonFinite` is a configuration error,
/// caught while the model is assembled or, for a heat capacity that turns
/// non-positive, when a material leaves its valid range mid-run.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A component was registered with an empty name.
    EmptyName,

    /// Two components share a name.
    DuplicateName { name: String },

    /// Builder lookup by name failed.
    UnknownComponent { name: String },

    /// A link points at a component that is not in the registry.
    UnknownTarget { component: String, target: String },

    /// A link points back at its own component.
    SelfLoop { component: String },

    /// A geometric or physical parameter that must be positive is not.
    NonPositive {
        component: String,
        what: &'static str,
        value: f64,
    },

    /// Material is non-physical at the component's initial temperature.
    Material {
        component: String,
        source: MaterialError,
    },

    /// A state slice does not match the registry layout.
    StateLength { expected: usize, actual: usize },

    /// A heat balance produced NaN or infinity.
    NonFinite { component: String, what: &'static str },
}

impl GraphError {
    /// True for errors detected while assembling the model.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            GraphError::StateLength { .. } | GraphError::NonFinite { .. }
        )
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::EmptyName => write!(f, "Component name must not be empty"),
            GraphError::DuplicateName { name } => {
                write!(f, "Component name '{}' is used more than once", name)
            }
            GraphError::UnknownComponent { name } => {
                write!(f, "No component named '{}'", name)
            }
            GraphError::UnknownTarget { component, target } => {
                write!(
                    f,
                    "Component '{}' links to '{}', which is not in the registry",
                    component, target
                )
            }
            GraphError::SelfLoop { component } => {
                write!(f, "Component '{}' links to itself", component)
            }
            GraphError::NonPositive {
                component,
                what,
                value,
            } => {
                write!(
                    f,
                    "Component '{}': {} must be positive (got {})",
                    component, what, value
                )
            }
            GraphError::Material { component, source } => {
                write!(f, "Component '{}': {}", component, source)
            }
            GraphError::StateLength { expected, actual } => {
                write!(
                    f,
                    "State slice has {} entries, registry expects {}",
                    actual, expected
                )
            }
            GraphError::NonFinite { component, what } => {
                write!(f, "Component '{}': non-finite {}", component, what)
            }
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Material { source, .. } => Some(source),
            _ => None,
        }
    }
}
