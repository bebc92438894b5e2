//! Registry validation logic.

use std::collections::HashMap;

use rk_materials::validate_at;

use crate::component::ThermalComponent;
use crate::error::{GraphError, GraphResult};

/// Check names, physical parameters and materials of every component.
///
/// Returns the name → slot map on success so `build` does not rebuild it.
pub(crate) fn validate_components(
    components: &[ThermalComponent],
) -> GraphResult<HashMap<String, usize>> {
    let mut by_name = HashMap::with_capacity(components.len());

    for (slot, comp) in components.iter().enumerate() {
        if comp.name().trim().is_empty() {
            return Err(GraphError::EmptyName);
        }
        if by_name.insert(comp.name().to_string(), slot).is_some() {
            return Err(GraphError::DuplicateName {
                name: comp.name().to_string(),
            });
        }

        positive(comp, "volume", comp.volume().value)?;
        positive(comp, "initial temperature", comp.initial_temperature().value)?;

        let alpha = comp.feedback_coefficient().value;
        if !alpha.is_finite() {
            return Err(GraphError::NonFinite {
                component: comp.name().to_string(),
                what: "feedback coefficient",
            });
        }

        if let Some(src) = comp.heat_source() {
            let p = src.nominal_power.value;
            if !p.is_finite() || p < 0.0 {
                return Err(GraphError::NonPositive {
                    component: comp.name().to_string(),
                    what: "nominal power",
                    value: p,
                });
            }
        }

        validate_at(comp.material(), comp.initial_temperature()).map_err(|source| {
            GraphError::Material {
                component: comp.name().to_string(),
                source,
            }
        })?;
    }

    Ok(by_name)
}

/// Resolve every link target to a slot, rejecting dangling and self links.
pub(crate) fn resolve_links(
    components: &[ThermalComponent],
    by_name: &HashMap<String, usize>,
) -> GraphResult<Vec<Vec<usize>>> {
    components
        .iter()
        .enumerate()
        .map(|(slot, comp)| {
            comp.links()
                .iter()
                .map(|link| {
                    let target =
                        by_name
                            .get(link.target())
                            .copied()
                            .ok_or_else(|| GraphError::UnknownTarget {
                                component: comp.name().to_string(),
                                target: link.target().to_string(),
                            })?;
                    if target == slot {
                        return Err(GraphError::SelfLoop {
                            component: comp.name().to_string(),
                        });
                    }
                    Ok(target)
                })
                .collect()
        })
        .collect()
}

fn positive(comp: &ThermalComponent, what: &'static str, value: f64) -> GraphResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GraphError::NonPositive {
            component: comp.name().to_string(),
            what,
            value,
        })
    }
}
