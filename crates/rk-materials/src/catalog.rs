use std::sync::Arc;

use rk_core::units::{j_per_kg_k, kg_per_m3, w_per_m_k};
use rk_core::{Dimension, UnitValue};

use crate::conductivity::ConductivityModel;
use crate::error::{MaterialError, MaterialResult};
use crate::material::{ConstantMaterial, LinearDensityMaterial, Material};

/// Built-in material with a constructor.
///
/// Property values are representative textbook figures for each substance.
#[derive(Debug, Clone, Copy)]
pub struct MaterialCatalogEntry {
    pub canonical_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    build: fn() -> Arc<dyn Material>,
}

impl MaterialCatalogEntry {
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        self.canonical_id == query || self.aliases.iter().any(|alias| *alias == query)
    }

    pub fn build(&self) -> Arc<dyn Material> {
        (self.build)()
    }
}

fn slope(v: f64) -> UnitValue {
    UnitValue::new(v, Dimension::CONDUCTIVITY_SLOPE)
}

fn kernel() -> Arc<dyn Material> {
    Arc::new(ConstantMaterial::new(
        "kernel",
        kg_per_m3(11_031.0),
        j_per_kg_k(400.0),
        ConductivityModel::constant(w_per_m_k(3.5)),
    ))
}

fn uo2() -> Arc<dyn Material> {
    Arc::new(ConstantMaterial::new(
        "uo2",
        kg_per_m3(10_970.0),
        j_per_kg_k(300.0),
        ConductivityModel::Linear {
            a: w_per_m_k(8.0),
            b: slope(-0.004),
        },
    ))
}

fn graphite() -> Arc<dyn Material> {
    Arc::new(ConstantMaterial::new(
        "graphite",
        kg_per_m3(1_740.0),
        j_per_kg_k(1_650.0),
        ConductivityModel::constant(w_per_m_k(26.0)),
    ))
}

fn flibe() -> Arc<dyn Material> {
    Arc::new(LinearDensityMaterial::new(
        "flibe",
        2_413.0,
        -0.488,
        j_per_kg_k(2_386.0),
        ConductivityModel::constant(w_per_m_k(1.1)),
    ))
}

fn sodium() -> Arc<dyn Material> {
    Arc::new(LinearDensityMaterial::new(
        "sodium",
        1_014.0,
        -0.235,
        j_per_kg_k(1_270.0),
        ConductivityModel::Linear {
            a: w_per_m_k(92.9),
            b: slope(-0.058),
        },
    ))
}

const CATALOG: [MaterialCatalogEntry; 5] = [
    MaterialCatalogEntry {
        canonical_id: "kernel",
        display_name: "UCO fuel kernel",
        aliases: &["uco", "fuel_kernel"],
        build: kernel,
    },
    MaterialCatalogEntry {
        canonical_id: "uo2",
        display_name: "Uranium dioxide",
        aliases: &["uranium_dioxide"],
        build: uo2,
    },
    MaterialCatalogEntry {
        canonical_id: "graphite",
        display_name: "Nuclear graphite",
        aliases: &["moderator"],
        build: graphite,
    },
    MaterialCatalogEntry {
        canonical_id: "flibe",
        display_name: "FLiBe (2LiF-BeF2)",
        aliases: &["salt", "2lif-bef2"],
        build: flibe,
    },
    MaterialCatalogEntry {
        canonical_id: "sodium",
        display_name: "Liquid sodium",
        aliases: &["na"],
        build: sodium,
    },
];

pub fn catalog() -> &'static [MaterialCatalogEntry] {
    &CATALOG
}

/// Look up and construct a built-in material by id or alias.
pub fn builtin(name: &str) -> MaterialResult<Arc<dyn Material>> {
    CATALOG
        .iter()
        .find(|entry| entry.matches(name))
        .map(MaterialCatalogEntry::build)
        .ok_or_else(|| MaterialError::UnknownMaterial {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::validate_at;
    use rk_core::units::k;

    #[test]
    fn every_entry_is_physical_over_operating_range() {
        for entry in catalog() {
            let m = entry.build();
            for t in [300.0, 600.0, 900.0, 1200.0] {
                assert!(
                    validate_at(m.as_ref(), k(t)).is_ok(),
                    "{} at {t} K",
                    entry.canonical_id
                );
            }
        }
    }

    #[test]
    fn lookup_by_alias() {
        assert_eq!(builtin("Salt").unwrap().name(), "flibe");
        assert_eq!(builtin("na").unwrap().name(), "sodium");
    }

    #[test]
    fn unknown_material() {
        let err = builtin("unobtainium").unwrap_err();
        assert!(matches!(err, MaterialError::UnknownMaterial { .. }));
    }
}
