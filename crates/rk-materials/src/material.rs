//! Material property trait and validation helpers.

use std::fmt;

use rk_core::units::{Conductivity, Density, SpecHeat, Temperature, kg_per_m3};

use crate::conductivity::ConductivityModel;
use crate::error::{MaterialError, MaterialResult};

/// Thermophysical properties of a substance.
///
/// Implementations must be thread-safe (Send + Sync) and pure: the same
/// temperature always yields the same properties.
pub trait Material: Send + Sync + fmt::Debug {
    /// Material name (for diagnostics).
    fn name(&self) -> &str;

    /// Density [kg/m³] at temperature `t`.
    fn density(&self, t: Temperature) -> Density;

    /// Specific heat capacity [J/(kg·K)] at temperature `t`.
    fn specific_heat(&self, t: Temperature) -> SpecHeat;

    /// Conductivity model used by conduction links leaving this material.
    fn conductivity_model(&self) -> &ConductivityModel;

    /// Thermal conductivity [W/(m·K)] at temperature `t`.
    fn conductivity(&self, t: Temperature) -> Conductivity {
        self.conductivity_model().evaluate(t)
    }
}

/// Check that a material is physical at temperature `t`.
///
/// Density and specific heat must be finite and positive; conductivity must be
/// finite and non-negative.
pub fn validate_at(material: &dyn Material, t: Temperature) -> MaterialResult<()> {
    let checks = [
        ("density", material.density(t).value, true),
        ("specific heat", material.specific_heat(t).value, true),
        ("conductivity", material.conductivity(t).value, false),
    ];
    for (what, value, strict) in checks {
        let ok = value.is_finite() && if strict { value > 0.0 } else { value >= 0.0 };
        if !ok {
            return Err(MaterialError::NonPhysical {
                material: material.name().to_string(),
                what,
                value,
            });
        }
    }
    Ok(())
}

/// Temperature-independent density and specific heat.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMaterial {
    name: String,
    density: Density,
    specific_heat: SpecHeat,
    conductivity: ConductivityModel,
}

impl ConstantMaterial {
    pub fn new(
        name: impl Into<String>,
        density: Density,
        specific_heat: SpecHeat,
        conductivity: ConductivityModel,
    ) -> Self {
        Self {
            name: name.into(),
            density,
            specific_heat,
            conductivity,
        }
    }
}

impl Material for ConstantMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn density(&self, _t: Temperature) -> Density {
        self.density
    }

    fn specific_heat(&self, _t: Temperature) -> SpecHeat {
        self.specific_heat
    }

    fn conductivity_model(&self) -> &ConductivityModel {
        &self.conductivity
    }
}

/// Density linear in absolute temperature, `ρ(T) = ρ₀ + (dρ/dT)·T`.
///
/// Liquid coolants (salts, metals) are usually tabulated this way.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDensityMaterial {
    name: String,
    /// Intercept at 0 K [kg/m³]
    rho0: f64,
    /// Slope [kg/(m³·K)]
    drho_dt: f64,
    specific_heat: SpecHeat,
    conductivity: ConductivityModel,
}

impl LinearDensityMaterial {
    pub fn new(
        name: impl Into<String>,
        rho0: f64,
        drho_dt: f64,
        specific_heat: SpecHeat,
        conductivity: ConductivityModel,
    ) -> Self {
        Self {
            name: name.into(),
            rho0,
            drho_dt,
            specific_heat,
            conductivity,
        }
    }
}

impl Material for LinearDensityMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn density(&self, t: Temperature) -> Density {
        kg_per_m3(self.rho0 + self.drho_dt * t.value)
    }

    fn specific_heat(&self, _t: Temperature) -> SpecHeat {
        self.specific_heat
    }

    fn conductivity_model(&self) -> &ConductivityModel {
        &self.conductivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_core::units::{j_per_kg_k, k, w_per_m_k};

    fn unit_material() -> ConstantMaterial {
        ConstantMaterial::new(
            "unit",
            kg_per_m3(1.0),
            j_per_kg_k(1.0),
            ConductivityModel::constant(w_per_m_k(1.0)),
        )
    }

    #[test]
    fn constant_material_properties() {
        let m = unit_material();
        assert_eq!(m.name(), "unit");
        assert_eq!(m.density(k(300.0)).value, 1.0);
        assert_eq!(m.specific_heat(k(900.0)).value, 1.0);
        assert_eq!(m.conductivity(k(900.0)).value, 1.0);
        assert!(validate_at(&m, k(300.0)).is_ok());
    }

    #[test]
    fn linear_density_decreases_with_temperature() {
        let m = LinearDensityMaterial::new(
            "salt",
            2413.0,
            -0.488,
            j_per_kg_k(2386.0),
            ConductivityModel::default(),
        );
        assert!(m.density(k(900.0)).value < m.density(k(600.0)).value);
        assert!((m.density(k(1000.0)).value - 1925.0).abs() < 1e-9);
    }

    #[test]
    fn validation_rejects_non_physical_density() {
        let m = ConstantMaterial::new(
            "void",
            kg_per_m3(0.0),
            j_per_kg_k(1.0),
            ConductivityModel::default(),
        );
        let err = validate_at(&m, k(300.0)).unwrap_err();
        assert!(matches!(
            err,
            MaterialError::NonPhysical {
                what: "density",
                ..
            }
        ));
    }

    #[test]
    fn validation_rejects_negative_linear_conductivity() {
        let model = ConductivityModel::linear(
            w_per_m_k(1.0),
            rk_core::UnitValue::new(-0.01, rk_core::Dimension::CONDUCTIVITY_SLOPE),
        )
        .unwrap();
        let m = ConstantMaterial::new("m", kg_per_m3(1.0), j_per_kg_k(1.0), model);
        assert!(validate_at(&m, k(300.0)).is_ok());
        assert!(validate_at(&m, k(500.0)).is_err());
    }
}
