//! Heat-transfer edges between thermal components.

use rk_core::units::{Area, FilmCoefficient, Length, MassRate, Power, Temperature, w};
use rk_materials::Material;

/// Heat-transfer law carried by a link, with its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkLaw {
    /// Fourier conduction through a slab of `area` and `length`.
    Conduction { area: Area, length: Length },
    /// Newton cooling across `area` with film coefficient `h`.
    Convection { area: Area, h: FilmCoefficient },
    /// Enthalpy carried in by a stream of `mass_flow` arriving from the target.
    Advection { mass_flow: MassRate },
}

/// Directed link from its owning component to `target`.
///
/// Heat flow is computed for the owner: positive means heat flowing into the
/// owner. A link contributes only to its owner's balance, so a symmetric
/// exchange needs a link on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalLink {
    target: String,
    law: LinkLaw,
}

impl ThermalLink {
    pub(crate) fn new(target: impl Into<String>, law: LinkLaw) -> Self {
        Self {
            target: target.into(),
            law,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn law(&self) -> &LinkLaw {
        &self.law
    }

    pub fn is_conduction(&self) -> bool {
        matches!(self.law, LinkLaw::Conduction { .. })
    }

    /// Heat flow into the owner [W].
    ///
    /// `owner` supplies k(T_self) for conduction and cp(T_self) for advection.
    pub fn heat_flow(
        &self,
        owner: &dyn Material,
        t_self: Temperature,
        t_target: Temperature,
    ) -> Power {
        w(self.heat_flow_w(owner, t_self.value, t_target.value))
    }

    /// Same as [`heat_flow`](Self::heat_flow) on raw kelvin values.
    pub(crate) fn heat_flow_w(&self, owner: &dyn Material, t_self: f64, t_target: f64) -> f64 {
        let dt = t_target - t_self;
        match self.law {
            LinkLaw::Conduction { area, length } => {
                let k = owner.conductivity(rk_core::units::k(t_self)).value;
                k * area.value * dt / length.value
            }
            LinkLaw::Convection { area, h } => h.value * area.value * dt,
            LinkLaw::Advection { mass_flow } => {
                let cp = owner.specific_heat(rk_core::units::k(t_self)).value;
                mass_flow.value * cp * dt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_core::units::{j_per_kg_k, k, kg_per_m3, kgps, m, m2, w_per_m2_k, w_per_m_k};
    use rk_materials::{ConductivityModel, ConstantMaterial};

    fn material(k_val: f64) -> ConstantMaterial {
        ConstantMaterial::new(
            "m",
            kg_per_m3(1.0),
            j_per_kg_k(2.0),
            ConductivityModel::constant(w_per_m_k(k_val)),
        )
    }

    #[test]
    fn conduction_is_fourier() {
        let mat = material(2.0);
        let link = ThermalLink::new(
            "b",
            LinkLaw::Conduction {
                area: m2(3.0),
                length: m(0.5),
            },
        );
        // 2 * 3 * (400 - 300) / 0.5
        assert_eq!(link.heat_flow(&mat, k(300.0), k(400.0)).value, 1200.0);
        assert!(link.is_conduction());
    }

    #[test]
    fn convection_is_newton() {
        let mat = material(1.0);
        let link = ThermalLink::new(
            "b",
            LinkLaw::Convection {
                area: m2(2.0),
                h: w_per_m2_k(10.0),
            },
        );
        assert_eq!(link.heat_flow(&mat, k(350.0), k(300.0)).value, -1000.0);
    }

    #[test]
    fn advection_uses_owner_specific_heat() {
        let mat = material(1.0);
        let link = ThermalLink::new(
            "inlet",
            LinkLaw::Advection {
                mass_flow: kgps(0.5),
            },
        );
        // 0.5 kg/s * 2 J/(kg K) * 10 K
        assert_eq!(link.heat_flow(&mat, k(290.0), k(300.0)).value, 10.0);
    }

    #[test]
    fn equal_temperatures_carry_no_heat() {
        let mat = material(5.0);
        let link = ThermalLink::new(
            "b",
            LinkLaw::Conduction {
                area: m2(1.0),
                length: m(1.0),
            },
        );
        assert_eq!(link.heat_flow(&mat, k(600.0), k(600.0)).value, 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rk_core::units::{j_per_kg_k, k, kg_per_m3, m, m2, w_per_m_k};
    use rk_materials::{ConductivityModel, ConstantMaterial};

    proptest! {
        #[test]
        fn swapping_roles_flips_sign(
            k_val in 0.1_f64..100.0,
            area in 0.01_f64..10.0,
            length in 0.01_f64..10.0,
            ta in 250.0_f64..1500.0,
            tb in 250.0_f64..1500.0,
        ) {
            let mat = ConstantMaterial::new(
                "m",
                kg_per_m3(1.0),
                j_per_kg_k(1.0),
                ConductivityModel::constant(w_per_m_k(k_val)),
            );
            let link = ThermalLink::new("x", LinkLaw::Conduction { area: m2(area), length: m(length) });
            let q_ab = link.heat_flow(&mat, k(ta), k(tb)).value;
            let q_ba = link.heat_flow(&mat, k(tb), k(ta)).value;
            prop_assert_eq!(q_ab, -q_ba);
        }
    }
}
