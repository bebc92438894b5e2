//! Lumped thermal components (graph nodes).

use std::sync::Arc;

use rk_core::units::{
    Area, FilmCoefficient, Length, MassRate, Power, Reactivity, TempCoefficient, Temperature,
    Volume, per_k, unitless,
};
use rk_materials::Material;

use crate::error::{GraphError, GraphResult};
use crate::link::{LinkLaw, ThermalLink};

/// Internal heat generation driven by reactor power.
///
/// `nominal_power` is what this component receives when the reactor sits at
/// its initial power; at other times it scales with the normalized reactor
/// power, so each generating component carries its own explicit share.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSource {
    pub nominal_power: Power,
}

/// A lumped node of the thermal network.
#[derive(Debug, Clone)]
pub struct ThermalComponent {
    name: String,
    material: Arc<dyn Material>,
    volume: Volume,
    initial_temperature: Temperature,
    feedback_coefficient: TempCoefficient,
    heat_source: Option<HeatSource>,
    links: Vec<ThermalLink>,
}

impl ThermalComponent {
    /// Component without feedback, heat generation or links.
    pub fn new(
        name: impl Into<String>,
        material: Arc<dyn Material>,
        volume: Volume,
        initial_temperature: Temperature,
    ) -> Self {
        Self {
            name: name.into(),
            material,
            volume,
            initial_temperature,
            feedback_coefficient: per_k(0.0),
            heat_source: None,
            links: Vec::new(),
        }
    }

    /// Reactivity feedback coefficient α (Δk/k per kelvin).
    pub fn with_feedback(mut self, alpha: TempCoefficient) -> Self {
        self.feedback_coefficient = alpha;
        self
    }

    /// Enable heat generation with the given share of nominal reactor power.
    pub fn with_heat_generation(mut self, nominal_power: Power) -> Self {
        self.heat_source = Some(HeatSource { nominal_power });
        self
    }

    /// Append a conduction link to `target`.
    pub fn add_conduction(
        &mut self,
        target: impl Into<String>,
        area: Area,
        length: Length,
    ) -> GraphResult<()> {
        self.require_positive("conduction area", area.value)?;
        self.require_positive("conduction length", length.value)?;
        self.links
            .push(ThermalLink::new(target, LinkLaw::Conduction { area, length }));
        Ok(())
    }

    /// Append a convection link to `target`.
    pub fn add_convection(
        &mut self,
        target: impl Into<String>,
        h: FilmCoefficient,
        area: Area,
    ) -> GraphResult<()> {
        self.require_positive("film coefficient", h.value)?;
        self.require_positive("convection area", area.value)?;
        self.links
            .push(ThermalLink::new(target, LinkLaw::Convection { area, h }));
        Ok(())
    }

    /// Append an advection link carrying `mass_flow` in from `target`.
    pub fn add_advection(
        &mut self,
        target: impl Into<String>,
        mass_flow: MassRate,
    ) -> GraphResult<()> {
        self.require_positive("mass flow", mass_flow.value)?;
        self.links
            .push(ThermalLink::new(target, LinkLaw::Advection { mass_flow }));
        Ok(())
    }

    fn require_positive(&self, what: &'static str, value: f64) -> GraphResult<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(GraphError::NonPositive {
                component: self.name.clone(),
                what,
                value,
            })
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn initial_temperature(&self) -> Temperature {
        self.initial_temperature
    }

    pub fn feedback_coefficient(&self) -> TempCoefficient {
        self.feedback_coefficient
    }

    pub fn heat_source(&self) -> Option<HeatSource> {
        self.heat_source
    }

    pub fn generates_heat(&self) -> bool {
        self.heat_source.is_some()
    }

    pub fn links(&self) -> &[ThermalLink] {
        &self.links
    }

    /// Thermal capacitance ρ(T)·cp(T)·V [J/K].
    pub fn heat_capacity(&self, t: Temperature) -> f64 {
        self.material.density(t).value * self.material.specific_heat(t).value * self.volume.value
    }

    /// Feedback reactivity α·(T − T₀).
    pub fn temperature_reactivity(&self, t: Temperature) -> Reactivity {
        unitless(self.feedback_coefficient.value * (t.value - self.initial_temperature.value))
    }

    /// Internal generation [W] at normalized reactor power `power_fraction`.
    pub fn generation(&self, power_fraction: f64) -> Power {
        match self.heat_source {
            Some(src) => src.nominal_power * power_fraction,
            None => rk_core::units::w(0.0),
        }
    }
}
