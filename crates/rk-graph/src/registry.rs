//! The validated thermal network and its heat balances.

use std::collections::HashMap;

use rayon::prelude::*;
use rk_core::CompId;
use rk_core::units::{Power, Temperature, k, w};

use crate::component::ThermalComponent;
use crate::error::{GraphError, GraphResult};

/// A validated, immutable set of thermal components.
///
/// Component `i` owns slot `i` of the temperature state. Link targets are
/// resolved once at build time into a flat list: component `i`'s targets are
/// `link_targets[link_offsets[i]..link_offsets[i + 1]]`, in the same order as
/// `components[i].links()`.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: Vec<ThermalComponent>,
    link_offsets: Vec<usize>,
    link_targets: Vec<usize>,
    by_name: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub(crate) fn from_parts(
        components: Vec<ThermalComponent>,
        targets: Vec<Vec<usize>>,
        by_name: HashMap<String, usize>,
    ) -> Self {
        let mut link_offsets = Vec::with_capacity(components.len() + 1);
        let mut link_targets = Vec::new();
        link_offsets.push(0);
        for list in targets {
            link_targets.extend(list);
            link_offsets.push(link_targets.len());
        }
        Self {
            components,
            link_offsets,
            link_targets,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[ThermalComponent] {
        &self.components
    }

    pub fn component(&self, id: CompId) -> Option<&ThermalComponent> {
        self.components.get(id.slot())
    }

    pub fn component_by_name(&self, name: &str) -> Option<&ThermalComponent> {
        self.by_name.get(name).map(|&i| &self.components[i])
    }

    pub fn id_of(&self, name: &str) -> Option<CompId> {
        self.by_name.get(name).map(|&i| CompId::from_slot(i))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name())
    }

    /// Resolved target slots of component `slot`'s links.
    pub fn link_targets(&self, slot: usize) -> &[usize] {
        if slot >= self.components.len() {
            return &[];
        }
        &self.link_targets[self.link_offsets[slot]..self.link_offsets[slot + 1]]
    }

    pub fn link_count(&self) -> usize {
        self.link_targets.len()
    }

    /// Initial temperatures in state order [K].
    pub fn initial_state(&self) -> Vec<f64> {
        self.components
            .iter()
            .map(|c| c.initial_temperature().value)
            .collect()
    }

    /// Sum of the nominal powers of every generating component.
    pub fn total_nominal_power(&self) -> Power {
        w(self
            .components
            .iter()
            .filter_map(|c| c.heat_source())
            .map(|s| s.nominal_power.value)
            .sum())
    }

    /// Typed view of a temperature slice.
    pub fn unpack(&self, temps: &[f64]) -> GraphResult<Vec<Temperature>> {
        self.check_len(temps.len())?;
        Ok(temps.iter().map(|&t| k(t)).collect())
    }

    /// Raw kelvin values from typed temperatures.
    pub fn pack(&self, temps: &[Temperature]) -> GraphResult<Vec<f64>> {
        self.check_len(temps.len())?;
        Ok(temps.iter().map(|t| t.value).collect())
    }

    fn check_len(&self, actual: usize) -> GraphResult<()> {
        if actual == self.components.len() {
            Ok(())
        } else {
            Err(GraphError::StateLength {
                expected: self.components.len(),
                actual,
            })
        }
    }

    /// Net heat into component `slot` [W]: link flows plus generation.
    pub fn net_heat(&self, slot: usize, temps: &[f64], power_fraction: f64) -> GraphResult<f64> {
        self.check_len(temps.len())?;
        let comp = self
            .components
            .get(slot)
            .ok_or_else(|| GraphError::StateLength {
                expected: self.components.len(),
                actual: slot,
            })?;
        Ok(self.net_heat_unchecked(slot, comp, temps, power_fraction))
    }

    fn net_heat_unchecked(
        &self,
        slot: usize,
        comp: &ThermalComponent,
        temps: &[f64],
        power_fraction: f64,
    ) -> f64 {
        let t_self = temps[slot];
        let mut q = comp.generation(power_fraction).value;
        for (link, &target) in comp.links().iter().zip(self.link_targets(slot)) {
            q += link.heat_flow_w(comp.material(), t_self, temps[target]);
        }
        q
    }

    fn derivative_at(
        &self,
        slot: usize,
        temps: &[f64],
        power_fraction: f64,
    ) -> GraphResult<f64> {
        let comp = &self.components[slot];
        if comp.links().is_empty() && !comp.generates_heat() {
            return Ok(0.0);
        }

        let q = self.net_heat_unchecked(slot, comp, temps, power_fraction);
        let c = comp.heat_capacity(k(temps[slot]));
        if c <= 0.0 {
            return Err(GraphError::NonPositive {
                component: comp.name().to_string(),
                what: "heat capacity",
                value: c,
            });
        }
        let dtdt = q / c;
        if !dtdt.is_finite() {
            return Err(GraphError::NonFinite {
                component: comp.name().to_string(),
                what: "temperature derivative",
            });
        }
        Ok(dtdt)
    }

    /// dT/dt for every component [K/s].
    ///
    /// `power_fraction` is reactor power over its initial value; each
    /// generating component receives that fraction of its nominal power.
    /// A component with neither links nor generation gets exactly zero.
    pub fn temperature_derivatives(
        &self,
        temps: &[f64],
        power_fraction: f64,
        out: &mut [f64],
    ) -> GraphResult<()> {
        self.check_len(temps.len())?;
        self.check_len(out.len())?;
        for (slot, d) in out.iter_mut().enumerate() {
            *d = self.derivative_at(slot, temps, power_fraction)?;
        }
        Ok(())
    }

    /// Same as [`temperature_derivatives`](Self::temperature_derivatives),
    /// with components evaluated on the rayon pool.
    pub fn temperature_derivatives_par(
        &self,
        temps: &[f64],
        power_fraction: f64,
        out: &mut [f64],
    ) -> GraphResult<()> {
        self.check_len(temps.len())?;
        self.check_len(out.len())?;
        out.par_iter_mut()
            .enumerate()
            .try_for_each(|(slot, d)| {
                *d = self.derivative_at(slot, temps, power_fraction)?;
                Ok(())
            })
    }

    /// Σ αᵢ·(Tᵢ − Tᵢ₀) over all components.
    pub fn feedback_reactivity(&self, temps: &[f64]) -> GraphResult<f64> {
        self.check_len(temps.len())?;
        Ok(self
            .components
            .iter()
            .zip(temps)
            .map(|(c, &t)| c.temperature_reactivity(k(t)).value)
            .sum())
    }

    /// Σ ρcpV·T over all components [J], relative to 0 K.
    ///
    /// Only meaningful as a conserved quantity for constant-property materials.
    pub fn stored_energy(&self, temps: &[f64]) -> GraphResult<f64> {
        self.check_len(temps.len())?;
        Ok(self
            .components
            .iter()
            .zip(temps)
            .map(|(c, &t)| c.heat_capacity(k(t)) * t)
            .sum())
    }
}
