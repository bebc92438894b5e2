//! Coupled thermal network + point kinetics ODE system.

use std::fmt;

use rk_core::units::Power;
use rk_graph::ComponentRegistry;
use rk_kinetics::{KineticsSolver, ReactivityInsertion, ReactivitySchedule};

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Per-run context owning the registry, kinetics and reactivity insertion.
///
/// State layout: `[T_0..T_{N-1}, n, c_1..c_npg, ω_1..ω_ndg]`, with
/// temperatures in registry order.
pub struct ReactorModel {
    registry: ComponentRegistry,
    kinetics: KineticsSolver,
    insertion: Box<dyn ReactivityInsertion>,
    parallel: bool,
}

impl fmt::Debug for ReactorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactorModel")
            .field("components", &self.registry.len())
            .field("kinetics", self.kinetics.config())
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl ReactorModel {
    pub fn new(
        registry: ComponentRegistry,
        kinetics: KineticsSolver,
        insertion: impl ReactivityInsertion + 'static,
    ) -> Self {
        Self {
            registry,
            kinetics,
            insertion: Box::new(insertion),
            parallel: false,
        }
    }

    /// Model without external reactivity.
    pub fn unperturbed(registry: ComponentRegistry, kinetics: KineticsSolver) -> Self {
        Self::new(registry, kinetics, ReactivitySchedule::None)
    }

    /// Evaluate component heat balances on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn kinetics(&self) -> &KineticsSolver {
        &self.kinetics
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Number of temperature entries at the front of the state.
    pub fn n_temperatures(&self) -> usize {
        self.registry.len()
    }

    /// Power delivered at the initial state (sum of component shares).
    pub fn nominal_power(&self) -> Power {
        self.registry.total_nominal_power()
    }

    fn split<'a>(&self, x: &'a [f64]) -> SimResult<(&'a [f64], &'a [f64])> {
        if x.len() != self.dim() {
            return Err(SimError::InvalidArg {
                what: "state vector length does not match the reactor layout",
            });
        }
        Ok(x.split_at(self.registry.len()))
    }

    /// External reactivity at `t` plus feedback when enabled.
    pub fn reactivity(&self, t: f64, x: &[f64]) -> SimResult<f64> {
        let (temps, _) = self.split(x)?;
        let external = self.insertion.reactivity(t);
        let feedback = if self.kinetics.feedback() {
            self.registry.feedback_reactivity(temps)?
        } else {
            0.0
        };
        Ok(self.kinetics.total_reactivity(external, feedback))
    }

    /// Reactor power over its initial value.
    pub fn power_fraction(&self, x: &[f64]) -> SimResult<f64> {
        let (_, kin) = self.split(x)?;
        Ok(self.kinetics.power_fraction(kin)?)
    }
}

impl TransientModel for ReactorModel {
    fn dim(&self) -> usize {
        self.registry.len() + self.kinetics.dim()
    }

    fn initial_state(&self) -> Vec<f64> {
        let mut x = self.registry.initial_state();
        x.extend(self.kinetics.initial_state());
        x
    }

    fn rhs(&self, t: f64, x: &[f64], dxdt: &mut [f64]) -> SimResult<()> {
        let (temps, kin) = self.split(x)?;
        if dxdt.len() != x.len() {
            return Err(SimError::InvalidArg {
                what: "derivative buffer length does not match the state",
            });
        }
        let (dtemps, dkin) = dxdt.split_at_mut(self.registry.len());

        let power_fraction = self.kinetics.power_fraction(kin)?;
        if self.parallel {
            self.registry
                .temperature_derivatives_par(temps, power_fraction, dtemps)?;
        } else {
            self.registry
                .temperature_derivatives(temps, power_fraction, dtemps)?;
        }

        let rho = self.reactivity(t, x)?;
        self.kinetics.derivatives(rho, kin, dkin)?;
        Ok(())
    }
}
