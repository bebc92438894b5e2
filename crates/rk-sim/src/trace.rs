//! Per-quantity histories extracted from a reactor run.

use crate::error::SimResult;
use crate::integrator::StepStats;
use crate::reactor::ReactorModel;
use crate::sim::SimRecord;

/// Temperature, population, power and reactivity histories of a run.
///
/// Every series is indexed like `times()`.
#[derive(Clone, Debug)]
pub struct ReactorTrace {
    times: Vec<f64>,
    names: Vec<String>,
    temperatures: Vec<Vec<f64>>,
    neutron_population: Vec<f64>,
    power_fraction: Vec<f64>,
    power: Vec<f64>,
    reactivity: Vec<f64>,
    stats: StepStats,
}

impl ReactorTrace {
    pub fn from_record(model: &ReactorModel, record: &SimRecord) -> SimResult<Self> {
        let n_temps = model.n_temperatures();
        let nominal = model.nominal_power().value;
        let len = record.t.len();

        let mut temperatures = vec![Vec::with_capacity(len); n_temps];
        let mut neutron_population = Vec::with_capacity(len);
        let mut power_fraction = Vec::with_capacity(len);
        let mut power = Vec::with_capacity(len);
        let mut reactivity = Vec::with_capacity(len);

        for (&t, x) in record.t.iter().zip(&record.x) {
            for (series, &temp) in temperatures.iter_mut().zip(&x[..n_temps]) {
                series.push(temp);
            }
            let pf = model.power_fraction(x)?;
            neutron_population.push(x[n_temps]);
            power_fraction.push(pf);
            power.push(pf * nominal);
            reactivity.push(model.reactivity(t, x)?);
        }

        Ok(Self {
            times: record.t.clone(),
            names: model.registry().names().map(str::to_string).collect(),
            temperatures,
            neutron_population,
            power_fraction,
            power,
            reactivity,
            stats: record.stats,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn component_names(&self) -> &[String] {
        &self.names
    }

    /// Temperature history [K] of the named component.
    pub fn temperature(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.temperatures[i].as_slice())
    }

    /// Last recorded temperature [K] of the named component.
    pub fn final_temperature(&self, name: &str) -> Option<f64> {
        self.temperature(name).and_then(|s| s.last().copied())
    }

    pub fn neutron_population(&self) -> &[f64] {
        &self.neutron_population
    }

    pub fn power_fraction(&self) -> &[f64] {
        &self.power_fraction
    }

    /// Thermal power [W].
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn reactivity(&self) -> &[f64] {
        &self.reactivity
    }

    pub fn stats(&self) -> StepStats {
        self.stats
    }
}
