//! Point-kinetics equations with delayed neutrons and decay heat.

use crate::data::{DecayHeatData, FissionIsotope, PrecursorData, Spectrum};
use crate::error::{KineticsError, KineticsResult};

/// Switches selecting the kinetics data and feedback coupling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticsConfig {
    pub isotope: FissionIsotope,
    pub spectrum: Spectrum,
    /// Delayed-neutron precursor groups, 0 or 6.
    pub n_precursor_groups: i64,
    /// Decay-heat groups, 0 or 11.
    pub n_decay_groups: i64,
    /// Add temperature feedback to the external reactivity.
    pub feedback: bool,
}

impl Default for KineticsConfig {
    fn default() -> Self {
        Self {
            isotope: FissionIsotope::U235,
            spectrum: Spectrum::Thermal,
            n_precursor_groups: 6,
            n_decay_groups: 11,
            feedback: false,
        }
    }
}

/// Owned snapshot of the kinetics part of the state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct KineticsState {
    /// Neutron population relative to its initial value.
    pub neutron_population: f64,
    pub precursor_concentrations: Vec<f64>,
    pub decay_heat_fractions: Vec<f64>,
}

/// Evaluates the point-kinetics right-hand side.
///
/// The kinetics slice is laid out as `[n, c_1..c_npg, ω_1..ω_ndg]`.
#[derive(Debug, Clone)]
pub struct KineticsSolver {
    config: KineticsConfig,
    precursors: PrecursorData,
    decay: DecayHeatData,
}

impl KineticsSolver {
    pub fn new(config: KineticsConfig) -> KineticsResult<Self> {
        let precursors =
            PrecursorData::lookup(config.isotope, config.spectrum, config.n_precursor_groups)?;
        let decay = DecayHeatData::lookup(config.isotope, config.spectrum, config.n_decay_groups)?;

        tracing::debug!(
            isotope = %config.isotope,
            spectrum = %config.spectrum,
            n_pg = precursors.groups(),
            n_dg = decay.groups(),
            beta = precursors.beta(),
            feedback = config.feedback,
            "kinetics configured"
        );

        Ok(Self {
            config,
            precursors,
            decay,
        })
    }

    pub fn config(&self) -> &KineticsConfig {
        &self.config
    }

    pub fn precursors(&self) -> &PrecursorData {
        &self.precursors
    }

    pub fn decay_heat(&self) -> &DecayHeatData {
        &self.decay
    }

    pub fn feedback(&self) -> bool {
        self.config.feedback
    }

    pub fn n_pg(&self) -> usize {
        self.precursors.groups()
    }

    pub fn n_dg(&self) -> usize {
        self.decay.groups()
    }

    /// Length of the kinetics slice.
    pub fn dim(&self) -> usize {
        1 + self.n_pg() + self.n_dg()
    }

    /// Equilibrium at unit power: n = 1, cᵢ = βᵢ/(λᵢΛ), ωₖ = κₖ.
    pub fn initial_state(&self) -> Vec<f64> {
        let gen_time = self.precursors.generation_time();
        let mut x = Vec::with_capacity(self.dim());
        x.push(1.0);
        x.extend(
            self.precursors
                .betas()
                .iter()
                .zip(self.precursors.lambdas())
                .map(|(b, l)| b / (l * gen_time)),
        );
        x.extend_from_slice(self.decay.kappas());
        x
    }

    /// Total reactivity from the external insertion and summed feedback.
    ///
    /// Feedback is ignored unless enabled in the configuration.
    pub fn total_reactivity(&self, external: f64, feedback: f64) -> f64 {
        if self.config.feedback {
            external + feedback
        } else {
            external
        }
    }

    fn check_len(&self, actual: usize) -> KineticsResult<()> {
        if actual == self.dim() {
            Ok(())
        } else {
            Err(KineticsError::StateLength {
                expected: self.dim(),
                actual,
            })
        }
    }

    /// Derivatives of the kinetics slice at reactivity `rho`.
    pub fn derivatives(&self, rho: f64, x: &[f64], out: &mut [f64]) -> KineticsResult<()> {
        self.check_len(x.len())?;
        self.check_len(out.len())?;

        let npg = self.n_pg();
        let n = x[0];
        let c = &x[1..1 + npg];
        let omega = &x[1 + npg..];

        let gen_time = self.precursors.generation_time();
        let beta = self.precursors.beta();
        let lambdas = self.precursors.lambdas();

        let delayed: f64 = lambdas.iter().zip(c).map(|(l, ci)| l * ci).sum();
        out[0] = (rho - beta) / gen_time * n + delayed;

        for (i, (b, l)) in self.precursors.betas().iter().zip(lambdas).enumerate() {
            out[1 + i] = b / gen_time * n - l * c[i];
        }

        for (k, (l, kappa)) in self
            .decay
            .lambdas()
            .iter()
            .zip(self.decay.kappas())
            .enumerate()
        {
            out[1 + npg + k] = l * (kappa * n - omega[k]);
        }
        Ok(())
    }

    /// Thermal power over its initial value: n·(1 − Σκ) + Σω.
    pub fn power_fraction(&self, x: &[f64]) -> KineticsResult<f64> {
        self.check_len(x.len())?;
        let omega_sum: f64 = x[1 + self.n_pg()..].iter().sum();
        Ok(x[0] * (1.0 - self.decay.kappa_total()) + omega_sum)
    }

    pub fn unpack(&self, x: &[f64]) -> KineticsResult<KineticsState> {
        self.check_len(x.len())?;
        let npg = self.n_pg();
        Ok(KineticsState {
            neutron_population: x[0],
            precursor_concentrations: x[1..1 + npg].to_vec(),
            decay_heat_fractions: x[1 + npg..].to_vec(),
        })
    }

    pub fn pack(&self, state: &KineticsState) -> KineticsResult<Vec<f64>> {
        let mut x = Vec::with_capacity(self.dim());
        x.push(state.neutron_population);
        x.extend_from_slice(&state.precursor_concentrations);
        x.extend_from_slice(&state.decay_heat_fractions);
        self.check_len(x.len())?;
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(n_pg: i64, n_dg: i64, feedback: bool) -> KineticsSolver {
        KineticsSolver::new(KineticsConfig {
            n_precursor_groups: n_pg,
            n_decay_groups: n_dg,
            feedback,
            ..KineticsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn layout() {
        let s = solver(6, 11, false);
        assert_eq!(s.dim(), 18);
        assert_eq!(s.initial_state().len(), 18);
        assert_eq!(solver(0, 0, false).dim(), 1);
    }

    #[test]
    fn equilibrium_is_steady_without_reactivity() {
        let s = solver(6, 11, false);
        let x = s.initial_state();
        let mut dx = vec![f64::NAN; s.dim()];
        s.derivatives(0.0, &x, &mut dx).unwrap();
        for (i, d) in dx.iter().enumerate() {
            assert!(d.abs() < 1e-9, "component {i}: {d}");
        }
        assert!((s.power_fraction(&x).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn positive_reactivity_raises_population() {
        let s = solver(6, 0, false);
        let x = s.initial_state();
        let mut dx = vec![0.0; s.dim()];
        s.derivatives(0.001, &x, &mut dx).unwrap();
        // ρ/Λ with n = 1
        assert!((dx[0] - 10.0).abs() < 1e-9);
        assert!(dx[1..].iter().all(|d| d.abs() < 1e-9));
    }

    #[test]
    fn feedback_switch() {
        assert_eq!(solver(6, 0, false).total_reactivity(1e-3, -5e-4), 1e-3);
        assert_eq!(solver(6, 0, true).total_reactivity(1e-3, -5e-4), 5e-4);
    }

    #[test]
    fn decay_heat_lags_power() {
        let s = solver(0, 11, false);
        let mut x = s.initial_state();
        x[0] = 2.0;
        let mut dx = vec![0.0; s.dim()];
        s.derivatives(0.0, &x, &mut dx).unwrap();
        assert!(dx[1..].iter().all(|d| *d > 0.0));
        let p = s.power_fraction(&x).unwrap();
        assert!(p > 1.0 && p < 2.0);
    }

    #[test]
    fn pack_and_length_checks() {
        let s = solver(6, 11, false);
        let state = s.unpack(&s.initial_state()).unwrap();
        assert_eq!(state.neutron_population, 1.0);
        assert_eq!(state.precursor_concentrations.len(), 6);
        assert_eq!(state.decay_heat_fractions.len(), 11);
        assert_eq!(s.pack(&state).unwrap(), s.initial_state());
        assert_eq!(
            s.power_fraction(&[1.0]),
            Err(KineticsError::StateLength {
                expected: 18,
                actual: 1
            })
        );
    }

    #[test]
    fn bad_counts_fail_construction() {
        let err = KineticsSolver::new(KineticsConfig {
            n_precursor_groups: -6,
            ..KineticsConfig::default()
        })
        .unwrap_err();
        assert!(err.is_configuration());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn equilibrium_holds_for_every_dataset(
            iso in prop::sample::select(FissionIsotope::ALL.to_vec()),
            spec in prop::sample::select(Spectrum::ALL.to_vec()),
        ) {
            let s = KineticsSolver::new(KineticsConfig {
                isotope: iso,
                spectrum: spec,
                n_precursor_groups: 6,
                n_decay_groups: 0,
                feedback: false,
            }).unwrap();
            let x = s.initial_state();
            let mut dx = vec![0.0; s.dim()];
            s.derivatives(0.0, &x, &mut dx).unwrap();
            let scale = s.precursors().beta() / s.precursors().generation_time();
            prop_assert!(dx[0].abs() <= 1e-12 * scale);
        }
    }
}
