//! Simulation runner and result recording.

use std::str::FromStr;

use rk_core::Timer;

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince, ForwardEuler, Integrator, RK4, StepStats};
use crate::model::TransientModel;
use crate::reactor::ReactorModel;
use crate::trace::ReactorTrace;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Adaptive Dormand–Prince 5(4) (default).
    #[default]
    DormandPrince,
    /// 4th-order Runge-Kutta, one step per output interval.
    RK4,
    /// Forward Euler, one step per output interval.
    ForwardEuler,
}

impl IntegratorType {
    pub const OPTIONS: &'static str = "dopri5, rk4, euler";

    pub fn as_str(self) -> &'static str {
        match self {
            IntegratorType::DormandPrince => "dopri5",
            IntegratorType::RK4 => "rk4",
            IntegratorType::ForwardEuler => "euler",
        }
    }
}

impl FromStr for IntegratorType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dopri5" | "dormand-prince" | "dormand_prince" => Ok(IntegratorType::DormandPrince),
            "rk4" => Ok(IntegratorType::RK4),
            "euler" | "forward-euler" | "forward_euler" => Ok(IntegratorType::ForwardEuler),
            _ => Err(SimError::InvalidArg {
                what: "unknown integrator (options: dopri5, rk4, euler)",
            }),
        }
    }
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Output grid
    pub timer: Timer,
    /// Integrator type (default: adaptive Dormand–Prince)
    pub integrator: IntegratorType,
    /// Attempted internal steps allowed per output interval
    pub nsteps: usize,
    /// Relative tolerance of the adaptive integrator
    pub rtol: f64,
    /// Absolute tolerance of the adaptive integrator
    pub atol: f64,
    /// Record every N-th output point (the final point is always kept)
    pub record_every: usize,
}

impl SimOptions {
    pub const DEFAULT_NSTEPS: usize = 500;
    pub const DEFAULT_RTOL: f64 = 1e-6;
    pub const DEFAULT_ATOL: f64 = 1e-9;

    pub fn new(timer: Timer) -> Self {
        Self {
            timer,
            integrator: IntegratorType::default(),
            nsteps: Self::DEFAULT_NSTEPS,
            rtol: Self::DEFAULT_RTOL,
            atol: Self::DEFAULT_ATOL,
            record_every: 1,
        }
    }

    pub fn with_integrator(mut self, integrator: IntegratorType) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_nsteps(mut self, nsteps: usize) -> Self {
        self.nsteps = nsteps;
        self
    }

    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }
}

/// Progress snapshot passed to the callback after every output interval.
#[derive(Clone, Debug, Default)]
pub struct SimProgress {
    pub t: f64,
    pub tf: f64,
    pub fraction_complete: f64,
    pub interval: usize,
    pub steps: StepStats,
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<Vec<f64>>,
    /// Internal steps over the whole run
    pub stats: StepStats,
}

enum Stepper {
    DormandPrince(DormandPrince),
    RK4(RK4),
    ForwardEuler(ForwardEuler),
}

impl Stepper {
    fn new(opts: &SimOptions) -> SimResult<Self> {
        Ok(match opts.integrator {
            IntegratorType::DormandPrince => {
                Stepper::DormandPrince(DormandPrince::new(opts.rtol, opts.atol, opts.nsteps)?)
            }
            IntegratorType::RK4 => Stepper::RK4(RK4),
            IntegratorType::ForwardEuler => Stepper::ForwardEuler(ForwardEuler),
        })
    }

    fn advance<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &mut [f64],
        dt: f64,
    ) -> SimResult<StepStats> {
        match self {
            Stepper::DormandPrince(i) => i.advance(model, t, x, dt),
            Stepper::RK4(i) => i.advance(model, t, x, dt),
            Stepper::ForwardEuler(i) => i.advance(model, t, x, dt),
        }
    }
}

/// Integrate `model` over `opts.timer`, recording the state on the grid.
pub fn run_sim<M: TransientModel + ?Sized>(model: &M, opts: &SimOptions) -> SimResult<SimRecord> {
    run_sim_with_progress(model, opts, |_| {})
}

/// Same as [`run_sim`], calling `progress` after every output interval.
pub fn run_sim_with_progress<M, F>(
    model: &M,
    opts: &SimOptions,
    mut progress: F,
) -> SimResult<SimRecord>
where
    M: TransientModel + ?Sized,
    F: FnMut(&SimProgress),
{
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }

    let timer = &opts.timer;
    let mut stepper = Stepper::new(opts)?;

    let mut x = model.initial_state();
    if x.len() != model.dim() {
        return Err(SimError::InvalidArg {
            what: "initial state length does not match the model dimension",
        });
    }

    let t0 = timer.time_at(0);
    let tf = timer.tf().value;
    let intervals = timer.intervals();

    tracing::info!(
        t0,
        tf,
        dt = timer.dt().value,
        intervals,
        dim = x.len(),
        integrator = opts.integrator.as_str(),
        "transient started"
    );

    let mut t_record = vec![t0];
    let mut x_record = vec![x.clone()];
    let mut stats = StepStats::default();

    for idx in 0..intervals {
        let t = timer.time_at(idx);
        let t_next = timer.time_at(idx + 1);

        let step = stepper.advance(model, t, &mut x, t_next - t)?;
        stats.absorb(step);

        if x.iter().any(|v| !v.is_finite()) {
            return Err(SimError::NonFinite { t: t_next });
        }

        tracing::trace!(
            t = t_next,
            accepted = step.accepted,
            rejected = step.rejected,
            "interval done"
        );

        let done = idx + 1;
        if done % opts.record_every == 0 || done == intervals {
            t_record.push(t_next);
            x_record.push(x.clone());
        }

        progress(&SimProgress {
            t: t_next,
            tf,
            fraction_complete: done as f64 / intervals as f64,
            interval: done,
            steps: stats,
        });
    }

    tracing::info!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        recorded = t_record.len(),
        "transient finished"
    );

    Ok(SimRecord {
        t: t_record,
        x: x_record,
        stats,
    })
}

/// Run a reactor model and reduce the record to a `ReactorTrace`.
pub fn run_reactor(model: &ReactorModel, opts: &SimOptions) -> SimResult<ReactorTrace> {
    let record = run_sim(model, opts)?;
    ReactorTrace::from_record(model, &record)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp;

    impl TransientModel for Ramp {
        fn dim(&self) -> usize {
            1
        }

        fn initial_state(&self) -> Vec<f64> {
            vec![0.0]
        }

        fn rhs(&self, _t: f64, _x: &[f64], dxdt: &mut [f64]) -> SimResult<()> {
            dxdt[0] = 2.0;
            Ok(())
        }
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::new(Timer::from_seconds(0.0, 1.0, 0.1).unwrap());
        assert_eq!(opts.nsteps, 500);
        assert_eq!(opts.integrator, IntegratorType::DormandPrince);
        assert_eq!(opts.record_every, 1);
    }

    #[test]
    fn integrator_names_round_trip() {
        for ty in [
            IntegratorType::DormandPrince,
            IntegratorType::RK4,
            IntegratorType::ForwardEuler,
        ] {
            assert_eq!(ty.as_str().parse::<IntegratorType>(), Ok(ty));
        }
        assert!("bdf".parse::<IntegratorType>().is_err());
    }

    #[test]
    fn records_every_grid_point() {
        let opts = SimOptions::new(Timer::from_seconds(0.0, 1.0, 0.25).unwrap());
        let rec = run_sim(&Ramp, &opts).unwrap();
        assert_eq!(rec.t, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!((rec.x[4][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn decimation_keeps_final_point() {
        let mut opts = SimOptions::new(Timer::from_seconds(0.0, 1.0, 0.1).unwrap())
            .with_integrator(IntegratorType::ForwardEuler);
        opts.record_every = 4;
        let rec = run_sim(&Ramp, &opts).unwrap();
        assert_eq!(rec.t.len(), 4); // 0, 0.4, 0.8, 1.0
        assert_eq!(*rec.t.last().unwrap(), 1.0);
        assert_eq!(rec.stats.accepted, 10);
    }

    #[test]
    fn progress_reaches_completion() {
        let opts = SimOptions::new(Timer::from_seconds(0.0, 1.0, 0.5).unwrap())
            .with_integrator(IntegratorType::RK4);
        let mut seen = Vec::new();
        run_sim_with_progress(&Ramp, &opts, |p| seen.push(p.fraction_complete)).unwrap();
        assert_eq!(seen, vec![0.5, 1.0]);
    }

    #[test]
    fn zero_decimation_is_invalid() {
        let mut opts = SimOptions::new(Timer::from_seconds(0.0, 1.0, 0.5).unwrap());
        opts.record_every = 0;
        assert!(run_sim(&Ramp, &opts).is_err());
    }
}
