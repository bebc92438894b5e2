//! Time integrators.
//!
//! Every integrator advances the state in place over one output interval.
//! The fixed-step schemes take that interval as a single step; the adaptive
//! Dormand–Prince scheme subdivides it under an error-control loop.

use rk_core::error_norm;

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Step counts for one `advance` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub accepted: usize,
    pub rejected: usize,
}

impl StepStats {
    pub fn attempted(&self) -> usize {
        self.accepted + self.rejected
    }

    pub fn absorb(&mut self, other: StepStats) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
    }
}

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `x` from `t` to `t + dt` in place.
    fn advance<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &mut [f64],
        dt: f64,
    ) -> SimResult<StepStats>;
}

/// `out = x + Σ aⱼ·kⱼ`.
fn combine(out: &mut [f64], x: &[f64], terms: &[(f64, &[f64])]) {
    out.copy_from_slice(x);
    for (a, k) in terms {
        if *a == 0.0 {
            continue;
        }
        for (o, ki) in out.iter_mut().zip(k.iter()) {
            *o += a * ki;
        }
    }
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn advance<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &mut [f64],
        dt: f64,
    ) -> SimResult<StepStats> {
        let n = x.len();
        let mut k1 = vec![0.0; n];
        let mut k2 = vec![0.0; n];
        let mut k3 = vec![0.0; n];
        let mut k4 = vec![0.0; n];
        let mut tmp = vec![0.0; n];

        model.rhs(t, x, &mut k1)?;

        combine(&mut tmp, x, &[(0.5 * dt, &k1[..])]);
        model.rhs(t + 0.5 * dt, &tmp, &mut k2)?;

        combine(&mut tmp, x, &[(0.5 * dt, &k2[..])]);
        model.rhs(t + 0.5 * dt, &tmp, &mut k3)?;

        combine(&mut tmp, x, &[(dt, &k3[..])]);
        model.rhs(t + dt, &tmp, &mut k4)?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        for i in 0..n {
            x[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }

        Ok(StepStats {
            accepted: 1,
            rejected: 0,
        })
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn advance<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &mut [f64],
        dt: f64,
    ) -> SimResult<StepStats> {
        let mut xdot = vec![0.0; x.len()];
        model.rhs(t, x, &mut xdot)?;
        for (xi, di) in x.iter_mut().zip(&xdot) {
            *xi += dt * di;
        }
        Ok(StepStats {
            accepted: 1,
            rejected: 0,
        })
    }
}

// Dormand–Prince 5(4) tableau.
const C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const A: [[f64; 6]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

/// 5th-order minus embedded 4th-order weights.
const E: [f64; 7] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Adaptive embedded Runge–Kutta 5(4) with error control.
///
/// A step is accepted when the RMS of `err_i / (atol + rtol·max(|x_i|, |x̃_i|))`
/// is at most one. At most `nsteps` steps (accepted or rejected) may be
/// attempted per `advance` call. The last accepted step size carries over to
/// the next interval.
#[derive(Clone, Debug)]
pub struct DormandPrince {
    rtol: f64,
    atol: f64,
    nsteps: usize,
    h: Option<f64>,
}

impl DormandPrince {
    pub fn new(rtol: f64, atol: f64, nsteps: usize) -> SimResult<Self> {
        if !(rtol.is_finite() && rtol > 0.0) {
            return Err(SimError::InvalidArg {
                what: "rtol must be positive",
            });
        }
        if !(atol.is_finite() && atol > 0.0) {
            return Err(SimError::InvalidArg {
                what: "atol must be positive",
            });
        }
        if nsteps == 0 {
            return Err(SimError::InvalidArg {
                what: "nsteps must be positive",
            });
        }
        Ok(Self {
            rtol,
            atol,
            nsteps,
            h: None,
        })
    }

    /// Step size proposed for the next interval, once one has been taken.
    pub fn step_size(&self) -> Option<f64> {
        self.h
    }

    fn rms_scaled(&self, v: &[f64], x: &[f64]) -> f64 {
        error_norm(v, x, x, self.rtol, self.atol)
    }

    /// Starting step from the local derivative scale.
    fn initial_step<M: TransientModel + ?Sized>(
        &self,
        model: &M,
        t: f64,
        x: &[f64],
        f0: &[f64],
        dt: f64,
    ) -> SimResult<f64> {
        let d0 = self.rms_scaled(x, x);
        let d1 = self.rms_scaled(f0, x);
        let h0: f64 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(dt);

        let mut x1 = vec![0.0; x.len()];
        combine(&mut x1, x, &[(h0, f0)]);
        let mut f1 = vec![0.0; x.len()];
        model.rhs(t + h0, &x1, &mut f1)?;
        let diff: Vec<f64> = f1.iter().zip(f0).map(|(a, b)| a - b).collect();
        let d2 = self.rms_scaled(&diff, x) / h0;

        let scale = d1.max(d2);
        let h1 = if scale <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / scale).powf(0.2)
        };
        Ok((100.0 * h0).min(h1).min(dt))
    }
}

impl Integrator for DormandPrince {
    fn advance<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &mut [f64],
        dt: f64,
    ) -> SimResult<StepStats> {
        let n = x.len();
        let t_end = t + dt;
        let mut t = t;
        let mut stats = StepStats::default();

        let mut k: [Vec<f64>; 7] = std::array::from_fn(|_| vec![0.0; n]);
        let mut stage = vec![0.0; n];
        let mut err = vec![0.0; n];
        let mut x_new = vec![0.0; n];

        model.rhs(t, x, &mut k[0])?;
        let mut h = match self.h {
            Some(h) => h,
            None => self.initial_step(model, t, x, &k[0], dt)?,
        };

        while t_end - t > 1e-12 * dt {
            if stats.attempted() >= self.nsteps {
                tracing::warn!(t, t_end, h, nsteps = self.nsteps, "step ceiling reached");
                return Err(SimError::ConvergenceFailed {
                    t,
                    nsteps: self.nsteps,
                });
            }

            let remaining = t_end - t;
            let last = h >= remaining;
            let h_try = if last { remaining } else { h };
            if h_try <= 16.0 * f64::EPSILON * t.abs().max(1.0) {
                return Err(SimError::StepUnderflow { t, h: h_try });
            }

            for s in 1..7 {
                stage.copy_from_slice(x);
                for (j, a) in A[s].iter().enumerate().take(s) {
                    if *a == 0.0 {
                        continue;
                    }
                    for (si, kj) in stage.iter_mut().zip(&k[j]) {
                        *si += h_try * a * kj;
                    }
                }
                model.rhs(t + C[s] * h_try, &stage, &mut k[s])?;
                if s == 6 {
                    x_new.copy_from_slice(&stage);
                }
            }

            for (i, e) in err.iter_mut().enumerate() {
                *e = h_try * E.iter().zip(&k).map(|(ej, kj)| ej * kj[i]).sum::<f64>();
            }
            let norm = error_norm(&err, x, &x_new, self.rtol, self.atol);

            if norm.is_finite() && norm <= 1.0 {
                stats.accepted += 1;
                t = if last { t_end } else { t + h_try };
                x.copy_from_slice(&x_new);
                // First-same-as-last: f(t + h, x_new) is the next k1
                k.swap(0, 6);

                let factor = if norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                h = if last {
                    h.max(h_try * factor)
                } else {
                    h_try * factor
                };
            } else {
                stats.rejected += 1;
                let factor = if norm.is_finite() {
                    (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, 1.0)
                } else {
                    MIN_FACTOR
                };
                h = h_try * factor;
                tracing::trace!(t, h_try, norm, "step rejected");
            }
        }

        self.h = Some(h);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = λx
    struct Decay {
        lambda: f64,
    }

    impl TransientModel for Decay {
        fn dim(&self) -> usize {
            1
        }

        fn initial_state(&self) -> Vec<f64> {
            vec![1.0]
        }

        fn rhs(&self, _t: f64, x: &[f64], dxdt: &mut [f64]) -> SimResult<()> {
            dxdt[0] = self.lambda * x[0];
            Ok(())
        }
    }

    /// dx/dt = cos(t)
    struct Forced;

    impl TransientModel for Forced {
        fn dim(&self) -> usize {
            1
        }

        fn initial_state(&self) -> Vec<f64> {
            vec![0.0]
        }

        fn rhs(&self, t: f64, _x: &[f64], dxdt: &mut [f64]) -> SimResult<()> {
            dxdt[0] = t.cos();
            Ok(())
        }
    }

    #[test]
    fn euler_single_step() {
        let model = Decay { lambda: -1.0 };
        let mut x = model.initial_state();
        ForwardEuler.advance(&model, 0.0, &mut x, 0.1).unwrap();
        assert!((x[0] - 0.9).abs() < 1e-15);
    }

    #[test]
    fn rk4_matches_exponential() {
        let model = Decay { lambda: -1.0 };
        let mut x = model.initial_state();
        let mut t = 0.0;
        for _ in 0..100 {
            RK4.advance(&model, t, &mut x, 0.01).unwrap();
            t += 0.01;
        }
        assert!((x[0] - (-1.0_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn dopri_meets_tolerance() {
        let model = Decay { lambda: -2.0 };
        let mut dp = DormandPrince::new(1e-8, 1e-10, 500).unwrap();
        let mut x = model.initial_state();
        let mut total = StepStats::default();
        for i in 0..10 {
            total.absorb(dp.advance(&model, i as f64 * 0.1, &mut x, 0.1).unwrap());
        }
        assert!((x[0] - (-2.0_f64).exp()).abs() < 1e-7);
        assert!(total.accepted >= 10);
        assert!(dp.step_size().is_some());
    }

    #[test]
    fn dopri_tracks_time_dependent_forcing() {
        let mut dp = DormandPrince::new(1e-9, 1e-12, 500).unwrap();
        let mut x = Forced.initial_state();
        dp.advance(&Forced, 0.0, &mut x, 3.0).unwrap();
        assert!((x[0] - 3.0_f64.sin()).abs() < 1e-7);
    }

    #[test]
    fn dopri_ceiling_is_per_interval() {
        let model = Decay { lambda: -5000.0 };
        let mut dp = DormandPrince::new(1e-6, 1e-9, 3).unwrap();
        let mut x = model.initial_state();
        let err = dp.advance(&model, 0.0, &mut x, 1.0).unwrap_err();
        assert!(matches!(err, SimError::ConvergenceFailed { nsteps: 3, .. }));
    }

    #[test]
    fn invalid_settings() {
        assert!(DormandPrince::new(0.0, 1e-9, 10).is_err());
        assert!(DormandPrince::new(1e-6, -1.0, 10).is_err());
        assert!(DormandPrince::new(1e-6, 1e-9, 0).is_err());
    }
}
