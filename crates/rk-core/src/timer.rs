//! Simulation time grid.

use crate::error::{RkError, RkResult};
use crate::numeric::{ensure_finite, ensure_positive};
use crate::units::{Time, s};

/// Output grid `t0, t0 + dt, …, tf` for a run.
///
/// When `dt` does not divide `tf - t0` exactly, the last interval is shortened
/// so the grid always ends at `tf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    t0: f64,
    tf: f64,
    dt: f64,
    intervals: usize,
}

impl Timer {
    pub fn new(t0: Time, tf: Time, dt: Time) -> RkResult<Self> {
        Self::from_seconds(t0.value, tf.value, dt.value)
    }

    pub fn from_seconds(t0: f64, tf: f64, dt: f64) -> RkResult<Self> {
        let t0 = ensure_finite(t0, "t0")?;
        let tf = ensure_finite(tf, "tf")?;
        let dt = ensure_positive(dt, "dt must be positive")?;
        if t0 < 0.0 {
            return Err(RkError::InvalidArg {
                what: "t0 must be non-negative",
            });
        }
        if tf <= t0 {
            return Err(RkError::InvalidArg {
                what: "tf must be greater than t0",
            });
        }

        // Absorb round-off so 1.0 / 0.1 gives 10 intervals, not 11
        let ratio = (tf - t0) / dt;
        let intervals = ((ratio - 1e-9 * ratio.max(1.0)).ceil() as usize).max(1);

        Ok(Self {
            t0,
            tf,
            dt,
            intervals,
        })
    }

    pub fn t0(&self) -> Time {
        s(self.t0)
    }

    pub fn tf(&self) -> Time {
        s(self.tf)
    }

    pub fn dt(&self) -> Time {
        s(self.dt)
    }

    /// Number of output intervals.
    pub fn intervals(&self) -> usize {
        self.intervals
    }

    /// Number of output points, including `t0` and `tf`.
    pub fn timesteps(&self) -> usize {
        self.intervals + 1
    }

    /// Time (seconds) of output point `idx`; clamps to `tf`.
    pub fn time_at(&self, idx: usize) -> f64 {
        if idx >= self.intervals {
            self.tf
        } else {
            self.t0 + idx as f64 * self.dt
        }
    }

    /// Index of the output point closest to `t` (seconds), clamped to the grid.
    pub fn index_of(&self, t: f64) -> usize {
        if t <= self.t0 {
            return 0;
        }
        let idx = ((t - self.t0) / self.dt).round() as usize;
        idx.min(self.intervals)
    }

    /// All output times in seconds.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=self.intervals).map(|i| self.time_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_includes_endpoints() {
        let timer = Timer::from_seconds(0.0, 1.0, 0.1).unwrap();
        assert_eq!(timer.intervals(), 10);
        assert_eq!(timer.timesteps(), 11);
        let times: Vec<f64> = timer.times().collect();
        assert_eq!(times[0], 0.0);
        assert_eq!(*times.last().unwrap(), 1.0);
    }

    #[test]
    fn short_last_interval() {
        let timer = Timer::from_seconds(0.0, 1.0, 0.3).unwrap();
        assert_eq!(timer.intervals(), 4);
        assert_eq!(timer.time_at(4), 1.0);
        assert!((timer.time_at(3) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn index_lookup() {
        let timer = Timer::from_seconds(1.0, 2.0, 0.25).unwrap();
        assert_eq!(timer.index_of(0.0), 0);
        assert_eq!(timer.index_of(1.5), 2);
        assert_eq!(timer.index_of(10.0), 4);
    }

    #[test]
    fn rejects_bad_grids() {
        assert!(Timer::from_seconds(0.0, 1.0, 0.0).is_err());
        assert!(Timer::from_seconds(0.0, 0.0, 0.1).is_err());
        assert!(Timer::from_seconds(-1.0, 1.0, 0.1).is_err());
        assert!(Timer::from_seconds(0.0, f64::NAN, 0.1).is_err());
    }
}
