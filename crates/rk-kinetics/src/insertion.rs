//! External reactivity insertions.

use crate::error::{KineticsError, KineticsResult};

/// External reactivity as a pure function of elapsed time [s] → Δk/k.
///
/// Any `Fn(f64) -> f64 + Send + Sync` closure is an insertion, so scripted
/// transients can be plugged in without a new type.
pub trait ReactivityInsertion: Send + Sync {
    fn reactivity(&self, t: f64) -> f64;
}

impl<F> ReactivityInsertion for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn reactivity(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Built-in insertion shapes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReactivitySchedule {
    /// No external reactivity.
    #[default]
    None,
    /// `rho` from `time` onward.
    Step { time: f64, rho: f64 },
    /// Linear rise from 0 at `start` to `rho` at `end`, held afterwards.
    Ramp { start: f64, end: f64, rho: f64 },
    /// `rho` on `[start, start + duration)`, zero otherwise.
    Impulse { start: f64, duration: f64, rho: f64 },
}

impl ReactivitySchedule {
    pub fn step(time: f64, rho: f64) -> KineticsResult<Self> {
        finite(time, "step time must be finite")?;
        finite(rho, "step reactivity must be finite")?;
        Ok(Self::Step { time, rho })
    }

    pub fn ramp(start: f64, end: f64, rho: f64) -> KineticsResult<Self> {
        finite(start, "ramp start must be finite")?;
        finite(end, "ramp end must be finite")?;
        finite(rho, "ramp reactivity must be finite")?;
        if end <= start {
            return Err(KineticsError::InvalidSchedule {
                what: "ramp end must be after its start",
            });
        }
        Ok(Self::Ramp { start, end, rho })
    }

    pub fn impulse(start: f64, duration: f64, rho: f64) -> KineticsResult<Self> {
        finite(start, "impulse start must be finite")?;
        finite(rho, "impulse reactivity must be finite")?;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(KineticsError::InvalidSchedule {
                what: "impulse duration must be positive",
            });
        }
        Ok(Self::Impulse {
            start,
            duration,
            rho,
        })
    }

    /// Short name used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ReactivitySchedule::None => "none",
            ReactivitySchedule::Step { .. } => "step",
            ReactivitySchedule::Ramp { .. } => "ramp",
            ReactivitySchedule::Impulse { .. } => "impulse",
        }
    }
}

fn finite(v: f64, what: &'static str) -> KineticsResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(KineticsError::InvalidSchedule { what })
    }
}

impl ReactivityInsertion for ReactivitySchedule {
    fn reactivity(&self, t: f64) -> f64 {
        match *self {
            ReactivitySchedule::None => 0.0,
            ReactivitySchedule::Step { time, rho } => {
                if t >= time {
                    rho
                } else {
                    0.0
                }
            }
            ReactivitySchedule::Ramp { start, end, rho } => {
                if t <= start {
                    0.0
                } else if t >= end {
                    rho
                } else {
                    rho * (t - start) / (end - start)
                }
            }
            ReactivitySchedule::Impulse {
                start,
                duration,
                rho,
            } => {
                if t >= start && t < start + duration {
                    rho
                } else {
                    0.0
                }
            }
        }
    }
}
