//! Thermal conductivity models.

use std::fmt;
use std::str::FromStr;

use rk_core::units::constants::T_REF_K;
use rk_core::units::{Conductivity, Temperature, w_per_m_k};
use rk_core::{Dimension, UnitValue};

use crate::error::{MaterialError, MaterialResult};

/// Implemented functional forms for k(T).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConductivityKind {
    Constant,
    Linear,
}

impl ConductivityKind {
    pub const OPTIONS: &'static str = "constant, linear";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for ConductivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConductivityKind {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::Constant),
            "linear" => Ok(Self::Linear),
            _ => Err(MaterialError::UnknownModel {
                kind: s.to_string(),
                options: Self::OPTIONS,
            }),
        }
    }
}

/// Thermal conductivity k(T).
///
/// `Linear` evaluates `a + b·(T − 273.15 K)`, so `a` is the conductivity at
/// 0 °C and `b` is the slope in W/(m·K²). Evaluation is pure and the model is
/// freely shareable across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConductivityModel {
    Constant { k: Conductivity },
    Linear { a: Conductivity, b: UnitValue },
}

impl Default for ConductivityModel {
    /// Temperature-independent 1 W/(m·K).
    fn default() -> Self {
        Self::Constant { k: w_per_m_k(1.0) }
    }
}

impl ConductivityModel {
    pub fn constant(k: Conductivity) -> Self {
        Self::Constant { k }
    }

    /// Linear model; `b` must be a conductivity per kelvin.
    pub fn linear(a: Conductivity, b: UnitValue) -> MaterialResult<Self> {
        let b = b.expect_dimension(Dimension::CONDUCTIVITY_SLOPE)?;
        Ok(Self::Linear { a, b })
    }

    /// Build from a kind name and untyped coefficients.
    ///
    /// Both coefficients are dimension-checked regardless of kind. The
    /// `constant` kind ignores them and yields the 1 W/(m·K) baseline; use
    /// [`ConductivityModel::constant`] for any other fixed value.
    pub fn from_kind(kind: &str, a: UnitValue, b: UnitValue) -> MaterialResult<Self> {
        let kind: ConductivityKind = kind.parse()?;
        let a: Conductivity = a.to_quantity()?;
        let b = b.expect_dimension(Dimension::CONDUCTIVITY_SLOPE)?;
        Ok(match kind {
            ConductivityKind::Constant => Self::default(),
            ConductivityKind::Linear => Self::Linear { a, b },
        })
    }

    pub fn kind(&self) -> ConductivityKind {
        match self {
            Self::Constant { .. } => ConductivityKind::Constant,
            Self::Linear { .. } => ConductivityKind::Linear,
        }
    }

    /// Conductivity at temperature `t`.
    pub fn evaluate(&self, t: Temperature) -> Conductivity {
        match *self {
            Self::Constant { k } => k,
            Self::Linear { a, b } => w_per_m_k(a.value + b.value() * (t.value - T_REF_K)),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rk_core::units::k;

    proptest! {
        #[test]
        fn evaluation_is_deterministic(a in 0.1_f64..100.0, b in -0.05_f64..0.05, t in 250.0_f64..2000.0) {
            let model = ConductivityModel::linear(
                w_per_m_k(a),
                UnitValue::new(b, Dimension::CONDUCTIVITY_SLOPE),
            ).unwrap();
            prop_assert_eq!(model.evaluate(k(t)), model.evaluate(k(t)));
            prop_assert_eq!(model.evaluate(k(T_REF_K)).value, a);
        }
    }
}
