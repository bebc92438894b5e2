//! Runtime dimension-checked quantities.
//!
//! Physics code works in `uom` types, which check dimensions at compile time.
//! Values that arrive from configuration (model files, kind-dispatched
//! coefficients) carry their dimension at runtime instead: a [`UnitValue`] is a
//! canonical SI magnitude tagged with a [`Dimension`] exponent vector.
//!
//! - Addition, subtraction and comparison require equal dimensions and fail
//!   with [`DimensionError`] otherwise.
//! - Multiplication and division combine exponents. The operators saturate
//!   an exponent at the `i8` bounds; `checked_mul`, `checked_div` and
//!   `checked_powi` return `None` instead.
//! - Conversion into a `uom` quantity is explicit ([`UnitValue::to_quantity`])
//!   and checks the dimension.
//!
//! Text such as `"0.5 m^2"`, `"W/(m*K)"`, `"1.2 MW"` or `"25 C"` is parsed by
//! [`UnitValue::parse`].

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, Mul, Neg};

use thiserror::Error;

use crate::units;

/// Exponents over the base dimensions used by thermal-hydraulics:
/// length, mass, time, temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub temperature: i8,
}

impl Dimension {
    pub const fn new(length: i8, mass: i8, time: i8, temperature: i8) -> Self {
        Self {
            length,
            mass,
            time,
            temperature,
        }
    }

    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(1, 0, 0, 0);
    pub const AREA: Self = Self::new(2, 0, 0, 0);
    pub const VOLUME: Self = Self::new(3, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 1, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0);
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 1);
    pub const MASS_RATE: Self = Self::new(0, 1, -1, 0);
    pub const ENERGY: Self = Self::new(2, 1, -2, 0);
    pub const POWER: Self = Self::new(2, 1, -3, 0);
    pub const FORCE: Self = Self::new(1, 1, -2, 0);
    pub const PRESSURE: Self = Self::new(-1, 1, -2, 0);
    pub const DENSITY: Self = Self::new(-3, 1, 0, 0);
    pub const SPECIFIC_HEAT: Self = Self::new(2, 0, -2, -1);
    pub const HEAT_CAPACITY: Self = Self::new(2, 1, -2, -1);
    /// W/(m·K)
    pub const CONDUCTIVITY: Self = Self::new(1, 1, -3, -1);
    /// W/(m·K²), slope of a linear conductivity fit.
    pub const CONDUCTIVITY_SLOPE: Self = Self::new(1, 1, -3, -2);
    /// W/(m²·K)
    pub const FILM_COEFFICIENT: Self = Self::new(0, 1, -3, -1);
    pub const TEMPERATURE_COEFFICIENT: Self = Self::new(0, 0, 0, -1);

    pub fn is_dimensionless(self) -> bool {
        self == Self::DIMENSIONLESS
    }

    /// Exponents of `self * other^sign`, or `None` if any leaves `i8`.
    pub fn checked_combine(self, other: Self, sign: i8) -> Option<Self> {
        let term = |a: i8, b: i8| b.checked_mul(sign).and_then(|b| a.checked_add(b));
        Some(Self {
            length: term(self.length, other.length)?,
            mass: term(self.mass, other.mass)?,
            time: term(self.time, other.time)?,
            temperature: term(self.temperature, other.temperature)?,
        })
    }

    /// Exponents of `self^n`, or `None` if any leaves `i8`.
    pub fn checked_scaled(self, n: i8) -> Option<Self> {
        Some(Self {
            length: self.length.checked_mul(n)?,
            mass: self.mass.checked_mul(n)?,
            time: self.time.checked_mul(n)?,
            temperature: self.temperature.checked_mul(n)?,
        })
    }

    fn saturating_combine(self, other: Self, sign: i8) -> Self {
        let term = |a: i8, b: i8| a.saturating_add(b.saturating_mul(sign));
        Self {
            length: term(self.length, other.length),
            mass: term(self.mass, other.mass),
            time: term(self.time, other.time),
            temperature: term(self.temperature, other.temperature),
        }
    }

    fn saturating_scaled(self, n: i8) -> Self {
        Self {
            length: self.length.saturating_mul(n),
            mass: self.mass.saturating_mul(n),
            time: self.time.saturating_mul(n),
            temperature: self.temperature.saturating_mul(n),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let mut first = true;
        for (sym, exp) in [
            ("m", self.length),
            ("kg", self.mass),
            ("s", self.time),
            ("K", self.temperature),
        ] {
            if exp == 0 {
                continue;
            }
            if !first {
                write!(f, "·")?;
            }
            first = false;
            if exp == 1 {
                write!(f, "{sym}")?;
            } else {
                write!(f, "{sym}^{exp}")?;
            }
        }
        Ok(())
    }
}

/// Two quantities of incompatible dimension were combined.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Dimension mismatch in {op}: {left} vs {right}")]
pub struct DimensionError {
    pub op: &'static str,
    pub left: Dimension,
    pub right: Dimension,
}

/// Failure to read a quantity from text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitParseError {
    #[error("Empty quantity")]
    Empty,

    #[error("Could not parse number from '{0}'")]
    BadNumber(String),

    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Bad exponent in unit '{0}'")]
    BadExponent(String),

    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// A magnitude in canonical SI units tagged with its dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitValue {
    value: f64,
    dim: Dimension,
}

impl UnitValue {
    pub const fn new(value: f64, dim: Dimension) -> Self {
        Self { value, dim }
    }

    pub const fn dimensionless(value: f64) -> Self {
        Self::new(value, Dimension::DIMENSIONLESS)
    }

    /// SI magnitude.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// Fail unless `self` has dimension `expected`.
    pub fn expect_dimension(self, expected: Dimension) -> Result<Self, DimensionError> {
        if self.dim == expected {
            Ok(self)
        } else {
            Err(DimensionError {
                op: "conversion",
                left: self.dim,
                right: expected,
            })
        }
    }

    /// SI magnitude, provided the dimension is `expected`.
    pub fn value_in(self, expected: Dimension) -> Result<f64, DimensionError> {
        self.expect_dimension(expected).map(|v| v.value)
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, DimensionError> {
        self.same_dim(rhs, "addition")?;
        Ok(Self::new(self.value + rhs.value, self.dim))
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, DimensionError> {
        self.same_dim(rhs, "subtraction")?;
        Ok(Self::new(self.value - rhs.value, self.dim))
    }

    pub fn checked_cmp(self, rhs: Self) -> Result<Option<Ordering>, DimensionError> {
        self.same_dim(rhs, "comparison")?;
        Ok(self.value.partial_cmp(&rhs.value))
    }

    /// Exponents saturate at the `i8` bounds; see [`UnitValue::checked_powi`].
    pub fn powi(self, n: i8) -> Self {
        Self::new(self.value.powi(i32::from(n)), self.dim.saturating_scaled(n))
    }

    pub fn checked_powi(self, n: i8) -> Option<Self> {
        let dim = self.dim.checked_scaled(n)?;
        Some(Self::new(self.value.powi(i32::from(n)), dim))
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        let dim = self.dim.checked_combine(rhs.dim, 1)?;
        Some(Self::new(self.value * rhs.value, dim))
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        let dim = self.dim.checked_combine(rhs.dim, -1)?;
        Some(Self::new(self.value / rhs.value, dim))
    }

    /// Convert into a typed `uom` quantity, checking the dimension.
    pub fn to_quantity<Q: FromUnitValue>(self) -> Result<Q, DimensionError> {
        self.value_in(Q::DIMENSION).map(Q::from_si)
    }

    fn same_dim(self, rhs: Self, op: &'static str) -> Result<(), DimensionError> {
        if self.dim == rhs.dim {
            Ok(())
        } else {
            Err(DimensionError {
                op,
                left: self.dim,
                right: rhs.dim,
            })
        }
    }

    /// Parse `"<number> [unit]"` into SI.
    ///
    /// A bare number is dimensionless. Units combine with `*`, `·`, spaces
    /// and `/`, may carry `^n` exponents and may be grouped with parentheses.
    /// Offset temperature scales (`C`, `degC`, `°C`, `F`, `degF`, `°F`) are
    /// accepted only as the whole unit.
    pub fn parse(text: &str) -> Result<Self, UnitParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(UnitParseError::Empty);
        }

        let split = number_prefix_len(trimmed);
        let number: f64 = trimmed[..split]
            .parse()
            .map_err(|_| UnitParseError::BadNumber(trimmed.to_string()))?;
        let unit = trimmed[split..].trim();

        match unit {
            "" => Ok(Self::dimensionless(number)),
            "C" | "degC" | "°C" => Ok(Self::new(number + 273.15, Dimension::TEMPERATURE)),
            "F" | "degF" | "°F" => Ok(Self::new(
                (number + 459.67) * 5.0 / 9.0,
                Dimension::TEMPERATURE,
            )),
            _ => {
                let (scale, dim) = parse_unit_expr(unit)?;
                Ok(Self::new(number * scale, dim))
            }
        }
    }

    /// Parse and require a dimension.
    pub fn parse_as(text: &str, expected: Dimension) -> Result<Self, UnitParseError> {
        Ok(Self::parse(text)?.expect_dimension(expected)?)
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dim.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.dim)
        }
    }
}

impl Mul for UnitValue {
    type Output = UnitValue;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(
            self.value * rhs.value,
            self.dim.saturating_combine(rhs.dim, 1),
        )
    }
}

impl Div for UnitValue {
    type Output = UnitValue;

    fn div(self, rhs: Self) -> Self::Output {
        Self::new(
            self.value / rhs.value,
            self.dim.saturating_combine(rhs.dim, -1),
        )
    }
}

impl Mul<f64> for UnitValue {
    type Output = UnitValue;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.value * rhs, self.dim)
    }
}

impl Neg for UnitValue {
    type Output = UnitValue;

    fn neg(self) -> Self::Output {
        Self::new(-self.value, self.dim)
    }
}

/// Typed quantities that a [`UnitValue`] can be converted into (and from).
pub trait FromUnitValue: Sized {
    const DIMENSION: Dimension;

    fn from_si(value: f64) -> Self;
}

macro_rules! unit_value_bridge {
    ($($ty:ty => $dim:expr, $ctor:path;)*) => {
        $(
            impl FromUnitValue for $ty {
                const DIMENSION: Dimension = $dim;

                fn from_si(value: f64) -> Self {
                    $ctor(value)
                }
            }

            impl From<$ty> for UnitValue {
                fn from(q: $ty) -> Self {
                    UnitValue::new(q.value, $dim)
                }
            }
        )*
    };
}

unit_value_bridge! {
    units::Length => Dimension::LENGTH, units::m;
    units::Area => Dimension::AREA, units::m2;
    units::Volume => Dimension::VOLUME, units::m3;
    units::Time => Dimension::TIME, units::s;
    units::Temperature => Dimension::TEMPERATURE, units::k;
    units::Power => Dimension::POWER, units::w;
    units::MassRate => Dimension::MASS_RATE, units::kgps;
    units::Density => Dimension::DENSITY, units::kg_per_m3;
    units::SpecHeat => Dimension::SPECIFIC_HEAT, units::j_per_kg_k;
    units::Conductivity => Dimension::CONDUCTIVITY, units::w_per_m_k;
    units::FilmCoefficient => Dimension::FILM_COEFFICIENT, units::w_per_m2_k;
    units::TempCoefficient => Dimension::TEMPERATURE_COEFFICIENT, units::per_k;
    units::Ratio => Dimension::DIMENSIONLESS, units::unitless;
}

/// Length of the leading numeric literal (sign, digits, point, exponent).
fn number_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    while i < b.len() && (b[i].is_ascii_digit() || b[i] == b'.') {
        i += 1;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut j = i + 1;
        if j < b.len() && (b[j] == b'+' || b[j] == b'-') {
            j += 1;
        }
        if j < b.len() && b[j].is_ascii_digit() {
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

fn parse_unit_expr(expr: &str) -> Result<(f64, Dimension), UnitParseError> {
    let terms = split_top_level(expr, |c| c == '/');
    let mut scale = 1.0;
    let mut dim = Dimension::DIMENSIONLESS;
    for (i, term) in terms.iter().enumerate() {
        let (s, d) = parse_product(term.trim())?;
        let sign = if i == 0 {
            scale *= s;
            1
        } else {
            scale /= s;
            -1
        };
        dim = dim
            .checked_combine(d, sign)
            .ok_or_else(|| UnitParseError::BadExponent(expr.to_string()))?;
    }
    Ok((scale, dim))
}

fn parse_product(term: &str) -> Result<(f64, Dimension), UnitParseError> {
    if term.is_empty() {
        return Err(UnitParseError::UnknownUnit(term.to_string()));
    }
    let mut scale = 1.0;
    let mut dim = Dimension::DIMENSIONLESS;
    for factor in split_top_level(term, |c| c == '*' || c == '·' || c.is_whitespace()) {
        let factor = factor.trim();
        if factor.is_empty() {
            continue;
        }
        let (s, d) = parse_factor(factor)?;
        scale *= s;
        dim = dim
            .checked_combine(d, 1)
            .ok_or_else(|| UnitParseError::BadExponent(term.to_string()))?;
    }
    Ok((scale, dim))
}

fn parse_factor(factor: &str) -> Result<(f64, Dimension), UnitParseError> {
    let (base, exp) = split_exponent(factor)?;
    let (s, d) = if let Some(inner) = base.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        parse_unit_expr(inner)?
    } else {
        unit_symbol(base).ok_or_else(|| UnitParseError::UnknownUnit(base.to_string()))?
    };
    let d = d
        .checked_scaled(exp)
        .ok_or_else(|| UnitParseError::BadExponent(factor.to_string()))?;
    Ok((s.powi(i32::from(exp)), d))
}

fn split_exponent(factor: &str) -> Result<(&str, i8), UnitParseError> {
    if let Some(base) = factor.strip_suffix('²') {
        return Ok((base, 2));
    }
    if let Some(base) = factor.strip_suffix('³') {
        return Ok((base, 3));
    }
    // `^` after a closing paren or symbol; parens never contain a top-level `^`
    match factor.rfind('^') {
        Some(pos) if !factor[pos..].contains(')') => {
            let exp = factor[pos + 1..]
                .trim()
                .parse::<i8>()
                .map_err(|_| UnitParseError::BadExponent(factor.to_string()))?;
            Ok((&factor[..pos], exp))
        }
        _ => Ok((factor, 1)),
    }
}

/// Split on separators that are not nested inside parentheses.
fn split_top_level(s: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if depth == 0 && is_sep(c) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn unit_symbol(sym: &str) -> Option<(f64, Dimension)> {
    use Dimension as D;
    let entry = match sym {
        "1" => (1.0, D::DIMENSIONLESS),
        "%" => (1e-2, D::DIMENSIONLESS),
        "pcm" => (units::constants::PCM, D::DIMENSIONLESS),
        "ppm" => (1e-6, D::DIMENSIONLESS),

        "m" => (1.0, D::LENGTH),
        "cm" => (1e-2, D::LENGTH),
        "mm" => (1e-3, D::LENGTH),
        "um" | "µm" => (1e-6, D::LENGTH),
        "km" => (1e3, D::LENGTH),
        "in" => (0.0254, D::LENGTH),
        "ft" => (0.3048, D::LENGTH),

        "L" => (1e-3, D::VOLUME),

        "kg" => (1.0, D::MASS),
        "g" => (1e-3, D::MASS),

        "s" => (1.0, D::TIME),
        "ms" => (1e-3, D::TIME),
        "min" => (60.0, D::TIME),
        "h" | "hr" => (3600.0, D::TIME),

        "K" => (1.0, D::TEMPERATURE),

        "W" => (1.0, D::POWER),
        "kW" => (1e3, D::POWER),
        "MW" => (1e6, D::POWER),
        "GW" => (1e9, D::POWER),

        "J" => (1.0, D::ENERGY),
        "kJ" => (1e3, D::ENERGY),
        "MJ" => (1e6, D::ENERGY),

        "N" => (1.0, D::FORCE),

        "Pa" => (1.0, D::PRESSURE),
        "kPa" => (1e3, D::PRESSURE),
        "MPa" => (1e6, D::PRESSURE),
        "bar" => (1e5, D::PRESSURE),

        _ => return None,
    };
    Some(entry)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn dim() -> impl Strategy<Value = Dimension> {
        (-3_i8..4, -2_i8..3, -3_i8..3, -2_i8..3).prop_map(|(l, m, t, k)| Dimension::new(l, m, t, k))
    }

    proptest! {
        #[test]
        fn mismatched_add_always_fails(a in -1e6_f64..1e6, b in -1e6_f64..1e6, da in dim(), db in dim()) {
            let x = UnitValue::new(a, da);
            let y = UnitValue::new(b, db);
            prop_assert_eq!(x.checked_add(y).is_ok(), da == db);
            prop_assert_eq!(x.checked_sub(y).is_ok(), da == db);
        }

        #[test]
        fn mul_then_div_restores_dimension(a in 0.1_f64..1e3, b in 0.1_f64..1e3, da in dim(), db in dim()) {
            let x = UnitValue::new(a, da);
            let y = UnitValue::new(b, db);
            let z = (x * y) / y;
            prop_assert_eq!(z.dimension(), da);
            prop_assert!((z.value() - a).abs() <= 1e-9 * a);
        }
    }
}
