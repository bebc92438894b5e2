// rk-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, HeatTransfer as UomHeatTransfer,
    Length as UomLength, MassDensity as UomMassDensity, MassRate as UomMassRate,
    Power as UomPower, Ratio as UomRatio, SpecificHeatCapacity as UomSpecificHeatCapacity,
    TemperatureCoefficient as UomTemperatureCoefficient,
    TemperatureInterval as UomTemperatureInterval, ThermalConductivity as UomThermalConductivity,
    ThermodynamicTemperature as UomThermodynamicTemperature, Time as UomTime,
    Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Conductivity = UomThermalConductivity;
pub type Density = UomMassDensity;
pub type FilmCoefficient = UomHeatTransfer;
pub type Length = UomLength;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Ratio = UomRatio;
pub type SpecHeat = UomSpecificHeatCapacity;
pub type TempCoefficient = UomTemperatureCoefficient;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;
pub type Time = UomTime;
pub type Volume = UomVolume;

/// Reactivity is a dimensionless Δk/k.
pub type Reactivity = UomRatio;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn w(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn j_per_kg_k(v: f64) -> SpecHeat {
    use uom::si::specific_heat_capacity::joule_per_kilogram_kelvin;
    SpecHeat::new::<joule_per_kilogram_kelvin>(v)
}

#[inline]
pub fn w_per_m_k(v: f64) -> Conductivity {
    use uom::si::thermal_conductivity::watt_per_meter_kelvin;
    Conductivity::new::<watt_per_meter_kelvin>(v)
}

#[inline]
pub fn w_per_m2_k(v: f64) -> FilmCoefficient {
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;
    FilmCoefficient::new::<watt_per_square_meter_kelvin>(v)
}

#[inline]
pub fn per_k(v: f64) -> TempCoefficient {
    use uom::si::temperature_coefficient::per_kelvin;
    TempCoefficient::new::<per_kelvin>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Reactivity given in per cent mille (1 pcm = 1e-5 Δk/k).
#[inline]
pub fn pcm(v: f64) -> Reactivity {
    unitless(v * constants::PCM)
}

pub mod constants {
    use super::*;

    /// Reference temperature for linear conductivity fits (0 °C).
    pub const T_REF_K: f64 = 273.15;

    pub const PCM: f64 = 1e-5;

    #[inline]
    pub fn t_ref() -> Temperature {
        k(T_REF_K)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _t = k(300.0);
        let _l = m(2.0);
        let _a = m2(0.5);
        let _v = m3(1.0);
        let _dt = s(0.1);
        let _p = w(1.0e6);
        let _mdot = kgps(2.0);
        let _rho = kg_per_m3(1940.0);
        let _cp = j_per_kg_k(2386.0);
        let _k = w_per_m_k(1.1);
        let _h = w_per_m2_k(4700.0);
        let _alpha = per_k(-3.8e-5);
        let _t_ref = constants::t_ref();
    }

    #[test]
    fn pcm_is_scaled_ratio() {
        assert!((pcm(100.0).value - 1e-3).abs() < 1e-15);
    }

    #[test]
    fn base_values_are_si() {
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(w_per_m_k(2.5).value, 2.5);
        assert_eq!(m3(0.25).value, 0.25);
    }
}
