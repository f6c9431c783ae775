// pf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Length as UomLength, Mass as UomMass, MassDensity as UomMassDensity,
    Pressure as UomPressure, Time as UomTime, Volume as UomVolume,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Pressure = UomPressure;
pub type Time = UomTime;
pub type Volume = UomVolume;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
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
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// US customary factors used by the pipe-flow tools.
///
/// Flow conditions are entered in inches, microinches and gallons per minute
/// and evaluated in feet and seconds.
pub mod us_customary {
    pub const INCHES_PER_FOOT: f64 = 12.0;
    pub const MICROINCHES_PER_INCH: f64 = 1.0e6;
    /// Cubic feet per US gallon, rounded the way the hand tables do.
    pub const FT3_PER_GALLON: f64 = 0.133681;
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    /// Kinematic viscosity of water near 20 °C (ft²/s).
    pub const WATER_KINEMATIC_VISCOSITY_FT2PS: f64 = 1.217e-5;

    #[inline]
    pub fn inches_to_feet(inches: f64) -> f64 {
        inches / INCHES_PER_FOOT
    }

    #[inline]
    pub fn microinches_to_feet(microinches: f64) -> f64 {
        microinches / MICROINCHES_PER_INCH / INCHES_PER_FOOT
    }

    #[inline]
    pub fn gpm_to_ft3ps(gpm: f64) -> f64 {
        gpm * FT3_PER_GALLON / SECONDS_PER_MINUTE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _l = m(2.0);
        let _a = m2(4.909e-4);
        let _v = m3(1.473e-4);
        let _m = kg(30.0);
        let _rho = kg_per_m3(850.0);
        let _dt = s(0.1);
    }

    #[test]
    fn constructors_store_si_values() {
        assert_eq!(pa(1.4e7).value, 1.4e7);
        assert_eq!(m3(1.473e-4).value, 1.473e-4);
    }

    #[test]
    fn us_customary_conversions() {
        use us_customary::*;
        let tol = Tolerances::default();
        assert!(nearly_equal(inches_to_feet(6.0), 0.5, tol));
        assert!(nearly_equal(microinches_to_feet(12.0e6), 1.0, tol));
        assert!(nearly_equal(gpm_to_ft3ps(60.0), FT3_PER_GALLON, tol));
    }
}
