// ps-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, MassDensity as UomMassDensity,
    Power as UomPower, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Power = UomPower;
pub type VolumeRate = UomVolumeRate;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Volumetric flow from cubic metres per hour, the unit pump curves are
/// published in.
#[inline]
pub fn m3h(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v / SECONDS_PER_HOUR)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn to_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

pub mod constants {
    use super::*;

    /// Gravitational acceleration used by the pump power relation.
    pub const G_MPS2: f64 = 9.81;

    /// Density of water at specific gravity 1.0.
    pub const WATER_DENSITY_KG_M3: f64 = 1000.0;

    #[inline]
    pub fn g() -> Accel {
        use uom::si::acceleration::meter_per_second_squared;
        Accel::new::<meter_per_second_squared>(G_MPS2)
    }

    #[inline]
    pub fn density(specific_gravity: f64) -> Density {
        use uom::si::mass_density::kilogram_per_cubic_meter;
        Density::new::<kilogram_per_cubic_meter>(WATER_DENSITY_KG_M3 * specific_gravity)
    }
}

/// Shaft power needed to deliver `flow` against `head`.
///
/// ```text
/// P = rho * g * Q * H / eta
/// ```
///
/// `efficiency_pct` is a percentage. A non-positive efficiency yields zero
/// power rather than an infinite one.
pub fn shaft_power(flow: VolumeRate, head: Length, specific_gravity: f64, efficiency_pct: f64) -> Power {
    if !(efficiency_pct > 0.0) {
        return kw(0.0);
    }
    let hydraulic: Power = constants::density(specific_gravity) * constants::g() * flow * head;
    hydraulic / (efficiency_pct / 100.0)
}

/// [`shaft_power`] in the engine's working units (m³/h, m, %, kW).
pub fn shaft_power_kw(flow_m3hr: f64, head_m: f64, specific_gravity: f64, efficiency_pct: f64) -> f64 {
    to_kw(shaft_power(m3h(flow_m3hr), m(head_m), specific_gravity, efficiency_pct))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _q = m3h(200.0);
        let _h = m(35.0);
        let _p = kw(24.0);
        let _g = constants::g();
        let _rho = constants::density(1.0);
    }

    #[test]
    fn water_power_matches_handbook_form() {
        // (200 * 35 * 9.81) / (0.78 * 3600)
        let p = shaft_power_kw(200.0, 35.0, 1.0, 78.0);
        let expected = (200.0 * 35.0 * 9.81) / (0.78 * 3600.0);
        assert!((p - expected).abs() < 1e-9);
        assert!((p - 24.45).abs() < 0.01);
    }

    #[test]
    fn zero_efficiency_is_zero_power() {
        assert_eq!(shaft_power_kw(200.0, 35.0, 1.0, 0.0), 0.0);
        assert_eq!(shaft_power_kw(200.0, 35.0, 1.0, -5.0), 0.0);
        assert_eq!(shaft_power_kw(200.0, 35.0, 1.0, f64::NAN), 0.0);
    }

    #[test]
    fn power_scales_with_specific_gravity() {
        let water = shaft_power_kw(100.0, 20.0, 1.0, 70.0);
        let brine = shaft_power_kw(100.0, 20.0, 1.2, 70.0);
        assert!((brine / water - 1.2).abs() < 1e-12);
    }
}
