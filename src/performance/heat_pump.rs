use crate::domain::{BuildingProfile, HvacSystemConfig, PerformancePoint};

use super::defrost::DefrostPenalty;

pub const KW_PER_TON_OUTPUT: f64 = 3.517;
pub const BTU_PER_KWH: f64 = 3412.14;
pub const MIN_CAPACITY_FACTOR: f64 = 0.3;
/// Floor under the capacity factor when deriving the power factor.
pub const MIN_POWER_CAPACITY_FACTOR: f64 = 0.7;

/// Share of rated output available at an outdoor temperature.
///
/// Full capacity from 47°F up, 1% lost per degree down to 17°F, then 0.74%
/// per degree below that, never under 30%. Both pieces meet at 0.70 at 17°F.
pub fn capacity_factor(outdoor_temp_f: f64) -> f64 {
    if outdoor_temp_f >= 47.0 {
        1.0
    } else if outdoor_temp_f >= 17.0 {
        (1.0 - (47.0 - outdoor_temp_f) * 0.01).max(MIN_CAPACITY_FACTOR)
    } else {
        (0.70 - (17.0 - outdoor_temp_f) * 0.0074).max(MIN_CAPACITY_FACTOR)
    }
}

/// Heat-pump output at the given capacity factor, BTU/hr.
pub fn output_btu(capacity_tons: f64, capacity_factor: f64) -> f64 {
    capacity_tons * KW_PER_TON_OUTPUT * capacity_factor * BTU_PER_KWH
}

pub(crate) fn evaluate<D: DefrostPenalty + ?Sized>(
    defrost: &D,
    outdoor_temp_f: f64,
    humidity_pct: f64,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    indoor_setpoint_f: f64,
) -> PerformancePoint {
    let temp_diff = (indoor_setpoint_f - outdoor_temp_f).max(1.0);
    let building_heat_loss_btu = building.heat_loss_factor * temp_diff;

    let cf = capacity_factor(outdoor_temp_f);
    let power_factor = 1.0 / cf.max(MIN_POWER_CAPACITY_FACTOR);
    let base_kw = system.compressor_power_kw * power_factor;

    let penalty = defrost.multiplier(outdoor_temp_f, humidity_pct);
    let defrost_multiplier = if penalty.is_finite() { penalty.max(1.0) } else { 1.0 };
    let electrical_kw = base_kw * defrost_multiplier;

    let delivered_capacity_btu = output_btu(system.capacity_tons, cf);
    let runtime_percent = if delivered_capacity_btu > 0.0 {
        (building_heat_loss_btu / delivered_capacity_btu * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };
    let aux_kw = (building_heat_loss_btu - delivered_capacity_btu).max(0.0) / BTU_PER_KWH;

    PerformancePoint {
        electrical_kw,
        runtime_percent,
        building_heat_loss_btu,
        delivered_capacity_btu,
        aux_kw,
        defrost_multiplier,
        therms_per_hour: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn curve_is_continuous_at_17f() {
        let upper = 1.0 - (47.0 - 17.0) * 0.01;
        let lower = 0.70 - (17.0f64 - 17.0) * 0.0074;
        assert_eq!(upper, 0.7);
        assert_eq!(lower, 0.7);
        assert_eq!(capacity_factor(17.0), 0.7);
        assert!((capacity_factor(16.999_999) - 0.7).abs() < 1e-6);
    }

    #[rstest]
    #[case(47.0, 1.0)]
    #[case(80.0, 1.0)]
    #[case(37.0, 0.9)]
    #[case(7.0, 0.626)]
    #[case(-100.0, 0.3)]
    fn capacity_factor_points(#[case] temp: f64, #[case] expected: f64) {
        assert!((capacity_factor(temp) - expected).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn capacity_factor_stays_in_range(t in -60.0f64..120.0) {
            let cf = capacity_factor(t);
            prop_assert!((MIN_CAPACITY_FACTOR..=1.0).contains(&cf));
        }

        #[test]
        fn capacity_factor_never_decreases_with_temperature(a in -60.0f64..120.0, b in -60.0f64..120.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(capacity_factor(lo) <= capacity_factor(hi) + 1e-12);
        }
    }
}
