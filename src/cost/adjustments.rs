use crate::domain::{Adjustments, Mode};

/// Heating setpoint the typical-month tables are normalized to.
pub const REFERENCE_HEATING_SETPOINT_F: f64 = 70.0;
/// Cooling setpoint the typical-month tables are normalized to.
pub const REFERENCE_COOLING_SETPOINT_F: f64 = 74.0;

/// `1 + elevation/1000 * 0.005`, kept within `[0.8, 1.3]`.
pub fn elevation_multiplier(home_elevation_ft: f64) -> f64 {
    (1.0 + home_elevation_ft / 1000.0 * 0.005).clamp(0.8, 1.3)
}

/// Scales typical-month energy for a thermostat kept off the reference.
///
/// Warmer winter settings cost more, so heating is `actual / 70`; cooler
/// summer settings cost more, so cooling is `74 / actual`.
pub fn setpoint_multiplier(mode: Mode, actual_setpoint_f: f64) -> f64 {
    if !actual_setpoint_f.is_finite() || actual_setpoint_f <= 0.0 {
        return 1.0;
    }
    match mode {
        Mode::Heating => actual_setpoint_f / REFERENCE_HEATING_SETPOINT_F,
        Mode::Cooling => REFERENCE_COOLING_SETPOINT_F / actual_setpoint_f,
    }
}

pub fn adjustments(mode: Mode, home_elevation_ft: f64, actual_setpoint_f: f64) -> Adjustments {
    Adjustments {
        elevation: elevation_multiplier(home_elevation_ft),
        setpoint: setpoint_multiplier(mode, actual_setpoint_f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(5000.0, 1.025)]
    #[case(100_000.0, 1.3)]
    #[case(-100_000.0, 0.8)]
    fn elevation_is_clamped(#[case] ft: f64, #[case] expected: f64) {
        assert!((elevation_multiplier(ft) - expected).abs() < 1e-12);
    }

    #[test]
    fn setpoint_multipliers_move_in_opposite_directions() {
        assert!((setpoint_multiplier(Mode::Heating, 77.0) - 1.1).abs() < 1e-12);
        assert!((setpoint_multiplier(Mode::Cooling, 74.0) - 1.0).abs() < 1e-12);
        assert!(setpoint_multiplier(Mode::Cooling, 70.0) > 1.0);
        assert_eq!(setpoint_multiplier(Mode::Heating, 0.0), 1.0);
    }
}
