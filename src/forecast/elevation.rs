use tracing::debug;

use crate::domain::HourlyWeather;

/// °F per 1000 ft in dry air.
pub const DRY_LAPSE_RATE_F: f64 = 5.4;
/// °F per 1000 ft in saturated air.
pub const SATURATED_LAPSE_RATE_F: f64 = 3.0;
/// Smaller elevation differences are left alone.
pub const MIN_ELEVATION_DIFF_FT: f64 = 10.0;
const DEFAULT_HUMIDITY_PCT: f64 = 50.0;

/// Lapse rate interpolated by relative humidity: saturated at 100 %, dry at 0 %.
pub fn lapse_rate(humidity_pct: f64) -> f64 {
    let humidity = if (0.0..=100.0).contains(&humidity_pct) {
        humidity_pct
    } else {
        DEFAULT_HUMIDITY_PCT
    };
    SATURATED_LAPSE_RATE_F + (DRY_LAPSE_RATE_F - SATURATED_LAPSE_RATE_F) * (1.0 - humidity / 100.0)
}

/// Shifts station temperatures to the home's elevation. A home above the
/// station reads colder.
pub fn adjust_for_elevation(hours: &[HourlyWeather], home_ft: f64, station_ft: f64) -> Vec<HourlyWeather> {
    let diff_ft = home_ft - station_ft;
    if !diff_ft.is_finite() || diff_ft.abs() < MIN_ELEVATION_DIFF_FT {
        return hours.to_vec();
    }
    debug!(home_ft, station_ft, diff_ft, "adjusting forecast for elevation");
    hours
        .iter()
        .map(|h| HourlyWeather {
            temp_f: h.temp_f - diff_ft / 1000.0 * lapse_rate(h.humidity_pct),
            ..h.clone()
        })
        .collect()
}
