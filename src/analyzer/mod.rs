//! Coast-down heat-loss analysis.
//!
//! Finds a stretch of thermostat history where the heating stage stayed off,
//! measures how fast the indoor temperature decayed toward the outdoor
//! temperature, and converts that decay rate into a heat-loss factor with a
//! fixed thermal-mass estimate of 8 BTU/°F per square foot. The estimate is
//! an approximation and is not calibrated per building.

pub mod period;

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::domain::{CanonicalReading, CoastDownSummary, HeatLossResult};
use crate::error::EngineError;

use period::OffPeriod;

/// BTU/°F of thermal mass per square foot.
pub const THERMAL_MASS_PER_SQFT: f64 = 8.0;
/// Net indoor change at or below which the home is treated as stable.
pub const STABLE_TREND_F: f64 = 0.1;
/// Drop used in place of the measured one for stable homes.
pub const SYNTHETIC_DROP_F: f64 = 0.1;
/// Floor area assumed when the caller passes none.
pub const DEFAULT_SQUARE_FEET: f64 = 2000.0;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Highest outdoor temperature at which aux heat ran, or the coldest
/// observed temperature when it never did.
pub fn balance_point(readings: &[CanonicalReading]) -> Option<f64> {
    let aux_max = readings
        .iter()
        .filter(|r| r.aux_heat1_sec.is_some_and(|s| s > 0))
        .filter_map(|r| r.outdoor_temp_f)
        .reduce(f64::max);
    aux_max.or_else(|| readings.iter().filter_map(|r| r.outdoor_temp_f).reduce(f64::min))
}

fn insufficient(periods: &[OffPeriod<'_>]) -> EngineError {
    let longest = periods
        .iter()
        .max_by(|a, b| a.duration_hours.total_cmp(&b.duration_hours));
    EngineError::InsufficientData {
        off_periods: period::run_count(periods),
        longest_readings: longest.map_or(0, |p| p.readings.len()),
        longest_duration_hours: longest.map_or(0.0, |p| p.duration_hours),
        longest_start: longest.map_or_else(
            || "n/a".to_string(),
            |p| format!("{} {}", p.first().date, p.first().time),
        ),
    }
}

/// Derives a heat-loss factor from chronologically ordered readings.
///
/// Deterministic: the same readings always produce the same result.
pub fn analyze(readings: &[CanonicalReading], square_feet: f64) -> Result<HeatLossResult, EngineError> {
    let square_feet = if square_feet.is_finite() && square_feet > 0.0 {
        square_feet
    } else {
        DEFAULT_SQUARE_FEET
    };

    let balance_point_f = balance_point(readings);

    let periods = period::off_periods(readings);
    debug!(candidates = periods.len(), "scanned system-off periods");
    let chosen = period::select(&periods).ok_or_else(|| insufficient(&periods))?;

    let duration_hours = chosen.duration_hours;
    let first = chosen.first();
    let last = chosen.last();
    let (start_temp_f, end_temp_f) = match (first.indoor_temp_f, last.indoor_temp_f) {
        (Some(s), Some(e)) => (s, e),
        (start_temp_f, end_temp_f) => {
            return Err(EngineError::MissingIndoorTemperature {
                date: first.date.clone(),
                start_time: first.time.clone(),
                end_time: last.time.clone(),
                start_temp_f,
                end_temp_f,
            })
        }
    };

    let indoor: Vec<f64> = chosen.readings.iter().filter_map(|r| r.indoor_temp_f).collect();
    let outdoor: Vec<f64> = chosen.readings.iter().filter_map(|r| r.outdoor_temp_f).collect();

    let avg_indoor_f = mean(&indoor);
    let avg_outdoor_f = mean(&outdoor);
    let avg_temp_diff_f = avg_indoor_f - avg_outdoor_f;

    if avg_temp_diff_f.is_nan() || avg_temp_diff_f <= 0.0 {
        return Err(EngineError::ZeroOrNegativeTempDiff { avg_indoor_f, avg_outdoor_f });
    }

    let net_trend_f = end_temp_f - start_temp_f;

    if net_trend_f > STABLE_TREND_F {
        let (min_temp_f, max_temp_f) = indoor
            .iter()
            .copied()
            .minmax_by(f64::total_cmp)
            .into_option()
            .unwrap_or((start_temp_f, end_temp_f));
        return Err(EngineError::InvalidTrend {
            start_temp_f,
            end_temp_f,
            net_change_f: net_trend_f,
            min_temp_f,
            max_temp_f,
            duration_hours,
            avg_indoor_f,
            avg_outdoor_f,
        });
    }

    let stable_substituted = net_trend_f.abs() <= STABLE_TREND_F;
    let temp_drop_f = if stable_substituted {
        warn!(
            net_change_f = net_trend_f,
            "indoor temperature stable during coast-down; using minimal drop"
        );
        SYNTHETIC_DROP_F
    } else {
        -net_trend_f
    };

    let hourly_loss_rate = temp_drop_f / duration_hours;
    let thermal_decay_rate = hourly_loss_rate / avg_temp_diff_f;
    let thermal_mass = square_feet * THERMAL_MASS_PER_SQFT;
    let heat_loss_factor = thermal_mass * thermal_decay_rate;

    info!(
        date = %first.date,
        start = %first.time,
        end = %last.time,
        duration_hours,
        temp_drop_f,
        avg_temp_diff_f,
        heat_loss_factor,
        "coast-down heat loss computed"
    );

    Ok(HeatLossResult {
        heat_loss_factor,
        balance_point_f,
        avg_temp_diff_f,
        heat_loss_total_at_70f: heat_loss_factor * 70.0,
        period: CoastDownSummary {
            date: first.date.clone(),
            start_time: first.time.clone(),
            end_time: last.time.clone(),
            readings: chosen.readings.len(),
            duration_hours,
            temp_drop_f,
            net_trend_f,
            stable_substituted,
            thermal_decay_rate,
        },
    })
}
