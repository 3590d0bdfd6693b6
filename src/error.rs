use serde::Serialize;
use thiserror::Error;

/// Fatal conditions raised by the coast-down analyzer.
///
/// Every variant carries the numbers that led to the rejection so the caller
/// can show the user why their export could not be analyzed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(
        "no coast-down period with the system off for at least 3 hours was found \
         ({off_periods} off periods scanned; longest: {longest_readings} readings over \
         {longest_duration_hours:.2} hours starting {longest_start})"
    )]
    InsufficientData {
        off_periods: usize,
        longest_readings: usize,
        longest_duration_hours: f64,
        longest_start: String,
    },

    #[error(
        "indoor temperature rose during the coast-down period: start {start_temp_f:.1}°F, \
         end {end_temp_f:.1}°F, net change {net_change_f:+.2}°F, range {min_temp_f:.1}°F to \
         {max_temp_f:.1}°F, duration {duration_hours:.2} hours, avg indoor {avg_indoor_f:.1}°F, \
         avg outdoor {avg_outdoor_f:.1}°F"
    )]
    InvalidTrend {
        start_temp_f: f64,
        end_temp_f: f64,
        net_change_f: f64,
        min_temp_f: f64,
        max_temp_f: f64,
        duration_hours: f64,
        avg_indoor_f: f64,
        avg_outdoor_f: f64,
    },

    #[error(
        "average outdoor temperature ({avg_outdoor_f:.1}°F) is not lower than average indoor \
         temperature ({avg_indoor_f:.1}°F); heat loss cannot be computed"
    )]
    ZeroOrNegativeTempDiff { avg_indoor_f: f64, avg_outdoor_f: f64 },

    #[error(
        "indoor temperature missing at the edge of the coast-down period on {date} \
         ({start_time} to {end_time}): start {start_temp_f:?}, end {end_temp_f:?}"
    )]
    MissingIndoorTemperature {
        date: String,
        start_time: String,
        end_time: String,
        start_temp_f: Option<f64>,
        end_temp_f: Option<f64>,
    },
}

/// Non-fatal ambiguities resolved by the normalizer with a documented default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationWarning {
    /// Time fragment of a combined timestamp could not be parsed and was replaced by `00:00:00`.
    UnparsableTime { row: usize, value: String },
    /// No header matched a canonical field; the field stays unset for every row.
    MissingColumn { field: &'static str },
    /// Rows without a date or a time were dropped.
    DroppedRows { count: usize },
    /// A runtime cell was negative and left unset.
    NegativeRuntime { row: usize, field: &'static str, value: f64 },
}
