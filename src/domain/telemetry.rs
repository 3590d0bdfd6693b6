use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

use crate::error::NormalizationWarning;

/// One CSV row keyed by its raw header.
pub type RawRecord = HashMap<String, String>;

/// A thermostat sample in the canonical schema.
///
/// Temperatures are always Fahrenheit and runtimes always whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalReading {
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    pub outdoor_temp_f: Option<f64>,
    pub indoor_temp_f: Option<f64>,
    pub heat_stage1_sec: Option<u32>,
    pub aux_heat1_sec: Option<u32>,
}

impl CanonicalReading {
    /// Minutes since midnight. Seconds are ignored.
    pub fn minutes_of_day(&self) -> Option<u32> {
        let mut parts = self.time.split(':');
        let hours: u32 = parts.next()?.trim().parse().ok()?;
        let minutes: u32 = parts.next().unwrap_or("0").trim().parse().ok()?;
        Some(hours * 60 + minutes)
    }

    /// Unset compressor runtime counts as running.
    pub fn is_system_off(&self) -> bool {
        self.heat_stage1_sec == Some(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuntimeUnit {
    Seconds,
    Minutes,
    Milliseconds,
}

impl RuntimeUnit {
    pub fn to_seconds(self, value: f64) -> f64 {
        match self {
            RuntimeUnit::Seconds => value,
            RuntimeUnit::Minutes => value * 60.0,
            RuntimeUnit::Milliseconds => value / 1000.0,
        }
    }
}

/// Units detected for each converted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedUnits {
    pub temperature: TemperatureUnit,
    pub heat_stage1: RuntimeUnit,
    pub aux_heat1: RuntimeUnit,
}

impl Default for DetectedUnits {
    fn default() -> Self {
        Self {
            temperature: TemperatureUnit::Fahrenheit,
            heat_stage1: RuntimeUnit::Seconds,
            aux_heat1: RuntimeUnit::Seconds,
        }
    }
}

/// Output of one normalization pass.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedTelemetry {
    pub readings: Vec<CanonicalReading>,
    pub units: DetectedUnits,
    pub warnings: Vec<NormalizationWarning>,
}
