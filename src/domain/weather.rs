use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeatherSource {
    Forecast,
    Historical,
}

/// One day of weather, either forecast or reconstructed from normals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub high_f: f64,
    pub low_f: f64,
    pub avg_f: f64,
    pub humidity_pct: f64,
    pub source: WeatherSource,
}

impl DailyWeather {
    pub fn new(date: NaiveDate, high_f: f64, low_f: f64, humidity_pct: f64, source: WeatherSource) -> Self {
        Self {
            date,
            high_f,
            low_f,
            avg_f: (high_f + low_f) / 2.0,
            humidity_pct,
            source,
        }
    }
}

/// One hour of forecast weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub time: NaiveDateTime,
    pub temp_f: f64,
    pub humidity_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}
