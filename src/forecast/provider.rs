use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::{DailyWeather, GeoLocation, HourlyWeather};

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(String),
    #[error("weather service returned status {status}")]
    Status { status: u16 },
    #[error("malformed weather response: {0}")]
    Parse(String),
    #[error("weather request cancelled")]
    Cancelled,
}

impl WeatherError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WeatherError::Cancelled)
    }
}

#[cfg(feature = "open-meteo")]
impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Http(e.to_string())
    }
}

/// Hourly forecast plus the elevation of the grid point it was computed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub hours: Vec<HourlyWeather>,
    pub station_elevation_ft: Option<f64>,
}

/// Source of forecast and archived weather. Every call observes `cancel` and
/// returns [`WeatherError::Cancelled`] once it fires.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Daily forecast starting today, tagged `forecast`.
    async fn daily_forecast(
        &self,
        location: GeoLocation,
        days: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyWeather>, WeatherError>;

    /// Archived daily highs and lows for `start..=end`, tagged `historical`.
    async fn daily_archive(
        &self,
        location: GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyWeather>, WeatherError>;

    async fn hourly_forecast(
        &self,
        location: GeoLocation,
        days: u32,
        cancel: &CancellationToken,
    ) -> Result<HourlyForecast, WeatherError>;
}
