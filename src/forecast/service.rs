use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cost::days_in_month;
use crate::domain::{DailyWeather, GeoLocation, HourlyWeather};

use super::blend::merge_month;
use super::elevation::adjust_for_elevation;
use super::normals::HistoricalNormals;
use super::provider::{WeatherError, WeatherProvider};

pub const DEFAULT_HORIZON_DAYS: u32 = 15;
pub const DEFAULT_ARCHIVE_YEARS: u32 = 10;

/// Assembles a full month of daily weather from a provider: live forecast
/// first, archive normals for the remainder.
pub struct MonthlyWeatherService<P> {
    provider: P,
    location: GeoLocation,
    horizon_days: u32,
    archive_years: u32,
}

impl<P: WeatherProvider> MonthlyWeatherService<P> {
    pub fn new(provider: P, location: GeoLocation) -> Self {
        Self {
            provider,
            location,
            horizon_days: DEFAULT_HORIZON_DAYS,
            archive_years: DEFAULT_ARCHIVE_YEARS,
        }
    }

    pub fn with_horizon(mut self, horizon_days: u32, archive_years: u32) -> Self {
        self.horizon_days = horizon_days;
        self.archive_years = archive_years.max(1);
        self
    }

    /// Daily weather for every day of `month` in `year`.
    ///
    /// A failed or empty forecast or archive degrades to the blending
    /// fallbacks. Only cancellation is returned as an error.
    pub async fn month(
        &self,
        year: i32,
        month: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyWeather>, WeatherError> {
        if cancel.is_cancelled() {
            return Err(WeatherError::Cancelled);
        }

        let forecast = match self.provider.daily_forecast(self.location, self.horizon_days, cancel).await {
            Ok(days) => days,
            Err(WeatherError::Cancelled) => return Err(WeatherError::Cancelled),
            Err(e) => {
                warn!(error = %e, "forecast unavailable, using historical normals only");
                Vec::new()
            }
        };

        let normals = match self.archive_range(year, month) {
            Some((start, end)) => match self.provider.daily_archive(self.location, start, end, cancel).await {
                Ok(archive) => Some(HistoricalNormals::from_archive(month, &archive)),
                Err(WeatherError::Cancelled) => return Err(WeatherError::Cancelled),
                Err(e) => {
                    warn!(error = %e, "archive unavailable, repeating forecast average");
                    None
                }
            },
            None => None,
        };

        let days = merge_month(&forecast, normals.as_ref(), year, month);
        info!(
            year,
            month,
            forecast_days = forecast.len(),
            normal_days = normals.as_ref().map_or(0, HistoricalNormals::len),
            "monthly weather assembled"
        );
        Ok(days)
    }

    /// Hourly forecast shifted from the grid point's elevation to the home's.
    pub async fn hourly(
        &self,
        days: u32,
        home_elevation_ft: Option<f64>,
        station_elevation_ft: Option<f64>,
        cancel: &CancellationToken,
    ) -> Result<Vec<HourlyWeather>, WeatherError> {
        let forecast = self.provider.hourly_forecast(self.location, days, cancel).await?;
        let station = station_elevation_ft.or(forecast.station_elevation_ft);
        Ok(match (home_elevation_ft, station) {
            (Some(home), Some(station)) => adjust_for_elevation(&forecast.hours, home, station),
            _ => forecast.hours,
        })
    }

    /// Same month across the preceding `archive_years` years.
    fn archive_range(&self, year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
        let years = i32::try_from(self.archive_years).ok()?;
        let start = NaiveDate::from_ymd_opt(year - years, month, 1)?;
        let last_day = days_in_month(year - 1, month)?;
        let end = NaiveDate::from_ymd_opt(year - 1, month, last_day)?;
        Some((start, end))
    }
}
