//! Open-Meteo weather client.
//!
//! Forecasts come from the `/v1/forecast` endpoint and archived days from the
//! archive API. Both are requested in Fahrenheit.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{DailyWeather, GeoLocation, HourlyWeather, WeatherSource};

use super::normals::HISTORICAL_HUMIDITY_PCT;
use super::provider::{HourlyForecast, WeatherError, WeatherProvider};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const FEET_PER_METER: f64 = 3.28084;
const DEFAULT_HUMIDITY_PCT: f64 = 50.0;

#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: String,
    archive_url: String,
}

impl OpenMeteoClient {
    pub fn new(forecast_url: String, archive_url: String, timeout: Duration) -> Result<Self, WeatherError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("thermal-cost-engine/0.1"));
        let client = Client::builder().timeout(timeout).default_headers(headers).build()?;
        Ok(Self { client, forecast_url, archive_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, cancel: &CancellationToken) -> Result<T, WeatherError> {
        debug!(%url, "fetching weather");
        let request = async {
            let resp = self.client.get(&url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                warn!(%status, "weather service error");
                return Err(WeatherError::Status { status: status.as_u16() });
            }
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WeatherError::Cancelled),
            result = request => result,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    elevation: Option<f64>,
    hourly: HourlySeries,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_2m: Vec<Option<f64>>,
}

fn at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

fn parse_date(s: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| WeatherError::Parse(format!("date {s:?}: {e}")))
}

fn parse_daily(series: DailySeries, source: WeatherSource) -> Result<Vec<DailyWeather>, WeatherError> {
    let mut days = Vec::with_capacity(series.time.len());
    for (i, t) in series.time.iter().enumerate() {
        let date = parse_date(t)?;
        let high = at(&series.temperature_2m_max, i).unwrap_or(f64::NAN);
        let low = at(&series.temperature_2m_min, i).unwrap_or(f64::NAN);
        let humidity = match source {
            WeatherSource::Historical => HISTORICAL_HUMIDITY_PCT,
            WeatherSource::Forecast => {
                match (at(&series.relativehumidity_2m_max, i), at(&series.relativehumidity_2m_min, i)) {
                    (Some(max), Some(min)) => (max + min) / 2.0,
                    _ => DEFAULT_HUMIDITY_PCT,
                }
            }
        };
        days.push(DailyWeather::new(date, high, low, humidity, source));
    }
    Ok(days)
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn daily_forecast(
        &self,
        location: GeoLocation,
        days: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyWeather>, WeatherError> {
        let url = format!(
            "{}?latitude={:.4}&longitude={:.4}&daily=temperature_2m_max,temperature_2m_min,relativehumidity_2m_max,relativehumidity_2m_min&temperature_unit=fahrenheit&timezone=auto&forecast_days={}",
            self.forecast_url, location.latitude, location.longitude, days
        );
        let resp: DailyResponse = self.get_json(url, cancel).await?;
        let days: Vec<DailyWeather> = parse_daily(resp.daily, WeatherSource::Forecast)?
            .into_iter()
            .filter(|d| d.avg_f.is_finite())
            .collect();
        info!(days = days.len(), "daily forecast fetched");
        Ok(days)
    }

    async fn daily_archive(
        &self,
        location: GeoLocation,
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<DailyWeather>, WeatherError> {
        let url = format!(
            "{}?latitude={:.4}&longitude={:.4}&start_date={}&end_date={}&daily=temperature_2m_max,temperature_2m_min&timezone=auto&temperature_unit=fahrenheit",
            self.archive_url,
            location.latitude,
            location.longitude,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let resp: DailyResponse = self.get_json(url, cancel).await?;
        let days = parse_daily(resp.daily, WeatherSource::Historical)?;
        info!(days = days.len(), %start, %end, "weather archive fetched");
        Ok(days)
    }

    async fn hourly_forecast(
        &self,
        location: GeoLocation,
        days: u32,
        cancel: &CancellationToken,
    ) -> Result<HourlyForecast, WeatherError> {
        let url = format!(
            "{}?latitude={:.4}&longitude={:.4}&hourly=temperature_2m,relativehumidity_2m&temperature_unit=fahrenheit&forecast_days={}",
            self.forecast_url, location.latitude, location.longitude, days
        );
        let resp: HourlyResponse = self.get_json(url, cancel).await?;
        let series = resp.hourly;
        let mut hours = Vec::with_capacity(series.time.len());
        for (i, t) in series.time.iter().enumerate() {
            let time = NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M")
                .map_err(|e| WeatherError::Parse(format!("time {t:?}: {e}")))?;
            let Some(temp_f) = at(&series.temperature_2m, i) else {
                continue;
            };
            let humidity_pct = at(&series.relativehumidity_2m, i).unwrap_or(DEFAULT_HUMIDITY_PCT);
            hours.push(HourlyWeather { time, temp_f, humidity_pct });
        }
        Ok(HourlyForecast {
            hours,
            station_elevation_ft: resp.elevation.map(|m| (m * FEET_PER_METER).round()),
        })
    }
}
