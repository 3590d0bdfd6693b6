use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::cost::days_in_month;
use crate::domain::{DailyWeather, WeatherSource};

use super::normals::{HistoricalNormals, HISTORICAL_HUMIDITY_PCT};

/// High used when neither normals nor forecast days are available.
pub const FALLBACK_HIGH_F: f64 = 50.0;
/// Low used when neither normals nor forecast days are available.
pub const FALLBACK_LOW_F: f64 = 40.0;

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Builds a complete month of daily weather.
///
/// Forecast days inside the month are used as given. Every other day comes
/// from `normals` for its day of month, or, failing that, from the average of
/// the in-month forecast days. Returns exactly as many entries as the month has
/// days, in date order; an invalid month yields an empty series.
pub fn merge_month(
    forecast: &[DailyWeather],
    normals: Option<&HistoricalNormals>,
    year: i32,
    month: u32,
) -> Vec<DailyWeather> {
    let Some(days) = days_in_month(year, month) else {
        return Vec::new();
    };

    let in_month: HashMap<u32, &DailyWeather> = forecast
        .iter()
        .filter(|d| d.date.year() == year && d.date.month() == month)
        .map(|d| (d.date.day(), d))
        .collect();

    let fallback_high = mean(in_month.values().map(|d| d.high_f)).unwrap_or(FALLBACK_HIGH_F);
    let fallback_low = mean(in_month.values().map(|d| d.low_f)).unwrap_or(FALLBACK_LOW_F);

    (1..=days)
        .filter_map(|day| {
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            let weather = match in_month.get(&day) {
                Some(f) => DailyWeather {
                    date,
                    source: WeatherSource::Forecast,
                    ..(*f).clone()
                },
                None => {
                    let (high, low) = normals
                        .and_then(|n| n.get(day))
                        .map(|n| (n.high_f, n.low_f))
                        .unwrap_or((fallback_high, fallback_low));
                    DailyWeather::new(date, high, low, HISTORICAL_HUMIDITY_PCT, WeatherSource::Historical)
                }
            };
            Some(weather)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn forecast(y: i32, m: u32, d: u32, high: f64, low: f64) -> DailyWeather {
        DailyWeather::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), high, low, 80.0, WeatherSource::Forecast)
    }

    #[test]
    fn forecast_days_win_and_normals_fill_the_rest() {
        let archive = vec![
            DailyWeather::new(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(), 30.0, 10.0, 0.0, WeatherSource::Historical),
        ];
        let normals = HistoricalNormals::from_archive(1, &archive);
        let month = merge_month(&[forecast(2025, 1, 1, 40.0, 20.0)], Some(&normals), 2025, 1);

        assert_eq!(month.len(), 31);
        assert_eq!(month[0].source, WeatherSource::Forecast);
        assert_eq!(month[0].humidity_pct, 80.0);
        assert_eq!(month[2].source, WeatherSource::Historical);
        assert_eq!((month[2].high_f, month[2].low_f, month[2].avg_f), (30.0, 10.0, 20.0));
        assert_eq!(month[2].humidity_pct, 60.0);
        // day 2 has no normal, so it repeats the forecast average
        assert_eq!((month[1].high_f, month[1].low_f), (40.0, 20.0));
    }

    #[test]
    fn forecast_outside_the_month_is_ignored() {
        let days = [forecast(2025, 1, 31, 10.0, 0.0), forecast(2025, 2, 1, 60.0, 40.0)];
        let feb = merge_month(&days, None, 2025, 2);
        assert_eq!(feb.len(), 28);
        assert_eq!(feb.iter().filter(|d| d.source == WeatherSource::Forecast).count(), 1);
        assert!(feb[1..].iter().all(|d| d.high_f == 60.0 && d.low_f == 40.0));
    }

    #[test]
    fn no_data_at_all_uses_fixed_fallback() {
        let month = merge_month(&[], None, 2024, 2);
        assert_eq!(month.len(), 29);
        assert!(month.iter().all(|d| d.source == WeatherSource::Historical && d.avg_f == 45.0));
    }

    #[test]
    fn invalid_month_is_empty() {
        assert!(merge_month(&[], None, 2024, 13).is_empty());
    }

    proptest! {
        #[test]
        fn always_one_entry_per_day(
            month in 1u32..=12,
            year in 2000i32..2100,
            start in 0u32..40,
            horizon in 0usize..40,
        ) {
            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap() + chrono::Duration::days(i64::from(start) - 10);
            let days: Vec<DailyWeather> = (0..horizon)
                .map(|i| DailyWeather::new(
                    first + chrono::Duration::days(i as i64),
                    50.0,
                    30.0,
                    70.0,
                    WeatherSource::Forecast,
                ))
                .collect();
            let merged = merge_month(&days, None, year, month);
            prop_assert_eq!(merged.len() as u32, days_in_month(year, month).unwrap());
            for (i, d) in merged.iter().enumerate() {
                prop_assert_eq!(d.date.day() as usize, i + 1);
                prop_assert!(matches!(d.source, WeatherSource::Forecast | WeatherSource::Historical));
            }
        }
    }
}
