use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::DailyWeather;

/// Humidity assumed for days reconstructed from normals.
pub const HISTORICAL_HUMIDITY_PCT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNormal {
    pub high_f: f64,
    pub low_f: f64,
    pub years: u32,
}

/// Per-day-of-month average high and low for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalNormals {
    pub month: u32,
    by_day: BTreeMap<u32, DayNormal>,
}

impl HistoricalNormals {
    /// Averages a multi-year archive. Days outside `month` and non-finite
    /// readings are skipped.
    pub fn from_archive(month: u32, archive: &[DailyWeather]) -> Self {
        let mut sums: BTreeMap<u32, (f64, f64, u32)> = BTreeMap::new();
        for day in archive {
            if day.date.month() != month || !day.high_f.is_finite() || !day.low_f.is_finite() {
                continue;
            }
            let entry = sums.entry(day.date.day()).or_insert((0.0, 0.0, 0));
            entry.0 += day.high_f;
            entry.1 += day.low_f;
            entry.2 += 1;
        }
        let by_day = sums
            .into_iter()
            .map(|(dom, (high, low, n))| {
                let n_f = f64::from(n);
                (dom, DayNormal { high_f: high / n_f, low_f: low / n_f, years: n })
            })
            .collect();
        Self { month, by_day }
    }

    pub fn get(&self, day_of_month: u32) -> Option<DayNormal> {
        self.by_day.get(&day_of_month).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_day.len()
    }
}
