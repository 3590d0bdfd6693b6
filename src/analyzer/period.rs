use itertools::Itertools;

use crate::domain::CanonicalReading;

pub const MIN_READINGS: usize = 3;
pub const MIN_DURATION_HOURS: f64 = 3.0;
/// A night candidate may replace a longer one if it reaches this share of it.
pub const NIGHT_PREFERENCE_RATIO: f64 = 0.8;

/// A run of consecutive system-off readings on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffPeriod<'a> {
    pub readings: &'a [CanonicalReading],
    pub duration_hours: f64,
}

impl<'a> OffPeriod<'a> {
    pub fn first(&self) -> &'a CanonicalReading {
        &self.readings[0]
    }

    pub fn last(&self) -> &'a CanonicalReading {
        &self.readings[self.readings.len() - 1]
    }

    pub fn start_hour(&self) -> f64 {
        f64::from(self.first().minutes_of_day().unwrap_or(0)) / 60.0
    }

    /// Starts in `[20:00, 24:00)` or `[00:00, 08:00]`.
    pub fn is_nighttime(&self) -> bool {
        let hour = self.start_hour();
        hour >= 20.0 || hour <= 8.0
    }

    pub fn qualifies(&self) -> bool {
        self.readings.len() >= MIN_READINGS && self.duration_hours >= MIN_DURATION_HOURS
    }
}

/// Wall-clock hours between two times of day, taking the shorter way around midnight.
pub fn hours_between(start: &CanonicalReading, end: &CanonicalReading) -> f64 {
    let a = i64::from(start.minutes_of_day().unwrap_or(0));
    let b = i64::from(end.minutes_of_day().unwrap_or(0));
    let diff = (b - a).abs();
    diff.min(1440 - diff) as f64 / 60.0
}

/// Candidate periods, in order: one per system-off reading, extended until the
/// system starts or the calendar date changes. Later candidates of the same run
/// are suffixes of earlier ones and compete with them in [`select`].
pub fn off_periods(readings: &[CanonicalReading]) -> Vec<OffPeriod<'_>> {
    let mut periods = Vec::new();
    for (i, start) in readings.iter().enumerate() {
        if !start.is_system_off() {
            continue;
        }
        let run = readings[i + 1..]
            .iter()
            .take_while(|next| next.is_system_off() && next.date == start.date)
            .count();
        let slice = &readings[i..=i + run];
        periods.push(OffPeriod {
            readings: slice,
            duration_hours: hours_between(&slice[0], &slice[slice.len() - 1]),
        });
    }
    periods
}

/// Number of distinct off runs behind a candidate list. Suffixes of one run
/// share its last reading.
pub fn run_count(periods: &[OffPeriod<'_>]) -> usize {
    periods
        .iter()
        .dedup_by(|a, b| std::ptr::eq(a.last(), b.last()))
        .count()
}

/// Picks the coast-down period: longest qualifying, with a night start allowed
/// to displace a longer candidate when it is at least 80% as long.
pub fn select<'a>(periods: &[OffPeriod<'a>]) -> Option<OffPeriod<'a>> {
    let mut best: Option<OffPeriod<'a>> = None;
    let mut best_hours = 0.0;
    for period in periods.iter().filter(|p| p.qualifies()) {
        let hours = period.duration_hours;
        if hours > best_hours || (period.is_nighttime() && hours >= best_hours * NIGHT_PREFERENCE_RATIO) {
            best = Some(*period);
            best_hours = hours;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(date: &str, time: &str, stage: Option<u32>) -> CanonicalReading {
        CanonicalReading {
            date: date.to_string(),
            time: time.to_string(),
            outdoor_temp_f: Some(30.0),
            indoor_temp_f: Some(68.0),
            heat_stage1_sec: stage,
            aux_heat1_sec: Some(0),
        }
    }

    #[test]
    fn wraps_around_midnight() {
        let a = reading("d", "23:00:00", Some(0));
        let b = reading("d", "01:00:00", Some(0));
        assert_eq!(hours_between(&a, &b), 2.0);
    }

    #[test]
    fn periods_stop_at_date_change_and_running_system() {
        let readings = vec![
            reading("2024-01-01", "22:00:00", Some(0)),
            reading("2024-01-01", "23:00:00", Some(0)),
            reading("2024-01-02", "00:00:00", Some(0)),
            reading("2024-01-02", "01:00:00", Some(300)),
            reading("2024-01-02", "02:00:00", None),
        ];
        let periods = off_periods(&readings);
        let shape: Vec<_> = periods
            .iter()
            .map(|p| (p.first().time.as_str(), p.readings.len(), p.duration_hours))
            .collect();
        assert_eq!(
            shape,
            vec![("22:00:00", 2, 1.0), ("23:00:00", 1, 0.0), ("00:00:00", 1, 0.0)]
        );
        assert_eq!(run_count(&periods), 2);
    }

    #[test]
    fn later_night_suffix_displaces_full_run() {
        let readings: Vec<_> = ["01:00:00", "02:00:00", "03:00:00", "04:00:00", "05:00:00", "06:00:00"]
            .iter()
            .map(|t| reading("2024-01-10", t, Some(0)))
            .collect();
        let periods = off_periods(&readings);
        assert_eq!(periods.len(), 6);
        assert_eq!(run_count(&periods), 1);
        // 5 h from 01:00, then 4 h from 02:00 (>= 0.8 * 5); 3 h from 03:00 falls short of 0.8 * 4.
        let chosen = select(&periods).unwrap();
        assert_eq!(chosen.first().time, "02:00:00");
        assert_eq!(chosen.duration_hours, 4.0);
    }

    #[test]
    fn day_suffix_never_displaces_its_run() {
        let readings: Vec<_> = ["10:00:00", "11:00:00", "12:00:00", "13:00:00", "14:00:00"]
            .iter()
            .map(|t| reading("2024-01-10", t, Some(0)))
            .collect();
        let chosen = select(&off_periods(&readings)).unwrap();
        assert_eq!(chosen.first().time, "10:00:00");
        assert_eq!(chosen.readings.len(), 5);
    }

    #[test]
    fn night_candidate_displaces_slightly_longer_day_candidate() {
        let day: Vec<_> = ["09:00:00", "11:00:00", "14:00:00"]
            .iter()
            .map(|t| reading("2024-01-01", t, Some(0)))
            .collect();
        let night: Vec<_> = ["21:00:00", "22:30:00", "23:30:00"]
            .iter()
            .map(|t| reading("2024-01-02", t, Some(0)))
            .collect();
        let periods = [
            OffPeriod { readings: &day, duration_hours: 5.0 },
            OffPeriod { readings: &night, duration_hours: 4.0 },
        ];
        let chosen = select(&periods).unwrap();
        assert_eq!(chosen.first().date, "2024-01-02");
    }

    #[test]
    fn day_candidate_needs_to_be_strictly_longer() {
        let night: Vec<_> = ["02:00:00", "03:00:00", "06:00:00"]
            .iter()
            .map(|t| reading("2024-01-01", t, Some(0)))
            .collect();
        let day: Vec<_> = ["12:00:00", "13:00:00", "16:00:00"]
            .iter()
            .map(|t| reading("2024-01-02", t, Some(0)))
            .collect();
        let periods = [
            OffPeriod { readings: &night, duration_hours: 4.0 },
            OffPeriod { readings: &day, duration_hours: 4.0 },
        ];
        assert_eq!(select(&periods).unwrap().first().date, "2024-01-01");
    }
}
