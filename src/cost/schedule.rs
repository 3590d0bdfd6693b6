use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::Mode;

/// Day/night thermostat program for both seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermostatSchedule {
    pub winter_day_f: f64,
    pub winter_night_f: f64,
    pub summer_day_f: f64,
    pub summer_night_f: f64,
    pub day_start: NaiveTime,
    pub night_start: NaiveTime,
}

impl Default for ThermostatSchedule {
    fn default() -> Self {
        Self {
            winter_day_f: 70.0,
            winter_night_f: 68.0,
            summer_day_f: 76.0,
            summer_night_f: 78.0,
            day_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            night_start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

fn fractional_hour(t: NaiveTime) -> f64 {
    f64::from(t.hour()) + f64::from(t.minute()) / 60.0
}

impl ThermostatSchedule {
    /// Hours per day spent on the day setpoint and on the night setpoint.
    pub fn day_night_hours(&self) -> (f64, f64) {
        let day = fractional_hour(self.day_start);
        let night = fractional_hour(self.night_start);
        if day < night {
            let day_hours = night - day;
            (day_hours, 24.0 - day_hours)
        } else {
            let night_hours = day - night;
            (24.0 - night_hours, night_hours)
        }
    }

    /// Time-weighted setpoint over a day.
    pub fn effective_setpoint(&self, mode: Mode) -> f64 {
        let (day_hours, night_hours) = self.day_night_hours();
        let (day_f, night_f) = match mode {
            Mode::Heating => (self.winter_day_f, self.winter_night_f),
            Mode::Cooling => (self.summer_day_f, self.summer_night_f),
        };
        (day_f * day_hours + night_f * night_hours) / 24.0
    }

    /// Setpoint in force at a time of day.
    pub fn setpoint_at(&self, mode: Mode, time: NaiveTime) -> f64 {
        let (day_start, night_start) = (self.day_start, self.night_start);
        let is_day = if day_start < night_start {
            time >= day_start && time < night_start
        } else {
            time >= day_start || time < night_start
        };
        match (mode, is_day) {
            (Mode::Heating, true) => self.winter_day_f,
            (Mode::Heating, false) => self.winter_night_f,
            (Mode::Cooling, true) => self.summer_day_f,
            (Mode::Cooling, false) => self.summer_night_f,
        }
    }
}
