//! Cost aggregation over daily weather, degree-day tables and hourly
//! forecasts.

pub mod adjustments;
pub mod day_by_day;
pub mod degree_day;
pub mod hourly;
pub mod schedule;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Adjustments, AnnualEstimate, BuildingProfile, CostEstimate, DailyWeather, HourlyWeather, HvacSystemConfig, Mode,
};
use crate::performance::{DefrostPenalty, PerformanceModel, StandardDefrost};

pub use adjustments::{adjustments, elevation_multiplier, setpoint_multiplier};
pub use degree_day::DegreeDayTable;
pub use hourly::HourlyDaySummary;
pub use schedule::ThermostatSchedule;

/// Energy prices in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRates {
    pub electricity_per_kwh: f64,
    pub gas_per_therm: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self { electricity_per_kwh: 0.15, gas_per_therm: 1.2 }
    }
}

/// Number of days in a calendar month, `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Binds a performance model to one building, system, schedule and rate set.
pub struct CostAggregator<'a, D = StandardDefrost> {
    model: &'a PerformanceModel<D>,
    building: &'a BuildingProfile,
    system: &'a HvacSystemConfig,
    schedule: &'a ThermostatSchedule,
    rates: CostRates,
}

impl<'a, D: DefrostPenalty> CostAggregator<'a, D> {
    pub fn new(
        model: &'a PerformanceModel<D>,
        building: &'a BuildingProfile,
        system: &'a HvacSystemConfig,
        schedule: &'a ThermostatSchedule,
        rates: CostRates,
    ) -> Self {
        Self { model, building, system, schedule, rates }
    }

    /// Simulates each day against the schedule's effective setpoint.
    pub fn day_by_day(&self, days: &[DailyWeather], mode: Mode) -> CostEstimate {
        let setpoint = self.schedule.effective_setpoint(mode);
        let estimate = match mode {
            Mode::Heating => {
                day_by_day::heating(self.model, days, setpoint, self.building, self.system, &self.rates)
            }
            Mode::Cooling => {
                day_by_day::cooling(self.model, days, setpoint, self.building, self.system, &self.rates)
            }
        };
        info!(
            %mode,
            days = estimate.days,
            energy = estimate.energy,
            unit = %estimate.unit,
            cost = estimate.cost,
            "day-by-day estimate"
        );
        estimate
    }

    /// Day-by-day estimate followed by post-hoc adjustments.
    pub fn day_by_day_adjusted(&self, days: &[DailyWeather], mode: Mode, adj: Adjustments) -> CostEstimate {
        self.day_by_day(days, mode).with_adjustments(adj)
    }

    pub fn typical_month(&self, month: u32, degree_days: f64, mode: Mode) -> CostEstimate {
        degree_day::typical_month(month, degree_days, mode, self.building, self.system, &self.rates)
    }

    pub fn annual(
        &self,
        table: &DegreeDayTable,
        heating_adjustments: Adjustments,
        cooling_adjustments: Adjustments,
    ) -> AnnualEstimate {
        let annual = degree_day::annual(
            table,
            self.building,
            self.system,
            &self.rates,
            heating_adjustments,
            cooling_adjustments,
        );
        info!(
            heating_cost = annual.heating_cost,
            cooling_cost = annual.cooling_cost,
            total_cost = annual.total_cost,
            months = annual.months_counted,
            "annual estimate"
        );
        annual
    }

    pub fn integrate_hourly(&self, hours: &[HourlyWeather], mode: Mode) -> Vec<HourlyDaySummary> {
        hourly::integrate(self.model, hours, mode, self.schedule, self.building, self.system, &self.rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HeatLossSource, WeatherSource};
    use rstest::rstest;

    #[rstest]
    #[case(2023, 1, Some(31))]
    #[case(2023, 2, Some(28))]
    #[case(2024, 2, Some(29))]
    #[case(2023, 4, Some(30))]
    #[case(2023, 12, Some(31))]
    #[case(2023, 13, None)]
    #[case(2023, 0, None)]
    fn month_lengths(#[case] year: i32, #[case] month: u32, #[case] expected: Option<u32>) {
        assert_eq!(days_in_month(year, month), expected);
    }

    #[test]
    fn aggregator_uses_effective_setpoint() {
        let model = PerformanceModel::new();
        let building = BuildingProfile {
            square_feet: 2000.0,
            insulation_multiplier: 1.0,
            home_shape_multiplier: 1.0,
            ceiling_height_ft: 8.0,
            solar_exposure: 1.0,
            heat_loss_factor: 500.0,
            heat_loss_source: HeatLossSource::Analyzer,
        };
        let system = HvacSystemConfig {
            kind: crate::domain::SystemKind::GasFurnace,
            afue: 0.8,
            ..Default::default()
        };
        let schedule = ThermostatSchedule {
            winter_day_f: 70.0,
            winter_night_f: 70.0,
            ..Default::default()
        };
        let agg = CostAggregator::new(&model, &building, &system, &schedule, CostRates::default());
        let day = DailyWeather::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            40.0,
            20.0,
            50.0,
            WeatherSource::Forecast,
        );
        let est = agg.day_by_day(std::slice::from_ref(&day), Mode::Heating);
        // 500 * 40°F * 24h / (100000 * 0.8)
        assert!((est.energy - 6.0).abs() < 1e-12);
        assert!((est.cost - 7.2).abs() < 1e-12);

        let adjusted = agg.day_by_day_adjusted(&[day], Mode::Heating, Adjustments { elevation: 1.1, setpoint: 1.0 });
        assert!((adjusted.energy - 6.6).abs() < 1e-9);
    }
}
