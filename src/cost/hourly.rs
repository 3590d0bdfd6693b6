use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BuildingProfile, EnergyUnit, HourlyWeather, HvacSystemConfig, Mode, SystemKind};
use crate::performance::{DefrostPenalty, PerformanceModel};

use super::schedule::ThermostatSchedule;
use super::CostRates;

/// One calendar day of an hourly simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyDaySummary {
    pub date: NaiveDate,
    pub hours: u32,
    pub min_temp_f: f64,
    pub max_temp_f: f64,
    pub energy: f64,
    pub unit: EnergyUnit,
    /// Cost of compressor or burner energy only.
    pub cost: f64,
    /// Cost including auxiliary resistance heat.
    pub cost_with_aux: f64,
    pub aux_energy_kwh: f64,
}

struct HourCost {
    energy: f64,
    aux_kwh: f64,
    rate: f64,
}

fn hour_cost<D: DefrostPenalty>(
    model: &PerformanceModel<D>,
    hour: &HourlyWeather,
    mode: Mode,
    setpoint_f: f64,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    rates: &CostRates,
) -> HourCost {
    match mode {
        Mode::Cooling => {
            let p = model.evaluate_cooling(hour.temp_f, building, system, setpoint_f);
            HourCost { energy: p.electrical_kw, aux_kwh: 0.0, rate: rates.electricity_per_kwh }
        }
        Mode::Heating => {
            let p = model.evaluate(hour.temp_f, hour.humidity_pct, building, system, setpoint_f);
            match system.kind {
                SystemKind::HeatPump => HourCost {
                    energy: p.electrical_kw * p.runtime_percent / 100.0,
                    aux_kwh: p.aux_kw,
                    rate: rates.electricity_per_kwh,
                },
                SystemKind::GasFurnace => {
                    HourCost { energy: p.therms_per_hour, aux_kwh: 0.0, rate: rates.gas_per_therm }
                }
            }
        }
    }
}

/// Runs the performance model hour by hour against the schedule and rolls
/// the result up per date, in date order.
pub fn integrate<D: DefrostPenalty>(
    model: &PerformanceModel<D>,
    hours: &[HourlyWeather],
    mode: Mode,
    schedule: &ThermostatSchedule,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    rates: &CostRates,
) -> Vec<HourlyDaySummary> {
    let unit = match (mode, system.kind) {
        (Mode::Heating, SystemKind::GasFurnace) => EnergyUnit::Therms,
        _ => EnergyUnit::Kwh,
    };
    let mut days: BTreeMap<NaiveDate, HourlyDaySummary> = BTreeMap::new();

    for hour in hours {
        let setpoint = schedule.setpoint_at(mode, hour.time.time());
        let c = hour_cost(model, hour, mode, setpoint, building, system, rates);
        let day = days.entry(hour.time.date()).or_insert_with(|| HourlyDaySummary {
            date: hour.time.date(),
            hours: 0,
            min_temp_f: hour.temp_f,
            max_temp_f: hour.temp_f,
            energy: 0.0,
            unit,
            cost: 0.0,
            cost_with_aux: 0.0,
            aux_energy_kwh: 0.0,
        });
        day.hours += 1;
        day.min_temp_f = day.min_temp_f.min(hour.temp_f);
        day.max_temp_f = day.max_temp_f.max(hour.temp_f);
        day.energy += c.energy;
        day.aux_energy_kwh += c.aux_kwh;
        day.cost += c.energy * c.rate;
        day.cost_with_aux += (c.energy + c.aux_kwh) * c.rate;
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeatLossSource;
    use crate::performance::NoDefrost;

    fn building(factor: f64) -> BuildingProfile {
        BuildingProfile {
            square_feet: 2000.0,
            insulation_multiplier: 1.0,
            home_shape_multiplier: 1.0,
            ceiling_height_ft: 8.0,
            solar_exposure: 1.0,
            heat_loss_factor: factor,
            heat_loss_source: HeatLossSource::Calculated,
        }
    }

    fn hour(d: u32, h: u32, temp_f: f64) -> HourlyWeather {
        HourlyWeather {
            time: NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(h, 0, 0).unwrap(),
            temp_f,
            humidity_pct: 50.0,
        }
    }

    fn rates() -> CostRates {
        CostRates { electricity_per_kwh: 0.1, gas_per_therm: 1.0 }
    }

    #[test]
    fn groups_hours_by_date_in_order() {
        let model = PerformanceModel::with_defrost(NoDefrost);
        let hours = [hour(2, 0, 30.0), hour(1, 12, 40.0), hour(1, 13, 35.0), hour(2, 1, 25.0)];
        let days = integrate(
            &model,
            &hours,
            Mode::Heating,
            &ThermostatSchedule::default(),
            &building(500.0),
            &HvacSystemConfig::default(),
            &rates(),
        );
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(days[0].hours, 2);
        assert_eq!((days[0].min_temp_f, days[0].max_temp_f), (35.0, 40.0));
        assert_eq!((days[1].min_temp_f, days[1].max_temp_f), (25.0, 30.0));
    }

    #[test]
    fn night_hours_use_night_setpoint() {
        let model = PerformanceModel::with_defrost(NoDefrost);
        let sys = HvacSystemConfig { kind: SystemKind::GasFurnace, afue: 0.8, ..Default::default() };
        let b = building(1000.0);
        let schedule = ThermostatSchedule::default();
        // 03:00 runs at 68°F, 12:00 at 70°F
        let night = integrate(&model, &[hour(1, 3, 28.0)], Mode::Heating, &schedule, &b, &sys, &rates());
        let day = integrate(&model, &[hour(1, 12, 28.0)], Mode::Heating, &schedule, &b, &sys, &rates());
        assert!((night[0].energy - 40_000.0 / 80_000.0).abs() < 1e-12);
        assert!((day[0].energy - 42_000.0 / 80_000.0).abs() < 1e-12);
        assert_eq!(night[0].unit, EnergyUnit::Therms);
    }

    #[test]
    fn aux_heat_only_in_cost_with_aux() {
        let model = PerformanceModel::with_defrost(NoDefrost);
        let days = integrate(
            &model,
            &[hour(1, 12, -5.0)],
            Mode::Heating,
            &ThermostatSchedule::default(),
            &building(1000.0),
            &HvacSystemConfig::default(),
            &rates(),
        );
        let d = &days[0];
        assert!(d.aux_energy_kwh > 0.0);
        assert!((d.cost_with_aux - d.cost - d.aux_energy_kwh * 0.1).abs() < 1e-9);
    }

    #[test]
    fn empty_input_yields_no_days() {
        let model = PerformanceModel::new();
        let days = integrate(
            &model,
            &[],
            Mode::Cooling,
            &ThermostatSchedule::default(),
            &building(500.0),
            &HvacSystemConfig::default(),
            &rates(),
        );
        assert!(days.is_empty());
    }
}
