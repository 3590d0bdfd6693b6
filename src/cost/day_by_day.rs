use tracing::debug;

use crate::domain::{
    BuildingProfile, CostEstimate, DailyCost, DailyWeather, EnergyUnit, EstimateMethod, HvacSystemConfig, Mode,
    SystemKind,
};
use crate::performance::cooling::MIN_SEER2;
use crate::performance::furnace::BTU_PER_THERM;
use crate::performance::{DefrostPenalty, PerformanceModel};

use super::CostRates;

const HOURS_PER_DAY: f64 = 24.0;

fn finish(
    mut estimate: CostEstimate,
    days: &[DailyWeather],
    daily: Vec<DailyCost>,
) -> CostEstimate {
    estimate.energy = daily.iter().map(|d| d.energy).sum();
    estimate.cost = daily.iter().map(|d| d.cost).sum();
    estimate.breakdown.avg_daily_temp_f =
        (!days.is_empty()).then(|| days.iter().map(|d| d.avg_f).sum::<f64>() / days.len() as f64);
    estimate.breakdown.daily = daily;
    estimate
}

/// Cooling from a daily series. Daily energy is capped at what the system
/// can remove in 24 hours; each capped day adds 24 unmet hours.
pub fn cooling<D: DefrostPenalty>(
    model: &PerformanceModel<D>,
    days: &[DailyWeather],
    setpoint_f: f64,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    rates: &CostRates,
) -> CostEstimate {
    let rate = rates.electricity_per_kwh;
    let mut estimate =
        CostEstimate::zero(EnergyUnit::Kwh, days.len() as u32, EstimateMethod::DayByDay, Mode::Cooling, rate);
    let seer_wh = system.seer2.max(MIN_SEER2) * 1000.0;
    let daily_capacity_btu = system.capacity_btu() * HOURS_PER_DAY;
    let max_daily_kwh = daily_capacity_btu / seer_wh;

    let mut daily = Vec::with_capacity(days.len());
    for day in days {
        let point = model.evaluate_cooling(day.avg_f, building, system, setpoint_f);
        let daily_gain_btu = point.building_heat_loss_btu * HOURS_PER_DAY;
        if daily_gain_btu > daily_capacity_btu {
            estimate.breakdown.unmet_hours += HOURS_PER_DAY;
        }
        let kwh = (daily_gain_btu / seer_wh).min(max_daily_kwh);
        daily.push(DailyCost {
            date: day.date,
            avg_temp_f: day.avg_f,
            energy: kwh,
            cost: kwh * rate,
            aux_energy_kwh: 0.0,
        });
    }
    finish(estimate, days, daily)
}

/// Heating from a daily series against a fixed effective setpoint. Days at or
/// above the setpoint cost nothing.
pub fn heating<D: DefrostPenalty>(
    model: &PerformanceModel<D>,
    days: &[DailyWeather],
    setpoint_f: f64,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    rates: &CostRates,
) -> CostEstimate {
    let (unit, rate) = match system.kind {
        SystemKind::HeatPump => (EnergyUnit::Kwh, rates.electricity_per_kwh),
        SystemKind::GasFurnace => (EnergyUnit::Therms, rates.gas_per_therm),
    };
    let mut estimate = CostEstimate::zero(unit, days.len() as u32, EstimateMethod::DayByDay, Mode::Heating, rate);

    let mut daily = Vec::with_capacity(days.len());
    for day in days {
        let temp_diff = setpoint_f - day.avg_f;
        let (energy, aux_kwh) = if temp_diff <= 0.0 {
            (0.0, 0.0)
        } else {
            match system.kind {
                SystemKind::GasFurnace => {
                    let load = building.heat_loss_factor * temp_diff;
                    (load * HOURS_PER_DAY / (BTU_PER_THERM * system.clamped_afue()), 0.0)
                }
                SystemKind::HeatPump => {
                    let point = model.evaluate(day.avg_f, day.humidity_pct, building, system, setpoint_f);
                    let compressor_kwh = point.electrical_kw * point.runtime_percent / 100.0 * HOURS_PER_DAY;
                    let aux_kwh = point.aux_kw * HOURS_PER_DAY;
                    if system.use_electric_aux_heat {
                        (compressor_kwh + aux_kwh, aux_kwh)
                    } else {
                        estimate.breakdown.excluded_aux_energy_kwh += aux_kwh;
                        (compressor_kwh, 0.0)
                    }
                }
            }
        };
        estimate.breakdown.aux_energy_kwh += aux_kwh;
        daily.push(DailyCost {
            date: day.date,
            avg_temp_f: day.avg_f,
            energy,
            cost: energy * rate,
            aux_energy_kwh: aux_kwh,
        });
    }
    debug!(
        days = days.len(),
        aux_kwh = estimate.breakdown.aux_energy_kwh,
        excluded_aux_kwh = estimate.breakdown.excluded_aux_energy_kwh,
        "day-by-day heating simulated"
    );
    finish(estimate, days, daily)
}
