use serde::{Deserialize, Serialize};

use crate::domain::{
    Adjustments, AnnualEstimate, BuildingProfile, CostEstimate, EnergyUnit, EstimateMethod, HvacSystemConfig,
    Mode, MonthlyEstimate, SystemKind,
};
use crate::performance::cooling::MIN_SEER2;
use crate::performance::furnace::BTU_PER_THERM;

use super::{days_in_month, CostRates};

/// Floor under HSPF2 in the typical-month heating division.
pub const MIN_HSPF2: f64 = 0.1;
const REFERENCE_YEAR: i32 = 2023;

/// Monthly heating and cooling degree days, January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeDayTable {
    pub hdd: [f64; 12],
    pub cdd: [f64; 12],
}

impl DegreeDayTable {
    /// Generic temperate-climate table.
    pub fn typical() -> Self {
        Self {
            hdd: [1200.0, 1000.0, 600.0, 200.0, 50.0, 10.0, 0.0, 0.0, 20.0, 200.0, 500.0, 1100.0],
            cdd: [0.0, 0.0, 20.0, 60.0, 100.0, 250.0, 450.0, 400.0, 250.0, 60.0, 10.0, 0.0],
        }
    }

    /// Degree days for `month` (1-12); zero outside that range.
    pub fn degree_days(&self, mode: Mode, month: u32) -> f64 {
        let idx = match month {
            1..=12 => (month - 1) as usize,
            _ => return 0.0,
        };
        match mode {
            Mode::Heating => self.hdd[idx],
            Mode::Cooling => self.cdd[idx],
        }
    }
}

impl Default for DegreeDayTable {
    fn default() -> Self {
        Self::typical()
    }
}

pub fn heating_unit(system: &HvacSystemConfig) -> EnergyUnit {
    match system.kind {
        SystemKind::HeatPump => EnergyUnit::Kwh,
        SystemKind::GasFurnace => EnergyUnit::Therms,
    }
}

/// Estimate for one month from its degree-day total alone.
///
/// Has no failure mode: zero or negative degree days give a zero estimate.
pub fn typical_month(
    month: u32,
    degree_days: f64,
    mode: Mode,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    rates: &CostRates,
) -> CostEstimate {
    let days = days_in_month(REFERENCE_YEAR, month).unwrap_or(30);
    let (unit, rate) = match (mode, system.kind) {
        (Mode::Heating, SystemKind::GasFurnace) => (EnergyUnit::Therms, rates.gas_per_therm),
        _ => (EnergyUnit::Kwh, rates.electricity_per_kwh),
    };
    let mut estimate = CostEstimate::zero(unit, days, EstimateMethod::TypicalMonth, mode, rate);
    estimate.breakdown.degree_days = Some(degree_days.max(0.0));
    if degree_days.is_nan() || degree_days <= 0.0 {
        return estimate;
    }

    let degree_hours = degree_days * 24.0;
    let energy = match (mode, system.kind) {
        (Mode::Heating, SystemKind::HeatPump) => {
            degree_hours * building.heat_loss_factor / (system.hspf2.max(MIN_HSPF2) * 1000.0)
        }
        (Mode::Heating, SystemKind::GasFurnace) => {
            degree_hours * building.heat_loss_factor / (system.clamped_afue() * BTU_PER_THERM)
        }
        (Mode::Cooling, _) => degree_hours * building.btu_gain_per_deg_f() / (system.seer2.max(MIN_SEER2) * 1000.0),
    };
    estimate.energy = energy;
    estimate.cost = energy * rate;
    estimate
}

/// Sum of twelve typical months, with per-season adjustments applied to each.
pub fn annual(
    table: &DegreeDayTable,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    rates: &CostRates,
    heating_adjustments: Adjustments,
    cooling_adjustments: Adjustments,
) -> AnnualEstimate {
    let month_estimate = |month: u32, mode: Mode, adj: Adjustments| {
        let dd = table.degree_days(mode, month);
        (dd > 0.0).then(|| typical_month(month, dd, mode, building, system, rates).with_adjustments(adj))
    };

    let months: Vec<MonthlyEstimate> = (1..=12)
        .map(|month| MonthlyEstimate {
            month,
            heating: month_estimate(month, Mode::Heating, heating_adjustments),
            cooling: month_estimate(month, Mode::Cooling, cooling_adjustments),
        })
        .collect();

    let heating_cost: f64 = months.iter().filter_map(|m| m.heating.as_ref()).map(|e| e.cost).sum();
    let cooling_cost: f64 = months.iter().filter_map(|m| m.cooling.as_ref()).map(|e| e.cost).sum();
    let heating_energy = months.iter().filter_map(|m| m.heating.as_ref()).map(|e| e.energy).sum();
    let cooling_energy_kwh = months.iter().filter_map(|m| m.cooling.as_ref()).map(|e| e.energy).sum();
    let months_counted = months
        .iter()
        .filter(|m| m.heating.is_some() || m.cooling.is_some())
        .count() as u32;

    AnnualEstimate {
        heating_cost,
        cooling_cost,
        total_cost: heating_cost + cooling_cost,
        heating_energy,
        heating_unit: heating_unit(system),
        cooling_energy_kwh,
        months_counted,
        months,
    }
}
