use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnergyUnit {
    Kwh,
    Therms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EstimateMethod {
    DayByDay,
    TypicalMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    Heating,
    Cooling,
}

/// Energy and cost for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub date: NaiveDate,
    pub avg_temp_f: f64,
    pub energy: f64,
    pub cost: f64,
    pub aux_energy_kwh: f64,
}

/// Post-hoc multipliers applied to a base estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    pub elevation: f64,
    pub setpoint: f64,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self { elevation: 1.0, setpoint: 1.0 }
    }
}

impl Adjustments {
    pub fn combined(&self) -> f64 {
        self.elevation * self.setpoint
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub daily: Vec<DailyCost>,
    /// Resistance heat billed in the totals.
    pub aux_energy_kwh: f64,
    /// Resistance heat needed but left out because aux heat is disabled.
    pub excluded_aux_energy_kwh: f64,
    pub unmet_hours: f64,
    pub avg_daily_temp_f: Option<f64>,
    pub degree_days: Option<f64>,
    pub rate: f64,
    pub adjustments: Adjustments,
}

/// Energy and cost for a month (or any span of days).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub cost: f64,
    pub energy: f64,
    pub unit: EnergyUnit,
    pub days: u32,
    pub method: EstimateMethod,
    pub mode: Mode,
    pub breakdown: CostBreakdown,
}

impl CostEstimate {
    pub fn zero(unit: EnergyUnit, days: u32, method: EstimateMethod, mode: Mode, rate: f64) -> Self {
        Self {
            cost: 0.0,
            energy: 0.0,
            unit,
            days,
            method,
            mode,
            breakdown: CostBreakdown { rate, ..Default::default() },
        }
    }

    /// Scales energy and cost by the combined multiplier and records it.
    pub fn with_adjustments(mut self, adjustments: Adjustments) -> Self {
        let factor = adjustments.combined();
        self.energy *= factor;
        self.cost *= factor;
        self.breakdown.adjustments = adjustments;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEstimate {
    pub month: u32,
    pub heating: Option<CostEstimate>,
    pub cooling: Option<CostEstimate>,
}

impl MonthlyEstimate {
    pub fn cost(&self) -> f64 {
        self.heating.as_ref().map_or(0.0, |e| e.cost) + self.cooling.as_ref().map_or(0.0, |e| e.cost)
    }
}

/// Twelve typical months rolled up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualEstimate {
    pub heating_cost: f64,
    pub cooling_cost: f64,
    pub total_cost: f64,
    pub heating_energy: f64,
    pub heating_unit: EnergyUnit,
    pub cooling_energy_kwh: f64,
    /// Months that contributed non-zero degree days.
    pub months_counted: u32,
    pub months: Vec<MonthlyEstimate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_scale_energy_and_cost() {
        let est = CostEstimate {
            cost: 10.0,
            energy: 100.0,
            ..CostEstimate::zero(EnergyUnit::Kwh, 30, EstimateMethod::TypicalMonth, Mode::Heating, 0.1)
        }
        .with_adjustments(Adjustments { elevation: 1.5, setpoint: 2.0 });
        assert_eq!(est.cost, 30.0);
        assert_eq!(est.energy, 300.0);
        assert_eq!(est.breakdown.adjustments.elevation, 1.5);
    }
}
