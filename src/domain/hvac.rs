use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SystemKind {
    HeatPump,
    GasFurnace,
}

/// HVAC equipment ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HvacSystemConfig {
    pub kind: SystemKind,
    pub capacity_tons: f64,
    pub seer2: f64,
    pub hspf2: f64,
    pub afue: f64,
    pub compressor_power_kw: f64,
    /// Route heat-pump shortfall to resistance strips. When false the
    /// shortfall is reported but not billed.
    pub use_electric_aux_heat: bool,
}

impl HvacSystemConfig {
    /// Nominal cooling/heating capacity, BTU/hr.
    pub fn capacity_btu(&self) -> f64 {
        self.capacity_tons * 12_000.0
    }

    pub fn clamped_afue(&self) -> f64 {
        self.afue.clamp(0.6, 0.99)
    }
}

impl Default for HvacSystemConfig {
    fn default() -> Self {
        Self {
            kind: SystemKind::HeatPump,
            capacity_tons: 3.0,
            seer2: 15.0,
            hspf2: 9.0,
            afue: 0.95,
            compressor_power_kw: 3.5,
            use_electric_aux_heat: true,
        }
    }
}

/// Capacity in tons for a nominal kBTU size, as found on equipment labels.
pub fn tons_for_kbtu(kbtu: u32) -> Option<f64> {
    match kbtu {
        18 => Some(1.5),
        24 => Some(2.0),
        30 => Some(2.5),
        36 => Some(3.0),
        42 => Some(3.5),
        48 => Some(4.0),
        60 => Some(5.0),
        _ => None,
    }
}

/// One evaluation of the performance model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    pub electrical_kw: f64,
    /// 0..=100
    pub runtime_percent: f64,
    pub building_heat_loss_btu: f64,
    pub delivered_capacity_btu: f64,
    /// Resistance heat needed to cover the shortfall.
    pub aux_kw: f64,
    pub defrost_multiplier: f64,
    pub therms_per_hour: f64,
}
