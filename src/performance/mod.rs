//! HVAC performance model.
//!
//! Pure functions of outdoor conditions, building and equipment. Nothing is
//! cached; callers evaluate per hour or per day as they need.

pub mod cooling;
pub mod defrost;
pub mod furnace;
pub mod heat_pump;

use crate::domain::{BuildingProfile, HvacSystemConfig, PerformancePoint, SystemKind};

pub use defrost::{DefrostPenalty, NoDefrost, StandardDefrost};
pub use heat_pump::{capacity_factor, BTU_PER_KWH, KW_PER_TON_OUTPUT};

/// Evaluates equipment against weather with a pluggable defrost penalty.
#[derive(Debug, Clone, Default)]
pub struct PerformanceModel<D = StandardDefrost> {
    defrost: D,
}

impl PerformanceModel<StandardDefrost> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DefrostPenalty> PerformanceModel<D> {
    pub fn with_defrost(defrost: D) -> Self {
        Self { defrost }
    }

    /// Heating performance for the configured system kind.
    pub fn evaluate(
        &self,
        outdoor_temp_f: f64,
        humidity_pct: f64,
        building: &BuildingProfile,
        system: &HvacSystemConfig,
        indoor_setpoint_f: f64,
    ) -> PerformancePoint {
        match system.kind {
            SystemKind::HeatPump => heat_pump::evaluate(
                &self.defrost,
                outdoor_temp_f,
                humidity_pct,
                building,
                system,
                indoor_setpoint_f,
            ),
            SystemKind::GasFurnace => furnace::evaluate(outdoor_temp_f, building, system, indoor_setpoint_f),
        }
    }

    /// Cooling performance. No defrost applies.
    pub fn evaluate_cooling(
        &self,
        outdoor_temp_f: f64,
        building: &BuildingProfile,
        system: &HvacSystemConfig,
        indoor_setpoint_f: f64,
    ) -> PerformancePoint {
        cooling::evaluate(outdoor_temp_f, building, system, indoor_setpoint_f)
    }
}
