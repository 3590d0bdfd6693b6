use crate::domain::{BuildingProfile, HvacSystemConfig, PerformancePoint};

/// Floor under SEER2 in every cooling division.
pub const MIN_SEER2: f64 = 5.0;

pub(crate) fn evaluate(
    outdoor_temp_f: f64,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    indoor_setpoint_f: f64,
) -> PerformancePoint {
    let temp_diff = (outdoor_temp_f - indoor_setpoint_f).max(0.0);
    let heat_gain_btu = building.btu_gain_per_deg_f() * temp_diff;
    let electrical_kw = heat_gain_btu / (system.seer2.max(MIN_SEER2) * 1000.0);
    let capacity = system.capacity_btu();
    let runtime_percent = if capacity > 0.0 {
        (heat_gain_btu / capacity * 100.0).clamp(0.0, 100.0)
    } else if heat_gain_btu > 0.0 {
        100.0
    } else {
        0.0
    };

    PerformancePoint {
        electrical_kw,
        runtime_percent,
        building_heat_loss_btu: heat_gain_btu,
        delivered_capacity_btu: capacity,
        aux_kw: 0.0,
        defrost_multiplier: 1.0,
        therms_per_hour: 0.0,
    }
}
