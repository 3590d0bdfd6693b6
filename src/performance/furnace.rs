use crate::domain::{BuildingProfile, HvacSystemConfig, PerformancePoint};

pub const BTU_PER_THERM: f64 = 100_000.0;

pub(crate) fn evaluate(
    outdoor_temp_f: f64,
    building: &BuildingProfile,
    system: &HvacSystemConfig,
    indoor_setpoint_f: f64,
) -> PerformancePoint {
    let temp_diff = (indoor_setpoint_f - outdoor_temp_f).max(1.0);
    let building_heat_loss_btu = building.heat_loss_factor * temp_diff;
    let gas_input_btu = building_heat_loss_btu / system.clamped_afue();
    let capacity = system.capacity_btu();
    let runtime_percent = if capacity > 0.0 {
        (building_heat_loss_btu / capacity * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };

    PerformancePoint {
        electrical_kw: 0.0,
        runtime_percent,
        building_heat_loss_btu,
        delivered_capacity_btu: capacity,
        aux_kw: 0.0,
        defrost_multiplier: 1.0,
        therms_per_hour: gas_input_btu / BTU_PER_THERM,
    }
}
