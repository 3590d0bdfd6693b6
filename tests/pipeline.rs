//! End-to-end: thermostat export text to heat-loss factor to cost estimates.

use thermal_cost_engine::analyzer::analyze;
use thermal_cost_engine::cost::{adjustments, CostAggregator, CostRates, DegreeDayTable, ThermostatSchedule};
use thermal_cost_engine::domain::{
    Adjustments, BuildingProfile, DailyWeather, EnergyUnit, HeatLossSource, HvacSystemConfig, Mode, SystemKind,
    WeatherSource,
};
use thermal_cost_engine::forecast::merge_month;
use thermal_cost_engine::normalizer::normalize_csv_text;
use thermal_cost_engine::performance::PerformanceModel;
use thermal_cost_engine::repo::{HeatLossRepository, JsonFileRepository};
use thermal_cost_engine::EngineError;

const EXPORT: &str = "\
# Thermostat runtime report
# Serial 000000000000

Date,Time,Heat Stage 1 (sec),Aux Heat 1 (sec),Outdoor Temp (F),Thermostat Temperature (F)
2024-01-10,00:00:00,300,0,31.0,70.0
2024-01-10,01:00:00,0,0,30.0,70.5
2024-01-10,02:00:00,0,0,30.0,70.25
2024-01-10,03:00:00,0,0,30.0,70.0
2024-01-10,04:00:00,0,0,30.0,70.0
2024-01-10,05:00:00,0,0,30.0,69.75
2024-01-10,06:00:00,0,0,30.0,69.5
2024-01-10,07:00:00,300,120,25.0,69.0
2024-01-10,08:00:00,300,0,33.0,70.0
";

fn building(factor: Option<f64>) -> BuildingProfile {
    BuildingProfile::resolve(2000.0, 1.0, 1.0, 8.0, 1.0, None, factor)
}

#[test]
fn export_yields_heat_loss_factor_from_night_suffix() {
    let telemetry = normalize_csv_text(EXPORT).unwrap();
    assert_eq!(telemetry.readings.len(), 9);
    assert!(telemetry.warnings.is_empty());

    let result = analyze(&telemetry.readings, 2000.0).unwrap();
    // 01:00-06:00 is off; the 02:00-06:00 suffix is a night start at >= 80% of 5 h.
    assert_eq!(result.period.start_time, "02:00:00");
    assert_eq!(result.period.end_time, "06:00:00");
    assert_eq!(result.period.readings, 5);
    assert_eq!(result.period.duration_hours, 4.0);
    assert_eq!(result.period.temp_drop_f, 0.75);
    assert!((result.avg_temp_diff_f - 39.9).abs() < 1e-9);
    assert!((result.heat_loss_factor - 3000.0 / 39.9).abs() < 1e-9);
    assert!((result.heat_loss_total_at_70f - result.heat_loss_factor * 70.0).abs() < 1e-9);
    assert_eq!(result.balance_point_f, Some(25.0));
}

#[test]
fn short_coast_down_reports_longest_period() {
    let text = "\
Date,Time,Heat Stage 1 (sec),Outdoor Temp (F),Thermostat Temperature (F)
2024-01-10,01:00:00,0,30.0,70.5
2024-01-10,02:00:00,0,30.0,70.25
2024-01-10,03:00:00,0,30.0,70.0
2024-01-10,04:00:00,120,30.0,70.0
";
    let telemetry = normalize_csv_text(text).unwrap();
    let err = analyze(&telemetry.readings, 2000.0).unwrap_err();
    match err {
        EngineError::InsufficientData { off_periods, longest_readings, longest_duration_hours, .. } => {
            assert_eq!(off_periods, 1);
            assert_eq!(longest_readings, 3);
            assert_eq!(longest_duration_hours, 2.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn analyzed_factor_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heat_loss.json");
    let telemetry = normalize_csv_text(EXPORT).unwrap();
    let result = analyze(&telemetry.readings, 2000.0).unwrap();

    JsonFileRepository::new(&path).save(&result).await.unwrap();
    let stored = JsonFileRepository::new(&path).load().await.unwrap().unwrap();

    assert_eq!(stored.result.period.start_time, "02:00:00");
    assert_eq!(stored.result.period.readings, result.period.readings);
    let profile = building(Some(stored.result.heat_loss_factor));
    assert_eq!(profile.heat_loss_source, HeatLossSource::Analyzer);
    assert!((profile.heat_loss_factor - result.heat_loss_factor).abs() < 1e-9);
}

#[test]
fn annual_estimate_from_analyzed_building() {
    let profile = building(Some(80.0));
    let system = HvacSystemConfig { hspf2: 10.0, seer2: 16.0, ..Default::default() };
    let schedule = ThermostatSchedule::default();
    let model = PerformanceModel::new();
    let agg = CostAggregator::new(&model, &profile, &system, &schedule, CostRates::default());

    let annual = agg.annual(&DegreeDayTable::typical(), Adjustments::default(), Adjustments::default());
    assert_eq!(annual.months_counted, 12);
    assert_eq!(annual.heating_unit, EnergyUnit::Kwh);
    assert!((annual.total_cost - annual.heating_cost - annual.cooling_cost).abs() < 1e-9);
    let january = annual.months[0].heating.as_ref().unwrap();
    // 1200 HDD * 24 h * 80 BTU/hr/°F / (10 * 1000)
    assert!((january.energy - 230.4).abs() < 1e-9);

    let elevated = agg.annual(
        &DegreeDayTable::typical(),
        adjustments(Mode::Heating, 5000.0, 70.0),
        Adjustments::default(),
    );
    assert!((elevated.heating_cost - annual.heating_cost * 1.025).abs() < 1e-6);
}

#[test]
fn blended_month_feeds_day_by_day_estimate() {
    let forecast: Vec<DailyWeather> = (1..=10)
        .map(|d| {
            DailyWeather::new(
                chrono::NaiveDate::from_ymd_opt(2025, 1, d).unwrap(),
                40.0,
                20.0,
                60.0,
                WeatherSource::Forecast,
            )
        })
        .collect();
    let month = merge_month(&forecast, None, 2025, 1);
    assert_eq!(month.len(), 31);

    let profile = building(Some(400.0));
    let system = HvacSystemConfig { kind: SystemKind::GasFurnace, afue: 0.8, ..Default::default() };
    let schedule = ThermostatSchedule { winter_night_f: 70.0, ..Default::default() };
    let model = PerformanceModel::new();
    let agg = CostAggregator::new(&model, &profile, &system, &schedule, CostRates::default());

    let heating = agg.day_by_day(&month, Mode::Heating);
    assert_eq!(heating.unit, EnergyUnit::Therms);
    assert_eq!(heating.days, 31);
    // every day averages 30°F against a flat 70°F setpoint
    let per_day = 400.0 * 40.0 * 24.0 / (100_000.0 * 0.8);
    assert!((heating.energy - per_day * 31.0).abs() < 1e-9);

    let cooling = agg.day_by_day(&month, Mode::Cooling);
    assert_eq!(cooling.cost, 0.0);
}
