use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use thermal_cost_engine::{analyzer, config, cost, domain, forecast, normalizer, performance, repo, telemetry};
use tracing::{info, warn};

use config::Config;
use cost::{adjustments, CostAggregator, DegreeDayTable};
use domain::{AnnualEstimate, BuildingProfile, CostEstimate, DailyWeather, HeatLossResult, Mode};
use forecast::StaticRateTable;
use repo::{HeatLossRepository, JsonFileRepository};
use telemetry::init_tracing;

#[derive(Debug, Serialize)]
struct Report {
    analysis: Option<HeatLossResult>,
    analysis_error: Option<String>,
    normalization_warnings: usize,
    building: BuildingProfile,
    annual: AnnualEstimate,
    month: Option<MonthReport>,
}

#[derive(Debug, Serialize)]
struct MonthReport {
    year: i32,
    month: u32,
    heating: CostEstimate,
    cooling: CostEstimate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let repository = JsonFileRepository::new(&cfg.analysis.repository_path);

    let csv_path = std::env::args_os().nth(1).map(PathBuf::from).or_else(|| cfg.analysis.csv_path.clone());
    let mut analysis = None;
    let mut analysis_error = None;
    let mut normalization_warnings = 0;

    if let Some(path) = csv_path {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read thermostat export {}", path.display()))?;
        let telemetry = normalizer::normalize_csv_text(&text)?;
        normalization_warnings = telemetry.warnings.len();
        info!(readings = telemetry.readings.len(), path = %path.display(), "telemetry normalized");

        match analyzer::analyze(&telemetry.readings, cfg.building.square_feet) {
            Ok(result) => {
                repository.save(&result).await?;
                analysis = Some(result);
            }
            Err(e) => {
                warn!(error = %e, "coast-down analysis rejected the export");
                analysis_error = Some(e.to_string());
            }
        }
    }

    let analyzer_factor = match &analysis {
        Some(result) => Some(result.heat_loss_factor),
        None => repository.load().await?.map(|stored| stored.result.heat_loss_factor),
    };

    let building = cfg.building.profile(analyzer_factor);
    let system = cfg.system.hvac();
    let schedule = cfg.schedule.thermostat()?;
    let rates = cfg.rates.cost_rates(&StaticRateTable);
    let model = performance::PerformanceModel::new();
    let aggregator = CostAggregator::new(&model, &building, &system, &schedule, rates);
    info!(
        factor = building.heat_loss_factor,
        source = %building.heat_loss_source,
        "building profile resolved"
    );

    let elevation_ft = cfg.location.home_elevation_ft;
    let annual = aggregator.annual(
        &DegreeDayTable::typical(),
        adjustments(Mode::Heating, elevation_ft, schedule.effective_setpoint(Mode::Heating)),
        adjustments(Mode::Cooling, elevation_ft, schedule.effective_setpoint(Mode::Cooling)),
    );

    let today = Local::now().date_naive();
    let (year, month) = (today.year(), today.month());
    let month = match monthly_weather(&cfg, year, month).await? {
        Some(days) => {
            let elevation = cost::elevation_multiplier(elevation_ft);
            let adj = domain::Adjustments { elevation, setpoint: 1.0 };
            Some(MonthReport {
                year,
                month,
                heating: aggregator.day_by_day_adjusted(&days, Mode::Heating, adj),
                cooling: aggregator.day_by_day_adjusted(&days, Mode::Cooling, adj),
            })
        }
        None => None,
    };

    let report = Report {
        analysis,
        analysis_error,
        normalization_warnings,
        building,
        annual,
        month,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Forecast-blended weather for the current month, when a location is
/// configured and forecasting is on. Ctrl+C cancels the fetch.
#[cfg(feature = "open-meteo")]
async fn monthly_weather(cfg: &Config, year: i32, month: u32) -> Result<Option<Vec<DailyWeather>>> {
    let Some(location) = cfg.location.geo().filter(|_| cfg.forecast.enabled) else {
        return Ok(None);
    };

    let cancel = tokio_util::sync::CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let client = forecast::OpenMeteoClient::new(
        cfg.forecast.forecast_url.clone(),
        cfg.forecast.archive_url.clone(),
        cfg.forecast.timeout(),
    )?;
    let service = forecast::MonthlyWeatherService::new(client, location)
        .with_horizon(cfg.forecast.horizon_days, cfg.forecast.archive_years);
    match service.month(year, month, &cancel).await {
        Ok(days) => Ok(Some(days)),
        Err(e) if e.is_cancelled() => {
            warn!("weather fetch cancelled");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(feature = "open-meteo"))]
async fn monthly_weather(cfg: &Config, _year: i32, _month: u32) -> Result<Option<Vec<DailyWeather>>> {
    if cfg.forecast.enabled {
        warn!("forecasting enabled but built without the open-meteo feature");
    }
    Ok(None)
}
