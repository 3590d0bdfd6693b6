use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cost::{CostRates, ThermostatSchedule};
use crate::domain::{tons_for_kbtu, BuildingProfile, GeoLocation, HvacSystemConfig, SystemKind};
use crate::forecast::{Fuel, RateProvider};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub building: BuildingConfig,
    #[validate(nested)]
    pub system: SystemConfig,
    #[validate(nested)]
    pub schedule: ScheduleConfig,
    #[validate(nested)]
    pub rates: RatesConfig,
    #[validate(nested)]
    pub location: LocationConfig,
    #[validate(nested)]
    pub forecast: ForecastConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BuildingConfig {
    #[validate(range(min = 100.0, max = 100000.0))]
    pub square_feet: f64,
    #[validate(range(min = 0.1, max = 5.0))]
    pub insulation_multiplier: f64,
    #[validate(range(min = 0.1, max = 5.0))]
    pub home_shape_multiplier: f64,
    #[validate(range(min = 6.0, max = 30.0))]
    pub ceiling_height_ft: f64,
    #[validate(range(min = 0.1, max = 3.0))]
    pub solar_exposure: f64,
    /// BTU/hr/°F entered by hand; overrides everything else.
    #[validate(range(min = 0.0))]
    pub manual_heat_loss_factor: Option<f64>,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            square_feet: 1500.0,
            insulation_multiplier: 1.0,
            home_shape_multiplier: 1.0,
            ceiling_height_ft: 8.0,
            solar_exposure: 1.0,
            manual_heat_loss_factor: None,
        }
    }
}

impl BuildingConfig {
    pub fn profile(&self, analyzer_factor: Option<f64>) -> BuildingProfile {
        BuildingProfile::resolve(
            self.square_feet,
            self.insulation_multiplier,
            self.home_shape_multiplier,
            self.ceiling_height_ft,
            self.solar_exposure,
            self.manual_heat_loss_factor,
            analyzer_factor,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SystemConfig {
    pub kind: SystemKind,
    #[validate(range(min = 0.5, max = 20.0))]
    pub capacity_tons: f64,
    /// Nameplate size in kBTU (18, 24, ... 60); wins over `capacity_tons` when recognised.
    pub capacity_kbtu: Option<u32>,
    #[validate(range(min = 1.0, max = 40.0))]
    pub seer2: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    pub hspf2: f64,
    #[validate(range(min = 0.5, max = 1.0))]
    pub afue: f64,
    #[validate(range(min = 0.1, max = 20.0))]
    pub compressor_power_kw: f64,
    pub use_electric_aux_heat: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let d = HvacSystemConfig::default();
        Self {
            kind: d.kind,
            capacity_tons: d.capacity_tons,
            capacity_kbtu: None,
            seer2: d.seer2,
            hspf2: d.hspf2,
            afue: d.afue,
            compressor_power_kw: d.compressor_power_kw,
            use_electric_aux_heat: d.use_electric_aux_heat,
        }
    }
}

impl SystemConfig {
    pub fn hvac(&self) -> HvacSystemConfig {
        HvacSystemConfig {
            kind: self.kind,
            capacity_tons: self.capacity_kbtu.and_then(tons_for_kbtu).unwrap_or(self.capacity_tons),
            seer2: self.seer2,
            hspf2: self.hspf2,
            afue: self.afue,
            compressor_power_kw: self.compressor_power_kw,
            use_electric_aux_heat: self.use_electric_aux_heat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScheduleConfig {
    #[validate(range(min = 40.0, max = 90.0))]
    pub winter_day_f: f64,
    #[validate(range(min = 40.0, max = 90.0))]
    pub winter_night_f: f64,
    #[validate(range(min = 50.0, max = 100.0))]
    pub summer_day_f: f64,
    #[validate(range(min = 50.0, max = 100.0))]
    pub summer_night_f: f64,
    /// `HH:MM`
    pub day_start: String,
    /// `HH:MM`
    pub night_start: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            winter_day_f: 70.0,
            winter_night_f: 68.0,
            summer_day_f: 76.0,
            summer_night_f: 78.0,
            day_start: "06:00".into(),
            night_start: "22:00".into(),
        }
    }
}

impl ScheduleConfig {
    pub fn thermostat(&self) -> Result<ThermostatSchedule> {
        let parse = |label: &str, s: &str| {
            NaiveTime::parse_from_str(s.trim(), "%H:%M").with_context(|| format!("schedule.{label} {s:?} is not HH:MM"))
        };
        Ok(ThermostatSchedule {
            winter_day_f: self.winter_day_f,
            winter_night_f: self.winter_night_f,
            summer_day_f: self.summer_day_f,
            summer_night_f: self.summer_night_f,
            day_start: parse("day_start", &self.day_start)?,
            night_start: parse("night_start", &self.night_start)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RatesConfig {
    /// $/kWh; when unset the state table is consulted.
    #[validate(range(min = 0.0, max = 5.0))]
    pub electricity_per_kwh: Option<f64>,
    /// $/therm; when unset the state table is consulted.
    #[validate(range(min = 0.0, max = 50.0))]
    pub gas_per_therm: Option<f64>,
    pub state: Option<String>,
}

impl RatesConfig {
    pub fn cost_rates(&self, provider: &dyn RateProvider) -> CostRates {
        let state = self.state.as_deref();
        CostRates {
            electricity_per_kwh: self
                .electricity_per_kwh
                .unwrap_or_else(|| provider.rate(Fuel::Electricity, state).rate),
            gas_per_therm: self.gas_per_therm.unwrap_or_else(|| provider.rate(Fuel::Gas, state).rate),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LocationConfig {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub home_elevation_ft: f64,
    /// Overrides the elevation reported by the weather service.
    pub station_elevation_ft: Option<f64>,
}

impl LocationConfig {
    pub fn geo(&self) -> Option<GeoLocation> {
        Some(GeoLocation { latitude: self.latitude?, longitude: self.longitude? })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ForecastConfig {
    pub enabled: bool,
    pub forecast_url: String,
    pub archive_url: String,
    #[validate(range(min = 1, max = 16))]
    pub horizon_days: u32,
    #[validate(range(min = 1, max = 40))]
    pub archive_years: u32,
    #[validate(range(min = 1, max = 300))]
    pub http_timeout_seconds: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            forecast_url: "https://api.open-meteo.com/v1/forecast".into(),
            archive_url: "https://archive-api.open-meteo.com/v1/archive".into(),
            horizon_days: 15,
            archive_years: 10,
            http_timeout_seconds: 30,
        }
    }
}

impl ForecastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub csv_path: Option<PathBuf>,
    pub repository_path: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { csv_path: None, repository_path: PathBuf::from("data/heat_loss.json") }
    }
}

impl Config {
    /// Defaults, then `config/default.toml`, then `TCE__`-prefixed environment.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("TCE__").split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to read configuration")?;
        cfg.validate().context("configuration value out of range")?;
        cfg.schedule.thermostat()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeatLossSource;
    use crate::forecast::StaticRateTable;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_figment(Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)))
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = from_toml("").unwrap();
        assert_eq!(cfg.building.square_feet, 1500.0);
        assert_eq!(cfg.system.hvac(), HvacSystemConfig::default());
        assert_eq!(cfg.schedule.thermostat().unwrap(), ThermostatSchedule::default());
        assert!(cfg.location.geo().is_none());
    }

    #[test]
    fn toml_overrides_nested_fields() {
        let cfg = from_toml(
            r#"
            [building]
            square_feet = 2400.0
            manual_heat_loss_factor = 650.0

            [system]
            kind = "gas_furnace"
            afue = 0.8
            capacity_kbtu = 48

            [location]
            latitude = 39.7
            longitude = -104.9
            "#,
        )
        .unwrap();
        assert_eq!(cfg.building.square_feet, 2400.0);
        assert_eq!(cfg.system.kind, SystemKind::GasFurnace);
        assert_eq!(cfg.system.hvac().capacity_tons, 4.0);
        assert_eq!(cfg.building.insulation_multiplier, 1.0);
        let profile = cfg.building.profile(Some(300.0));
        assert_eq!(profile.heat_loss_source, HeatLossSource::Manual);
        assert_eq!(profile.heat_loss_factor, 650.0);
        assert_eq!(cfg.location.geo(), Some(GeoLocation { latitude: 39.7, longitude: -104.9 }));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(from_toml("[system]\nafue = 1.5").is_err());
        assert!(from_toml("[forecast]\nhorizon_days = 30").is_err());
        assert!(from_toml("[schedule]\nday_start = \"6am\"").is_err());
    }

    #[test]
    fn explicit_rates_win_over_state_table() {
        let rates = RatesConfig { electricity_per_kwh: Some(0.1), gas_per_therm: None, state: Some("Texas".into()) };
        let r = rates.cost_rates(&StaticRateTable);
        assert_eq!(r.electricity_per_kwh, 0.1);
        assert_eq!(r.gas_per_therm, 1.371);
    }
}
