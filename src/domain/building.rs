use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// BTU/hr per square foot at the 70°F design difference used for calculated estimates.
pub const CALCULATED_BTU_PER_SQFT: f64 = 22.67;
/// Reference indoor/outdoor difference behind [`CALCULATED_BTU_PER_SQFT`].
pub const DESIGN_TEMP_DIFF_F: f64 = 70.0;

/// Where a building's heat-loss factor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HeatLossSource {
    Manual,
    Calculated,
    Analyzer,
}

/// Output of a coast-down analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatLossResult {
    /// BTU/hr/°F
    pub heat_loss_factor: f64,
    /// `None` when the sample has no outdoor temperatures at all.
    pub balance_point_f: Option<f64>,
    pub avg_temp_diff_f: f64,
    pub heat_loss_total_at_70f: f64,
    pub period: CoastDownSummary,
}

/// The off-period the heat-loss factor was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoastDownSummary {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub readings: usize,
    pub duration_hours: f64,
    pub temp_drop_f: f64,
    pub net_trend_f: f64,
    /// Net change was within ±0.1°F and the synthetic drop was used.
    pub stable_substituted: bool,
    /// 1/hr
    pub thermal_decay_rate: f64,
}

/// Physical description of a home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingProfile {
    pub square_feet: f64,
    pub insulation_multiplier: f64,
    pub home_shape_multiplier: f64,
    pub ceiling_height_ft: f64,
    pub solar_exposure: f64,
    /// BTU/hr/°F
    pub heat_loss_factor: f64,
    pub heat_loss_source: HeatLossSource,
}

impl BuildingProfile {
    /// Builds a profile whose heat-loss factor is picked by priority:
    /// manual, then analyzer, then the square-footage estimate.
    pub fn resolve(
        square_feet: f64,
        insulation_multiplier: f64,
        home_shape_multiplier: f64,
        ceiling_height_ft: f64,
        solar_exposure: f64,
        manual_factor: Option<f64>,
        analyzer_factor: Option<f64>,
    ) -> Self {
        let mut profile = Self {
            square_feet,
            insulation_multiplier,
            home_shape_multiplier,
            ceiling_height_ft,
            solar_exposure,
            heat_loss_factor: 0.0,
            heat_loss_source: HeatLossSource::Calculated,
        };

        let usable = |v: Option<f64>| v.filter(|f| f.is_finite() && *f > 0.0);
        let (factor, source) = match (usable(manual_factor), usable(analyzer_factor)) {
            (Some(manual), _) => (manual, HeatLossSource::Manual),
            (None, Some(analyzed)) => (analyzed, HeatLossSource::Analyzer),
            (None, None) => (profile.calculated_heat_loss_factor(), HeatLossSource::Calculated),
        };
        profile.heat_loss_factor = factor;
        profile.heat_loss_source = source;
        profile
    }

    pub fn ceiling_multiplier(&self) -> f64 {
        1.0 + (self.ceiling_height_ft - 8.0) * 0.1
    }

    /// Design heat loss at a 70°F difference, BTU/hr.
    pub fn design_heat_loss_btu(&self) -> f64 {
        self.square_feet
            * CALCULATED_BTU_PER_SQFT
            * self.insulation_multiplier
            * self.home_shape_multiplier
            * self.ceiling_multiplier()
    }

    /// Square-footage estimate of the heat-loss factor, BTU/hr/°F.
    pub fn calculated_heat_loss_factor(&self) -> f64 {
        self.design_heat_loss_btu() / DESIGN_TEMP_DIFF_F
    }

    /// Heat gain per °F above the setpoint, BTU/hr/°F.
    pub fn btu_gain_per_deg_f(&self) -> f64 {
        (self.square_feet
            * 28.0
            * self.insulation_multiplier
            * self.home_shape_multiplier
            * self.ceiling_multiplier()
            * self.solar_exposure)
            / 20.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(manual: Option<f64>, analyzed: Option<f64>) -> BuildingProfile {
        BuildingProfile::resolve(2000.0, 1.0, 1.0, 8.0, 1.0, manual, analyzed)
    }

    #[test]
    fn manual_factor_wins() {
        let p = profile(Some(500.0), Some(80.0));
        assert_eq!(p.heat_loss_source, HeatLossSource::Manual);
        assert_eq!(p.heat_loss_factor, 500.0);
    }

    #[test]
    fn analyzer_factor_beats_calculated() {
        let p = profile(None, Some(80.0));
        assert_eq!(p.heat_loss_source, HeatLossSource::Analyzer);
        assert_eq!(p.heat_loss_factor, 80.0);
    }

    #[test]
    fn falls_back_to_square_footage() {
        let p = profile(Some(0.0), None);
        assert_eq!(p.heat_loss_source, HeatLossSource::Calculated);
        assert!((p.heat_loss_factor - 2000.0 * 22.67 / 70.0).abs() < 1e-9);
    }

    #[test]
    fn taller_ceilings_raise_loads() {
        let mut p = profile(None, None);
        p.ceiling_height_ft = 10.0;
        assert!((p.ceiling_multiplier() - 1.2).abs() < 1e-12);
        assert!((p.btu_gain_per_deg_f() - 2000.0 * 28.0 * 1.2 / 20.0).abs() < 1e-9);
    }
}
