use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::cost::CostRates;

pub const DEFAULT_ELECTRICITY_RATE: f64 = 0.15;
pub const DEFAULT_GAS_RATE: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Fuel {
    /// $/kWh
    Electricity,
    /// $/therm
    Gas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "region", rename_all = "snake_case")]
pub enum RateSource {
    Region(String),
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub rate: f64,
    pub source: RateSource,
}

/// Supplies utility prices for a region.
pub trait RateProvider: Send + Sync {
    fn rate(&self, fuel: Fuel, region: Option<&str>) -> RateQuote;

    fn cost_rates(&self, region: Option<&str>) -> CostRates {
        CostRates {
            electricity_per_kwh: self.rate(Fuel::Electricity, region).rate,
            gas_per_therm: self.rate(Fuel::Gas, region).rate,
        }
    }
}

/// Average US residential rates by state.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRateTable;

const ELECTRICITY: &[(&str, f64)] = &[
    ("Hawaii", 0.3825),
    ("California", 0.3011),
    ("Massachusetts", 0.2674),
    ("Alaska", 0.2491),
    ("Maine", 0.246),
    ("Rhode Island", 0.245),
    ("Connecticut", 0.243),
    ("New York", 0.2413),
    ("District of Columbia", 0.2154),
    ("Vermont", 0.215),
    ("New Hampshire", 0.2149),
    ("New Jersey", 0.2144),
    ("Michigan", 0.1786),
    ("Maryland", 0.1708),
    ("Pennsylvania", 0.1663),
    ("Delaware", 0.1655),
    ("West Virginia", 0.1555),
    ("Florida", 0.153),
    ("North Carolina", 0.152),
    ("South Carolina", 0.151),
    ("Arizona", 0.149),
    ("Wisconsin", 0.148),
    ("Texas", 0.146),
    ("Nevada", 0.145),
    ("Minnesota", 0.144),
    ("Tennessee", 0.143),
    ("Oregon", 0.142),
    ("Virginia", 0.141),
    ("Montana", 0.14),
    ("Georgia", 0.139),
    ("Indiana", 0.138),
    ("Ohio", 0.137),
    ("Missouri", 0.136),
    ("Alabama", 0.135),
    ("Illinois", 0.1334),
    ("Colorado", 0.133),
    ("Iowa", 0.132),
    ("Kansas", 0.131),
    ("Kentucky", 0.13),
    ("New Mexico", 0.129),
    ("South Dakota", 0.128),
    ("Wyoming", 0.127),
    ("Arkansas", 0.126),
    ("Mississippi", 0.125),
    ("Utah", 0.124),
    ("Nebraska", 0.123),
    ("Oklahoma", 0.122),
    ("Louisiana", 0.121),
    ("North Dakota", 0.12),
    ("Idaho", 0.119),
    ("Washington", 0.118),
];

const GAS: &[(&str, f64)] = &[
    ("Alabama", 2.264),
    ("Alaska", 7.0),
    ("Arizona", 1.757),
    ("Arkansas", 2.104),
    ("California", 4.372),
    ("Colorado", 1.4),
    ("Connecticut", 3.098),
    ("Delaware", 2.79),
    ("District of Columbia", 3.301),
    ("Florida", 2.577),
    ("Georgia", 2.934),
    ("Hawaii", 5.56),
    ("Idaho", 1.235),
    ("Illinois", 1.892),
    ("Indiana", 2.133),
    ("Iowa", 1.958),
    ("Kansas", 1.728),
    ("Kentucky", 2.383),
    ("Louisiana", 1.583),
    ("Maine", 3.717),
    ("Maryland", 2.876),
    ("Massachusetts", 2.725),
    ("Michigan", 2.075),
    ("Minnesota", 1.467),
    ("Mississippi", 2.017),
    ("Missouri", 2.23),
    ("Montana", 1.149),
    ("Nebraska", 1.807),
    ("Nevada", 1.313),
    ("New Hampshire", 3.417),
    ("New Jersey", 2.394),
    ("New Mexico", 1.168),
    ("New York", 2.597),
    ("North Carolina", 2.471),
    ("North Dakota", 1.332),
    ("Ohio", 1.969),
    ("Oklahoma", 1.516),
    ("Oregon", 1.67),
    ("Pennsylvania", 1.747),
    ("Rhode Island", 3.012),
    ("South Carolina", 2.645),
    ("South Dakota", 1.911),
    ("Tennessee", 2.181),
    ("Texas", 1.371),
    ("Utah", 1.149),
    ("Vermont", 3.544),
    ("Virginia", 2.423),
    ("Washington", 1.622),
    ("West Virginia", 1.68),
    ("Wisconsin", 1.554),
    ("Wyoming", 1.226),
];

impl StaticRateTable {
    fn lookup(table: &[(&'static str, f64)], region: &str) -> Option<(&'static str, f64)> {
        let region = region.trim();
        table.iter().copied().find(|(name, _)| name.eq_ignore_ascii_case(region))
    }
}

impl RateProvider for StaticRateTable {
    fn rate(&self, fuel: Fuel, region: Option<&str>) -> RateQuote {
        let (table, default) = match fuel {
            Fuel::Electricity => (ELECTRICITY, DEFAULT_ELECTRICITY_RATE),
            Fuel::Gas => (GAS, DEFAULT_GAS_RATE),
        };
        match region.and_then(|r| Self::lookup(table, r)) {
            Some((name, rate)) => RateQuote { rate, source: RateSource::Region(name.to_string()) },
            None => RateQuote { rate: default, source: RateSource::Default },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Fuel::Electricity, Some("California"), 0.3011)]
    #[case(Fuel::Electricity, Some("  new york "), 0.2413)]
    #[case(Fuel::Gas, Some("ALASKA"), 7.0)]
    #[case(Fuel::Gas, Some("Atlantis"), DEFAULT_GAS_RATE)]
    #[case(Fuel::Electricity, None, DEFAULT_ELECTRICITY_RATE)]
    fn state_lookup(#[case] fuel: Fuel, #[case] region: Option<&str>, #[case] expected: f64) {
        assert_eq!(StaticRateTable.rate(fuel, region).rate, expected);
    }

    #[test]
    fn source_names_the_canonical_region() {
        let quote = StaticRateTable.rate(Fuel::Gas, Some("rhode island"));
        assert_eq!(quote.source, RateSource::Region("Rhode Island".into()));
        assert_eq!(StaticRateTable.rate(Fuel::Gas, Some("")).source, RateSource::Default);
    }

    #[test]
    fn cost_rates_pairs_both_fuels() {
        let rates = StaticRateTable.cost_rates(Some("Texas"));
        assert_eq!(rates.electricity_per_kwh, 0.146);
        assert_eq!(rates.gas_per_therm, 1.371);
    }
}
