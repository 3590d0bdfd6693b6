//! Telemetry normalizer.
//!
//! Maps brand-specific thermostat exports onto [`CanonicalReading`]s:
//! headers are resolved through the synonym table in [`headers`], combined
//! timestamps are split, Celsius exports are converted to Fahrenheit and
//! runtime columns are rescaled to whole seconds. Nothing here fails on bad
//! cells; ambiguities are resolved with a default and reported as
//! [`NormalizationWarning`]s.

pub mod csv_input;
pub mod headers;
pub mod units;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::domain::{
    CanonicalReading, DetectedUnits, NormalizedTelemetry, RawRecord, RuntimeUnit, TemperatureUnit,
};
use crate::error::NormalizationWarning;

pub use csv_input::{parse_csv_text, CsvTable};
pub use headers::{CanonicalField, HeaderMap};

const MIDNIGHT: &str = "00:00:00";

fn cell<'r>(row: &'r RawRecord, map: &HeaderMap, field: CanonicalField) -> Option<&'r str> {
    map.get(field)
        .and_then(|h| row.get(h))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn runtime_unit(rows: &[RawRecord], map: &HeaderMap, field: CanonicalField) -> RuntimeUnit {
    match map.get(field) {
        None => RuntimeUnit::Seconds,
        Some(header) => units::runtime_unit_from_header(header).unwrap_or_else(|| {
            units::runtime_unit_from_values(rows.iter().filter_map(|r| cell(r, map, field)))
        }),
    }
}

fn runtime_seconds(
    raw: Option<&str>,
    unit: RuntimeUnit,
    row: usize,
    field: CanonicalField,
    warnings: &mut Vec<NormalizationWarning>,
) -> Option<u32> {
    let value = unit.to_seconds(raw.and_then(units::parse_number)?).round();
    if value < 0.0 {
        warnings.push(NormalizationWarning::NegativeRuntime {
            row,
            field: field.into(),
            value,
        });
        return None;
    }
    Some(value as u32)
}

/// Normalizes parsed CSV rows into canonical readings.
///
/// Rows that end up without a date or a time are dropped.
pub fn normalize(headers: &[String], rows: &[RawRecord]) -> NormalizedTelemetry {
    let map = HeaderMap::build(headers);
    debug!(?map, "resolved telemetry headers");

    let mut warnings = Vec::new();
    let has_timestamp = map.get(CanonicalField::Timestamp).is_some();
    for field in map.missing() {
        let relevant = match field {
            CanonicalField::Timestamp => false,
            CanonicalField::Date | CanonicalField::Time => !has_timestamp,
            _ => true,
        };
        if relevant {
            warnings.push(NormalizationWarning::MissingColumn { field: field.into() });
        }
    }

    let outdoor_header = map.get(CanonicalField::OutdoorTemp).unwrap_or_default();
    let indoor_header = map.get(CanonicalField::IndoorTemp).unwrap_or_default();
    let celsius = units::header_says_celsius(outdoor_header)
        || units::header_says_celsius(indoor_header)
        || units::looks_like_celsius(rows.iter().map(|r| {
            (
                cell(r, &map, CanonicalField::OutdoorTemp),
                cell(r, &map, CanonicalField::IndoorTemp),
            )
        }));

    let detected = DetectedUnits {
        temperature: if celsius { TemperatureUnit::Celsius } else { TemperatureUnit::Fahrenheit },
        heat_stage1: runtime_unit(rows, &map, CanonicalField::HeatStage1),
        aux_heat1: runtime_unit(rows, &map, CanonicalField::AuxHeat1),
    };

    let to_fahrenheit = |raw: Option<&str>| {
        raw.and_then(units::parse_number)
            .map(|v| if celsius { units::celsius_to_fahrenheit(v) } else { v })
    };

    let mut readings = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for (idx, row) in rows.iter().enumerate() {
        let mut date = cell(row, &map, CanonicalField::Date).map(str::to_string);
        // Discrete time cells are kept as exported; only timestamp fragments are normalized.
        let mut time = cell(row, &map, CanonicalField::Time).map(str::to_string);

        if date.is_none() || time.is_none() {
            if let Some(ts) = cell(row, &map, CanonicalField::Timestamp) {
                let (d, t) = units::split_timestamp(ts);
                date = date.or(Some(d).filter(|d| !d.is_empty()));
                if time.is_none() && !t.is_empty() {
                    time = Some(units::normalize_time(&t).unwrap_or_else(|| {
                        warnings.push(NormalizationWarning::UnparsableTime { row: idx, value: t });
                        MIDNIGHT.to_string()
                    }));
                }
            }
        }

        let (Some(date), Some(time)) = (date, time) else {
            dropped += 1;
            continue;
        };

        readings.push(CanonicalReading {
            date,
            time,
            outdoor_temp_f: to_fahrenheit(cell(row, &map, CanonicalField::OutdoorTemp)),
            indoor_temp_f: to_fahrenheit(cell(row, &map, CanonicalField::IndoorTemp)),
            heat_stage1_sec: runtime_seconds(
                cell(row, &map, CanonicalField::HeatStage1),
                detected.heat_stage1,
                idx,
                CanonicalField::HeatStage1,
                &mut warnings,
            ),
            aux_heat1_sec: runtime_seconds(
                cell(row, &map, CanonicalField::AuxHeat1),
                detected.aux_heat1,
                idx,
                CanonicalField::AuxHeat1,
                &mut warnings,
            ),
        });
    }

    if dropped > 0 {
        warnings.push(NormalizationWarning::DroppedRows { count: dropped });
    }
    for w in &warnings {
        warn!(warning = ?w, "telemetry normalization");
    }

    info!(
        readings = readings.len(),
        dropped,
        temperature = %detected.temperature,
        heat_stage1 = %detected.heat_stage1,
        aux_heat1 = %detected.aux_heat1,
        "normalized thermostat telemetry"
    );

    NormalizedTelemetry { readings, units: detected, warnings }
}

/// Parses and normalizes a raw CSV export in one step.
pub fn normalize_csv_text(text: &str) -> Result<NormalizedTelemetry> {
    let table = parse_csv_text(text)?;
    Ok(normalize(&table.headers, &table.rows))
}
