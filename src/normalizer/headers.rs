//! Header synonym table.
//!
//! Every canonical field owns an ordered list of case-insensitive patterns.
//! Headers are scanned in file order and, for each header, the patterns in
//! table order; the first header that hits any pattern is taken. This is a
//! first-match heuristic, not a scoring pass, and ambiguous exports are
//! resolved purely by the order below.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum CanonicalField {
    #[strum(serialize = "Date")]
    Date,
    #[strum(serialize = "Time")]
    Time,
    #[strum(serialize = "Timestamp")]
    Timestamp,
    #[strum(serialize = "Outdoor Temp (F)")]
    OutdoorTemp,
    #[strum(serialize = "Thermostat Temperature (F)")]
    IndoorTemp,
    #[strum(serialize = "Heat Stage 1 (sec)")]
    HeatStage1,
    #[strum(serialize = "Aux Heat 1 (sec)")]
    AuxHeat1,
}

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).unwrap_or_else(|e| panic!("bad header pattern {pattern}: {e}"))
}

static SYNONYMS: Lazy<Vec<(CanonicalField, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        (CanonicalField::Date, vec![ci(r"^date$")]),
        (CanonicalField::Time, vec![ci(r"^time$")]),
        (
            CanonicalField::Timestamp,
            vec![ci(r"^(timestamp|date\s*time|datetime|date_time|date-time)$")],
        ),
        (
            CanonicalField::OutdoorTemp,
            vec![
                ci(r"^(out|outside|outdoor)[^a-zA-Z0-9_]*temp"),
                ci(r"^outdoor temperature\s*\(f\)"),
                ci(r"^outdoor temperature$"),
                ci(r"^outside temperature$"),
                // truncated export label
                ci(r"^outdoor tel$"),
                ci(r"^outdoor\s*tel"),
            ],
        ),
        (
            CanonicalField::IndoorTemp,
            vec![
                ci(r"^(thermostat|indoor|inside)[^a-zA-Z0-9_]*temp"),
                ci(r"^indoor temperature\s*\(f\)"),
                ci(r"^thermostat temperature$"),
                ci(r"^temperature\s*\(f\)$"),
                // truncated "Current Temperature"
                ci(r"^current ten$"),
                ci(r"^current\s*ten"),
                ci(r"^current temp"),
            ],
        ),
        (
            CanonicalField::HeatStage1,
            vec![
                ci(r"^(heat|compressor|stage\s*1|hp stage 1).*?(sec|seconds|runtime|run time|time)$"),
                ci(r"^heat stage 1$"),
                ci(r"^heat stage$"),
                ci(r"^heat\s*stage$"),
            ],
        ),
        (
            CanonicalField::AuxHeat1,
            vec![
                ci(r"^(aux|auxiliary).*?(heat).*?(sec|seconds|runtime|run time|time)$"),
                ci(r"^aux heat 1$"),
                ci(r"^aux heat 1\s*\(fan\s*\(sec\)\)$"),
                ci(r"^aux heat 1\s*\(fan"),
            ],
        ),
    ]
});

/// Second-chance patterns tried against raw headers when no synonym hit.
static LOOSE: Lazy<Vec<(CanonicalField, Regex)>> = Lazy::new(|| {
    vec![
        (CanonicalField::OutdoorTemp, ci(r"outdoor.*temp|outdoor\s*tel")),
        (
            CanonicalField::IndoorTemp,
            ci(r"(thermostat|indoor|current\s*ten).*temp|current\s*ten"),
        ),
        (CanonicalField::HeatStage1, ci(r"(heat|compressor).*stage")),
        (CanonicalField::AuxHeat1, ci(r"(aux|auxiliary).*heat")),
    ]
});

fn clean(header: &str) -> String {
    header.trim().replace('"', "")
}

fn first_match<'h>(headers: &'h [String], patterns: &[Regex]) -> Option<&'h String> {
    headers.iter().find(|h| {
        let cleaned = clean(h);
        patterns.iter().any(|p| p.is_match(&cleaned))
    })
}

/// Canonical field to the header token found in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: HashMap<CanonicalField, String>,
}

impl HeaderMap {
    pub fn build(headers: &[String]) -> Self {
        let mut fields = HashMap::new();
        for (field, patterns) in SYNONYMS.iter() {
            if let Some(found) = first_match(headers, patterns) {
                fields.insert(*field, found.clone());
            }
        }
        for (field, pattern) in LOOSE.iter() {
            if fields.contains_key(field) {
                continue;
            }
            if let Some(found) = headers.iter().find(|h| pattern.is_match(h)) {
                fields.insert(*field, found.clone());
            }
        }
        Self { fields }
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Fields with no header in the file, in table order.
    pub fn missing(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        CanonicalField::iter().filter(move |f| !self.fields.contains_key(f))
    }
}
