use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};

use crate::domain::RawRecord;

/// Header row and records parsed from a thermostat export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// Parses raw CSV text.
///
/// Blank lines and lines starting with `#` (after trimming) are skipped, the
/// first remaining line is the header row. Short rows are padded with empty
/// cells; extra cells are ignored.
pub fn parse_csv_text(text: &str) -> Result<CsvTable> {
    let body = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .collect::<Vec<_>>()
        .join("\n");

    if body.is_empty() {
        return Ok(CsvTable::default());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("unreadable CSV header row")?
        .iter()
        .map(|h| h.replace('"', "").trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record {}", idx + 1))?;
        let row: RawRecord = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}
