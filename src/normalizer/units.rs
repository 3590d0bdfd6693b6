use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::RuntimeUnit;

static TIME_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").unwrap_or_else(|e| panic!("time regex: {e}"))
});
static CELSIUS_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(c\)").unwrap_or_else(|e| panic!("celsius regex: {e}")));
static MINUTES_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(min|minutes)\b|\(min\)").unwrap_or_else(|e| panic!("minutes regex: {e}"))
});
static MILLIS_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(ms|millisecond)\b|\(ms\)").unwrap_or_else(|e| panic!("millis regex: {e}"))
});
static SECONDS_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(sec|seconds)\b|\(sec\)").unwrap_or_else(|e| panic!("seconds regex: {e}"))
});

const CELSIUS_SAMPLE: usize = 50;
const RUNTIME_SAMPLE: usize = 100;

/// Parses a numeric cell. Blank, non-numeric and non-finite values are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalizes a time fragment to `HH:MM:SS`, or `None` when it carries no
/// `H:MM` pattern.
pub fn normalize_time(fragment: &str) -> Option<String> {
    let caps = TIME_FRAGMENT.captures(fragment.trim())?;
    let hh = &caps[1];
    let mm = &caps[2];
    let ss = caps.get(3).map_or("00", |m| m.as_str());
    Some(format!("{hh:0>2}:{mm}:{ss}"))
}

/// Splits a combined timestamp into raw date and time fragments.
///
/// ISO values split on `T` (trailing `Z` dropped), others on the first space.
/// A value with neither is taken as a bare date.
pub fn split_timestamp(value: &str) -> (String, String) {
    let s = value.trim();
    if let Some((date, time)) = s.split_once('T') {
        let time = time.split('T').next().unwrap_or("");
        let time = time.strip_suffix('Z').or_else(|| time.strip_suffix('z')).unwrap_or(time);
        (date.to_string(), time.to_string())
    } else if let Some((date, rest)) = s.split_once(' ') {
        let time = rest.split(' ').next().unwrap_or("");
        (date.to_string(), time.to_string())
    } else {
        (s.to_string(), String::new())
    }
}

pub fn header_says_celsius(header: &str) -> bool {
    CELSIUS_HINT.is_match(header)
}

/// Guesses whether temperature samples are Celsius.
///
/// Takes `(outdoor, indoor)` cell pairs in row order. Sampling stops once 50
/// values are collected, checked before each row.
pub fn looks_like_celsius<'a, I>(pairs: I) -> bool
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    let mut values = Vec::with_capacity(CELSIUS_SAMPLE + 1);
    for (outdoor, indoor) in pairs {
        if values.len() >= CELSIUS_SAMPLE {
            break;
        }
        values.extend(outdoor.and_then(parse_number));
        values.extend(indoor.and_then(parse_number));
    }
    if values.is_empty() {
        return false;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (-30.0..=50.0).contains(&avg) && max <= 60.0
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Runtime unit from an explicit header token, if any.
pub fn runtime_unit_from_header(header: &str) -> Option<RuntimeUnit> {
    let header = header.to_lowercase();
    if MINUTES_HINT.is_match(&header) {
        Some(RuntimeUnit::Minutes)
    } else if MILLIS_HINT.is_match(&header) {
        Some(RuntimeUnit::Milliseconds)
    } else if SECONDS_HINT.is_match(&header) {
        Some(RuntimeUnit::Seconds)
    } else {
        None
    }
}

/// Runtime unit guessed from up to 100 positive samples.
pub fn runtime_unit_from_values<'a, I>(cells: I) -> RuntimeUnit
where
    I: IntoIterator<Item = &'a str>,
{
    let samples: Vec<f64> = cells
        .into_iter()
        .filter_map(parse_number)
        .filter(|v| *v > 0.0)
        .take(RUNTIME_SAMPLE)
        .collect();
    if samples.is_empty() {
        return RuntimeUnit::Seconds;
    }
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = samples.iter().sum::<f64>() / samples.len() as f64;
    if max >= 10_000.0 {
        RuntimeUnit::Milliseconds
    } else if max <= 10.0 && avg <= 5.0 {
        RuntimeUnit::Minutes
    } else {
        RuntimeUnit::Seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("6:05", Some("06:05:00"))]
    #[case("06:05:30", Some("06:05:30"))]
    #[case("  23:59  ", Some("23:59:00"))]
    #[case("noonish", None)]
    fn time_fragments_normalize(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_time(raw).as_deref(), expected);
    }

    #[rstest]
    #[case("2024-01-15T06:30:00Z", "2024-01-15", "06:30:00")]
    #[case("2024-01-15 6:30", "2024-01-15", "6:30")]
    #[case("2024-01-15", "2024-01-15", "")]
    fn timestamps_split(#[case] raw: &str, #[case] date: &str, #[case] time: &str) {
        assert_eq!(split_timestamp(raw), (date.to_string(), time.to_string()));
    }

    #[test]
    fn celsius_inferred_from_typical_indoor_and_outdoor_values() {
        let rows = [
            (Some("5"), Some("21")),
            (Some("4"), Some("20")),
            (Some("6"), Some("22")),
        ];
        assert!(looks_like_celsius(rows.iter().map(|(o, i)| (*o, *i))));
    }

    #[test]
    fn fahrenheit_values_are_left_alone() {
        let rows = [(Some("35"), Some("70")), (Some("33"), Some("69"))];
        assert!(!looks_like_celsius(rows.iter().map(|(o, i)| (*o, *i))));
    }

    #[test]
    fn conversion_is_exact_for_21c() {
        assert_eq!(celsius_to_fahrenheit(21.0), 69.8);
    }

    #[rstest]
    #[case("Heat Stage 1 (sec)", Some(RuntimeUnit::Seconds))]
    #[case("Compressor (min)", Some(RuntimeUnit::Minutes))]
    #[case("Aux runtime ms", Some(RuntimeUnit::Milliseconds))]
    #[case("Heat Stage", None)]
    fn header_tokens_decide_runtime_unit(#[case] header: &str, #[case] expected: Option<RuntimeUnit>) {
        assert_eq!(runtime_unit_from_header(header), expected);
    }

    #[test]
    fn large_values_mean_milliseconds() {
        assert_eq!(
            runtime_unit_from_values(["0", "15000", "3000"]),
            RuntimeUnit::Milliseconds
        );
    }

    #[test]
    fn small_values_mean_minutes() {
        assert_eq!(runtime_unit_from_values(["5", "2", "0", "1"]), RuntimeUnit::Minutes);
    }

    #[test]
    fn no_positive_samples_default_to_seconds() {
        assert_eq!(runtime_unit_from_values(["0", "", "x"]), RuntimeUnit::Seconds);
        assert_eq!(runtime_unit_from_values(["300", "120"]), RuntimeUnit::Seconds);
    }
}
