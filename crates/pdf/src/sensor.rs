use crate::text::document_text;
use agritrust::extract::{parse_number, Extraction, Location, SensorExtractor};
use agritrust::metrics::{MetricField, MetricsAccumulator, MetricsPolicy, RainfallAccumulator};
use agritrust::{normalize, ExtractError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static PH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ph[:\s=]*(-?\d+(?:\.\d+)?)|(-?\d+(?:\.\d+)?)\s*(?:ph|pH)")
        .expect("static regex")
});
static MOISTURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*%|moisture[:\s=]*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)\s*moisture",
    )
    .expect("static regex")
});
static NITROGEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)nitrogen[:\s=]*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)\s*(?:ppm|mg/kg|mg kg)|n[:\s=]*(\d+(?:\.\d+)?)",
    )
    .expect("static regex")
});
static RAINFALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)rainfall[:\s=]*(\d+(?:\.\d+)?)|precipitation[:\s=]*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)\s*(?:mm|mm\.?)",
    )
    .expect("static regex")
});
static SIGNED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)").expect("static regex"));
static UNSIGNED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("static regex"));

/// The first participating capture group of `pattern` in `haystack`.
fn first_group(pattern: &Regex, haystack: &str) -> Option<f64> {
    let captures = pattern.captures(haystack)?;
    captures
        .iter()
        .skip(1)
        .flatten()
        .next()
        .and_then(|m| parse_number(m.as_str()))
}

/// The keyword-anchored reading on a line, else the first number on it.
fn line_reading(pattern: &Regex, fallback: &Regex, lower: &str, line: &str) -> Option<f64> {
    first_group(pattern, lower).or_else(|| first_group(fallback, line))
}

struct MetricRule {
    field: MetricField,
    /// Key under which the reading is normalized.
    normalize_as: &'static str,
    pattern: &'static LazyLock<Regex>,
    triggers: fn(lower: &str, line: &str) -> bool,
}

fn mentions_ph(lower: &str, _line: &str) -> bool {
    lower.contains("ph") || lower.contains("p.h")
}

fn mentions_moisture(lower: &str, line: &str) -> bool {
    lower.contains("moist") || lower.contains("humidity") || line.contains('%')
}

fn mentions_nitrogen(lower: &str, _line: &str) -> bool {
    lower.contains("nitrogen")
        || lower.contains("n ")
        || lower.contains(" ppm")
        || lower.contains("mg/kg")
}

static METRIC_RULES: [MetricRule; 3] = [
    MetricRule {
        field: MetricField::Ph,
        normalize_as: "ph",
        pattern: &PH_PATTERN,
        triggers: mentions_ph,
    },
    MetricRule {
        field: MetricField::Moisture,
        normalize_as: "soil moisture",
        pattern: &MOISTURE_PATTERN,
        triggers: mentions_moisture,
    },
    MetricRule {
        field: MetricField::Nitrogen,
        normalize_as: "nitrogen",
        pattern: &NITROGEN_PATTERN,
        triggers: mentions_nitrogen,
    },
];

/// The address on a line mentioning one: the text after the first colon, or
/// the whole line when nothing follows it.
fn address_on_line(line: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim().to_string(),
        _ => line.to_string(),
    }
}

/// Line boundaries in decoded report text. Bare `\r` counts, since raw
/// decodes of older PDFs often use it alone.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Reads metrics, rainfall and an address out of free report text, one line
/// at a time.
pub fn parse_report_text(text: &str, policy: MetricsPolicy) -> Extraction {
    let mut metrics = MetricsAccumulator::new(policy);
    let mut rainfall = RainfallAccumulator::default();
    let mut normalized = Vec::new();
    let mut address: Option<String> = None;

    for line in text.split(is_line_break).map(str::trim).filter(|line| !line.is_empty()) {
        let lower = line.to_lowercase();

        for rule in &METRIC_RULES {
            if !metrics.wants(rule.field) || !(rule.triggers)(&lower, line) {
                continue;
            }
            if let Some(reading) = line_reading(rule.pattern, &SIGNED_NUMBER, &lower, line) {
                metrics.observe(rule.field, reading);
                normalized.extend(normalize(rule.normalize_as, reading));
            }
        }

        if address.is_none() && (lower.contains("address") || lower.contains("location")) {
            address = Some(address_on_line(line));
        }

        if lower.contains("rain") || lower.contains("precip") {
            if let Some(reading) = line_reading(&RAINFALL_PATTERN, &UNSIGNED_NUMBER, &lower, line) {
                rainfall.add(reading);
            }
        }
    }

    Extraction {
        metrics: metrics.finish(),
        location: address.map(Location::from_address).unwrap_or_default(),
        raw_content: text.to_string(),
        normalized,
        rainfall_total: rainfall.total(),
    }
}

/// Reads a sensor or soil-test report from a PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    policy: MetricsPolicy,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MetricsPolicy) -> Self {
        Self { policy }
    }
}

impl SensorExtractor for PdfExtractor {
    #[instrument(skip(self), fields(policy = ?self.policy))]
    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let data = std::fs::read(path)?;
        let text = document_text(&data);
        debug!(chars = text.chars().count(), "Parsing PDF report text.");
        Ok(parse_report_text(&text, self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agritrust::AddressValue;

    #[test]
    fn keyword_patterns_take_precedence() {
        let extraction = parse_report_text(
            "Soil pH: 6.8\nMoisture content 35 %\nNitrogen (N): 60 mg/kg\nRainfall: 12.5 mm",
            MetricsPolicy::KeepFirst,
        );
        assert_eq!(extraction.metrics.ph, Some(6.8));
        assert_eq!(extraction.metrics.moisture, Some(35.0));
        assert_eq!(extraction.metrics.nitrogen, Some(60.0));
        assert_eq!(extraction.rainfall_total, Some(12.5));
        assert_eq!(extraction.normalized.len(), 3);
    }

    #[test]
    fn falls_back_to_first_number_on_line() {
        let extraction = parse_report_text("Reading of P.H. was about 7", MetricsPolicy::KeepFirst);
        assert_eq!(extraction.metrics.ph, Some(7.0));
    }

    #[test]
    fn keep_first_ignores_later_lines() {
        let text = "pH 6.0\npH 8.0\nprecipitation: 3\nrainfall: 2.25 mm";
        let extraction = parse_report_text(text, MetricsPolicy::KeepFirst);
        assert_eq!(extraction.metrics.ph, Some(6.0));
        assert_eq!(extraction.normalized.len(), 1);
        assert_eq!(extraction.rainfall_total, Some(5.3));

        let averaged = parse_report_text(text, MetricsPolicy::AverageAll);
        assert_eq!(averaged.metrics.ph, Some(7.0));
        assert_eq!(averaged.normalized.len(), 2);
    }

    #[test]
    fn address_line() {
        let extraction = parse_report_text(
            "Farm Location: Village Rampur, Punjab\nAddress: elsewhere",
            MetricsPolicy::KeepFirst,
        );
        assert_eq!(
            extraction.location.address,
            Some(AddressValue::Text("Village Rampur, Punjab".into()))
        );
        assert_eq!(address_on_line("Field address:  "), "Field address:  ");
    }

    #[test]
    fn carriage_return_only_line_endings() {
        let text = "pH 6.0\rpH 8.0\x0cprecipitation: 3\r\nrainfall: 2.25 mm\r";
        let extraction = parse_report_text(text, MetricsPolicy::AverageAll);
        assert_eq!(extraction.metrics.ph, Some(7.0));
        assert_eq!(extraction.normalized.len(), 2);
        assert_eq!(extraction.rainfall_total, Some(5.3));
    }

    #[test]
    fn lines_without_numbers_are_skipped() {
        let extraction = parse_report_text("pH not measured\n\n   \n", MetricsPolicy::KeepFirst);
        assert_eq!(extraction.metrics.ph, None);
        assert!(extraction.normalized.is_empty());
        assert_eq!(extraction.rainfall_total, None);
    }
}
