use crate::{extract_location, leaf_number};
use agritrust::extract::{Extraction, SensorExtractor};
use agritrust::metrics::{is_rainfall_key, MetricsAccumulator, MetricsPolicy, RainfallAccumulator};
use agritrust::{normalize, ExtractError};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};

/// Reads a JSON sensor report of any shape.
///
/// Defaults to [`MetricsPolicy::AverageAll`]: readings tagged anywhere in the
/// tree are averaged per metric.
#[derive(Debug, Clone)]
pub struct JsonExtractor {
    policy: MetricsPolicy,
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self {
            policy: MetricsPolicy::AverageAll,
        }
    }
}

impl JsonExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MetricsPolicy) -> Self {
        Self { policy }
    }

    /// Extracts from an already-decoded document. The location is returned
    /// as found; no geocoding happens here.
    pub fn extract_value(&self, document: &Value, raw_content: String) -> Extraction {
        let mut walk = JsonWalk::new(self.policy);
        walk.visit(document);
        debug!(readings = walk.normalized.len(), "Walked JSON document.");
        Extraction {
            metrics: walk.metrics.finish(),
            location: extract_location(document),
            raw_content,
            normalized: walk.normalized,
            rainfall_total: walk.rainfall.total(),
        }
    }
}

impl SensorExtractor for JsonExtractor {
    #[instrument(skip(self), fields(policy = ?self.policy))]
    fn extract(&self, path: &Path) -> Result<Extraction, ExtractError> {
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let document: Value = serde_json::from_str(&content)?;
        Ok(self.extract_value(&document, content))
    }
}

/// A single pass over the tree feeding all three collectors.
#[derive(Debug)]
struct JsonWalk {
    metrics: MetricsAccumulator,
    rainfall: RainfallAccumulator,
    normalized: Vec<f64>,
}

impl JsonWalk {
    fn new(policy: MetricsPolicy) -> Self {
        Self {
            metrics: MetricsAccumulator::new(policy),
            rainfall: RainfallAccumulator::default(),
            normalized: Vec::new(),
        }
    }

    fn visit(&mut self, node: &Value) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    match leaf_number(value) {
                        Some(reading) => self.keyed(key, reading),
                        None => self.visit(value),
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    match leaf_number(item) {
                        // Unkeyed readings only reach the normalizer.
                        Some(reading) => self.push_normalized("", reading),
                        None => self.visit(item),
                    }
                }
            }
            _ => {}
        }
    }

    fn keyed(&mut self, key: &str, reading: f64) {
        self.push_normalized(key, reading);
        self.metrics.observe_key(key, reading);
        if is_rainfall_key(key) {
            self.rainfall.add(reading);
        }
    }

    fn push_normalized(&mut self, key: &str, reading: f64) {
        if let Some(score) = normalize(key, reading) {
            self.normalized.push(score);
        }
    }
}
