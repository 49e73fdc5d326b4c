//! # Soil Metrics
//!
//! Key classification for the three tracked soil metrics and the two named
//! policies that decide which value wins when a document tags a metric more
//! than once.

use serde::{Deserialize, Serialize};

/// How repeated values for the same metric are folded into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsPolicy {
    /// The first value encountered is authoritative; later ones are ignored.
    #[default]
    KeepFirst,
    /// The arithmetic mean of every tagged value.
    AverageAll,
}

/// One of the tracked soil metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Ph,
    Moisture,
    Nitrogen,
}

impl MetricField {
    pub const ALL: [MetricField; 3] = [MetricField::Ph, MetricField::Moisture, MetricField::Nitrogen];

    /// Whether a lower-cased key names this metric.
    pub fn matches(self, lowered_key: &str) -> bool {
        match self {
            MetricField::Ph => lowered_key.contains("ph"),
            MetricField::Moisture => {
                lowered_key.contains("moist") || lowered_key.contains("humidity")
            }
            MetricField::Nitrogen => lowered_key.contains("nitrogen") || lowered_key.trim() == "n",
        }
    }

    /// Every metric named by `key`. A key may tag more than one metric.
    pub fn matching(key: &str) -> impl Iterator<Item = MetricField> {
        let lowered = key.to_lowercase();
        Self::ALL
            .into_iter()
            .filter(move |field| field.matches(&lowered))
    }
}

/// Whether a key names a rainfall/precipitation reading.
pub fn is_rainfall_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    lowered.contains("rain") || lowered.contains("precip")
}

/// The authoritative soil metrics of one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTriple {
    pub ph: Option<f64>,
    pub moisture: Option<f64>,
    pub nitrogen: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    first: Option<f64>,
    sum: f64,
    count: usize,
}

impl Slot {
    fn push(&mut self, value: f64) {
        if self.first.is_none() {
            self.first = Some(value);
        }
        self.sum += value;
        self.count += 1;
    }

    fn resolve(&self, policy: MetricsPolicy) -> Option<f64> {
        match policy {
            MetricsPolicy::KeepFirst => self.first,
            MetricsPolicy::AverageAll if self.count > 0 => Some(self.sum / self.count as f64),
            MetricsPolicy::AverageAll => None,
        }
    }
}

/// Collects metric observations for one document under a fixed policy.
#[derive(Debug, Clone)]
pub struct MetricsAccumulator {
    policy: MetricsPolicy,
    ph: Slot,
    moisture: Slot,
    nitrogen: Slot,
}

impl MetricsAccumulator {
    pub fn new(policy: MetricsPolicy) -> Self {
        Self {
            policy,
            ph: Slot::default(),
            moisture: Slot::default(),
            nitrogen: Slot::default(),
        }
    }

    fn slot(&self, field: MetricField) -> &Slot {
        match field {
            MetricField::Ph => &self.ph,
            MetricField::Moisture => &self.moisture,
            MetricField::Nitrogen => &self.nitrogen,
        }
    }

    fn slot_mut(&mut self, field: MetricField) -> &mut Slot {
        match field {
            MetricField::Ph => &mut self.ph,
            MetricField::Moisture => &mut self.moisture,
            MetricField::Nitrogen => &mut self.nitrogen,
        }
    }

    /// Whether another value for `field` can still change the result.
    pub fn wants(&self, field: MetricField) -> bool {
        match self.policy {
            MetricsPolicy::KeepFirst => self.slot(field).first.is_none(),
            MetricsPolicy::AverageAll => true,
        }
    }

    pub fn observe(&mut self, field: MetricField, value: f64) {
        if value.is_finite() {
            self.slot_mut(field).push(value);
        }
    }

    /// Records `value` under every metric that `key` names.
    pub fn observe_key(&mut self, key: &str, value: f64) {
        for field in MetricField::matching(key) {
            self.observe(field, value);
        }
    }

    pub fn finish(&self) -> MetricsTriple {
        MetricsTriple {
            ph: self.ph.resolve(self.policy),
            moisture: self.moisture.resolve(self.policy),
            nitrogen: self.nitrogen.resolve(self.policy),
        }
    }
}

/// Running sum of every rainfall-tagged value in a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RainfallAccumulator {
    sum: f64,
    seen: bool,
}

impl RainfallAccumulator {
    pub fn add(&mut self, value: f64) {
        if value.is_finite() {
            self.sum += value;
            self.seen = true;
        }
    }

    /// The total rounded to one decimal place, or `None` if nothing was tagged.
    pub fn total(&self) -> Option<f64> {
        self.seen.then(|| crate::extract::round_to(self.sum, 1))
    }
}
