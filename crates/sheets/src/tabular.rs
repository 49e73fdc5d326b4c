use agritrust::extract::{Extraction, Location};
use agritrust::metrics::{is_rainfall_key, MetricsAccumulator, MetricsPolicy, RainfallAccumulator};
use agritrust::normalize;

/// Accumulates the signals of one table, cell by cell.
#[derive(Debug)]
pub(crate) struct TableWalk {
    metrics: MetricsAccumulator,
    rainfall: RainfallAccumulator,
    normalized: Vec<f64>,
}

impl TableWalk {
    pub(crate) fn new(policy: MetricsPolicy) -> Self {
        Self {
            metrics: MetricsAccumulator::new(policy),
            rainfall: RainfallAccumulator::default(),
            normalized: Vec::new(),
        }
    }

    /// Feeds one numeric cell under its column header.
    pub(crate) fn cell(&mut self, header: &str, value: f64) {
        if let Some(score) = normalize(header, value) {
            self.normalized.push(score);
        }
        if is_rainfall_key(header) {
            self.rainfall.add(value);
        }
        self.metrics.observe_key(header, value);
    }

    pub(crate) fn finish(self, raw_content: String) -> Extraction {
        Extraction {
            metrics: self.metrics.finish(),
            location: Location::default(),
            raw_content,
            normalized: self.normalized,
            rainfall_total: self.rainfall.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_collects_every_signal() {
        let mut walk = TableWalk::new(MetricsPolicy::KeepFirst);
        walk.cell("pH", 6.5);
        walk.cell("pH", 8.0);
        walk.cell("Rainfall_mm", 12.25);
        walk.cell("rain", 3.0);
        let extraction = walk.finish(String::new());

        assert_eq!(extraction.metrics.ph, Some(6.5));
        assert_eq!(extraction.rainfall_total, Some(15.3));
        assert_eq!(extraction.normalized.len(), 4);
        assert_eq!(extraction.normalized[0], 10.0);
    }
}
