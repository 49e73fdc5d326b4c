//! # Score Aggregator
//!
//! Turns extracted signals into bounded trust values: a 0–30 score for sensor
//! reports and a 0/20 delta for bank statements.

use crate::extract::{round_to, TransactionTally};
use crate::metrics::MetricsTriple;
use serde::Serialize;

pub const MAX_SENSOR_TRUST: f64 = 30.0;
const RULE_POINTS: u32 = 10;
const FALLBACK_MULTIPLIER: f64 = 3.0;

pub const ACTIVE_SMALL_TRANSACTIONS: usize = 15;
pub const ACTIVE_RATIO: f64 = 0.5;
pub const ACTIVE_TRUST_DELTA: u32 = 20;

/// Bank-statement activity assessment, serialized as the API response body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankActivity {
    pub active: bool,
    pub small_transactions: usize,
    pub total_transactions: usize,
    /// Small/total, rounded to two decimals; 0 when there are no transactions.
    pub activity_ratio: f64,
    pub trust_delta: u32,
}

pub fn assess_bank_activity(tally: &TransactionTally) -> BankActivity {
    let small = tally.small_count();
    let lines = tally.line_count();
    let ratio = if lines == 0 {
        0.0
    } else {
        small as f64 / lines as f64
    };
    let active = small >= ACTIVE_SMALL_TRANSACTIONS || ratio >= ACTIVE_RATIO;

    BankActivity {
        active,
        small_transactions: small,
        total_transactions: lines,
        activity_ratio: round_to(ratio, 2),
        trust_delta: if active { ACTIVE_TRUST_DELTA } else { 0 },
    }
}

fn rule_points(metrics: &MetricsTriple) -> u32 {
    let mut points = 0;
    if metrics.ph.is_some_and(|ph| (6.0..=7.5).contains(&ph)) {
        points += RULE_POINTS;
    }
    if metrics.moisture.is_some_and(|m| (20.0..=60.0).contains(&m)) {
        points += RULE_POINTS;
    }
    // 40-80 reads as mg/kg, 240-480 as ppm.
    if metrics
        .nitrogen
        .is_some_and(|n| (40.0..=80.0).contains(&n) || (240.0..=480.0).contains(&n))
    {
        points += RULE_POINTS;
    }
    points
}

fn mean_fallback(normalized: &[f64]) -> Option<f64> {
    if normalized.is_empty() {
        return None;
    }
    let mean = normalized.iter().sum::<f64>() / normalized.len() as f64;
    Some(round_to(mean * FALLBACK_MULTIPLIER, 1).clamp(0.0, MAX_SENSOR_TRUST))
}

/// Rule-based trust score in `[0, 30]`.
///
/// When no rule fires, the mean of the normalized observations stands in so a
/// document with plausible but out-of-range readings still scores above zero.
pub fn sensor_trust_score(metrics: &MetricsTriple, normalized: &[f64]) -> f64 {
    match rule_points(metrics) {
        0 => mean_fallback(normalized).unwrap_or(0.0),
        points => f64::from(points).min(MAX_SENSOR_TRUST),
    }
}
