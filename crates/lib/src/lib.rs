//! # Agricultural Document Trust Scoring
//!
//! This crate turns loosely-structured agricultural documents (soil and sensor
//! reports, bank statements) into a handful of normalized numeric signals and a
//! bounded trust score. The format-specific extractors live in plugin crates
//! (`agritrust-sheets`, `agritrust-text`, `agritrust-pdf`) that implement the
//! traits defined in [`extract`]; this crate owns everything they share.

pub mod errors;
pub mod extract;
pub mod metrics;
pub mod normalize;
pub mod providers;
pub mod resolver;
pub mod score;

pub use errors::{ExtractError, GeocodeError, StorageError, WeatherError};
pub use extract::{
    AddressValue, Coordinates, Extraction, FileKind, Location, SensorExtractor, TransactionScanner,
    TransactionTally,
};
pub use metrics::{MetricField, MetricsAccumulator, MetricsPolicy, MetricsTriple};
pub use normalize::normalize;
pub use resolver::resolve_location;
pub use score::{assess_bank_activity, sensor_trust_score, BankActivity};
