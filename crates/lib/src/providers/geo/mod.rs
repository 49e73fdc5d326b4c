pub mod nominatim;

use crate::errors::GeocodeError;
use crate::extract::Coordinates;
use async_trait::async_trait;
use std::fmt::Debug;

pub use nominatim::NominatimGeocoder;

/// A trait for forward geocoding a free-text address.
///
/// Implementations make exactly one attempt per call and never retry.
/// `Ok(None)` means the service answered but found nothing.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}
