//! # Address/Coordinate Resolver

use crate::extract::Location;
use crate::providers::geo::Geocoder;
use tracing::{debug, info, warn};

/// Fills in coordinates for a location found in a document.
///
/// Inline coordinates are used as-is. Otherwise a textual address is geocoded
/// once; any failure leaves the coordinates absent and is never propagated.
pub async fn resolve_location(geocoder: &dyn Geocoder, mut location: Location) -> Location {
    if location.has_coordinates() {
        return location;
    }

    let Some(query) = location
        .address
        .as_ref()
        .and_then(|address| address.as_text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
    else {
        return location;
    };

    match geocoder.geocode(query).await {
        Ok(Some(coordinates)) => {
            info!(query, lat = coordinates.lat, lon = coordinates.lon, "Geocoded address.");
            location.lat = Some(coordinates.lat);
            location.lon = Some(coordinates.lon);
        }
        Ok(None) => debug!(query, "Geocoder returned no results."),
        Err(e) => warn!(query, "Geocoding failed, continuing without coordinates: {e}"),
    }
    location
}
