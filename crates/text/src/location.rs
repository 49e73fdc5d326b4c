use agritrust::extract::{coordinate_from_value, AddressValue, Location};
use serde_json::{Map, Value};

const ADDRESS_KEYS: [&str; 3] = ["address", "location", "field_address"];
const LAT_KEYS: [&str; 2] = ["lat", "latitude"];
const LON_KEYS: [&str; 3] = ["lon", "lng", "longitude"];
/// Keys holding the display text of a nested location object.
const PLACE_KEYS: [&str; 3] = ["place", "name", "address"];

/// The first non-null value among `keys`.
fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

/// Finds the address and inline coordinates at the top level of a document.
///
/// Only object roots carry a location. A nested location object such as
/// `{"place": "Manaus", "latitude": -3.1, "longitude": -60.0}` contributes its
/// display text and fills in coordinates not given at the top level.
pub fn extract_location(document: &Value) -> Location {
    let Value::Object(root) = document else {
        return Location::default();
    };

    let mut location = Location {
        address: None,
        lat: first_present(root, &LAT_KEYS).and_then(coordinate_from_value),
        lon: first_present(root, &LON_KEYS).and_then(coordinate_from_value),
    };

    location.address = match first_present(root, &ADDRESS_KEYS) {
        None => None,
        Some(Value::String(text)) => Some(AddressValue::Text(text.clone())),
        Some(Value::Object(nested)) => {
            if location.lat.is_none() {
                location.lat = nested.get("latitude").and_then(coordinate_from_value);
            }
            if location.lon.is_none() {
                location.lon = nested.get("longitude").and_then(coordinate_from_value);
            }
            let place = PLACE_KEYS
                .iter()
                .filter_map(|key| nested.get(*key).and_then(Value::as_str))
                .find(|text| !text.is_empty());
            Some(match place {
                Some(text) => AddressValue::Text(text.to_string()),
                None => AddressValue::Structured(Value::Object(nested.clone())),
            })
        }
        Some(other) => Some(AddressValue::Structured(other.clone())),
    };
    location
}
