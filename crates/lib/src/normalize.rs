//! # Metric Normalizer
//!
//! Maps a raw `(key, value)` reading onto a common 0–10 scale. The curve is
//! chosen by substring matches on the lower-cased key; the first matching rule
//! wins, in the order they appear in [`normalize`].

const SCALE_MAX: f64 = 10.0;
const PH_OPTIMUM: f64 = 6.5;
const TEMPERATURE_OPTIMUM: f64 = 25.0;
const RAINFALL_TOLERANCE: f64 = 20.0;

fn clamp_scale(value: f64) -> f64 {
    value.clamp(0.0, SCALE_MAX)
}

/// Normalizes a single reading to `[0, 10]`.
///
/// Returns `None` for non-finite input so that the caller drops the reading
/// instead of counting it as zero.
pub fn normalize(key: &str, value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let k = key.to_lowercase();

    let score = if k.contains("soil") && k.contains("moist") {
        clamp_scale(value / 10.0)
    } else if k == "ph" || k.contains("ph") {
        clamp_scale(SCALE_MAX - (value - PH_OPTIMUM).abs() * SCALE_MAX / PH_OPTIMUM)
    } else if k.contains("humid") {
        clamp_scale(value / 10.0)
    } else if k.contains("temp") {
        clamp_scale((50.0 - (value - TEMPERATURE_OPTIMUM).abs()) / 5.0)
    } else if k.contains("rain") || k.contains("precip") {
        clamp_scale(SCALE_MAX - (value - RAINFALL_TOLERANCE).max(0.0) * 0.5)
    } else if k.contains("wind") {
        clamp_scale(SCALE_MAX - value * 0.5)
    } else if (0.0..=100.0).contains(&value) {
        value / 10.0
    } else {
        clamp_scale(value / 10.0)
    };

    Some(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ph_peaks_at_optimum_and_bottoms_out_at_thirteen() {
        assert_eq!(normalize("pH", 6.5), Some(10.0));
        assert_eq!(normalize("ph", 13.0), Some(0.0));
        assert_eq!(normalize("soil_ph", 0.0), Some(0.0));
    }

    #[test]
    fn soil_moisture_takes_priority_over_other_rules() {
        // "phase" would otherwise select the pH curve.
        assert!(approx(normalize("soil_moisture_phase", 35.0).unwrap(), 3.5));
        assert_eq!(normalize("Soil Moisture", 250.0), Some(10.0));
    }

    #[test]
    fn temperature_curve() {
        assert_eq!(normalize("temperature", 25.0), Some(10.0));
        assert!(approx(normalize("air_temp", 35.0).unwrap(), 8.0));
        assert!(approx(normalize("temp", 70.0).unwrap(), 1.0));
        assert_eq!(normalize("temp", -40.0), Some(0.0));
    }

    #[test]
    fn rainfall_has_no_penalty_below_tolerance() {
        assert_eq!(normalize("rainfall_mm", 5.0), Some(10.0));
        assert_eq!(normalize("precipitation", 20.0), Some(10.0));
        assert!(approx(normalize("rain", 30.0).unwrap(), 5.0));
        assert_eq!(normalize("rain", 100.0), Some(0.0));
    }

    #[test]
    fn wind_and_humidity() {
        assert!(approx(normalize("wind_speed", 4.0).unwrap(), 8.0));
        assert_eq!(normalize("wind", 40.0), Some(0.0));
        assert!(approx(normalize("Humidity", 55.0).unwrap(), 5.5));
    }

    #[test]
    fn generic_percentage_and_out_of_range_values() {
        assert!(approx(normalize("nitrogen", 60.0).unwrap(), 6.0));
        assert_eq!(normalize("", 250.0), Some(10.0));
        assert_eq!(normalize("potassium", -5.0), Some(0.0));
    }

    #[test]
    fn output_is_always_bounded() {
        let keys = [
            "ph", "soil moisture", "humidity", "temp", "rain", "wind", "other", "",
        ];
        let values = [-1e9, -50.0, -1.0, 0.0, 3.3, 6.5, 13.0, 50.0, 100.0, 101.0, 1e9];
        for key in keys {
            for value in values {
                let n = normalize(key, value).unwrap();
                assert!((0.0..=10.0).contains(&n), "{key}={value} -> {n}");
            }
        }
    }

    #[test]
    fn non_finite_values_are_absent() {
        assert_eq!(normalize("ph", f64::NAN), None);
        assert_eq!(normalize("rain", f64::INFINITY), None);
    }
}
