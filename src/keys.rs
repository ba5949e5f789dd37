//! Cache key construction
//!
//! Keys are opaque to the store. Each lookup kind gets its own prefix so a
//! place name can never alias a coordinate query, and every parameter that
//! changes the upstream response is part of the key.

use crate::data::Units;

const GEOCODE_PREFIX: &str = "geo::";
const FORECAST_PREFIX: &str = "fc::";

/// Key for a place-name lookup: `geo::<lowercased name>`
pub fn geocode_key(city: &str) -> String {
    format!("{}{}", GEOCODE_PREFIX, city.to_lowercase())
}

/// Key for a forecast lookup: `fc::<lat>,<lon>::<days>::<units>`
///
/// Coordinates are rounded to three decimals (about 100 m), so queries that
/// agree at that precision share an entry.
pub fn forecast_key(latitude: f64, longitude: f64, days: u8, units: Units) -> String {
    format!(
        "{}{:.3},{:.3}::{}::{}",
        FORECAST_PREFIX,
        latitude,
        longitude,
        days,
        units.cache_tag()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_key_lowercases() {
        assert_eq!(geocode_key("Minneapolis"), "geo::minneapolis");
        assert_eq!(geocode_key("ST PAUL"), "geo::st paul");
    }

    #[test]
    fn test_geocode_key_keeps_whitespace_and_unicode() {
        assert_eq!(geocode_key("São Paulo"), "geo::são paulo");
        assert_ne!(geocode_key("st paul"), geocode_key("stpaul"));
    }

    #[test]
    fn test_forecast_key_format() {
        assert_eq!(
            forecast_key(44.9778, -93.2650, 7, Units::Metric),
            "fc::44.978,-93.265::7::si"
        );
        assert_eq!(
            forecast_key(44.9778, -93.2650, 3, Units::Imperial),
            "fc::44.978,-93.265::3::us"
        );
    }

    #[test]
    fn test_forecast_key_pads_to_three_decimals() {
        assert_eq!(forecast_key(45.0, -93.5, 1, Units::Metric), "fc::45.000,-93.500::1::si");
        assert_eq!(forecast_key(0.0, 0.0, 16, Units::Metric), "fc::0.000,0.000::16::si");
    }

    #[test]
    fn test_forecast_key_rounds_to_three_decimals() {
        // Equal at three decimals: same slot
        assert_eq!(
            forecast_key(44.9778, -93.2650, 7, Units::Metric),
            forecast_key(44.97781, -93.26501, 7, Units::Metric)
        );
        // Rounds, not truncates
        assert_eq!(forecast_key(44.9776, 10.0, 7, Units::Metric), "fc::44.978,10.000::7::si");
    }

    #[test]
    fn test_forecast_key_distinguishes_coordinates() {
        assert_ne!(
            forecast_key(44.978, -93.265, 7, Units::Metric),
            forecast_key(44.979, -93.265, 7, Units::Metric)
        );
        assert_ne!(
            forecast_key(44.978, -93.265, 7, Units::Metric),
            forecast_key(44.978, -93.266, 7, Units::Metric)
        );
        // Swapped coordinates must not alias
        assert_ne!(
            forecast_key(10.0, 20.0, 7, Units::Metric),
            forecast_key(20.0, 10.0, 7, Units::Metric)
        );
    }

    #[test]
    fn test_forecast_key_distinguishes_days_and_units() {
        let base = forecast_key(44.978, -93.265, 7, Units::Metric);

        assert_ne!(base, forecast_key(44.978, -93.265, 8, Units::Metric));
        assert_ne!(base, forecast_key(44.978, -93.265, 7, Units::Imperial));
        // "1" + "1" vs "11" style ambiguity is separated by the delimiters
        assert_ne!(
            forecast_key(1.0, 1.0, 11, Units::Metric),
            forecast_key(1.0, 1.0, 1, Units::Metric)
        );
    }

    #[test]
    fn test_geocode_and_forecast_keys_never_alias() {
        let geo = geocode_key("fc::44.978,-93.265::7::si");
        assert_ne!(geo, forecast_key(44.978, -93.265, 7, Units::Metric));
        assert!(geo.starts_with("geo::"));
    }
}
