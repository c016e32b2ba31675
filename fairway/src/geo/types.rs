//! Core geographic types.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors raised by coordinate validation.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90] degrees.
    #[error("latitude {0} out of range [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("longitude {0} out of range [-180, 180]")]
    InvalidLongitude(f64),

    /// A coordinate component is NaN or infinite.
    #[error("coordinate component is not finite")]
    NotFinite,
}

/// A geographic point in decimal degrees (WGS84).
///
/// On the wire this is a two-element `[latitude, longitude]` array, matching
/// the course data served by the companion backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// Rejects NaN/infinite components and out-of-range degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coord = Self {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Re-check an already-constructed coordinate.
    ///
    /// Used by the course validator on deserialized data, where fields are
    /// populated directly from the wire.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(GeoError::InvalidLatitude(self.latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(GeoError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.latitude)?;
        tuple.serialize_element(&self.longitude)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (latitude, longitude) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_valid_coordinate() {
        let coord = Coordinate::new(36.5720, -121.9510).unwrap();
        assert!((coord.latitude - 36.5720).abs() < 1e-12);
        assert!((coord.longitude - (-121.9510)).abs() < 1e-12);
    }

    #[test]
    fn test_new_accepts_range_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_new_rejects_out_of_range_latitude() {
        let result = Coordinate::new(90.5, 0.0);
        assert!(matches!(result, Err(GeoError::InvalidLatitude(_))));
    }

    #[test]
    fn test_new_rejects_out_of_range_longitude() {
        let result = Coordinate::new(0.0, -180.01);
        assert!(matches!(result, Err(GeoError::InvalidLongitude(_))));
    }

    #[test]
    fn test_new_rejects_nan() {
        assert_eq!(Coordinate::new(f64::NAN, 0.0), Err(GeoError::NotFinite));
        assert_eq!(Coordinate::new(0.0, f64::INFINITY), Err(GeoError::NotFinite));
    }

    #[test]
    fn test_display() {
        let coord = Coordinate::new(36.5720, -121.9510).unwrap();
        assert_eq!(format!("{}", coord), "(36.572000, -121.951000)");
    }

    #[test]
    fn test_wire_format_roundtrip() {
        // Course data ships coordinates as [lat, lon] pairs
        let coord: Coordinate = serde_json::from_str("[36.5713, -121.9505]").unwrap();
        assert!((coord.latitude - 36.5713).abs() < 1e-12);

        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, "[36.5713,-121.9505]");
    }

    #[test]
    fn test_wire_format_rejects_short_array() {
        let result: Result<Coordinate, _> = serde_json::from_str("[36.5713]");
        assert!(result.is_err());
    }
}
