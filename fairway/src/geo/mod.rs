//! Geodesy primitives
//!
//! Great-circle distance, initial bearing, and proximity tests between
//! latitude/longitude points. These are the pure building blocks used by the
//! hole-progress engine for distance-to-pin and hazard reporting.

mod types;

pub use types::{Coordinate, GeoError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in meters (IUGG mean radius, as used by common
/// geospatial toolkits).
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle (haversine) distance between two points, in meters.
///
/// Symmetric in its arguments and exactly zero when `a == b`.
#[inline]
pub fn distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `a` toward `b`, in degrees within [0, 360).
///
/// 0 = North, 90 = East. Degenerate when `a == b`; returns the 0.0 sentinel
/// rather than failing.
#[inline]
pub fn initial_bearing_deg(a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * dlon.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// True iff `point` lies within `radius_m` meters of `center`.
///
/// The boundary is inclusive: a point exactly `radius_m` away is inside.
#[inline]
pub fn is_within_radius(point: &Coordinate, center: &Coordinate, radius_m: f64) -> bool {
    distance_m(point, center) <= radius_m
}
