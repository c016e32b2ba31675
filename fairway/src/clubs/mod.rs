//! Club bag model and distance-based club suggestion.
//!
//! Carry distances are stored in yards, matching the companion app's data,
//! while the rest of the library works in meters. Conversions happen at the
//! suggestion boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Meters per international yard.
pub const METERS_PER_YARD: f64 = 0.9144;

/// Convert a distance in yards to meters.
pub fn yards_to_meters(yards: f64) -> f64 {
    yards * METERS_PER_YARD
}

/// Convert a distance in meters to yards.
pub fn meters_to_yards(meters: f64) -> f64 {
    meters / METERS_PER_YARD
}

/// Broad club category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClubKind {
    Driver,
    Wood,
    Hybrid,
    Iron,
    Wedge,
    Putter,
    Other,
}

impl fmt::Display for ClubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClubKind::Driver => "driver",
            ClubKind::Wood => "wood",
            ClubKind::Hybrid => "hybrid",
            ClubKind::Iron => "iron",
            ClubKind::Wedge => "wedge",
            ClubKind::Putter => "putter",
            ClubKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// One club in the player's bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    /// Display name, e.g. "7 Iron".
    pub name: String,
    #[serde(rename = "club_type")]
    pub kind: ClubKind,
    /// Typical carry distance for this player, in yards.
    pub average_distance_yards: f64,
}

impl Club {
    /// Typical carry distance in meters.
    pub fn average_distance_m(&self) -> f64 {
        yards_to_meters(self.average_distance_yards)
    }
}

impl fmt::Display for Club {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} yd)", self.name, self.average_distance_yards)
    }
}

/// The player's bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubSet {
    pub clubs: Vec<Club>,
}

impl ClubSet {
    pub fn new(clubs: Vec<Club>) -> Self {
        Self { clubs }
    }

    /// Suggest a club for a shot of `distance_m` meters.
    ///
    /// Picks the shortest club whose typical carry reaches the target, so the
    /// player swings the most lofted club that can get there. If nothing in
    /// the bag reaches, suggests the longest club. Empty bag returns `None`.
    pub fn suggest(&self, distance_m: f64) -> Option<&Club> {
        let reaching = self
            .clubs
            .iter()
            .filter(|club| club.average_distance_m() >= distance_m)
            .min_by(|a, b| {
                a.average_distance_yards
                    .total_cmp(&b.average_distance_yards)
            });

        reaching.or_else(|| {
            self.clubs
                .iter()
                .max_by(|a, b| {
                    a.average_distance_yards
                        .total_cmp(&b.average_distance_yards)
                })
        })
    }
}
