//! Course, hole, and hazard types.
//!
//! The wire shape mirrors the companion backend's course payload: each hole
//! carries a two-element `coordinates` array (`[tee, pin]`) and hazards a
//! `coords` pair. The Rust model exposes named `tee`/`pin`/`location` fields
//! and maps the wire shape during (de)serialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};

/// Kind of course hazard tracked for live distance reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HazardKind {
    Bunker,
    Water,
    OutOfBounds,
    /// Anything the course data names that we don't classify.
    #[serde(other)]
    Other,
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HazardKind::Bunker => write!(f, "bunker"),
            HazardKind::Water => write!(f, "water"),
            HazardKind::OutOfBounds => write!(f, "out-of-bounds"),
            HazardKind::Other => write!(f, "hazard"),
        }
    }
}

/// A point hazard on a hole. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Hazard classification.
    #[serde(rename = "type")]
    pub kind: HazardKind,
    /// Hazard location.
    #[serde(rename = "coords")]
    pub location: Coordinate,
}

/// Wire shape for a hole: tee and pin travel as a two-element array.
#[derive(Serialize, Deserialize)]
struct HoleWire {
    number: u32,
    par: u32,
    coordinates: (Coordinate, Coordinate),
    #[serde(default)]
    hazards: Vec<Hazard>,
}

impl From<HoleWire> for Hole {
    fn from(wire: HoleWire) -> Self {
        Self {
            number: wire.number,
            par: wire.par,
            tee: wire.coordinates.0,
            pin: wire.coordinates.1,
            hazards: wire.hazards,
        }
    }
}

impl From<Hole> for HoleWire {
    fn from(hole: Hole) -> Self {
        Self {
            number: hole.number,
            par: hole.par,
            coordinates: (hole.tee, hole.pin),
            hazards: hole.hazards,
        }
    }
}

/// One hole of a course.
///
/// Invariants (enforced by [`Course::validate`], not at construction):
/// positive par, unique number within the course, tee distinct from pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HoleWire", into = "HoleWire")]
pub struct Hole {
    /// Hole number, 1-based and consecutive within a course.
    pub number: u32,
    /// Par for the hole.
    pub par: u32,
    /// Tee box location.
    pub tee: Coordinate,
    /// Pin (cup) location.
    pub pin: Coordinate,
    /// Hazards in course-data order.
    pub hazards: Vec<Hazard>,
}

impl Hole {
    /// Straight-line tee-to-pin length in meters.
    pub fn length_m(&self) -> f64 {
        geo::distance_m(&self.tee, &self.pin)
    }
}

impl fmt::Display for Hole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hole {} (par {})", self.number, self.par)
    }
}

/// A golf course: a named, ordered sequence of holes.
///
/// Constructed from external input at round start, immutable for the
/// duration of a round, discarded when the round ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course name.
    pub name: String,
    /// Holes in play order.
    pub holes: Vec<Hole>,
}

impl Course {
    /// Look up a hole by number. O(holes), which is fine at course sizes
    /// (18-36 holes).
    pub fn hole(&self, number: u32) -> Option<&Hole> {
        self.holes.iter().find(|h| h.number == number)
    }

    /// Number of the first hole in play order, if any.
    pub fn first_hole_number(&self) -> Option<u32> {
        self.holes.first().map(|h| h.number)
    }

    /// Number of the final hole in play order, if any.
    pub fn last_hole_number(&self) -> Option<u32> {
        self.holes.last().map(|h| h.number)
    }

    /// Number of holes on the course.
    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// Total par across all holes.
    pub fn total_par(&self) -> u32 {
        self.holes.iter().map(|h| h.par).sum()
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} holes)", self.name, self.holes.len())
    }
}
