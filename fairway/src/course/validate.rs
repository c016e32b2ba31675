//! Load-time course validation.
//!
//! Runs once when course data is loaded, before any tracking starts. A round
//! must not start against an invalid course; the host surfaces the error and
//! re-fetches or corrects the data.

use thiserror::Error;

use crate::geo::GeoError;

use super::model::Course;

/// Errors found while validating course data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CourseError {
    /// The course has no holes at all.
    #[error("course has no holes")]
    NoHoles,

    /// Hole numbering is not consecutive starting at 1.
    #[error("hole numbering must be consecutive from 1 (found hole {found} at position {position})")]
    NonConsecutiveNumbering { position: usize, found: u32 },

    /// A hole has par 0.
    #[error("hole {number}: par must be positive")]
    NonPositivePar { number: u32 },

    /// A tee or pin coordinate is malformed.
    #[error("hole {number}: {field} coordinate invalid: {source}")]
    BadCoordinate {
        number: u32,
        field: &'static str,
        source: GeoError,
    },

    /// Tee and pin are the same point.
    #[error("hole {number}: tee and pin are the same point")]
    DegenerateHole { number: u32 },

    /// A hazard coordinate is malformed.
    #[error("hole {number}: hazard {index} coordinate invalid: {source}")]
    BadHazardCoordinate {
        number: u32,
        index: usize,
        source: GeoError,
    },
}

impl Course {
    /// Validate the course before a round starts.
    ///
    /// Checks: holes non-empty; numbering consecutive from 1; positive par;
    /// well-formed, distinct tee and pin per hole; well-formed hazard
    /// coordinates. Returns the first problem found.
    pub fn validate(&self) -> Result<(), CourseError> {
        if self.holes.is_empty() {
            return Err(CourseError::NoHoles);
        }

        for (position, hole) in self.holes.iter().enumerate() {
            let expected = position as u32 + 1;
            if hole.number != expected {
                return Err(CourseError::NonConsecutiveNumbering {
                    position,
                    found: hole.number,
                });
            }

            if hole.par == 0 {
                return Err(CourseError::NonPositivePar {
                    number: hole.number,
                });
            }

            hole.tee
                .validate()
                .map_err(|source| CourseError::BadCoordinate {
                    number: hole.number,
                    field: "tee",
                    source,
                })?;
            hole.pin
                .validate()
                .map_err(|source| CourseError::BadCoordinate {
                    number: hole.number,
                    field: "pin",
                    source,
                })?;

            if hole.tee == hole.pin {
                return Err(CourseError::DegenerateHole {
                    number: hole.number,
                });
            }

            for (index, hazard) in hole.hazards.iter().enumerate() {
                hazard
                    .location
                    .validate()
                    .map_err(|source| CourseError::BadHazardCoordinate {
                        number: hole.number,
                        index,
                        source,
                    })?;
            }
        }

        Ok(())
    }
}
