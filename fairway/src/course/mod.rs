//! Course data model and validation
//!
//! In-memory representation of a golf course - ordered holes with tee/pin
//! coordinates and point hazards - plus the validation pass that runs once
//! when course data is loaded, before any tracking starts.
//!
//! Course data arrives from outside the core (typically the deserialized
//! body of a `GET courses/{id}` response, or a static JSON fixture); this
//! module only validates and consumes it.

mod model;
mod validate;

pub use model::{Course, Hazard, HazardKind, Hole};
pub use validate::CourseError;

#[cfg(test)]
pub(crate) use model::fixtures;
