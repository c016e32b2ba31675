//! Validate command - check a course file and print its layout.

use std::path::Path;

use fairway::course::Course;

use super::load_json;
use crate::error::CliError;

/// Run the validate command.
pub fn run(path: &Path) -> Result<(), CliError> {
    let course: Course = load_json(path)?;
    course.validate()?;

    println!("{}", course);
    println!("{}", "=".repeat(course.to_string().len()));
    println!();
    for hole in &course.holes {
        let hazards = match hole.hazards.len() {
            0 => "no hazards".to_string(),
            1 => "1 hazard".to_string(),
            n => format!("{} hazards", n),
        };
        println!(
            "  Hole {:>2}  par {}  {:>5.0} m  {}",
            hole.number,
            hole.par,
            hole.length_m(),
            hazards
        );
    }
    println!();
    println!("Total par: {}", course.total_par());
    println!("Course data is valid.");
    Ok(())
}
