//! CLI command implementations.

pub mod simulate;
pub mod validate;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Read and deserialize a JSON file, attributing failures to the path.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let data = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use fairway::course::Course;

    use super::*;

    #[test]
    fn test_load_json_reads_course() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name":"Tiny","holes":[{{"number":1,"par":3,"coordinates":[[36.5713,-121.9505],[36.5720,-121.9510]]}}]}}"#
        )
        .unwrap();

        let course: Course = load_json(file.path()).unwrap();
        assert_eq!(course.name, "Tiny");
        assert_eq!(course.holes.len(), 1);
    }

    #[test]
    fn test_load_json_missing_file() {
        let result: Result<Course, _> = load_json(Path::new("/nonexistent/course.json"));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }

    #[test]
    fn test_load_json_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result: Result<Course, _> = load_json(file.path());
        assert!(matches!(result, Err(CliError::Parse { .. })));
    }
}
