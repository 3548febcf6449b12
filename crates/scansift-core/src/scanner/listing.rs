use glob::Pattern;
use std::io;
use std::path::Path;
use tracing::{debug, error};
use walkdir::WalkDir;

use super::FileFamily;

pub fn compile_ignore_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

/// File names directly inside `dir` that belong to `family`.
///
/// Not recursive. Entries are returned sorted by name so repeated runs over an
/// unchanged directory see the same order. Names matching an ignore pattern
/// are treated as absent. Any error reading the directory itself is returned.
pub fn list_candidates(
    dir: &Path,
    family: FileFamily,
    ignore_patterns: &[Pattern],
) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            io::Error::new(
                err.io_error().map_or(io::ErrorKind::Other, |e| e.kind()),
                format!("Error reading directory {}: {}", dir.display(), err),
            )
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };

        if ignore_patterns.iter().any(|pattern| pattern.matches(name)) {
            debug!("Ignoring '{}'", name);
            continue;
        }

        if family.accepts(name) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lists_only_accepted_files_in_name_order() {
        let tmp = tempdir().unwrap();
        for name in ["21234.jpg", "11111.JPEG", "20234.jpg", "10001.tif", "notes.txt"] {
            fs::write(tmp.path().join(name), b"x").unwrap();
        }
        fs::create_dir(tmp.path().join("11999.jpg")).unwrap();

        let names = list_candidates(tmp.path(), FileFamily::Compressed, &[]).unwrap();
        assert_eq!(names, vec!["11111.JPEG", "21234.jpg"]);
    }

    #[test]
    fn test_ignore_patterns_hide_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("10001.tif"), b"x").unwrap();
        fs::write(tmp.path().join("10002_old.tif"), b"x").unwrap();

        let ignore = compile_ignore_patterns(&["*_old.*".to_string(), "[".to_string()]);
        assert_eq!(ignore.len(), 1);

        let names = list_candidates(tmp.path(), FileFamily::HighFidelity, &ignore).unwrap();
        assert_eq!(names, vec!["10001.tif"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("TIF");
        assert!(list_candidates(&missing, FileFamily::HighFidelity, &[]).is_err());
    }
}
