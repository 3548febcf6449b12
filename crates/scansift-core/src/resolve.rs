//! Map decision records back to files on disk.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::decision::{DecisionRecord, SelectedFormat};
use crate::scanner::FileFamily;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolved {
    pub found: Vec<PathBuf>,
    /// Document base names with no file under any family extension.
    pub missing: Vec<String>,
}

impl Resolved {
    fn merge(&mut self, other: Resolved) {
        self.found.extend(other.found);
        self.missing.extend(other.missing);
    }
}

/// Locate each document in `dir`, trying the family's extensions in order.
pub fn resolve_documents<'a, I>(dir: &Path, documents: I, family: FileFamily) -> Resolved
where
    I: IntoIterator<Item = &'a str>,
{
    let mut resolved = Resolved::default();

    for document in documents {
        let hit = family
            .extensions()
            .iter()
            .map(|ext| dir.join(format!("{}.{}", document, ext)))
            .find(|candidate| candidate.exists());

        match hit {
            Some(path) => resolved.found.push(path),
            None => {
                warn!(
                    "{} file '{}' not found with extensions {}.",
                    family,
                    document,
                    family
                        .extensions()
                        .iter()
                        .map(|ext| format!(".{}", ext))
                        .collect::<Vec<_>>()
                        .join(" or ")
                );
                resolved.missing.push(document.to_string());
            }
        }
    }

    resolved
}

/// TIFF files behind every flagged record.
pub fn flagged_files(records: &[DecisionRecord], tif_dir: &Path) -> Resolved {
    let mut resolved = Resolved::default();
    for record in records.iter().filter(|record| record.flagged) {
        resolved.merge(resolve_documents(
            tif_dir,
            record.documents(),
            FileFamily::HighFidelity,
        ));
    }
    if resolved.found.is_empty() {
        info!("No flagged files found.");
    }
    resolved
}

/// The file each record selected, from whichever folder its format lives in.
pub fn selected_files(records: &[DecisionRecord], jpg_dir: &Path, tif_dir: &Path) -> Resolved {
    let mut resolved = Resolved::default();
    for record in records {
        let (dir, family) = match record.selected_format {
            SelectedFormat::Jpg => (jpg_dir, FileFamily::Compressed),
            SelectedFormat::Tiff | SelectedFormat::Intermediate => {
                (tif_dir, FileFamily::HighFidelity)
            }
        };
        resolved.merge(resolve_documents(dir, record.documents(), family));
    }
    if resolved.found.is_empty() {
        info!("No selected files found.");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_tries_each_extension_in_order() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("10001.tiff"), b"x").unwrap();
        fs::write(tmp.path().join("10002.tif"), b"x").unwrap();
        fs::write(tmp.path().join("10002.tiff"), b"x").unwrap();

        let resolved = resolve_documents(
            tmp.path(),
            "10001, 10002, 10003".split(", "),
            FileFamily::HighFidelity,
        );
        assert_eq!(
            resolved.found,
            vec![tmp.path().join("10001.tiff"), tmp.path().join("10002.tif")]
        );
        assert_eq!(resolved.missing, vec!["10003".to_string()]);
    }

    #[test]
    fn test_jpeg_extension_is_accepted() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("21234.jpeg"), b"x").unwrap();

        let resolved = resolve_documents(tmp.path(), ["21234"], FileFamily::Compressed);
        assert_eq!(resolved.found, vec![tmp.path().join("21234.jpeg")]);
        assert!(resolved.missing.is_empty());
    }
}
