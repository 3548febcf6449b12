use glob::Pattern;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::{list_candidates, FileFamily};
use crate::error::Error;
use crate::identity::{KeyError, ScanIdentityKey};

/// Identity key → every high-fidelity file carrying it, in encounter order.
///
/// Several TIFFs may share one key; all of them are kept and are selected
/// together as a group.
#[derive(Debug, Default, Clone)]
pub struct CounterpartIndex {
    entries: HashMap<ScanIdentityKey, Vec<String>>,
    unkeyed: Vec<(String, KeyError)>,
}

impl CounterpartIndex {
    /// Index the high-fidelity files directly inside `dir`.
    pub fn build(dir: &Path, ignore_patterns: &[Pattern]) -> Result<Self, Error> {
        let names = list_candidates(dir, FileFamily::HighFidelity, ignore_patterns)?;
        let index = Self::from_file_names(names);
        info!(
            "Found {} valid TIFF files under {} keys in '{}'.",
            index.file_count(),
            index.len(),
            dir.display()
        );
        Ok(index)
    }

    /// Index already-filtered file names.
    pub fn from_file_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();

        for name in names {
            let name = name.into();
            match ScanIdentityKey::from_file_name(&name) {
                Ok(key) => {
                    let files = index.entries.entry(key).or_default();
                    files.push(name);
                }
                Err(e) => {
                    debug!("No key for TIFF '{}': {}", name, e);
                    index.unkeyed.push((name, e));
                }
            }
        }

        index
    }

    pub fn get(&self, key: &ScanIdentityKey) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn file_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Files dropped because no key could be extracted, with the reason.
    pub fn unkeyed(&self) -> &[(String, KeyError)] {
        &self.unkeyed
    }
}
