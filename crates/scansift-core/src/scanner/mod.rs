mod index;
mod listing;

pub use index::CounterpartIndex;
pub use listing::{compile_ignore_patterns, list_candidates};

use std::fmt;

use crate::identity::{is_valid_compressed_name, is_valid_high_fidelity_name};

/// The two captured representations of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFamily {
    /// Lossy JPG raster.
    Compressed,
    /// Lossless TIFF raster, the archival candidate.
    HighFidelity,
}

impl FileFamily {
    /// Recognised extensions, in lookup preference order.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFamily::Compressed => &["jpg", "jpeg"],
            FileFamily::HighFidelity => &["tif", "tiff"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileFamily::Compressed => "JPG",
            FileFamily::HighFidelity => "TIFF",
        }
    }

    pub fn has_extension(self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self
                .extensions()
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)),
            None => false,
        }
    }

    pub fn has_valid_name(self, file_name: &str) -> bool {
        match self {
            FileFamily::Compressed => is_valid_compressed_name(file_name),
            FileFamily::HighFidelity => is_valid_high_fidelity_name(file_name),
        }
    }

    /// Extension and naming rule both hold.
    pub fn accepts(self, file_name: &str) -> bool {
        self.has_extension(file_name) && self.has_valid_name(file_name)
    }
}

impl fmt::Display for FileFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(FileFamily::Compressed.has_extension("11234.JPG"));
        assert!(FileFamily::Compressed.has_extension("11234.Jpeg"));
        assert!(FileFamily::HighFidelity.has_extension("10001.TIFF"));
        assert!(!FileFamily::HighFidelity.has_extension("10001.jpg"));
        assert!(!FileFamily::Compressed.has_extension("jpg"));
    }

    #[test]
    fn test_accepts_requires_name_rule() {
        assert!(FileFamily::Compressed.accepts("21234.jpg"));
        assert!(!FileFamily::Compressed.accepts("20234.jpg"));
        assert!(FileFamily::HighFidelity.accepts("20234.tif"));
        assert!(!FileFamily::HighFidelity.accepts("20234.jpg"));
    }
}
