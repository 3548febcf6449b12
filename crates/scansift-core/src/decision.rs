use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;
use crate::identity::{base_name, ScanIdentityKey};

pub const DEFAULT_LOW_THRESHOLD: f64 = 10.0;
pub const DEFAULT_HIGH_THRESHOLD: f64 = 15.0;

/// Gray-percentage band limits. Always satisfies `low < high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    low: f64,
    high: f64,
}

impl Thresholds {
    pub fn new(low: f64, high: f64) -> Result<Self, Error> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(Error::InvalidThresholds { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Both limits belong to the middle band.
    pub fn classify(&self, gray_pct: f64) -> SelectedFormat {
        if gray_pct < self.low {
            SelectedFormat::Tiff
        } else if gray_pct > self.high {
            SelectedFormat::Jpg
        } else {
            SelectedFormat::Intermediate
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedFormat {
    /// Mostly binary page, keep the TIFF.
    Tiff,
    /// Gray-heavy page, the JPG is good enough.
    Jpg,
    /// Between the thresholds; TIFF kept and routed to manual review.
    Intermediate,
}

impl SelectedFormat {
    pub fn label(self) -> &'static str {
        match self {
            SelectedFormat::Tiff => "TIFF",
            SelectedFormat::Jpg => "JPG",
            SelectedFormat::Intermediate => "TIF (Intermediate)",
        }
    }

    pub fn is_flagged(self) -> bool {
        self == SelectedFormat::Intermediate
    }
}

impl fmt::Display for SelectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Numeric ordering key. A part that cannot be read as a number sorts after
/// every numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub role: Option<u32>,
    pub sequence: Option<u32>,
}

impl SortKey {
    pub fn from_identity(key: &ScanIdentityKey) -> Self {
        Self {
            role: key.role_digit.to_digit(10),
            sequence: key.sequence_id.parse().ok(),
        }
    }

    fn rank(part: Option<u32>) -> u64 {
        part.map_or(u64::MAX, u64::from)
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (Self::rank(self.role), Self::rank(self.sequence))
            .cmp(&(Self::rank(other.role), Self::rank(other.sequence)))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One format decision for one compressed file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub sort_key: SortKey,
    /// Comma-space joined base names of the selected file(s).
    pub selected_documents: String,
    /// Gray percentage with exactly two decimals.
    pub gray_percentage_text: String,
    pub selected_format: SelectedFormat,
    pub flagged: bool,
}

impl DecisionRecord {
    pub fn new(
        key: &ScanIdentityKey,
        compressed_file: &str,
        counterparts: &[String],
        gray_pct: f64,
        selected_format: SelectedFormat,
    ) -> Self {
        let selected_documents = match selected_format {
            SelectedFormat::Jpg => base_name(compressed_file).to_string(),
            SelectedFormat::Tiff | SelectedFormat::Intermediate => counterparts
                .iter()
                .map(|name| base_name(name))
                .collect::<Vec<_>>()
                .join(", "),
        };

        Self {
            sort_key: SortKey::from_identity(key),
            selected_documents,
            gray_percentage_text: format!("{:.2}", gray_pct),
            selected_format,
            flagged: selected_format.is_flagged(),
        }
    }

    /// `Yes`/`No` as written to the Flagged_Files log column.
    pub fn flagged_text(&self) -> &'static str {
        if self.flagged {
            "Yes"
        } else {
            "No"
        }
    }

    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.selected_documents
            .split(", ")
            .filter(|doc| !doc.is_empty())
    }
}
