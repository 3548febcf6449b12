//! Identity keys derived from scan file names.
//!
//! A scanner writes the front and back of every page under names such as
//! `10001.jpg` / `10001.tif`. The first digit of the base name is the capture
//! role (`1` front, `2` back) and the last four digits are the page sequence.
//! Files from either format that share both parts describe the same capture.

use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("no digit in file name")]
    NoDigit,

    #[error("expected at least 4 digits in file name, found {found}")]
    TooFewDigits { found: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanIdentityKey {
    pub role_digit: char,
    pub sequence_id: String,
}

impl ScanIdentityKey {
    pub fn from_file_name(file_name: &str) -> Result<Self, KeyError> {
        Ok(Self {
            role_digit: extract_role_digit(file_name)?,
            sequence_id: extract_sequence_id(file_name)?,
        })
    }
}

impl fmt::Display for ScanIdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.role_digit, self.sequence_id)
    }
}

/// File name without its final extension.
pub fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name)
}

pub fn extract_role_digit(file_name: &str) -> Result<char, KeyError> {
    base_name(file_name)
        .chars()
        .find(char::is_ascii_digit)
        .ok_or(KeyError::NoDigit)
}

/// Last four of all digits in the base name, in their original order.
/// Non-digit characters are skipped rather than treated as separators.
pub fn extract_sequence_id(file_name: &str) -> Result<String, KeyError> {
    let digits: Vec<char> = base_name(file_name)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.len() < 4 {
        return Err(KeyError::TooFewDigits {
            found: digits.len(),
        });
    }
    Ok(digits[digits.len() - 4..].iter().collect())
}

pub fn is_valid_compressed_name(file_name: &str) -> bool {
    second_char_is(file_name, '1')
}

pub fn is_valid_high_fidelity_name(file_name: &str) -> bool {
    second_char_is(file_name, '0')
}

fn second_char_is(file_name: &str, digit: char) -> bool {
    base_name(file_name).chars().nth(1) == Some(digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_digit_is_first_digit() {
        assert_eq!(extract_role_digit("10001.jpg"), Ok('1'));
        assert_eq!(extract_role_digit("scan_2-0001.tif"), Ok('2'));
        assert_eq!(extract_role_digit("front.jpg"), Err(KeyError::NoDigit));
    }

    #[test]
    fn test_role_digit_ignores_extension_digits() {
        assert_eq!(extract_role_digit("page.mp4"), Err(KeyError::NoDigit));
    }

    #[test]
    fn test_sequence_id_takes_last_four_digits() {
        assert_eq!(extract_sequence_id("10001.jpg").unwrap(), "0001");
        assert_eq!(extract_sequence_id("21234567.jpg").unwrap(), "4567");
        assert_eq!(extract_sequence_id("1a0b0c9d9.tif").unwrap(), "0099");
    }

    #[test]
    fn test_sequence_id_needs_four_digits() {
        assert_eq!(
            extract_sequence_id("1x23.jpg"),
            Err(KeyError::TooFewDigits { found: 3 })
        );
        // the extension never contributes digits
        assert_eq!(
            extract_sequence_id("123.0004"),
            Err(KeyError::TooFewDigits { found: 3 })
        );
    }

    #[test]
    fn test_key_ignores_surrounding_digits() {
        let jpg = ScanIdentityKey::from_file_name("1100042.jpg").unwrap();
        let tif = ScanIdentityKey::from_file_name("1-0-7-0042.tif").unwrap();
        assert_eq!(jpg, tif);
        assert_eq!(jpg.to_string(), "(1, 0042)");
    }

    #[test]
    fn test_valid_compressed_name() {
        assert!(is_valid_compressed_name("21234.jpg"));
        assert!(!is_valid_compressed_name("20234.jpg"));
        assert!(!is_valid_compressed_name("2.jpg"));
        assert!(!is_valid_compressed_name("a.jpg"));
    }

    #[test]
    fn test_valid_high_fidelity_name() {
        assert!(is_valid_high_fidelity_name("10001.tif"));
        assert!(is_valid_high_fidelity_name("20999.TIFF"));
        assert!(!is_valid_high_fidelity_name("11001.tif"));
        assert!(!is_valid_high_fidelity_name("1.tif"));
    }

    #[test]
    fn test_base_name_strips_only_last_extension() {
        assert_eq!(base_name("10001.tif"), "10001");
        assert_eq!(base_name("10001.back.tif"), "10001.back");
        assert_eq!(base_name("10001"), "10001");
    }
}
