//! Textual bit-string key material.
//!
//! The gateway hands out its shared key and IV as strings of ASCII `0`/`1`
//! digits. [`BitString::to_bytes`] turns them into raw bytes by grouping eight
//! digits at a time from the least-significant (rightmost) end; the leftmost
//! group may be shorter and is parsed as-is.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while decoding a [`BitString`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitStringError {
    /// A character other than `0` or `1` was found.
    #[error("invalid binary digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
}

/// A big-endian sequence of binary digits.
///
/// `Debug` never prints the digits; the value is usually key material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitString(String);

impl BitString {
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    /// Render bytes as eight zero-padded digits each.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|b| format!("{b:08b}")).collect())
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into `ceil(len / 8)` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BitStringError::InvalidDigit`] for the first non-binary
    /// character, scanning groups from the rightmost end.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BitStringError> {
        let digits = self.0.as_bytes();
        let mut out = Vec::with_capacity(digits.len().div_ceil(8));

        let mut end = digits.len();
        while end > 0 {
            let start = end.saturating_sub(8);
            let mut byte = 0u8;
            for (offset, &digit) in digits[start..end].iter().enumerate() {
                let bit = match digit {
                    b'0' => 0,
                    b'1' => 1,
                    _ => {
                        let position = start + offset;
                        let found = self
                            .0
                            .get(position..)
                            .and_then(|rest| rest.chars().next())
                            .unwrap_or(char::from(digit));
                        return Err(BitStringError::InvalidDigit { position, found });
                    }
                };
                byte = (byte << 1) | bit;
            }
            out.push(byte);
            end = start;
        }

        // Groups were collected least-significant first.
        out.reverse();
        Ok(out)
    }
}

impl From<&str> for BitString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString(<{} digits>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_octets_decode_big_endian() {
        let b = BitString::new("0000000111111111");
        assert_eq!(b.to_bytes().unwrap(), vec![0x01, 0xFF]);
    }

    #[test]
    fn short_leading_group_is_parsed_as_is() {
        // "101" + "00000001" → 0x05, 0x01
        let b = BitString::new("10100000001");
        assert_eq!(b.to_bytes().unwrap(), vec![0x05, 0x01]);
    }

    #[test]
    fn byte_count_is_ceil_of_len_over_eight() {
        for n in 1..=40 {
            let b = BitString::new("1".repeat(n));
            assert_eq!(b.to_bytes().unwrap().len(), n.div_ceil(8), "len {n}");
        }
    }

    #[test]
    fn empty_string_yields_no_bytes() {
        assert_eq!(BitString::new("").to_bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn from_bytes_round_trips() {
        let bytes = [0x00, 0x7F, 0x80, 0xAB, 0xFF];
        let b = BitString::from_bytes(&bytes);
        assert_eq!(b.len(), 40);
        assert_eq!(b.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn reserialising_restores_digits_up_to_leading_zeros() {
        let original = "1100000001";
        let bytes = BitString::new(original).to_bytes().unwrap();
        let rendered = BitString::from_bytes(&bytes);
        // The leading group "11" is widened to "00000011".
        assert_eq!(rendered.0, format!("000000{original}"));
    }

    #[test]
    fn invalid_digit_reports_position() {
        let err = BitString::new("0000000100000002").to_bytes().unwrap_err();
        assert_eq!(
            err,
            BitStringError::InvalidDigit {
                position: 15,
                found: '2'
            }
        );
    }

    #[test]
    fn non_ascii_digit_is_rejected() {
        assert!(BitString::new("0101é").to_bytes().is_err());
    }

    #[test]
    fn debug_hides_digits() {
        let b = BitString::new("01010101");
        let rendered = format!("{b:?}");
        assert!(!rendered.contains("0101"));
        assert!(rendered.contains("8 digits"));
    }
}
