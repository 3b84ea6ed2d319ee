//! Band numbers
//!
//! Decimal text padded to at least four digits, compared by integer value so
//! that `9999` < `10000` even though `"10000" < "9999"` as strings.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{DuraError, Result};

/// Minimum number of digits in a canonical band number
pub const BAND_NUMBER_WIDTH: usize = 4;

/// Prefix of band directory names: `b0000`, `b0001`, ...
pub const BAND_DIR_PREFIX: char = 'b';

/// Pad a decimal digit string to the canonical band number width.
///
/// Fails with `InvalidFormat` if `input` is empty or contains anything but
/// ASCII digits. Numbers longer than the width are returned unchanged.
pub fn canonicalize(input: &str) -> Result<String> {
    if !is_digits(input) {
        return Err(DuraError::InvalidFormat(input.to_string()));
    }
    Ok(format!("{:0>width$}", input, width = BAND_NUMBER_WIDTH))
}

/// Extract the digits from a band directory name like `b0042`.
///
/// Anything else (other files in the archive root, temp files) is `None`.
pub fn match_band_name(name: &str) -> Option<&str> {
    let digits = name.strip_prefix(BAND_DIR_PREFIX)?;
    is_digits(digits).then_some(digits)
}

/// Compare two digit strings by the integers they denote.
///
/// Leading zeros are ignored; after trimming, a longer string is the larger
/// number and equal lengths compare lexicographically.
pub fn compare(a: &str, b: &str) -> Ordering {
    let a = trim_zeros(a);
    let b = trim_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip leading zeros, keeping a single "0" for zero itself
fn trim_zeros(s: &str) -> &str {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() && !s.is_empty() {
        &s[s.len() - 1..]
    } else {
        trimmed
    }
}

/// Canonical identifier of one band within an archive
///
/// Equality, ordering and hashing all go by integer value, so `"0900"` and
/// `"00900"` are the same band.
#[derive(Clone)]
pub struct BandNumber {
    digits: String,
}

impl BandNumber {
    /// Parse and canonicalize band number text
    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self {
            digits: canonicalize(input)?,
        })
    }

    /// The first band in an archive: `0000`
    pub fn zero() -> Self {
        Self {
            digits: "0".repeat(BAND_NUMBER_WIDTH),
        }
    }

    /// Parse a band directory name (`b0042`), if it is one
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match_band_name(name).and_then(|digits| Self::parse(digits).ok())
    }

    /// The following band number.
    ///
    /// Increments the decimal text directly so there is no upper bound.
    pub fn next(&self) -> Self {
        let mut bytes = trim_zeros(&self.digits).as_bytes().to_vec();
        let mut carry = true;
        for b in bytes.iter_mut().rev() {
            if !carry {
                break;
            }
            if *b == b'9' {
                *b = b'0';
            } else {
                *b += 1;
                carry = false;
            }
        }
        if carry {
            bytes.insert(0, b'1');
        }
        let incremented: String = bytes.iter().map(|&b| b as char).collect();
        Self {
            digits: format!("{:0>width$}", incremented, width = BAND_NUMBER_WIDTH),
        }
    }

    /// The canonical digits, e.g. `"0042"`
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Name of this band's directory under the archive root, e.g. `"b0042"`
    pub fn dir_name(&self) -> String {
        format!("{}{}", BAND_DIR_PREFIX, self.digits)
    }
}

impl FromStr for BandNumber {
    type Err = DuraError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for BandNumber {
    fn as_ref(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for BandNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

impl fmt::Debug for BandNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BandNumber({})", self.digits)
    }
}

impl PartialEq for BandNumber {
    fn eq(&self, other: &Self) -> bool {
        compare(&self.digits, &other.digits) == Ordering::Equal
    }
}

impl Eq for BandNumber {}

impl PartialOrd for BandNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BandNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(&self.digits, &other.digits)
    }
}

impl Hash for BandNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        trim_zeros(&self.digits).hash(state);
    }
}

impl PartialEq<str> for BandNumber {
    fn eq(&self, other: &str) -> bool {
        is_digits(other) && compare(&self.digits, other) == Ordering::Equal
    }
}

impl PartialEq<&str> for BandNumber {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
