//! Version Ranges
//!
//! Field dan message pada protokol punya rentang versi masing-masing.
//! Format teks ringkas, sama seperti di schema JSON:
//!
//! ```text
//! "3"     -> hanya versi 3
//! "1-3"   -> versi 1 sampai 3 (inklusif)
//! "1+"    -> versi 1 sampai versi terbaru
//! ```
//!
//! Generator memakai [`VersionRange::coverage`] untuk menentukan apakah
//! sebuah field selalu ada, tidak pernah ada, atau butuh pengecekan versi
//! untuk window versi message.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rentang versi untuk satu field.
///
/// `to` diabaikan jika `up_to_current` bernilai `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    pub from: i16,
    pub to: i16,
    pub up_to_current: bool,
}

/// Himpunan versi yang didukung sebuah message. Selalu terbatas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidVersionRange {
    pub from: i16,
    pub to: i16,
}

/// Cakupan field terhadap window versi message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Field valid untuk semua versi message.
    Full,
    /// Field valid hanya untuk sebagian versi; butuh cabang per versi.
    Partial,
    /// Field tidak pernah valid di window ini.
    None,
}

impl VersionRange {
    /// Rentang `[from, to]`.
    pub const fn new(from: i16, to: i16) -> Self {
        Self {
            from,
            to,
            up_to_current: false,
        }
    }

    /// Rentang terbuka `from+`.
    pub const fn up_to_current(from: i16) -> Self {
        Self {
            from,
            to: 0,
            up_to_current: true,
        }
    }

    /// Hanya satu versi.
    pub const fn single(version: i16) -> Self {
        Self::new(version, version)
    }

    /// Rentang kosong (`from > to`) tidak pernah valid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.up_to_current && self.from > self.to
    }

    /// Apakah `version` termasuk dalam rentang ini.
    #[inline]
    pub fn is_valid(&self, version: i16) -> bool {
        version >= self.from && (self.up_to_current || version <= self.to)
    }

    /// `true` jika field valid untuk *setiap* versi di `valid`.
    ///
    /// Window kosong selalu tercakup.
    pub fn overlaps_fully(&self, valid: &ValidVersionRange) -> bool {
        if valid.is_empty() {
            return true;
        }
        self.from <= valid.from && (self.up_to_current || self.to >= valid.to)
    }

    /// `true` jika field valid untuk minimal satu versi di `valid`.
    pub fn overlaps(&self, valid: &ValidVersionRange) -> bool {
        if valid.is_empty() || self.is_empty() {
            return false;
        }
        let lo = self.from.max(valid.from);
        let hi = if self.up_to_current {
            valid.to
        } else {
            self.to.min(valid.to)
        };
        lo <= hi
    }

    /// Klasifikasi cakupan field terhadap window versi message.
    pub fn coverage(&self, valid: &ValidVersionRange) -> Coverage {
        if self.overlaps_fully(valid) {
            Coverage::Full
        } else if self.overlaps(valid) {
            Coverage::Partial
        } else {
            Coverage::None
        }
    }
}

impl ValidVersionRange {
    pub const fn new(from: i16, to: i16) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    #[inline]
    pub fn contains(&self, version: i16) -> bool {
        version >= self.from && version <= self.to
    }

    /// Iterasi semua versi di window, urut naik.
    pub fn versions(&self) -> impl Iterator<Item = i16> {
        self.from..=self.to
    }
}

/// Hasil parse mentah: `(from, to, open)`.
fn parse_parts(input: &str) -> Result<(i16, Option<i16>, bool)> {
    let text = input.trim();
    let fail = |reason| Error::Parse {
        input: input.to_string(),
        reason,
    };
    let number = |s: &str, reason| -> Result<i16> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail(reason));
        }
        s.parse::<i16>().map_err(|_| fail(reason))
    };

    if let Some(from) = text.strip_suffix('+') {
        return Ok((number(from, "invalid from")?, None, true));
    }

    match text.split_once('-') {
        Some((from, to)) => Ok((
            number(from, "invalid from")?,
            Some(number(to, "invalid to")?),
            false,
        )),
        None => Ok((number(text, "invalid from")?, None, false)),
    }
}

impl FromStr for VersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (from, to, open) = parse_parts(s)?;
        Ok(match (to, open) {
            (_, true) => VersionRange::up_to_current(from),
            (Some(to), false) => VersionRange::new(from, to),
            (None, false) => VersionRange::single(from),
        })
    }
}

impl FromStr for ValidVersionRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (from, to, open) = parse_parts(s)?;
        if open {
            return Err(Error::Parse {
                input: s.to_string(),
                reason: "valid versions must be bounded",
            });
        }
        Ok(ValidVersionRange::new(from, to.unwrap_or(from)))
    }
}

/// Parse teks version range field (`"N"`, `"N-M"`, `"N+"`).
pub fn parse_version_range(text: &str) -> Result<VersionRange> {
    text.parse()
}

/// Parse teks valid versions message (`"N"`, `"N-M"`).
pub fn parse_valid_version_range(text: &str) -> Result<ValidVersionRange> {
    text.parse()
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.up_to_current {
            write!(f, "{}+", self.from)
        } else if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

impl fmt::Display for ValidVersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

impl TryFrom<String> for VersionRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<VersionRange> for String {
    fn from(value: VersionRange) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ValidVersionRange {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ValidVersionRange> for String {
    fn from(value: ValidVersionRange) -> Self {
        value.to_string()
    }
}
