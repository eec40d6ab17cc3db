//! Error types untuk codec, version range dan streaming layer.

use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Error utama kwire.
#[derive(Debug, Error)]
pub enum Error {
    /// Teks version range tidak valid.
    #[error("unable to parse version range {input:?}: {reason}")]
    Parse { input: String, reason: &'static str },

    /// Decode melewati akhir buffer.
    #[error("insufficient data to decode: need {needed} bytes, have {remaining}")]
    InsufficientData { needed: usize, remaining: usize },

    /// Varint lebih dari 10 byte atau melebihi 64 bit.
    #[error("var int overflow")]
    VarIntOverflow,

    /// Prefix `-1` pada string non-nullable.
    #[error("null string")]
    NullString,

    /// Prefix panjang negatif selain sentinel `-1`.
    #[error("invalid length prefix: {0}")]
    InvalidLength(i64),

    /// Isi string bukan UTF-8.
    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    /// Nilai terlalu panjang untuk length prefix-nya.
    #[error("{kind} of {len} bytes does not fit its length prefix")]
    Oversized { kind: &'static str, len: usize },

    /// Frame melebihi batas yang dikonfigurasi.
    #[error("frame of {size} bytes exceeds maximum of {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// Konfigurasi tidak valid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Ring buffer ditutup di tengah operasi.
    #[error("stream closed")]
    Closed,

    /// I/O error dari sink/source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// `true` jika buffer kekurangan data (bisa dicoba lagi dengan buffer yang lebih lengkap).
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}

/// `Result` khusus kwire.
pub type Result<T> = std::result::Result<T, Error>;
