//! Protocol Layer: Kafka-style Binary Encoding
//!
//! Prinsip desain:
//! - Big-endian, layout byte-exact
//! - Decoder zero-copy: string dan bytes meminjam buffer input
//! - Encoder sticky-error: rangkai `put_*`, cek error sekali di `finish()`
//! - Version range menentukan field mana yang ada di versi tertentu

mod decoder;
mod encoder;
mod header;
pub mod sizeof;
pub mod version;

pub use decoder::Decoder;
pub use encoder::{Encoder, MAX_VARINT_LEN};
pub use header::{RequestHeader, ResponseHeader};
pub use version::{
    parse_valid_version_range, parse_version_range, Coverage, ValidVersionRange, VersionRange,
};
