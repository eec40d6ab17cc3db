//! kwire - Kafka-style Wire Protocol Runtime
//!
//! Arsitektur:
//! - Version Model: `"N"`, `"N+"`, `"N-M"` untuk menandai versi field
//! - Binary Codec: big-endian, string/bytes/array dengan length prefix, zigzag varint
//! - SPSC Ring Buffer: byte ring blocking dengan backpressure untuk pipeline I/O -> decode
//! - Network: pump (mio) + frame reader di atas ring buffer
//!
//! ```
//! use kwire::protocol::{Decoder, Encoder, RequestHeader};
//!
//! let mut buf: Vec<u8> = Vec::new();
//! let mut e = Encoder::new(&mut buf);
//! RequestHeader::new(3, 1, 42).with_client_id("kwire").encode(&mut e);
//! e.finish().unwrap();
//!
//! let header = RequestHeader::decode(&mut Decoder::new(&buf)).unwrap();
//! assert_eq!(header.correlation_id, 42);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod protocol;

pub use error::{Error, Result};
