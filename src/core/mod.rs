//! Core module: Blocking SPSC Byte Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free data path: cursor atomic, data tidak pernah lewat lock
//! - No-Allocation: buffer pre-allocated saat init, kapasitas tetap
//! - Backpressure: writer menunggu reader (dan sebaliknya) tanpa busy-wait

mod ring_buffer;

pub use ring_buffer::{CloseHandle, RingBuffer, RingReader, RingWriter, Transfer};
