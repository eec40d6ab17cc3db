//! Network Layer: socket -> ring buffer -> frame
//!
//! Satu thread pump (mio) membaca socket dan menulis ke ring buffer;
//! thread pemanggil memotong isi ring menjadi frame Kafka dan men-decode.
//! Ring buffer memberi backpressure: decode lambat = pump berhenti membaca.

mod frame;
mod pump;

pub use frame::{encode_frame, FrameReader, FRAME_PREFIX_SIZE};
pub use pump::Pump;

use std::io::Read;
use std::net::TcpStream;

use crate::config::StreamConfig;
use crate::core::{RingBuffer, RingReader};
use crate::error::Result;

/// Sambungkan socket ke frame reader lewat pump + ring buffer.
///
/// Drop `FrameReader` menutup ring; pump berhenti dalam satu
/// `poll_interval`. Drop `Pump` tidak menghentikan stream.
pub fn open_frame_stream(
    stream: TcpStream,
    config: &StreamConfig,
) -> Result<(FrameReader<RingReader>, Pump)> {
    config.validate()?;
    let (writer, reader) = RingBuffer::with_capacity(config.ring_capacity);
    let pump = Pump::spawn_tcp(stream, writer, config)?;
    Ok((FrameReader::new(reader, config.max_frame_size), pump))
}

/// Sama seperti [`open_frame_stream`] untuk sumber `Read` yang blocking.
pub fn open_reader_stream<R>(
    source: R,
    config: &StreamConfig,
) -> Result<(FrameReader<RingReader>, Pump)>
where
    R: Read + Send + 'static,
{
    config.validate()?;
    let (writer, reader) = RingBuffer::with_capacity(config.ring_capacity);
    let pump = Pump::spawn_reader(source, writer, config)?;
    Ok((FrameReader::new(reader, config.max_frame_size), pump))
}
