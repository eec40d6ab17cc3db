//! Framing: `[size: int32 BE][payload: size bytes]`
//!
//! Setiap request/response Kafka di atas TCP dibungkus seperti ini.
//! [`FrameReader`] memotong stream jadi frame utuh; [`encode_frame`]
//! membungkus body hasil [`Encoder`] dengan prefix ukuran.

use std::io::{self, Read};

use crate::error::{Error, Result};
use crate::protocol::Encoder;

/// Ukuran prefix frame.
pub const FRAME_PREFIX_SIZE: usize = 4;

/// Pembaca frame dari sembarang `Read` (biasanya [`RingReader`]).
///
/// [`RingReader`]: crate::core::RingReader
pub struct FrameReader<R: Read> {
    source: R,
    max_frame_size: usize,
    // Di-reuse antar frame untuk menghindari alokasi di hot path
    buf: Vec<u8>,
}

impl<R: Read> FrameReader<R> {
    pub fn new(source: R, max_frame_size: usize) -> Self {
        Self {
            source,
            max_frame_size,
            buf: Vec::new(),
        }
    }

    /// Frame berikutnya.
    ///
    /// `Ok(None)` jika stream berakhir tepat di batas frame,
    /// [`Error::Closed`] jika berakhir di tengah frame.
    pub fn next_frame(&mut self) -> Result<Option<&[u8]>> {
        let mut prefix = [0u8; FRAME_PREFIX_SIZE];
        match self.fill(&mut prefix)? {
            0 => return Ok(None),
            FRAME_PREFIX_SIZE => {}
            _ => return Err(Error::Closed),
        }

        let size = i32::from_be_bytes(prefix);
        if size < 0 {
            return Err(Error::InvalidLength(size as i64));
        }
        let size = size as usize;
        if size > self.max_frame_size {
            log::warn!(
                "rejecting frame of {} bytes (max {})",
                size,
                self.max_frame_size
            );
            return Err(Error::FrameTooLarge {
                size,
                max: self.max_frame_size,
            });
        }

        self.buf.resize(size, 0);
        let mut buf = std::mem::take(&mut self.buf);
        let filled = self.fill(&mut buf);
        self.buf = buf;
        if filled? < size {
            return Err(Error::Closed);
        }
        Ok(Some(self.buf.as_slice()))
    }

    /// Baca sampai `buf` penuh atau EOF; kembalikan jumlah byte terbaca.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut read = 0;
        while read < buf.len() {
            match self.source.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(read)
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Encode body lewat `f`, lalu bungkus dengan prefix ukuran int32.
pub fn encode_frame<F>(f: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Encoder<&mut Vec<u8>>),
{
    let mut out = vec![0u8; FRAME_PREFIX_SIZE];
    {
        let mut encoder = Encoder::new(&mut out);
        f(&mut encoder);
        encoder.finish()?;
    }

    let len = out.len() - FRAME_PREFIX_SIZE;
    let size = i32::try_from(len).map_err(|_| Error::Oversized { kind: "frame", len })?;
    out[..FRAME_PREFIX_SIZE].copy_from_slice(&size.to_be_bytes());
    Ok(out)
}
