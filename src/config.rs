//! Konfigurasi streaming layer (pump + frame reader).

use std::time::Duration;

use crate::error::{Error, Result};

/// Buffer sizes - tuned untuk typical Kafka responses
pub const DEFAULT_RING_CAPACITY: usize = 64 * 1024; // 64KB
pub const DEFAULT_READ_CHUNK: usize = 16 * 1024; // 16KB
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Sama dengan default `socket.request.max.bytes` broker Kafka
pub const DEFAULT_MAX_FRAME_SIZE: usize = 100 * 1024 * 1024;

/// Stream configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Kapasitas ring buffer antara thread I/O dan thread decode
    pub ring_capacity: usize,
    /// Ukuran satu kali `read()` dari socket
    pub read_chunk: usize,
    /// Timeout poll; batas waktu pump menyadari buffer sudah ditutup
    pub poll_interval: Duration,
    /// Frame lebih besar dari ini ditolak
    pub max_frame_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            ring_capacity: DEFAULT_RING_CAPACITY,
            read_chunk: DEFAULT_READ_CHUNK,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl StreamConfig {
    pub fn with_ring_capacity(mut self, capacity: usize) -> Self {
        self.ring_capacity = capacity;
        self
    }

    pub fn with_read_chunk(mut self, chunk: usize) -> Self {
        self.read_chunk = chunk;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_frame_size(mut self, max: usize) -> Self {
        self.max_frame_size = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.ring_capacity == 0 {
            return Err(Error::Config("ring_capacity must be non-zero".into()));
        }
        if self.ring_capacity > usize::MAX / 4 {
            return Err(Error::Config("ring_capacity too large".into()));
        }
        if self.read_chunk == 0 {
            return Err(Error::Config("read_chunk must be non-zero".into()));
        }
        if self.max_frame_size > i32::MAX as usize {
            return Err(Error::Config(format!(
                "max_frame_size {} exceeds int32 frame prefix",
                self.max_frame_size
            )));
        }
        Ok(())
    }
}
