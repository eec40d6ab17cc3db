//! Stress Test - Ring Buffer di bawah beban lintas thread
//!
//! Producer menulis pola byte deterministik dengan ukuran chunk acak,
//! consumer membaca dengan ukuran chunk berbeda dan memverifikasi urutan.
//!
//! Usage:
//!   cargo test --release --test ring_buffer_stress_test -- --nocapture

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use kwire::core::{RingBuffer, Transfer};

/// Pola byte ke-`i` dari stream
fn pattern(i: u64) -> u8 {
    (i.wrapping_mul(31) ^ (i >> 8)) as u8
}

/// LCG sederhana untuk ukuran chunk, deterministik per seed
struct ChunkSizes(u64);

impl ChunkSizes {
    fn next(&mut self, max: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        1 + (self.0 >> 33) as usize % max
    }
}

/// Statistics collector
struct StressStats {
    written: AtomicU64,
    read: AtomicU64,
    write_calls: AtomicU64,
    read_calls: AtomicU64,
}

impl StressStats {
    fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
            read: AtomicU64::new(0),
            write_calls: AtomicU64::new(0),
            read_calls: AtomicU64::new(0),
        }
    }

    fn print_report(&self, name: &str, duration: Duration) {
        let written = self.written.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Relaxed);

        println!("\n📊 {}", name);
        println!("======================");
        println!("  Duration:      {:.2}s", duration.as_secs_f64());
        println!("  Written:       {} bytes", written);
        println!("  Read:          {} bytes", read);
        println!("  write_n calls: {}", self.write_calls.load(Ordering::Relaxed));
        println!("  read_n calls:  {}", self.read_calls.load(Ordering::Relaxed));
        println!(
            "  Throughput:    {:.2} MB/sec",
            read as f64 / duration.as_secs_f64() / 1_000_000.0
        );
    }
}

fn run_ordered_transfer(capacity: usize, total: u64, max_write: usize, max_read: usize) {
    let (mut writer, mut reader) = RingBuffer::with_capacity(capacity);
    let stats = Arc::new(StressStats::new());

    let start = Instant::now();
    let producer_stats = Arc::clone(&stats);
    let producer = thread::spawn(move || {
        let mut sizes = ChunkSizes(42);
        let mut buf = vec![0u8; max_write];
        let mut pos = 0u64;
        while pos < total {
            let n = sizes.next(max_write).min((total - pos) as usize);
            for (j, b) in buf[..n].iter_mut().enumerate() {
                *b = pattern(pos + j as u64);
            }
            assert_eq!(writer.write_n(&buf, n), Transfer::Complete);
            pos += n as u64;
            producer_stats.written.fetch_add(n as u64, Ordering::Relaxed);
            producer_stats.write_calls.fetch_add(1, Ordering::Relaxed);
        }
    });

    let mut sizes = ChunkSizes(7);
    let mut buf = vec![0u8; max_read];
    let mut pos = 0u64;
    while pos < total {
        let n = sizes.next(max_read).min((total - pos) as usize);
        assert_eq!(reader.read_n(&mut buf, n), Transfer::Complete);
        for (j, b) in buf[..n].iter().enumerate() {
            assert_eq!(*b, pattern(pos + j as u64), "mismatch at byte {}", pos + j as u64);
        }
        pos += n as u64;
        stats.read.fetch_add(n as u64, Ordering::Relaxed);
        stats.read_calls.fetch_add(1, Ordering::Relaxed);
    }

    producer.join().unwrap();
    stats.print_report(
        &format!("ORDERED TRANSFER (capacity={})", capacity),
        start.elapsed(),
    );

    assert_eq!(stats.written.load(Ordering::Relaxed), total);
    assert_eq!(stats.read.load(Ordering::Relaxed), total);
    assert!(reader.is_empty());
}

#[test]
fn test_stress_tiny_ring_many_wraps() {
    // Chunk jauh lebih besar dari kapasitas: setiap transfer wrap berkali-kali
    run_ordered_transfer(5, 2_000_000, 97, 61);
}

#[test]
fn test_stress_large_ring() {
    run_ordered_transfer(64 * 1024, 32 * 1024 * 1024, 16 * 1024, 4096);
}

#[test]
fn test_stress_close_under_load() {
    for round in 0..50u64 {
        let (mut writer, mut reader) = RingBuffer::with_capacity(128);
        let closer = reader.closer();
        let written = Arc::new(AtomicU64::new(0));

        let producer_written = Arc::clone(&written);
        let producer = thread::spawn(move || {
            let buf = [0xEEu8; 1000];
            loop {
                match writer.write_n(&buf, buf.len()) {
                    Transfer::Complete => {
                        producer_written.fetch_add(buf.len() as u64, Ordering::Relaxed);
                    }
                    Transfer::Closed { transferred } => {
                        producer_written.fetch_add(transferred as u64, Ordering::Relaxed);
                        return;
                    }
                }
            }
        });

        let consumer = thread::spawn(move || {
            let mut buf = [0u8; 333];
            let mut total = 0u64;
            let len = buf.len();
            loop {
                match reader.read_n(&mut buf, len) {
                    Transfer::Complete => total += buf.len() as u64,
                    Transfer::Closed { transferred } => return total + transferred as u64,
                }
            }
        });

        thread::sleep(Duration::from_micros(200 + round * 20));
        closer.close();

        // Keduanya harus selesai; tidak ada byte yang muncul dari ketiadaan
        producer.join().unwrap();
        let read = consumer.join().unwrap();
        assert!(read <= written.load(Ordering::Relaxed));
    }
}
