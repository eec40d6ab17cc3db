//! kwire - Kafka-style Wire Protocol Runtime
//!
//! Benchmark cepat untuk ring buffer dan codec. Untuk angka yang stabil
//! pakai `cargo bench`.

use std::thread;
use std::time::Instant;

use kwire::core::RingBuffer;
use kwire::protocol::{parse_version_range, Decoder, Encoder, RequestHeader, ValidVersionRange};

fn main() {
    env_logger::init();

    println!("🚀 kwire - Kafka Wire Runtime v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================\n");

    // Benchmark Ring Buffer
    benchmark_ring_buffer();

    // Benchmark Codec
    benchmark_codec();

    // Benchmark Varint + Version Range
    benchmark_varint();

    println!("\n✅ All benchmarks complete!");
}

fn benchmark_ring_buffer() {
    println!("📊 Ring Buffer Benchmark (Blocking SPSC, cross-thread)");
    println!("------------------------------------------------------");

    const TOTAL_BYTES: usize = 256 * 1024 * 1024;
    const CAPACITY: usize = 64 * 1024;

    for chunk in [64usize, 1024, 16 * 1024] {
        let (mut writer, mut reader) = RingBuffer::with_capacity(CAPACITY);

        let start = Instant::now();
        let producer = thread::spawn(move || {
            let buf = vec![0xABu8; chunk];
            let mut sent = 0;
            while sent < TOTAL_BYTES {
                if !writer.write_n(&buf, chunk).is_complete() {
                    break;
                }
                sent += chunk;
            }
        });

        let mut buf = vec![0u8; chunk];
        let mut received = 0;
        while received < TOTAL_BYTES {
            if !reader.read_n(&mut buf, chunk).is_complete() {
                break;
            }
            received += chunk;
        }
        let elapsed = start.elapsed();
        if producer.join().is_err() {
            eprintln!("  producer thread panicked");
            return;
        }

        let ops = (TOTAL_BYTES / chunk) as f64;
        println!("  Chunk: {:>6} bytes", chunk);
        println!(
            "    Latency:    {:.2} ns/op ({:.3} μs/op)",
            elapsed.as_nanos() as f64 / ops,
            elapsed.as_nanos() as f64 / ops / 1000.0
        );
        println!(
            "    Throughput: {:.2} MB/sec",
            received as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
    }
    println!();
}

fn benchmark_codec() {
    println!("📊 Codec Benchmark (Big-Endian Primitives)");
    println!("------------------------------------------");

    const ITERATIONS: usize = 1_000_000;

    let header = RequestHeader::new(1, 11, 0).with_client_id("kwire-bench");
    let payload = vec![0u8; 64];
    let partitions: Vec<i32> = (0..16).collect();

    let mut buf: Vec<u8> = Vec::with_capacity(256);

    // Benchmark encode
    let start = Instant::now();
    for i in 0..ITERATIONS {
        buf.clear();
        let mut e = Encoder::new(&mut buf);
        RequestHeader {
            correlation_id: i as i32,
            ..header.clone()
        }
        .encode(&mut e);
        e.put_string("events");
        e.put_int32_array(Some(&partitions[..]));
        e.put_bytes(Some(&payload[..]));
        if let Err(err) = e.finish() {
            eprintln!("  encode failed: {}", err);
            return;
        }
    }
    let encode_duration = start.elapsed();
    let message_size = buf.len();

    // Benchmark decode
    let start = Instant::now();
    let mut checksum = 0i64;
    for _ in 0..ITERATIONS {
        let mut d = Decoder::new(&buf);
        let decoded = (|| -> kwire::Result<i64> {
            let h = RequestHeader::decode(&mut d)?;
            let topic = d.get_string()?;
            let parts = d.get_int32_array()?.unwrap_or_default();
            let bytes = d.get_bytes()?.unwrap_or_default();
            Ok(h.correlation_id as i64 + topic.len() as i64 + parts.len() as i64 + bytes.len() as i64)
        })();
        match decoded {
            Ok(v) => checksum = checksum.wrapping_add(v),
            Err(err) => {
                eprintln!("  decode failed: {}", err);
                return;
            }
        }
    }
    let decode_duration = start.elapsed();

    let encode_ns = encode_duration.as_nanos() as f64 / ITERATIONS as f64;
    let decode_ns = decode_duration.as_nanos() as f64 / ITERATIONS as f64;

    println!("  Message size: {} bytes", message_size);
    println!("  Operations: {}", ITERATIONS);
    println!(
        "  Encode latency: {:.2} ns/op ({:.3} μs/op)",
        encode_ns,
        encode_ns / 1000.0
    );
    println!(
        "  Decode latency: {:.2} ns/op ({:.3} μs/op)",
        decode_ns,
        decode_ns / 1000.0
    );
    println!(
        "  Decode throughput: {:.2} M msgs/sec (checksum {})\n",
        ITERATIONS as f64 / decode_duration.as_secs_f64() / 1_000_000.0,
        checksum
    );
}

fn benchmark_varint() {
    println!("📊 Varint + Version Range Benchmark");
    println!("-----------------------------------");

    const ITERATIONS: usize = 1_000_000;

    let values: Vec<i64> = (0..63).map(|s| (1i64 << s) - 1).chain([i64::MIN, -1]).collect();
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    let mut e = Encoder::new(&mut buf);
    for v in &values {
        e.put_varint(*v);
    }
    if let Err(err) = e.finish() {
        eprintln!("  encode failed: {}", err);
        return;
    }

    let start = Instant::now();
    let mut sum = 0i64;
    for _ in 0..ITERATIONS / values.len() {
        let mut d = Decoder::new(&buf);
        while d.remaining() > 0 {
            match d.get_varint() {
                Ok(v) => sum = sum.wrapping_add(v),
                Err(err) => {
                    eprintln!("  decode failed: {}", err);
                    return;
                }
            }
        }
    }
    let varint_duration = start.elapsed();

    let valid = ValidVersionRange::new(0, 12);
    let texts = ["0+", "3", "2-9", "0-12", "13+"];
    let start = Instant::now();
    let mut covered = 0usize;
    for i in 0..ITERATIONS {
        if let Ok(range) = parse_version_range(texts[i % texts.len()]) {
            if range.overlaps_fully(&valid) {
                covered += 1;
            }
        }
    }
    let version_duration = start.elapsed();

    let decoded = (ITERATIONS / values.len()) * values.len();
    println!(
        "  Varint decode:  {:.2} ns/op (checksum {})",
        varint_duration.as_nanos() as f64 / decoded as f64,
        sum
    );
    println!(
        "  Parse + overlaps_fully: {:.2} ns/op ({} fully covered)",
        version_duration.as_nanos() as f64 / ITERATIONS as f64,
        covered
    );
}
