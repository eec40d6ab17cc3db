//! Stream Test - frame Kafka lewat TCP loopback
//!
//! Client menulis frame request ke socket; sisi server memakai
//! `open_frame_stream` (mio pump + ring buffer + frame reader).
//!
//! Usage:
//!   cargo test --test stream_test -- --nocapture

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use kwire::config::StreamConfig;
use kwire::network::{encode_frame, open_frame_stream};
use kwire::protocol::{Decoder, RequestHeader};
use kwire::Error;

fn connected_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = TcpStream::connect(addr).unwrap();
    let (server, _) = listener.accept().unwrap();
    (client, server)
}

fn request_frame(correlation_id: i32) -> Vec<u8> {
    encode_frame(|e| {
        RequestHeader::new(1, 11, correlation_id)
            .with_client_id("stream-test")
            .encode(e);
        e.put_string("orders");
        e.put_int32_array(Some(&[0, 1, 2][..]));
        e.put_varint(-(correlation_id as i64));
    })
    .unwrap()
}

#[test]
fn test_frames_over_tcp() {
    let (mut client, server) = connected_pair();
    let config = StreamConfig::default()
        .with_ring_capacity(256)
        .with_read_chunk(64);
    let (mut frames, pump) = open_frame_stream(server, &config).unwrap();

    const COUNT: i32 = 2_000;
    let sender = thread::spawn(move || {
        let mut total = 0u64;
        for id in 0..COUNT {
            let frame = request_frame(id);
            client.write_all(&frame).unwrap();
            total += frame.len() as u64;
        }
        // Drop client = EOF di sisi server
        total
    });

    let start = Instant::now();
    let mut received = 0;
    while let Some(frame) = frames.next_frame().unwrap() {
        let mut d = Decoder::new(frame);
        let header = RequestHeader::decode(&mut d).unwrap();
        assert_eq!(header.api_key, 1);
        assert_eq!(header.correlation_id, received);
        assert_eq!(header.client_id.as_deref(), Some("stream-test"));
        assert_eq!(d.get_string().unwrap(), "orders");
        assert_eq!(d.get_int32_array().unwrap(), Some(vec![0, 1, 2]));
        assert_eq!(d.get_varint().unwrap(), -(received as i64));
        assert_eq!(d.remaining(), 0);
        received += 1;
    }

    let sent = sender.join().unwrap();
    assert_eq!(received, COUNT);
    assert_eq!(pump.join().unwrap(), sent);
    println!(
        "📊 {} frames ({} bytes) in {:.2}ms",
        COUNT,
        sent,
        start.elapsed().as_secs_f64() * 1000.0
    );
}

#[test]
fn test_dropping_reader_stops_pump() {
    let (_client, server) = connected_pair();
    let config = StreamConfig::default().with_poll_interval(Duration::from_millis(10));
    let (frames, pump) = open_frame_stream(server, &config).unwrap();

    // Peer diam; hanya poll timeout yang bisa membangunkan pump
    drop(frames);

    let deadline = Instant::now() + Duration::from_secs(5);
    while !pump.is_finished() {
        assert!(Instant::now() < deadline, "pump did not stop after close");
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(pump.join().unwrap(), 0);
}

#[test]
fn test_oversized_frame_rejected() {
    let (mut client, server) = connected_pair();
    let config = StreamConfig::default().with_max_frame_size(16);
    let (mut frames, _pump) = open_frame_stream(server, &config).unwrap();

    client
        .write_all(&encode_frame(|e| e.put_bytes(Some(&[0u8; 100][..]))).unwrap())
        .unwrap();

    assert!(matches!(
        frames.next_frame(),
        Err(Error::FrameTooLarge { size: 104, max: 16 })
    ));
}
