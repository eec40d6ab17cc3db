//! Criterion benchmark untuk codec dan version range
//!
//! Run dengan: cargo bench --bench codec_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kwire::protocol::{
    parse_version_range, Decoder, Encoder, RequestHeader, ValidVersionRange,
};

fn encode_request(buf: &mut Vec<u8>, correlation_id: i32, payload: &[u8]) {
    buf.clear();
    let mut e = Encoder::new(buf);
    RequestHeader::new(0, 9, correlation_id)
        .with_client_id("bench")
        .encode(&mut e);
    e.put_string_array(Some(&["orders", "payments", "audit"][..]));
    e.put_bytes(Some(payload));
    let _ = e.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let payload = vec![7u8; 512];
    let mut buf = Vec::with_capacity(1024);

    group.bench_function("encode_request", |b| {
        let mut i = 0i32;
        b.iter(|| {
            encode_request(&mut buf, black_box(i), &payload);
            i = i.wrapping_add(1);
        });
    });

    encode_request(&mut buf, 1, &payload);
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("decode_request", |b| {
        b.iter(|| {
            let mut d = Decoder::new(black_box(&buf));
            let header = RequestHeader::decode(&mut d).unwrap();
            let topics = d.get_string_array().unwrap();
            let bytes = d.get_bytes().unwrap();
            black_box((header, topics, bytes))
        });
    });

    group.finish();
}

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");

    for v in [0i64, -1, 300, i32::MAX as i64, i64::MIN] {
        let mut buf: Vec<u8> = Vec::new();
        let mut e = Encoder::new(&mut buf);
        e.put_varint(v);
        e.finish().unwrap();

        group.bench_function(format!("decode_{}", v), |b| {
            b.iter(|| Decoder::new(black_box(&buf)).get_varint().unwrap());
        });
    }

    group.finish();
}

fn bench_version(c: &mut Criterion) {
    let valid = ValidVersionRange::new(0, 12);
    c.bench_function("version/parse_overlaps_fully", |b| {
        b.iter(|| {
            let range = parse_version_range(black_box("3-12")).unwrap();
            range.overlaps_fully(&valid)
        });
    });
}

criterion_group!(benches, bench_primitives, bench_varint, bench_version);
criterion_main!(benches);
