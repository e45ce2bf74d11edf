//! Decode throughput benchmarks
//!
//! Happy-path decoding should stay dominated by the header reads. The error
//! path (unknown xid, oversized fields) must not cost much more than success,
//! since noisy captures hit it constantly.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashMap;
use std::net::SocketAddr;
use zk_codec::{display_name, DecodeError, DecoderConfig, ReplyBuilder, ReplyDecoder};
use zk_types::{OpCode, WATCH_XID};

fn endpoints() -> (SocketAddr, SocketAddr) {
    (
        "10.1.0.5:41000".parse().unwrap(),
        "10.1.0.9:2181".parse().unwrap(),
    )
}

/// Benchmark happy path: replies that resolve and decode fully
fn bench_happy_path_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("happy_path_decoding");
    let decoder = ReplyDecoder::new(DecoderConfig::default()).unwrap();
    let (client, server) = endpoints();

    let create = ReplyBuilder::reply(7, 0x500, 0)
        .string("/services/payments/leader")
        .build();
    group.bench_function("decode_create", |b| {
        b.iter(|| {
            let mut table = HashMap::from([(7, OpCode::Create)]);
            let result = decoder.decode(black_box(&create), client, server, &mut table);
            black_box(result)
        });
    });

    let event = ReplyBuilder::reply(WATCH_XID, -1, 0)
        .int(4)
        .int(3)
        .string("/services/payments")
        .build();
    group.bench_function("decode_watch_event", |b| {
        b.iter(|| {
            let mut table = HashMap::new();
            let result = decoder.decode(black_box(&event), client, server, &mut table);
            black_box(result)
        });
    });

    let connect = ReplyBuilder::connect(0, 30_000, 0x72_0000_0001, &[9u8; 16], false).build();
    group.bench_function("decode_connect", |b| {
        b.iter(|| {
            let mut table = HashMap::from([(0, OpCode::Connect)]);
            let result = decoder.decode(black_box(&connect), client, server, &mut table);
            black_box(result)
        });
    });

    group.finish();
}

/// Benchmark error path: unresolved xids and oversized fields
fn bench_error_path_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("error_path_decoding");
    let decoder = ReplyDecoder::new(DecoderConfig::default()).unwrap();
    let (client, server) = endpoints();

    let orphan = ReplyBuilder::reply(99, 1, 0).build();
    group.bench_function("decode_unresolved", |b| {
        b.iter(|| {
            let mut table: HashMap<i32, OpCode> = HashMap::new();
            match decoder.decode(black_box(&orphan), client, server, &mut table) {
                Err(DecodeError::UnresolvedRequest { .. }) => {}
                _ => panic!("Expected UnresolvedRequest error"),
            }
        });
    });

    let long_path = "/x".repeat(1024);
    let oversized = ReplyBuilder::reply(7, 1, 0).string(&long_path).build();
    group.bench_function("decode_oversized_path", |b| {
        b.iter(|| {
            let mut table = HashMap::from([(7, OpCode::Create)]);
            let result = decoder.decode(black_box(&oversized), client, server, &mut table);
            black_box(result)
        });
    });

    group.finish();
}

/// Benchmark display naming for decoded messages
fn bench_display_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("display_name");
    let decoder = ReplyDecoder::new(DecoderConfig::default()).unwrap();
    let (client, server) = endpoints();

    let mut table = HashMap::from([(3, OpCode::SetData)]);
    let failed = ReplyBuilder::reply(3, 1, -101).build();
    let msg = decoder.decode(&failed, client, server, &mut table).unwrap();

    group.bench_function("failed_reply_label", |b| {
        b.iter(|| black_box(display_name(black_box(&msg))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_happy_path_decoding,
    bench_error_path_decoding,
    bench_display_name
);
criterion_main!(benches);
