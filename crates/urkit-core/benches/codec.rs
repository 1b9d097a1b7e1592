//! Codec benchmarks

use alloy_primitives::Address;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use urkit_core::{path, CommandParser, CommandType, Hop, RoutePlanner, TransactionDecoder, Value};
use urkit_test_utils::{mainnet_vectors, DAI, LINK, UNIVERSAL_ROUTER, USDT, WETH};

fn route() -> Vec<Hop> {
    vec![
        Hop::new(USDT, WETH, 500),
        Hop::new(WETH, LINK, 3000),
        Hop::new(LINK, DAI, 10000),
    ]
}

fn encode_benchmark(c: &mut Criterion) {
    c.bench_function("encode_v3_exact_in", |b| {
        b.iter(|| {
            let mut planner = RoutePlanner::default();
            planner
                .add_command(
                    CommandType::V3SwapExactIn,
                    vec![
                        Value::Address(Address::ZERO),
                        Value::from(1_000_000u64),
                        Value::from(0u64),
                        Value::Path(route()),
                        Value::Bool(true),
                    ],
                    false,
                )
                .unwrap();
            black_box(planner.finish())
        })
    });
}

fn decode_benchmark(c: &mut Criterion) {
    let parser = CommandParser::default();
    let calldata = mainnet_vectors()[0].bytes();

    c.bench_function("decode_mainnet_calldata", |b| {
        b.iter(|| black_box(parser.parse_calldata(black_box(&calldata)).unwrap()))
    });
}

fn path_benchmark(c: &mut Criterion) {
    let packed = path::encode_path_exact_in(&route()).unwrap();

    c.bench_function("decode_exact_in_path", |b| {
        b.iter(|| black_box(path::decode_exact_in(black_box(&packed)).unwrap()))
    });
    c.bench_function("decode_exact_out_path", |b| {
        b.iter(|| black_box(path::decode_exact_out(black_box(&packed)).unwrap()))
    });
}

fn swap_benchmark(c: &mut Criterion) {
    let decoder = TransactionDecoder::default();
    let calldata = mainnet_vectors()[3].bytes();

    c.bench_function("extract_swaps", |b| {
        b.iter(|| {
            black_box(
                decoder
                    .decode_swaps(UNIVERSAL_ROUTER, black_box(&calldata))
                    .unwrap(),
            )
        })
    });
}

criterion_group!(
    benches,
    encode_benchmark,
    decode_benchmark,
    path_benchmark,
    swap_benchmark
);
criterion_main!(benches);
