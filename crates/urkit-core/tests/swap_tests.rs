//! Swap extraction over planner-built batches

use alloy_primitives::{address, Address, U256};
use urkit_core::{
    CommandParser, CommandType, DecodeOptions, Error, Hop, KnownRouter, PoolVersion,
    RoutePlanner, RouterDirectory, RouterKind, TransactionDecoder, Value,
};
use urkit_test_utils::{DAI, LINK, UNIVERSAL_ROUTER, USDT, WETH};

const FORK_ROUTER: Address = address!("00000000000000000000000000000000000c0ffe");

fn v3_exact_out(amount_out: u64, hops: Vec<Hop>) -> Vec<Value> {
    vec![
        Value::Address(Address::ZERO),
        Value::from(amount_out),
        Value::from(u64::MAX),
        Value::Path(hops),
        Value::Bool(true),
    ]
}

fn nested_calldata() -> Vec<u8> {
    let mut child = RoutePlanner::default();
    child
        .add_command(
            CommandType::V3SwapExactOut,
            v3_exact_out(7, vec![Hop::new(DAI, WETH, 3000), Hop::new(WETH, LINK, 500)]),
            false,
        )
        .unwrap();

    let mut parent = RoutePlanner::default();
    parent
        .add_command(
            CommandType::V2SwapExactIn,
            vec![
                Value::Address(Address::ZERO),
                Value::from(100u64),
                Value::from(1u64),
                Value::from(vec![USDT, WETH]),
                Value::Bool(true),
            ],
            false,
        )
        .unwrap()
        .add_sub_plan(&child.finish())
        .unwrap();

    parent.finish().to_calldata(None).to_vec()
}

#[test]
fn test_raw_sub_plan_is_not_searched() {
    let swaps = TransactionDecoder::default()
        .decode_swaps(UNIVERSAL_ROUTER, &nested_calldata())
        .unwrap();

    assert_eq!(swaps.len(), 1);
    assert_eq!(swaps[0].version, PoolVersion::V2);
    assert_eq!(swaps[0].token_in, USDT);
    assert_eq!(swaps[0].token_out, WETH);
}

#[test]
fn test_expanded_sub_plan_is_searched() {
    let parser = CommandParser::default().with_options(DecodeOptions {
        expand_sub_plans: true,
        ..DecodeOptions::default()
    });
    let decoder = TransactionDecoder::new(RouterDirectory::mainnet(), parser);
    let swaps = decoder
        .decode_swaps(UNIVERSAL_ROUTER, &nested_calldata())
        .unwrap();

    assert_eq!(swaps.len(), 2);
    let nested = &swaps[1];
    assert_eq!(nested.version, PoolVersion::V3);
    assert_eq!(nested.token_in, DAI);
    assert_eq!(nested.token_out, LINK);
    assert_eq!(nested.amount_out, Some(U256::from(7u64)));
    assert_eq!(nested.hops.len(), 2);
}

#[test]
fn test_no_swaps_is_empty_not_error() {
    let mut planner = RoutePlanner::default();
    planner
        .add_command(
            CommandType::WrapEth,
            vec![Value::Address(Address::ZERO), Value::from(1u64)],
            false,
        )
        .unwrap();
    let calldata = planner.finish().to_calldata(Some(U256::from(1u64)));

    let swaps = TransactionDecoder::default()
        .decode_swaps(UNIVERSAL_ROUTER, &calldata)
        .unwrap();
    assert!(swaps.is_empty());
}

#[test]
fn test_custom_router_entry() {
    let mut directory = RouterDirectory::new();
    directory.insert(
        FORK_ROUTER,
        KnownRouter::new("fork", RouterKind::UniversalRouter),
    );
    let decoder = TransactionDecoder::new(directory, CommandParser::default());

    let swaps = decoder
        .decode_swaps(FORK_ROUTER, &nested_calldata())
        .unwrap();
    assert_eq!(swaps.len(), 1);

    let err = decoder
        .decode_swaps(UNIVERSAL_ROUTER, &nested_calldata())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownRouter(a) if a == UNIVERSAL_ROUTER));
}
