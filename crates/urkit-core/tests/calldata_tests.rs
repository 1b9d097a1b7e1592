//! Decoding recorded mainnet router transactions

use alloy_primitives::{hex, U256};
use urkit_core::{
    CommandParser, CommandType, Error, ExecuteCall, Hop, PoolVersion, TransactionDecoder, Value,
};
use urkit_test_utils::{mainnet_vectors, UNIVERSAL_ROUTER, USDT, WETH};

#[test]
fn test_vectors_envelope() {
    for vector in mainnet_vectors() {
        let call = ExecuteCall::decode(&vector.bytes()).unwrap();
        assert_eq!(hex::encode(&call.commands), vector.commands, "{}", vector.name);
        assert_eq!(call.inputs.len(), call.commands.len(), "{}", vector.name);
        assert!(call.deadline.is_some());
    }
}

#[test]
fn test_vectors_decode_every_command() {
    let parser = CommandParser::default();
    for vector in mainnet_vectors() {
        let call = parser.parse_calldata(&vector.bytes()).unwrap();
        let ids: Vec<u8> = call.commands.iter().map(|c| c.command.id()).collect();
        assert_eq!(hex::encode(ids), vector.commands, "{}", vector.name);
    }
}

#[test]
fn test_vectors_single_swap() {
    let decoder = TransactionDecoder::default();
    for vector in mainnet_vectors() {
        let swaps = decoder
            .decode_swaps(UNIVERSAL_ROUTER, &vector.bytes())
            .unwrap();
        assert_eq!(swaps.len(), 1, "{}", vector.name);

        let swap = &swaps[0];
        assert_eq!(swap.token_in, vector.token_in, "{}", vector.name);
        assert_eq!(swap.token_out, vector.token_out, "{}", vector.name);
        if vector.exact_in {
            assert_eq!(swap.amount_in, Some(vector.amount()), "{}", vector.name);
            assert_eq!(swap.amount_out, None);
        } else {
            assert_eq!(swap.amount_out, Some(vector.amount()), "{}", vector.name);
            assert_eq!(swap.amount_in, None);
        }
    }
}

#[test]
fn test_v3_exact_in_hops() {
    let vector = mainnet_vectors()[1];
    let call = CommandParser::default()
        .parse_calldata(&vector.bytes())
        .unwrap();

    let swap = &call.commands[0];
    assert_eq!(swap.command, CommandType::V3SwapExactIn);
    let hops = swap.param("path").and_then(Value::as_path).unwrap();
    assert_eq!(
        hops,
        &[
            Hop::new(USDT, WETH, 100),
            Hop::new(WETH, vector.token_out, 3000)
        ]
    );
}

#[test]
fn test_v3_exact_out_hop() {
    let vector = mainnet_vectors()[3];
    let swaps = TransactionDecoder::default()
        .decode_swaps(UNIVERSAL_ROUTER, &vector.bytes())
        .unwrap();

    assert_eq!(swaps[0].version, PoolVersion::V3);
    assert_eq!(swaps[0].hops, vec![Hop::new(WETH, USDT, 500)]);
    assert_eq!(swaps[0].amount_out, Some(U256::from(0x04_ab12_b880u64)));
}

#[test]
fn test_truncated_calldata() {
    let bytes = mainnet_vectors()[0].bytes();
    let err = CommandParser::default()
        .parse_calldata(&bytes[..100])
        .unwrap_err();
    assert!(matches!(err, Error::CalldataDecode(_)));
}

#[test]
fn test_wrong_selector() {
    let mut bytes = mainnet_vectors()[0].bytes();
    bytes[0] ^= 0xff;
    let err = CommandParser::default().parse_calldata(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnknownSelector(_)));
}
