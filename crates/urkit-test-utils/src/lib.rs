//! Shared fixtures for urkit tests
//!
//! Real mainnet `execute` calls sent to the universal router, with the swap
//! each one is known to perform.

use alloy_primitives::{address, hex, Address, U256};

/// Uniswap universal router on mainnet
pub const UNIVERSAL_ROUTER: Address = address!("3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad");

pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
pub const USDT: Address = address!("dac17f958d2ee523a2206206994597c13d831ec7");
pub const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
pub const LINK: Address = address!("514910771af9ca656af840dff83e8264ecf986ca");

// ============================================================================
// Mainnet Calldata
// ============================================================================

/// V2_SWAP_EXACT_IN (tx 0x25c0698f3cd26511fbdeee7cde5b956da7a2f5c76eee5efa8530013c7d7ec10e)
pub const V2_EXACT_IN_CALLDATA: &str = concat!(
    "0x3593564c00000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "0000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000",
    "006738ddd900000000000000000000000000000000000000000000000000000000000000040a08060c00000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000400000000000000000000000000000000000000000000000000000000000000800000000000000000000000",
    "000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000",
    "000000032000000000000000000000000000000000000000000000000000000000000003a00000000000000000000000",
    "00000000000000000000000000000000000000016000000000000000000000000014fee680690900ba0cccfc76ad70fd",
    "1b95d10e16000000000000000000000000ffffffffffffffffffffffffffffffffffffffff0000000000000000000000",
    "0000000000000000000000000000000000676063b7000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000003fc91a3afd70395cd496c647d5a6cc9d4b2b7fad0000000000000000000000",
    "00000000000000000000000000000000006738ddbf000000000000000000000000000000000000000000000000000000",
    "00000000e00000000000000000000000000000000000000000000000000000000000000041726e07ca9549078e0ba66d",
    "51c647200ec5b687474eb06f92ffa4d90a592e4b313d89aa6b39c732e349a4a5c45b78d46ba9a9676ca5b6f0ce4bcf16",
    "98e563e6ff1c000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000",
    "000000000200000000000000000000000000000000000000000000000000000550bec2f37d0000000000000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000a000000000000000000000000000000000000000000000000000000000000000010000000000000000000000",
    "00000000000000000000000000000000000000000200000000000000000000000014fee680690900ba0cccfc76ad70fd",
    "1b95d10e16000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc20000000000000000000000",
    "000000000000000000000000000000000000000060000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9",
    "083c756cc2000000000000000000000000000000fee13a103a10d593b9ae06b3e05f2e7e1c0000000000000000000000",
    "000000000000000000000000000000000000000019000000000000000000000000000000000000000000000000000000",
    "00000000400000000000000000000000001b906dad530d3df5e8f405538cc5bb52be2b118d0000000000000000000000",
    "00000000000000000000000000037b6d628d870d140c",
);

/// V3_SWAP_EXACT_IN (tx 0x51530678c50744538be500a653428749771c1283ffefdc8359dfe7a341716c63)
pub const V3_EXACT_IN_CALLDATA: &str = concat!(
    "0x3593564c00000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "0000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000",
    "006738fbf200000000000000000000000000000000000000000000000000000000000000030006040000000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000300000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "0000000000000000000000000000000000000001a0000000000000000000000000000000000000000000000000000000",
    "000000022000000000000000000000000000000000000000000000000000000000000001200000000000000000000000",
    "000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000",
    "003b9aca0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000",
    "00000000010000000000000000000000000000000000000000000000000000000000000042dac17f958d2ee523a22062",
    "06994597c13d831ec7000064c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2000bb87ce89243cc0d9e746609c57845",
    "eccbd9bb4b73150000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000000600000000000000000000000007ce89243cc0d9e746609c57845eccb",
    "d9bb4b7315000000000000000000000000000000fee13a103a10d593b9ae06b3e05f2e7e1c0000000000000000000000",
    "000000000000000000000000000000000000000019000000000000000000000000000000000000000000000000000000",
    "00000000600000000000000000000000007ce89243cc0d9e746609c57845eccbd9bb4b73150000000000000000000000",
    "000ba0936d77ed1232ef5b34dc67dd341277715c8500000000000000000000000000000000000000000000007ee8b05f",
    "aebc784ba20c",
);

/// V2_SWAP_EXACT_OUT (tx 0xf1383ff7af7cfd4143085f10a679184e52304045029fbb9e6e1a7a7775c28615)
pub const V2_EXACT_OUT_CALLDATA: &str = concat!(
    "0x3593564c00000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "0000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000",
    "006739089100000000000000000000000000000000000000000000000000000000000000050b0905040c000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000500000000000000000000000000000000000000000000000000000000000000a00000000000000000000000",
    "000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000",
    "000000022000000000000000000000000000000000000000000000000000000000000002a00000000000000000000000",
    "000000000000000000000000000000000000000320000000000000000000000000000000000000000000000000000000",
    "000000004000000000000000000000000000000000000000000000000000000000000000020000000000000000000000",
    "0000000000000000000000000000ef4dc3a6979661000000000000000000000000000000000000000000000000000000",
    "000000010000000000000000000000000000000000000000000000000000000000000000020000000000000000000000",
    "000000000000000000000000000014e39cf213cb8000000000000000000000000000000000000000000000000000ef4d",
    "c3a697966100000000000000000000000000000000000000000000000000000000000000a00000000000000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "0000000002000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc20000000000000000000000",
    "0069babe9811cc86dcfc3b8f9a14de6470dd18eda4000000000000000000000000000000000000000000000000000000",
    "000000006000000000000000000000000069babe9811cc86dcfc3b8f9a14de6470dd18eda40000000000000000000000",
    "00000000fee13a103a10d593b9ae06b3e05f2e7e1c00000000000000000000000000000000000000000000000000000d",
    "55f001538000000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "0069babe9811cc86dcfc3b8f9a14de6470dd18eda4000000000000000000000000b248d7d9401dc9d6bc58f3b5917d67",
    "769ffc3bef0000000000000000000000000000000000000000000000000014d647021278000000000000000000000000",
    "000000000000000000000000000000000000000040000000000000000000000000b248d7d9401dc9d6bc58f3b5917d67",
    "769ffc3bef00000000000000000000000000000000000000000000000000000000000000000c",
);

/// V3_SWAP_EXACT_OUT (tx 0xcecd841fcd7979acc53041906d364d0ed253df77bb5ee4f2b028231833685392)
pub const V3_EXACT_OUT_CALLDATA: &str = concat!(
    "0x3593564c00000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "0000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000",
    "00673a44c000000000000000000000000000000000000000000000000000000000000000050b0105040c000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000500000000000000000000000000000000000000000000000000000000000000a00000000000000000000000",
    "000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000",
    "000000022000000000000000000000000000000000000000000000000000000000000002a00000000000000000000000",
    "000000000000000000000000000000000000000320000000000000000000000000000000000000000000000000000000",
    "000000004000000000000000000000000000000000000000000000000000000000000000020000000000000000000000",
    "000000000000000000000000005ae3c8a459414bdd000000000000000000000000000000000000000000000000000000",
    "000000010000000000000000000000000000000000000000000000000000000000000000020000000000000000000000",
    "0000000000000000000000000000000004ab12b8800000000000000000000000000000000000000000000000005ae3c8",
    "a459414bdd00000000000000000000000000000000000000000000000000000000000000a00000000000000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000002bdac17f958d2ee523a2206206994597c13d831ec70001f4c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "0000000060000000000000000000000000dac17f958d2ee523a2206206994597c13d831ec70000000000000000000000",
    "00000000fee13a103a10d593b9ae06b3e05f2e7e1c000000000000000000000000000000000000000000000000000000",
    "0002faf08000000000000000000000000000000000000000000000000000000000000000600000000000000000000000",
    "00dac17f958d2ee523a2206206994597c13d831ec7000000000000000000000000749b9ea92056420b7e635eabae3d48",
    "f2d9b4d49700000000000000000000000000000000000000000000000000000004a817c8000000000000000000000000",
    "000000000000000000000000000000000000000040000000000000000000000000749b9ea92056420b7e635eabae3d48",
    "f2d9b4d49700000000000000000000000000000000000000000000000000000000000000000c",
);

// ============================================================================
// Expected Results
// ============================================================================

/// A recorded transaction and the single swap it performs
#[derive(Debug, Clone, Copy)]
pub struct SwapVector {
    pub name: &'static str,
    pub calldata: &'static str,
    /// Command bytes of the batch
    pub commands: &'static str,
    pub token_in: Address,
    pub token_out: Address,
    /// Fixed side of the trade: amount in for exact-in, amount out for exact-out
    pub amount: u64,
    pub exact_in: bool,
}

impl SwapVector {
    /// Raw calldata bytes
    pub fn bytes(&self) -> Vec<u8> {
        decode_hex(self.calldata)
    }

    pub fn amount(&self) -> U256 {
        U256::from(self.amount)
    }
}

/// The four recorded router transactions
pub fn mainnet_vectors() -> [SwapVector; 4] {
    [
        SwapVector {
            name: "v2 exact in",
            calldata: V2_EXACT_IN_CALLDATA,
            commands: "0a08060c",
            token_in: address!("14fee680690900ba0cccfc76ad70fd1b95d10e16"),
            token_out: WETH,
            amount: 0x0550_bec2_f37d,
            exact_in: true,
        },
        SwapVector {
            name: "v3 exact in",
            calldata: V3_EXACT_IN_CALLDATA,
            commands: "000604",
            token_in: USDT,
            token_out: address!("7ce89243cc0d9e746609c57845eccbd9bb4b7315"),
            amount: 0x3b9a_ca00,
            exact_in: true,
        },
        SwapVector {
            name: "v2 exact out",
            calldata: V2_EXACT_OUT_CALLDATA,
            commands: "0b0905040c",
            token_in: WETH,
            token_out: address!("69babe9811cc86dcfc3b8f9a14de6470dd18eda4"),
            amount: 0x0014_e39c_f213_cb80,
            exact_in: false,
        },
        SwapVector {
            name: "v3 exact out",
            calldata: V3_EXACT_OUT_CALLDATA,
            commands: "0b0105040c",
            token_in: WETH,
            token_out: USDT,
            amount: 0x04_ab12_b880,
            exact_in: false,
        },
    ]
}

/// Decode hex text with or without `0x`, panicking on bad input
pub fn decode_hex(text: &str) -> Vec<u8> {
    hex::decode(text.trim()).expect("fixture hex must be valid")
}
