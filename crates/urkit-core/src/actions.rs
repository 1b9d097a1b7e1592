//! Nested V4 action sets
//!
//! `V4_SWAP` and `V4_POSITION_MANAGER_CALL` carry a secondary protocol of
//! their own: an envelope `(bytes actions, bytes[] params)` with one action
//! byte and one ABI blob per action.

use crate::calldata::selector;
use crate::parser::decode_fields;
use crate::planner::encode_fields;
use crate::registry::{pool_key, FieldSpec};
use crate::{CommandType, Error, Param, Result, Value};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::Bytes;
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position manager entry point wrapping an action envelope
pub const MODIFY_LIQUIDITIES_SIGNATURE: &str = "modifyLiquidities(bytes,uint256)";

/// Decoder for nested action blobs
pub trait ActionDecoder: Send + Sync {
    /// Decode one nested-action input into one param per action
    fn decode_actions(&self, command: CommandType, input: &[u8]) -> Result<Vec<Param>>;
}

/// V4 action identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum V4Action {
    IncreaseLiquidity = 0x00,
    DecreaseLiquidity = 0x01,
    MintPosition = 0x02,
    BurnPosition = 0x03,
    IncreaseLiquidityFromDeltas = 0x04,
    MintPositionFromDeltas = 0x05,

    SwapExactInSingle = 0x06,
    SwapExactIn = 0x07,
    SwapExactOutSingle = 0x08,
    SwapExactOut = 0x09,

    Donate = 0x0a,

    Settle = 0x0b,
    SettleAll = 0x0c,
    SettlePair = 0x0d,
    Take = 0x0e,
    TakeAll = 0x0f,
    TakePortion = 0x10,
    TakePair = 0x11,
    CloseCurrency = 0x12,
    ClearOrTake = 0x13,
    Sweep = 0x14,

    Wrap = 0x15,
    Unwrap = 0x16,
}

impl V4Action {
    pub fn from_u8(val: u8) -> Option<Self> {
        use V4Action::*;
        Some(match val {
            0x00 => IncreaseLiquidity,
            0x01 => DecreaseLiquidity,
            0x02 => MintPosition,
            0x03 => BurnPosition,
            0x04 => IncreaseLiquidityFromDeltas,
            0x05 => MintPositionFromDeltas,
            0x06 => SwapExactInSingle,
            0x07 => SwapExactIn,
            0x08 => SwapExactOutSingle,
            0x09 => SwapExactOut,
            0x0a => Donate,
            0x0b => Settle,
            0x0c => SettleAll,
            0x0d => SettlePair,
            0x0e => Take,
            0x0f => TakeAll,
            0x10 => TakePortion,
            0x11 => TakePair,
            0x12 => CloseCurrency,
            0x13 => ClearOrTake,
            0x14 => Sweep,
            0x15 => Wrap,
            0x16 => Unwrap,
            _ => return None,
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        use V4Action::*;
        match self {
            IncreaseLiquidity => "INCREASE_LIQUIDITY",
            DecreaseLiquidity => "DECREASE_LIQUIDITY",
            MintPosition => "MINT_POSITION",
            BurnPosition => "BURN_POSITION",
            IncreaseLiquidityFromDeltas => "INCREASE_LIQUIDITY_FROM_DELTAS",
            MintPositionFromDeltas => "MINT_POSITION_FROM_DELTAS",
            SwapExactInSingle => "SWAP_EXACT_IN_SINGLE",
            SwapExactIn => "SWAP_EXACT_IN",
            SwapExactOutSingle => "SWAP_EXACT_OUT_SINGLE",
            SwapExactOut => "SWAP_EXACT_OUT",
            Donate => "DONATE",
            Settle => "SETTLE",
            SettleAll => "SETTLE_ALL",
            SettlePair => "SETTLE_PAIR",
            Take => "TAKE",
            TakeAll => "TAKE_ALL",
            TakePortion => "TAKE_PORTION",
            TakePair => "TAKE_PAIR",
            CloseCurrency => "CLOSE_CURRENCY",
            ClearOrTake => "CLEAR_OR_TAKE",
            Sweep => "SWEEP",
            Wrap => "WRAP",
            Unwrap => "UNWRAP",
        }
    }

    /// Parameter layout of this action
    pub fn fields(self) -> Vec<FieldSpec> {
        use DynSolType::{Address, Bool, Bytes, Int, Uint};
        use V4Action::*;

        let f = FieldSpec::new;
        match self {
            IncreaseLiquidity => vec![
                f("tokenId", Uint(256)),
                f("liquidity", Uint(256)),
                f("amount0Max", Uint(128)),
                f("amount1Max", Uint(128)),
                f("hookData", Bytes),
            ],
            DecreaseLiquidity => vec![
                f("tokenId", Uint(256)),
                f("liquidity", Uint(256)),
                f("amount0Min", Uint(128)),
                f("amount1Min", Uint(128)),
                f("hookData", Bytes),
            ],
            MintPosition => vec![
                f("poolKey", pool_key()),
                f("tickLower", Int(24)),
                f("tickUpper", Int(24)),
                f("liquidity", Uint(256)),
                f("amount0Max", Uint(128)),
                f("amount1Max", Uint(128)),
                f("owner", Address),
                f("hookData", Bytes),
            ],
            BurnPosition => vec![
                f("tokenId", Uint(256)),
                f("amount0Min", Uint(128)),
                f("amount1Min", Uint(128)),
                f("hookData", Bytes),
            ],
            IncreaseLiquidityFromDeltas => vec![
                f("tokenId", Uint(256)),
                f("amount0Max", Uint(128)),
                f("amount1Max", Uint(128)),
                f("hookData", Bytes),
            ],
            MintPositionFromDeltas => vec![
                f("poolKey", pool_key()),
                f("tickLower", Int(24)),
                f("tickUpper", Int(24)),
                f("amount0Max", Uint(128)),
                f("amount1Max", Uint(128)),
                f("owner", Address),
                f("hookData", Bytes),
            ],
            // (PoolKey poolKey, bool zeroForOne, uint128 amount, uint128 limit, bytes hookData)
            SwapExactInSingle | SwapExactOutSingle => vec![f(
                "swap",
                DynSolType::Tuple(vec![pool_key(), Bool, Uint(128), Uint(128), Bytes]),
            )],
            // (address currency, PathKey[] path, uint128 amount, uint128 limit)
            SwapExactIn | SwapExactOut => vec![f(
                "swap",
                DynSolType::Tuple(vec![
                    Address,
                    DynSolType::Array(Box::new(path_key())),
                    Uint(128),
                    Uint(128),
                ]),
            )],
            Donate => vec![
                f("poolKey", pool_key()),
                f("amount0", Uint(256)),
                f("amount1", Uint(256)),
                f("hookData", Bytes),
            ],
            Settle => vec![
                f("currency", Address),
                f("amount", Uint(256)),
                f("payerIsUser", Bool),
            ],
            SettleAll => vec![f("currency", Address), f("maxAmount", Uint(256))],
            SettlePair => vec![f("currency0", Address), f("currency1", Address)],
            Take => vec![
                f("currency", Address),
                f("recipient", Address),
                f("amount", Uint(256)),
            ],
            TakeAll => vec![f("currency", Address), f("minAmount", Uint(256))],
            TakePortion => vec![
                f("currency", Address),
                f("recipient", Address),
                f("bips", Uint(256)),
            ],
            TakePair => vec![
                f("currency0", Address),
                f("currency1", Address),
                f("recipient", Address),
            ],
            CloseCurrency => vec![f("currency", Address)],
            ClearOrTake => vec![f("currency", Address), f("amountMax", Uint(256))],
            Sweep => vec![f("currency", Address), f("recipient", Address)],
            Wrap | Unwrap => vec![f("amount", Uint(256))],
        }
    }
}

impl fmt::Display for V4Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `(address intermediateCurrency, uint24 fee, int24 tickSpacing, address hooks, bytes hookData)`
fn path_key() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Uint(24),
        DynSolType::Int(24),
        DynSolType::Address,
        DynSolType::Bytes,
    ])
}

fn envelope_type() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Bytes,
        DynSolType::Array(Box::new(DynSolType::Bytes)),
    ])
}

/// Default decoder for the V4 action envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct V4ActionDecoder;

impl V4ActionDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Strip a `modifyLiquidities` call down to its unlock data
    fn unwrap_position_call(command: CommandType, input: &[u8]) -> Result<Option<Bytes>> {
        if input.len() < 4 || input[..4] != selector(MODIFY_LIQUIDITIES_SIGNATURE)[..] {
            return Ok(None);
        }

        let ty = DynSolType::Tuple(vec![DynSolType::Bytes, DynSolType::Uint(256)]);
        let decoded = ty
            .abi_decode_params(&input[4..])
            .map_err(|source| Error::FieldDecode { command, source })?;

        match Value::from(decoded) {
            Value::Tuple(items) => items
                .first()
                .and_then(Value::as_bytes)
                .cloned()
                .map(Some)
                .ok_or(Error::UnexpectedShape("modifyLiquidities unlock data")),
            _ => Err(Error::UnexpectedShape("modifyLiquidities arguments")),
        }
    }
}

impl ActionDecoder for V4ActionDecoder {
    fn decode_actions(&self, command: CommandType, input: &[u8]) -> Result<Vec<Param>> {
        let unwrapped = if command == CommandType::V4PositionManagerCall {
            Self::unwrap_position_call(command, input)?
        } else {
            None
        };
        let input: &[u8] = match &unwrapped {
            Some(call) => call,
            None => input,
        };

        let decoded = envelope_type()
            .abi_decode_params(input)
            .map_err(|source| Error::FieldDecode { command, source })?;

        let Value::Tuple(items) = Value::from(decoded) else {
            return Err(Error::UnexpectedShape("action envelope"));
        };
        let actions = items
            .first()
            .and_then(Value::as_bytes)
            .ok_or(Error::UnexpectedShape("action bytes"))?;
        let params = items
            .get(1)
            .and_then(Value::as_array)
            .ok_or(Error::UnexpectedShape("action params"))?;

        if actions.len() != params.len() {
            return Err(Error::ActionLengthMismatch {
                actions: actions.len(),
                params: params.len(),
            });
        }

        let mut out = Vec::with_capacity(actions.len());
        for (byte, blob) in actions.iter().zip(params) {
            let action = V4Action::from_u8(*byte).ok_or(Error::UnknownAction(*byte))?;
            let blob = blob
                .as_bytes()
                .ok_or(Error::UnexpectedShape("action param blob"))?;

            tracing::trace!(%command, %action, len = blob.len(), "decoding action");
            let fields = decode_fields(command, &action.fields(), blob)?;
            out.push(Param::new(action.name(), Value::Params(fields)));
        }

        Ok(out)
    }
}

/// Builder for a V4 action envelope
#[derive(Debug, Clone)]
pub struct ActionPlanner {
    command: CommandType,
    actions: BytesMut,
    params: Vec<Bytes>,
}

impl ActionPlanner {
    /// Start an envelope destined for the given nested-action command
    pub fn new(command: CommandType) -> Self {
        Self {
            command,
            actions: BytesMut::new(),
            params: Vec::new(),
        }
    }

    /// Append one action with its arguments in field order
    pub fn add_action(&mut self, action: V4Action, args: Vec<Value>) -> Result<&mut Self> {
        let blob = encode_fields(self.command, &action.fields(), &args)?;
        self.actions.put_u8(action.id());
        self.params.push(blob);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encode the envelope
    pub fn finish(self) -> Bytes {
        let envelope = DynSolValue::Tuple(vec![
            DynSolValue::Bytes(self.actions.to_vec()),
            DynSolValue::Array(
                self.params
                    .into_iter()
                    .map(|p| DynSolValue::Bytes(p.to_vec()))
                    .collect(),
            ),
        ]);
        Bytes::from(envelope.abi_encode_params())
    }
}
