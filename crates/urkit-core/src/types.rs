//! Router command types and decoded command structures

use crate::Value;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Router command identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum CommandType {
    V3SwapExactIn = 0x00,
    V3SwapExactOut = 0x01,
    Permit2TransferFrom = 0x02,
    Permit2PermitBatch = 0x03,
    Sweep = 0x04,
    Transfer = 0x05,
    PayPortion = 0x06,

    V2SwapExactIn = 0x08,
    V2SwapExactOut = 0x09,
    Permit2Permit = 0x0a,
    WrapEth = 0x0b,
    UnwrapWeth = 0x0c,
    Permit2TransferFromBatch = 0x0d,
    BalanceCheckErc20 = 0x0e,

    V4Swap = 0x10,
    V3PositionManagerPermit = 0x11,
    V3PositionManagerCall = 0x12,
    V4InitializePool = 0x13,
    V4PositionManagerCall = 0x14,

    ExecuteSubPlan = 0x21,
}

impl CommandType {
    /// Every assigned identifier, in ascending order
    pub const ALL: [CommandType; 20] = [
        CommandType::V3SwapExactIn,
        CommandType::V3SwapExactOut,
        CommandType::Permit2TransferFrom,
        CommandType::Permit2PermitBatch,
        CommandType::Sweep,
        CommandType::Transfer,
        CommandType::PayPortion,
        CommandType::V2SwapExactIn,
        CommandType::V2SwapExactOut,
        CommandType::Permit2Permit,
        CommandType::WrapEth,
        CommandType::UnwrapWeth,
        CommandType::Permit2TransferFromBatch,
        CommandType::BalanceCheckErc20,
        CommandType::V4Swap,
        CommandType::V3PositionManagerPermit,
        CommandType::V3PositionManagerCall,
        CommandType::V4InitializePool,
        CommandType::V4PositionManagerCall,
        CommandType::ExecuteSubPlan,
    ];

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0x00 => Some(CommandType::V3SwapExactIn),
            0x01 => Some(CommandType::V3SwapExactOut),
            0x02 => Some(CommandType::Permit2TransferFrom),
            0x03 => Some(CommandType::Permit2PermitBatch),
            0x04 => Some(CommandType::Sweep),
            0x05 => Some(CommandType::Transfer),
            0x06 => Some(CommandType::PayPortion),
            0x08 => Some(CommandType::V2SwapExactIn),
            0x09 => Some(CommandType::V2SwapExactOut),
            0x0a => Some(CommandType::Permit2Permit),
            0x0b => Some(CommandType::WrapEth),
            0x0c => Some(CommandType::UnwrapWeth),
            0x0d => Some(CommandType::Permit2TransferFromBatch),
            0x0e => Some(CommandType::BalanceCheckErc20),
            0x10 => Some(CommandType::V4Swap),
            0x11 => Some(CommandType::V3PositionManagerPermit),
            0x12 => Some(CommandType::V3PositionManagerCall),
            0x13 => Some(CommandType::V4InitializePool),
            0x14 => Some(CommandType::V4PositionManagerCall),
            0x21 => Some(CommandType::ExecuteSubPlan),
            _ => None,
        }
    }

    /// Wire identifier (bits 0-6 of the command byte)
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Canonical command name, as used by the router contract
    pub fn name(self) -> &'static str {
        match self {
            CommandType::V3SwapExactIn => "V3_SWAP_EXACT_IN",
            CommandType::V3SwapExactOut => "V3_SWAP_EXACT_OUT",
            CommandType::Permit2TransferFrom => "PERMIT2_TRANSFER_FROM",
            CommandType::Permit2PermitBatch => "PERMIT2_PERMIT_BATCH",
            CommandType::Sweep => "SWEEP",
            CommandType::Transfer => "TRANSFER",
            CommandType::PayPortion => "PAY_PORTION",
            CommandType::V2SwapExactIn => "V2_SWAP_EXACT_IN",
            CommandType::V2SwapExactOut => "V2_SWAP_EXACT_OUT",
            CommandType::Permit2Permit => "PERMIT2_PERMIT",
            CommandType::WrapEth => "WRAP_ETH",
            CommandType::UnwrapWeth => "UNWRAP_WETH",
            CommandType::Permit2TransferFromBatch => "PERMIT2_TRANSFER_FROM_BATCH",
            CommandType::BalanceCheckErc20 => "BALANCE_CHECK_ERC20",
            CommandType::V4Swap => "V4_SWAP",
            CommandType::V3PositionManagerPermit => "V3_POSITION_MANAGER_PERMIT",
            CommandType::V3PositionManagerCall => "V3_POSITION_MANAGER_CALL",
            CommandType::V4InitializePool => "V4_INITIALIZE_POOL",
            CommandType::V4PositionManagerCall => "V4_POSITION_MANAGER_CALL",
            CommandType::ExecuteSubPlan => "EXECUTE_SUB_PLAN",
        }
    }

    /// Commands permitted to carry the revert flag
    pub fn is_revertible(self) -> bool {
        matches!(self, CommandType::ExecuteSubPlan)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CommandType::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown command name: {}", s))
    }
}

impl From<CommandType> for u8 {
    fn from(c: CommandType) -> u8 {
        c as u8
    }
}

/// One edge of a multi-hop trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hop {
    pub token_in: Address,
    pub token_out: Address,
    /// Fee tier, present for fee-tiered (V3) paths only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u32>,
}

impl Hop {
    /// Create a fee-tiered hop
    pub fn new(token_in: Address, token_out: Address, fee: u32) -> Self {
        Self {
            token_in,
            token_out,
            fee: Some(fee),
        }
    }

    /// Create a hop without fee tier
    pub fn unpriced(token_in: Address, token_out: Address) -> Self {
        Self {
            token_in,
            token_out,
            fee: None,
        }
    }

    /// Same pool edge traversed the other way
    pub fn reversed(&self) -> Self {
        Self {
            token_in: self.token_out,
            token_out: self.token_in,
            fee: self.fee,
        }
    }
}

/// A named decoded value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: Value,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Decoded form of one router command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredCommand {
    pub name: String,
    pub command: CommandType,
    /// Revert flag as it appeared on the wire
    #[serde(default)]
    pub allow_revert: bool,
    pub params: Vec<Param>,
}

impl StructuredCommand {
    pub fn new(command: CommandType, allow_revert: bool, params: Vec<Param>) -> Self {
        Self {
            name: command.name().to_string(),
            command,
            allow_revert,
            params,
        }
    }

    /// Look up a param by name
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

/// A decoded `execute` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterCall {
    pub commands: Vec<StructuredCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<U256>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_ids_roundtrip() {
        for command in CommandType::ALL {
            assert_eq!(CommandType::from_u8(command.id()), Some(command));
        }
        assert_eq!(CommandType::from_u8(0x07), None);
        assert_eq!(CommandType::from_u8(0x22), None);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(CommandType::V2SwapExactIn.name(), "V2_SWAP_EXACT_IN");
        assert_eq!(
            "permit2_transfer_from_batch".parse::<CommandType>(),
            Ok(CommandType::Permit2TransferFromBatch)
        );
        assert!("NOT_A_COMMAND".parse::<CommandType>().is_err());
    }

    #[test]
    fn test_serde_name_matches_wire_name() {
        for command in CommandType::ALL {
            let json = serde_json::to_string(&command).unwrap();
            assert_eq!(json, format!("\"{}\"", command.name()));
        }
    }

    #[test]
    fn test_only_sub_plan_is_revertible() {
        let revertible: Vec<_> = CommandType::ALL
            .into_iter()
            .filter(|c| c.is_revertible())
            .collect();
        assert_eq!(revertible, vec![CommandType::ExecuteSubPlan]);
    }
}
