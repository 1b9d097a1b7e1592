//! Command registry
//!
//! Maps every router command identifier to the strategy used to encode and
//! decode its input blob. The table is built once and never mutated; share it
//! between planners and parsers through an `Arc`.

use crate::flags::mask;
use crate::path::PathEncoding;
use crate::{CommandType, Error, Result};
use alloy_dyn_abi::DynSolType;
use std::collections::HashMap;

/// One named field of a field-list command
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: DynSolType,
    /// Packed path sub-decoder applied to this field, if any
    pub path: Option<PathEncoding>,
}

impl FieldSpec {
    pub fn new(name: &'static str, ty: DynSolType) -> Self {
        Self {
            name,
            ty,
            path: None,
        }
    }

    /// A `bytes` field holding a packed path
    pub fn path(name: &'static str, encoding: PathEncoding) -> Self {
        Self {
            name,
            ty: DynSolType::Bytes,
            path: Some(encoding),
        }
    }

    /// Solidity type name, e.g. `uint256` or `(address,uint160)[]`
    pub fn type_name(&self) -> String {
        self.ty.sol_type_name().into_owned()
    }
}

/// Decoding strategy for a command's input blob
#[derive(Debug, Clone, PartialEq)]
pub enum CommandDefinition {
    /// ABI-encoded field list, decoded in declared order
    FieldList(Vec<FieldSpec>),
    /// Self-contained nested action protocol, handed to an action decoder
    NestedActionSet,
    /// Passed through as raw bytes without field-level decoding
    OpaqueActionCall,
}

impl CommandDefinition {
    pub fn fields(&self) -> Option<&[FieldSpec]> {
        match self {
            CommandDefinition::FieldList(fields) => Some(fields),
            _ => None,
        }
    }

    /// Short label for listings
    pub fn strategy(&self) -> &'static str {
        match self {
            CommandDefinition::FieldList(_) => "abi",
            CommandDefinition::NestedActionSet => "actions",
            CommandDefinition::OpaqueActionCall => "opaque",
        }
    }
}

/// Immutable command table
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    definitions: HashMap<CommandType, CommandDefinition>,
}

impl CommandRegistry {
    /// Build a registry from explicit entries
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = (CommandType, CommandDefinition)>,
    ) -> Self {
        Self {
            definitions: definitions.into_iter().collect(),
        }
    }

    /// The full universal router command table
    pub fn universal_router() -> Self {
        use CommandDefinition::*;
        use DynSolType::{Address, Bool, Bytes};

        let uint = DynSolType::Uint;

        Self::from_definitions([
            // Batch reverts
            (
                CommandType::ExecuteSubPlan,
                FieldList(vec![
                    FieldSpec::new("commands", Bytes),
                    FieldSpec::new("inputs", DynSolType::Array(Box::new(Bytes))),
                ]),
            ),
            // Permit2 actions
            (
                CommandType::Permit2Permit,
                FieldList(vec![
                    FieldSpec::new("permit", permit_single()),
                    FieldSpec::new("signature", Bytes),
                ]),
            ),
            (
                CommandType::Permit2PermitBatch,
                FieldList(vec![
                    FieldSpec::new("permit", permit_batch()),
                    FieldSpec::new("signature", Bytes),
                ]),
            ),
            (
                CommandType::Permit2TransferFrom,
                FieldList(vec![
                    FieldSpec::new("token", Address),
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amount", uint(160)),
                ]),
            ),
            (
                CommandType::Permit2TransferFromBatch,
                FieldList(vec![FieldSpec::new(
                    "transferFrom",
                    DynSolType::Array(Box::new(allowance_transfer())),
                )]),
            ),
            // Swaps
            (
                CommandType::V3SwapExactIn,
                FieldList(vec![
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amountIn", uint(256)),
                    FieldSpec::new("amountOutMin", uint(256)),
                    FieldSpec::path("path", PathEncoding::ExactIn),
                    FieldSpec::new("payerIsUser", Bool),
                ]),
            ),
            (
                CommandType::V3SwapExactOut,
                FieldList(vec![
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amountOut", uint(256)),
                    FieldSpec::new("amountInMax", uint(256)),
                    FieldSpec::path("path", PathEncoding::ExactOut),
                    FieldSpec::new("payerIsUser", Bool),
                ]),
            ),
            (
                CommandType::V2SwapExactIn,
                FieldList(vec![
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amountIn", uint(256)),
                    FieldSpec::new("amountOutMin", uint(256)),
                    FieldSpec::new("path", DynSolType::Array(Box::new(Address))),
                    FieldSpec::new("payerIsUser", Bool),
                ]),
            ),
            (
                CommandType::V2SwapExactOut,
                FieldList(vec![
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amountOut", uint(256)),
                    FieldSpec::new("amountInMax", uint(256)),
                    FieldSpec::new("path", DynSolType::Array(Box::new(Address))),
                    FieldSpec::new("payerIsUser", Bool),
                ]),
            ),
            (CommandType::V4Swap, NestedActionSet),
            // Token actions and checks
            (
                CommandType::WrapEth,
                FieldList(vec![
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amount", uint(256)),
                ]),
            ),
            (
                CommandType::UnwrapWeth,
                FieldList(vec![
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amountMin", uint(256)),
                ]),
            ),
            (
                CommandType::Sweep,
                FieldList(vec![
                    FieldSpec::new("token", Address),
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("amountMin", uint(256)),
                ]),
            ),
            (
                CommandType::Transfer,
                FieldList(vec![
                    FieldSpec::new("token", Address),
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("value", uint(256)),
                ]),
            ),
            (
                CommandType::PayPortion,
                FieldList(vec![
                    FieldSpec::new("token", Address),
                    FieldSpec::new("recipient", Address),
                    FieldSpec::new("bips", uint(256)),
                ]),
            ),
            (
                CommandType::BalanceCheckErc20,
                FieldList(vec![
                    FieldSpec::new("owner", Address),
                    FieldSpec::new("token", Address),
                    FieldSpec::new("minBalance", uint(256)),
                ]),
            ),
            (
                CommandType::V4InitializePool,
                FieldList(vec![
                    FieldSpec::new("poolKey", pool_key()),
                    FieldSpec::new("sqrtPriceX96", uint(160)),
                ]),
            ),
            // Position actions
            (CommandType::V3PositionManagerPermit, OpaqueActionCall),
            (CommandType::V3PositionManagerCall, OpaqueActionCall),
            (CommandType::V4PositionManagerCall, NestedActionSet),
        ])
    }

    /// Look up the definition for a raw command byte (revert flag ignored)
    pub fn lookup(&self, byte: u8) -> Result<(CommandType, &CommandDefinition)> {
        let id = mask(byte);
        let command = CommandType::from_u8(id).ok_or(Error::UnknownCommand(id))?;
        let definition = self.get(command).ok_or(Error::UnknownCommand(id))?;
        Ok((command, definition))
    }

    /// Look up the definition for a known command type
    pub fn get(&self, command: CommandType) -> Option<&CommandDefinition> {
        self.definitions.get(&command)
    }

    pub fn contains(&self, command: CommandType) -> bool {
        self.definitions.contains_key(&command)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Entries in ascending identifier order
    pub fn iter(&self) -> impl Iterator<Item = (CommandType, &CommandDefinition)> {
        let mut entries: Vec<_> = self.definitions.iter().map(|(c, d)| (*c, d)).collect();
        entries.sort_by_key(|(c, _)| *c);
        entries.into_iter()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::universal_router()
    }
}

/// `(address token, uint160 amount, uint48 expiration, uint48 nonce)`
fn permit_details() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Uint(160),
        DynSolType::Uint(48),
        DynSolType::Uint(48),
    ])
}

/// `(PermitDetails details, address spender, uint256 sigDeadline)`
fn permit_single() -> DynSolType {
    DynSolType::Tuple(vec![
        permit_details(),
        DynSolType::Address,
        DynSolType::Uint(256),
    ])
}

/// `(PermitDetails[] details, address spender, uint256 sigDeadline)`
fn permit_batch() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Array(Box::new(permit_details())),
        DynSolType::Address,
        DynSolType::Uint(256),
    ])
}

/// `(address from, address to, uint160 amount, address token)`
fn allowance_transfer() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Address,
        DynSolType::Uint(160),
        DynSolType::Address,
    ])
}

/// `(address currency0, address currency1, uint24 fee, int24 tickSpacing, address hooks)`
pub(crate) fn pool_key() -> DynSolType {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Address,
        DynSolType::Uint(24),
        DynSolType::Int(24),
        DynSolType::Address,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_command() {
        let registry = CommandRegistry::universal_router();
        assert_eq!(registry.len(), CommandType::ALL.len());
        for command in CommandType::ALL {
            assert!(registry.contains(command), "missing {}", command);
        }
    }

    #[test]
    fn test_lookup_masks_revert_flag() {
        let registry = CommandRegistry::universal_router();
        let (plain, def) = registry.lookup(0x21).unwrap();
        let (flagged, flagged_def) = registry.lookup(0xa1).unwrap();

        assert_eq!(plain, CommandType::ExecuteSubPlan);
        assert_eq!(flagged, plain);
        assert_eq!(def, flagged_def);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = CommandRegistry::universal_router();
        assert!(matches!(registry.lookup(0x07), Err(Error::UnknownCommand(0x07))));
        assert!(matches!(registry.lookup(0xff), Err(Error::UnknownCommand(0x7f))));
    }

    #[test]
    fn test_stale_registry_reports_unknown() {
        let registry = CommandRegistry::from_definitions([(
            CommandType::WrapEth,
            CommandDefinition::OpaqueActionCall,
        )]);
        assert!(registry.lookup(0x0b).is_ok());
        assert!(matches!(registry.lookup(0x0c), Err(Error::UnknownCommand(0x0c))));
    }

    #[test]
    fn test_path_fields_tagged() {
        let registry = CommandRegistry::universal_router();

        let exact_in = registry.get(CommandType::V3SwapExactIn).unwrap();
        let path = &exact_in.fields().unwrap()[3];
        assert_eq!(path.name, "path");
        assert_eq!(path.path, Some(PathEncoding::ExactIn));

        let exact_out = registry.get(CommandType::V3SwapExactOut).unwrap();
        assert_eq!(exact_out.fields().unwrap()[3].path, Some(PathEncoding::ExactOut));

        let v2 = registry.get(CommandType::V2SwapExactIn).unwrap();
        assert_eq!(v2.fields().unwrap()[3].path, None);
        assert_eq!(v2.fields().unwrap()[3].type_name(), "address[]");
    }

    #[test]
    fn test_strategies() {
        let registry = CommandRegistry::universal_router();
        assert_eq!(
            registry.get(CommandType::V4Swap),
            Some(&CommandDefinition::NestedActionSet)
        );
        assert_eq!(
            registry.get(CommandType::V3PositionManagerCall),
            Some(&CommandDefinition::OpaqueActionCall)
        );
        assert_eq!(
            registry.get(CommandType::Permit2Permit).unwrap().fields().unwrap()[0].type_name(),
            "((address,uint160,uint48,uint48),address,uint256)"
        );
    }

    #[test]
    fn test_iter_sorted() {
        let registry = CommandRegistry::universal_router();
        let ids: Vec<u8> = registry.iter().map(|(c, _)| c.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.first(), Some(&0x00));
        assert_eq!(ids.last(), Some(&0x21));
    }
}
