//! urkit Core
//!
//! Command-batch codec for the Uniswap universal router.
//!
//! A router call carries a `commands` byte-string (one byte per command,
//! bit 7 = allow-revert) and a parallel list of ABI-encoded input blobs. This
//! crate provides:
//! - The command table ([`CommandRegistry`], [`CommandType`])
//! - Plan building ([`RoutePlanner`], [`Plan`])
//! - Decoding into structured commands ([`CommandParser`], [`StructuredCommand`])
//! - Packed V3 path encoding ([`path`])
//! - Nested V4 action sets ([`actions`])
//! - Swap extraction and router lookup ([`swap`])

pub mod actions;
pub mod calldata;
pub mod error;
pub mod flags;
pub mod parser;
pub mod path;
pub mod planner;
pub mod registry;
pub mod swap;
pub mod types;
pub mod value;

pub use actions::{ActionDecoder, ActionPlanner, V4Action, V4ActionDecoder};
pub use calldata::ExecuteCall;
pub use error::{Error, Result};
pub use flags::{CommandByte, ALLOW_REVERT_FLAG, COMMAND_TYPE_MASK};
pub use parser::{CommandParser, DecodeOptions};
pub use path::PathEncoding;
pub use planner::{EncodedCommand, Plan, PlanStep, RoutePlanner};
pub use registry::{CommandDefinition, CommandRegistry, FieldSpec};
pub use swap::{
    extract_swaps, KnownRouter, PoolVersion, RouterDirectory, RouterKind, SwapDescription,
    TransactionDecoder,
};
pub use types::*;
pub use value::Value;

/// Selector of `execute(bytes,bytes[],uint256)`
pub const EXECUTE_SELECTOR: [u8; 4] = [0x35, 0x93, 0x56, 0x4c];
