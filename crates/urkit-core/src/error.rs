//! Error types for the router codec

use crate::CommandType;
use alloy_primitives::{Address, Selector};
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Codec error types
#[derive(Error, Debug)]
pub enum Error {
    /// Command byte (after masking the revert flag) has no registry entry
    #[error("unknown command type: 0x{0:02x}")]
    UnknownCommand(u8),

    /// Commands byte-string and inputs list are not aligned
    #[error("commands/inputs length mismatch: {commands} commands, {inputs} inputs")]
    LengthMismatch { commands: usize, inputs: usize },

    /// Revert flag requested on a command that may not carry it
    #[error("command {0} cannot be allowed to revert")]
    NonRevertibleCommand(CommandType),

    /// Packed path shorter than one hop or not hop-aligned
    #[error("malformed path: {len} bytes is not a whole number of hops")]
    MalformedPath { len: usize },

    /// The ABI primitive rejected an input blob
    #[error("failed to decode {command} input: {source}")]
    FieldDecode {
        command: CommandType,
        #[source]
        source: alloy_dyn_abi::Error,
    },

    /// Wrong number of arguments for a field-list command
    #[error("{command} takes {expected} arguments, got {got}")]
    ArgumentCount {
        command: CommandType,
        expected: usize,
        got: usize,
    },

    /// Argument does not fit the declared field type
    #[error("argument {field} of {command} is not a valid {expected}")]
    ArgumentType {
        command: CommandType,
        field: String,
        expected: String,
    },

    /// Hop list that cannot be packed into a path
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// Decoded swap command whose route names no usable token pair
    #[error("unusable swap route: {0}")]
    UnusableRoute(String),

    /// Nested action byte with no known layout
    #[error("unknown action type: 0x{0:02x}")]
    UnknownAction(u8),

    /// Nested action envelope is not aligned
    #[error("actions/params length mismatch: {actions} actions, {params} params")]
    ActionLengthMismatch { actions: usize, params: usize },

    /// Sub-plan nesting exceeds the configured depth
    #[error("sub-plan nesting exceeds maximum depth of {max}")]
    SubPlanTooDeep { max: usize },

    /// Calldata too short to carry a selector
    #[error("calldata too short: {len} bytes")]
    CalldataTooShort { len: usize },

    /// Selector is not a router entry point
    #[error("unknown function selector: {0}")]
    UnknownSelector(Selector),

    /// Entry point arguments failed to decode
    #[error("failed to decode calldata: {0}")]
    CalldataDecode(#[source] alloy_dyn_abi::Error),

    /// ABI primitive returned a value of an unexpected shape
    #[error("unexpected decoded shape for {0}")]
    UnexpectedShape(&'static str),

    /// Decoded command lacks an expected param
    #[error("{command} is missing param {name}")]
    MissingParam { command: CommandType, name: String },

    /// Transaction target is not a known router
    #[error("unknown router: {0}")]
    UnknownRouter(Address),

    /// Router is known but has no calldata decoder
    #[error("router {name} ({address}) is not supported")]
    UnsupportedRouter { name: String, address: Address },
}

impl Error {
    /// True for failures caused by the input bytes rather than caller misuse
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Error::UnknownCommand(_)
                | Error::LengthMismatch { .. }
                | Error::MalformedPath { .. }
                | Error::FieldDecode { .. }
                | Error::UnknownAction(_)
                | Error::ActionLengthMismatch { .. }
                | Error::SubPlanTooDeep { .. }
                | Error::CalldataTooShort { .. }
                | Error::UnknownSelector(_)
                | Error::CalldataDecode(_)
                | Error::UnexpectedShape(_)
                | Error::UnusableRoute(_)
                | Error::MissingParam { .. }
        )
    }
}
