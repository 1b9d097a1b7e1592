//! Command byte layout
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │ Bit 7:     Allow-revert flag              │
//! │ Bits 6-0:  Command identifier             │
//! └───────────────────────────────────────────┘
//! ```
//!
//! The flag never changes what a command means. It is masked off before any
//! registry lookup and only reported alongside the decoded command.

use crate::{CommandType, Error, Result};

/// Allow-revert flag bit
pub const ALLOW_REVERT_FLAG: u8 = 0x80;

/// Mask selecting the command identifier bits
pub const COMMAND_TYPE_MASK: u8 = 0x7f;

/// Strip the revert flag from a raw command byte
#[inline]
pub const fn mask(byte: u8) -> u8 {
    byte & COMMAND_TYPE_MASK
}

/// A command byte split into identifier and flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandByte {
    pub id: u8,
    pub allow_revert: bool,
}

impl CommandByte {
    pub fn new(command: CommandType) -> Self {
        Self {
            id: command.id(),
            allow_revert: false,
        }
    }

    /// Set the revert flag
    pub fn with_allow_revert(mut self, allow_revert: bool) -> Self {
        self.allow_revert = allow_revert;
        self
    }

    pub fn to_byte(&self) -> u8 {
        let mut byte = mask(self.id);
        if self.allow_revert {
            byte |= ALLOW_REVERT_FLAG;
        }
        byte
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            id: mask(byte),
            allow_revert: (byte & ALLOW_REVERT_FLAG) != 0,
        }
    }

    /// Resolve the identifier to a known command type
    pub fn command_type(&self) -> Result<CommandType> {
        CommandType::from_u8(self.id).ok_or(Error::UnknownCommand(self.id))
    }
}

impl From<u8> for CommandByte {
    fn from(byte: u8) -> Self {
        CommandByte::from_byte(byte)
    }
}
