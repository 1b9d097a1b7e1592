//! Command dispatcher
//!
//! Walks a commands byte-string alongside its input blobs and decodes each
//! input with the strategy the registry assigns to the command.

use crate::actions::{ActionDecoder, V4ActionDecoder};
use crate::calldata::ExecuteCall;
use crate::flags::CommandByte;
use crate::registry::{CommandDefinition, CommandRegistry, FieldSpec};
use crate::{CommandType, Error, Param, Result, RouterCall, StructuredCommand, Value};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Decoder behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Recursively decode sub-plans into a `subPlan` param
    pub expand_sub_plans: bool,
    /// Deepest sub-plan nesting decoded when expansion is on
    pub max_sub_plan_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            expand_sub_plans: false,
            max_sub_plan_depth: 4,
        }
    }
}

/// Decoder for router command batches
#[derive(Clone)]
pub struct CommandParser {
    registry: Arc<CommandRegistry>,
    actions: Arc<dyn ActionDecoder>,
    options: DecodeOptions,
}

impl CommandParser {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            actions: Arc::new(V4ActionDecoder::new()),
            options: DecodeOptions::default(),
        }
    }

    /// Replace the nested action decoder
    pub fn with_action_decoder(mut self, actions: Arc<dyn ActionDecoder>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Decode a commands byte-string and its parallel input blobs
    pub fn parse<I: AsRef<[u8]>>(
        &self,
        commands: &[u8],
        inputs: &[I],
    ) -> Result<Vec<StructuredCommand>> {
        self.parse_at_depth(commands, inputs, 0)
    }

    /// Decode full `execute` calldata
    pub fn parse_calldata(&self, calldata: &[u8]) -> Result<RouterCall> {
        let call = ExecuteCall::decode(calldata)?;
        let commands = self.parse(&call.commands, &call.inputs)?;
        Ok(RouterCall {
            commands,
            deadline: call.deadline,
        })
    }

    fn parse_at_depth<I: AsRef<[u8]>>(
        &self,
        commands: &[u8],
        inputs: &[I],
        depth: usize,
    ) -> Result<Vec<StructuredCommand>> {
        if commands.len() != inputs.len() {
            return Err(Error::LengthMismatch {
                commands: commands.len(),
                inputs: inputs.len(),
            });
        }

        commands
            .iter()
            .zip(inputs)
            .map(|(byte, input)| self.parse_command(*byte, input.as_ref(), depth))
            .collect()
    }

    fn parse_command(&self, byte: u8, input: &[u8], depth: usize) -> Result<StructuredCommand> {
        let flag = CommandByte::from_byte(byte);
        let (command, definition) = self.registry.lookup(byte).inspect_err(|_| {
            tracing::warn!(byte = format_args!("0x{:02x}", byte), "unknown command byte");
        })?;

        tracing::debug!(
            command = %command,
            allow_revert = flag.allow_revert,
            depth,
            input_len = input.len(),
            "decoding command"
        );

        let params = match definition {
            CommandDefinition::FieldList(fields) => {
                let mut params = decode_fields(command, fields, input)?;
                if command == CommandType::ExecuteSubPlan && self.options.expand_sub_plans {
                    let expanded = self.expand_sub_plan(&params, depth)?;
                    params.push(expanded);
                }
                params
            }
            CommandDefinition::NestedActionSet => self.actions.decode_actions(command, input)?,
            CommandDefinition::OpaqueActionCall => {
                vec![Param::new("command", Bytes::copy_from_slice(input))]
            }
        };

        Ok(StructuredCommand::new(command, flag.allow_revert, params))
    }

    fn expand_sub_plan(&self, params: &[Param], depth: usize) -> Result<Param> {
        let max = self.options.max_sub_plan_depth;
        if depth >= max {
            return Err(Error::SubPlanTooDeep { max });
        }

        let missing = |name: &str| Error::MissingParam {
            command: CommandType::ExecuteSubPlan,
            name: name.to_string(),
        };
        let find = |name: &str| params.iter().find(|p| p.name == name).map(|p| &p.value);

        let commands = find("commands")
            .and_then(Value::as_bytes)
            .ok_or_else(|| missing("commands"))?;
        let inputs = find("inputs")
            .and_then(Value::as_array)
            .and_then(|items| items.iter().map(Value::as_bytes).collect::<Option<Vec<_>>>())
            .ok_or_else(|| missing("inputs"))?;

        let children = self.parse_at_depth(commands, &inputs, depth + 1)?;
        Ok(Param::new("subPlan", Value::Commands(children)))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(Arc::new(CommandRegistry::universal_router()))
    }
}

impl fmt::Debug for CommandParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("commands", &self.registry.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Decode an ABI field list, applying path sub-decoders to tagged fields
pub(crate) fn decode_fields(
    command: CommandType,
    fields: &[FieldSpec],
    input: &[u8],
) -> Result<Vec<Param>> {
    let ty = DynSolType::Tuple(fields.iter().map(|f| f.ty.clone()).collect());
    let decoded = ty
        .abi_decode_params(input)
        .map_err(|source| Error::FieldDecode { command, source })?;

    let DynSolValue::Tuple(values) = decoded else {
        return Err(Error::UnexpectedShape("field list"));
    };

    fields
        .iter()
        .zip(values)
        .map(|(field, value)| {
            let value = match (field.path, value) {
                (Some(encoding), DynSolValue::Bytes(raw)) => {
                    tracing::trace!(field = field.name, ?encoding, "decoding packed path");
                    Value::Path(encoding.decode(&raw)?)
                }
                (_, value) => Value::from(value),
            };
            Ok(Param::new(field.name, value))
        })
        .collect()
}
