//! Plan builder
//!
//! Accumulates one command byte and one encoded input blob per added command.
//! The two sequences grow together: a failed `add_command` leaves both
//! untouched, so `commands.len() == inputs.len()` always holds.

use crate::calldata::ExecuteCall;
use crate::flags::CommandByte;
use crate::registry::{CommandDefinition, CommandRegistry, FieldSpec};
use crate::{CommandType, Error, Result, Value};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{hex, Bytes, U256};
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One command on the wire: flagged identifier byte plus input blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCommand {
    pub byte: CommandByte,
    pub input: Bytes,
}

/// A finished plan: command bytes and a parallel list of input blobs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub commands: Bytes,
    pub inputs: Vec<Bytes>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Iterate over wire commands in order
    pub fn iter(&self) -> impl Iterator<Item = EncodedCommand> + '_ {
        self.commands
            .iter()
            .zip(self.inputs.iter())
            .map(|(byte, input)| EncodedCommand {
                byte: CommandByte::from_byte(*byte),
                input: input.clone(),
            })
    }

    /// Command bytes as `0x`-prefixed hex text
    pub fn commands_hex(&self) -> String {
        hex::encode_prefixed(&self.commands)
    }

    /// Wrap the plan in an `execute` call
    pub fn to_calldata(&self, deadline: Option<U256>) -> Bytes {
        ExecuteCall {
            commands: self.commands.clone(),
            inputs: self.inputs.clone(),
            deadline,
        }
        .encode()
    }
}

/// Builder for router plans
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    registry: Arc<CommandRegistry>,
    commands: BytesMut,
    inputs: Vec<Bytes>,
}

impl RoutePlanner {
    /// Create an empty planner over the given registry
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            commands: BytesMut::new(),
            inputs: Vec::new(),
        }
    }

    /// Append a command.
    ///
    /// Field-list commands take one argument per declared field. Nested
    /// action and opaque commands take their already-encoded blob as the only
    /// argument.
    pub fn add_command(
        &mut self,
        command: CommandType,
        args: Vec<Value>,
        allow_revert: bool,
    ) -> Result<&mut Self> {
        if allow_revert && !command.is_revertible() {
            return Err(Error::NonRevertibleCommand(command));
        }

        let definition = self
            .registry
            .get(command)
            .ok_or(Error::UnknownCommand(command.id()))?;

        let input = match definition {
            CommandDefinition::FieldList(fields) => encode_fields(command, fields, &args)?,
            CommandDefinition::NestedActionSet | CommandDefinition::OpaqueActionCall => {
                preencoded_input(command, args)?
            }
        };

        let byte = CommandByte::new(command).with_allow_revert(allow_revert);
        tracing::debug!(
            command = %command,
            allow_revert,
            input_len = input.len(),
            "added command"
        );

        self.commands.put_u8(byte.to_byte());
        self.inputs.push(input);
        Ok(self)
    }

    /// Embed a finished plan as a revertible sub-plan command
    pub fn add_sub_plan(&mut self, sub_plan: &Plan) -> Result<&mut Self> {
        self.add_command(
            CommandType::ExecuteSubPlan,
            vec![
                Value::Bytes(sub_plan.commands.clone()),
                Value::from(sub_plan.inputs.clone()),
            ],
            true,
        )
    }

    /// Number of commands added so far
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// A planner sharing this planner's registry, for building sub-plans
    pub fn child(&self) -> Self {
        Self::new(Arc::clone(&self.registry))
    }

    /// Finish and hand out the plan
    pub fn finish(self) -> Plan {
        Plan {
            commands: Bytes::from(self.commands.freeze()),
            inputs: self.inputs,
        }
    }
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(Arc::new(CommandRegistry::universal_router()))
    }
}

pub(crate) fn encode_fields(command: CommandType, fields: &[FieldSpec], args: &[Value]) -> Result<Bytes> {
    if args.len() != fields.len() {
        return Err(Error::ArgumentCount {
            command,
            expected: fields.len(),
            got: args.len(),
        });
    }

    let mut values = Vec::with_capacity(fields.len());
    for (field, arg) in fields.iter().zip(args) {
        let value = match (field.path, arg) {
            (Some(encoding), Value::Path(hops)) => {
                DynSolValue::Bytes(encoding.encode(hops)?.to_vec())
            }
            _ => arg.to_sol(&field.ty).ok_or_else(|| Error::ArgumentType {
                command,
                field: field.name.to_string(),
                expected: field.type_name(),
            })?,
        };
        values.push(value);
    }

    Ok(Bytes::from(DynSolValue::Tuple(values).abi_encode_params()))
}

fn preencoded_input(command: CommandType, args: Vec<Value>) -> Result<Bytes> {
    let got = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(Value::Bytes(input)), None) => Ok(input),
        (Some(_), None) => Err(Error::ArgumentType {
            command,
            field: "input".to_string(),
            expected: "bytes".to_string(),
        }),
        _ => Err(Error::ArgumentCount {
            command,
            expected: 1,
            got,
        }),
    }
}

/// Declarative plan description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanStep {
    Command {
        command: CommandType,
        #[serde(default)]
        args: Vec<Value>,
        #[serde(default)]
        allow_revert: bool,
    },
    SubPlan {
        sub_plan: Vec<PlanStep>,
    },
}

impl PlanStep {
    /// Build a plan from a list of steps
    pub fn build_all(steps: &[PlanStep], registry: Arc<CommandRegistry>) -> Result<Plan> {
        let mut planner = RoutePlanner::new(registry);
        for step in steps {
            step.apply(&mut planner)?;
        }
        Ok(planner.finish())
    }

    fn apply(&self, planner: &mut RoutePlanner) -> Result<()> {
        match self {
            PlanStep::Command {
                command,
                args,
                allow_revert,
            } => {
                planner.add_command(*command, args.clone(), *allow_revert)?;
            }
            PlanStep::SubPlan { sub_plan } => {
                let mut child = planner.child();
                for step in sub_plan {
                    step.apply(&mut child)?;
                }
                planner.add_sub_plan(&child.finish())?;
            }
        }
        Ok(())
    }
}
