//! Human-readable output

use alloy_primitives::hex;
use colored::Colorize;
use std::fmt::Write;
use urkit_core::{
    CommandDefinition, CommandRegistry, Hop, Param, StructuredCommand, SwapDescription, Value,
};

const INDENT: &str = "  ";

/// Render decoded commands, one block per command
pub fn commands(commands: &[StructuredCommand]) -> String {
    let mut out = String::new();
    write_commands(&mut out, commands, 0);
    out
}

fn write_commands(out: &mut String, commands: &[StructuredCommand], depth: usize) {
    let pad = INDENT.repeat(depth);
    for (i, command) in commands.iter().enumerate() {
        let flag = if command.allow_revert {
            format!(" {}", "allow-revert".yellow())
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{}[{}] {} {}{}",
            pad,
            i,
            command.name.cyan().bold(),
            format!("(0x{:02x})", command.command.id()).dimmed(),
            flag
        );
        write_params(out, &command.params, depth + 1);
    }
}

fn write_params(out: &mut String, params: &[Param], depth: usize) {
    let pad = INDENT.repeat(depth);
    for param in params {
        match &param.value {
            Value::Params(nested) => {
                let _ = writeln!(out, "{}{}:", pad, param.name.green());
                write_params(out, nested, depth + 1);
            }
            Value::Commands(nested) => {
                let _ = writeln!(out, "{}{}:", pad, param.name.green());
                write_commands(out, nested, depth + 1);
            }
            value => {
                let _ = writeln!(out, "{}{}: {}", pad, param.name.green(), value_text(value));
            }
        }
    }
}

/// Single-line form of a value
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Address(a) => a.to_checksum(None),
        Value::Uint(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Bytes(b) | Value::FixedBytes(b) => hex::encode_prefixed(b),
        Value::String(s) => format!("{:?}", s),
        Value::Array(items) => list(items, '[', ']'),
        Value::Tuple(items) => list(items, '(', ')'),
        Value::Path(hops) => path_text(hops),
        Value::Params(params) => format!("{} params", params.len()),
        Value::Commands(commands) => format!("{} commands", commands.len()),
    }
}

fn list(items: &[Value], open: char, close: char) -> String {
    let inner: Vec<String> = items.iter().map(value_text).collect();
    format!("{}{}{}", open, inner.join(", "), close)
}

/// `A -[fee]-> B -[fee]-> C`
pub fn path_text(hops: &[Hop]) -> String {
    let Some(first) = hops.first() else {
        return "(empty path)".to_string();
    };

    let mut out = first.token_in.to_checksum(None);
    for hop in hops {
        match hop.fee {
            Some(fee) => {
                let _ = write!(out, " -[{}]-> ", fee);
            }
            None => out.push_str(" -> "),
        }
        out.push_str(&hop.token_out.to_checksum(None));
    }
    out
}

/// One line per swap
pub fn swaps(swaps: &[SwapDescription]) -> String {
    if swaps.is_empty() {
        return format!("{}\n", "no swaps".yellow());
    }

    let mut out = String::new();
    for swap in swaps {
        let amount = match (swap.amount_in, swap.amount_out) {
            (Some(amount), _) => format!("exact in {}", amount),
            (_, Some(amount)) => format!("exact out {}", amount),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{} {} -> {} {}",
            swap.version.to_string().cyan().bold(),
            swap.token_in.to_checksum(None),
            swap.token_out.to_checksum(None),
            amount
        );
        let _ = writeln!(out, "{}{}", INDENT, path_text(&swap.hops).dimmed());
    }
    out
}

/// Command table listing
pub fn registry(registry: &CommandRegistry) -> String {
    let mut out = String::new();
    for (command, definition) in registry.iter() {
        let detail = match definition {
            CommandDefinition::FieldList(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| match f.path {
                        Some(_) => format!("path {}", f.name),
                        None => format!("{} {}", f.type_name(), f.name),
                    })
                    .collect();
                format!("({})", fields.join(", "))
            }
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "0x{:02x} {:<28} {:<8} {}",
            command.id(),
            command.name().cyan(),
            definition.strategy(),
            detail
        );
    }
    out
}
