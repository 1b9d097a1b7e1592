//! urkit CLI - Decode and build universal router calldata
//!
//! Decode `execute` calldata or raw command batches, extract swaps from
//! router transactions, and encode declarative plans.

use alloy_primitives::{hex, Address, Bytes, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use urkit_core::{
    CommandParser, CommandRegistry, PlanStep, TransactionDecoder, EXECUTE_SELECTOR,
};

mod config;
mod render;

use config::Config;

/// urkit - universal router calldata codec
#[derive(Parser)]
#[command(name = "urkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "URKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Recursively decode sub-plans
    #[arg(long, global = true)]
    expand_sub_plans: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode `execute` calldata
    Decode {
        /// Calldata hex, or - to read stdin
        calldata: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode a raw commands/inputs pair
    Commands {
        /// Command bytes hex
        commands: String,

        /// Input blobs hex, one per command
        inputs: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Extract swaps from a router transaction
    Swaps {
        /// Transaction target address
        #[arg(long)]
        to: Address,

        /// Calldata hex, or - to read stdin
        calldata: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Encode a JSON plan
    Encode {
        /// Plan file (JSON list of steps), or - to read stdin
        plan: PathBuf,

        /// Deadline argument of `execute`
        #[arg(long)]
        deadline: Option<U256>,

        /// Print the commands/inputs pair instead of calldata
        #[arg(long)]
        raw: bool,
    },

    /// List the command table
    Registry,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    if cli.expand_sub_plans {
        config.decoder.expand_sub_plans = true;
    }

    setup_logging(&config.logging.level, config.logging.json)?;
    debug!(?config, "loaded configuration");

    let registry = Arc::new(CommandRegistry::universal_router());
    let parser = CommandParser::new(Arc::clone(&registry)).with_options(config.decoder);

    match cli.command {
        Commands::Decode { calldata, json } => {
            let calldata = read_hex(&calldata)?;
            let call = parser
                .parse_calldata(&calldata)
                .context("Failed to decode calldata")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&call)?);
            } else {
                if let Some(deadline) = call.deadline {
                    println!("{} {}", "deadline".green(), deadline);
                }
                print!("{}", render::commands(&call.commands));
            }
        }

        Commands::Commands {
            commands,
            inputs,
            json,
        } => {
            let commands = read_hex(&commands)?;
            let inputs = inputs
                .iter()
                .map(|input| read_hex(input))
                .collect::<Result<Vec<_>>>()?;
            let decoded = parser
                .parse(&commands, &inputs)
                .context("Failed to decode commands")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&decoded)?);
            } else {
                print!("{}", render::commands(&decoded));
            }
        }

        Commands::Swaps { to, calldata, json } => {
            let calldata = read_hex(&calldata)?;
            let decoder = TransactionDecoder::new(config.directory(), parser);
            let swaps = decoder
                .decode_swaps(to, &calldata)
                .with_context(|| format!("Failed to decode swaps sent to {}", to))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&swaps)?);
            } else {
                print!("{}", render::swaps(&swaps));
            }
        }

        Commands::Encode {
            plan,
            deadline,
            raw,
        } => {
            let text = read_input(&plan)?;
            let steps: Vec<PlanStep> =
                serde_json::from_str(&text).context("Failed to parse plan")?;
            let plan = PlanStep::build_all(&steps, registry).context("Failed to build plan")?;

            if raw {
                println!("{}", plan.commands_hex());
                for input in &plan.inputs {
                    println!("{}", hex::encode_prefixed(input));
                }
            } else {
                let calldata: Bytes = plan.to_calldata(deadline);
                println!("{}", calldata);
            }
        }

        Commands::Registry => {
            println!(
                "{} {} commands, execute selector {}",
                "urkit".cyan().bold(),
                registry.len(),
                hex::encode_prefixed(EXECUTE_SELECTOR)
            );
            print!("{}", render::registry(&registry));
        }
    }

    Ok(())
}

fn setup_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Failed to parse log level")?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

/// Read text from a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Decode a hex argument, or hex read from stdin for `-`
fn read_hex(arg: &str) -> Result<Vec<u8>> {
    let text = if arg == "-" {
        read_input(Path::new("-"))?
    } else {
        arg.to_string()
    };
    parse_hex(&text)
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    hex::decode(text).with_context(|| {
        let preview: String = text.chars().take(16).collect();
        format!("Invalid hex input: {}...", preview)
    })
}
