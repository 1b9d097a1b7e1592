//! Swap extraction and router directory
//!
//! Reduces decoded commands to the trades they perform, and maps router
//! contract addresses to the decoder able to read their calldata.

use crate::parser::CommandParser;
use crate::{CommandType, Error, Hop, Result, StructuredCommand, Value};
use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Pool family a swap command routes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolVersion {
    V2,
    V3,
}

impl fmt::Display for PoolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolVersion::V2 => f.write_str("v2"),
            PoolVersion::V3 => f.write_str("v3"),
        }
    }
}

/// One trade: entry token, exit token and the fixed side of the amount.
///
/// Exact-in swaps fix `amount_in`; exact-out swaps fix `amount_out`. The other
/// side is left for a quoting collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapDescription {
    pub version: PoolVersion,
    pub token_in: Address,
    pub token_out: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_in: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_out: Option<U256>,
    pub hops: Vec<Hop>,
}

impl SwapDescription {
    /// Describe a single decoded command, or `None` if it is not a swap
    pub fn from_command(command: &StructuredCommand) -> Result<Option<Self>> {
        let (version, exact_in) = match command.command {
            CommandType::V2SwapExactIn => (PoolVersion::V2, true),
            CommandType::V2SwapExactOut => (PoolVersion::V2, false),
            CommandType::V3SwapExactIn => (PoolVersion::V3, true),
            CommandType::V3SwapExactOut => (PoolVersion::V3, false),
            _ => return Ok(None),
        };

        let amount_name = if exact_in { "amountIn" } else { "amountOut" };
        let amount = command
            .param(amount_name)
            .and_then(Value::as_uint)
            .ok_or_else(|| missing(command.command, amount_name))?;

        let hops = match version {
            PoolVersion::V2 => v2_hops(command)?,
            PoolVersion::V3 => command
                .param("path")
                .and_then(Value::as_path)
                .ok_or_else(|| missing(command.command, "path"))?
                .to_vec(),
        };

        let (first, last) = match (hops.first(), hops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Error::UnusableRoute("swap path has no hops".to_string())),
        };

        Ok(Some(Self {
            version,
            token_in: first.token_in,
            token_out: last.token_out,
            amount_in: exact_in.then_some(amount),
            amount_out: (!exact_in).then_some(amount),
            hops,
        }))
    }
}

fn missing(command: CommandType, name: &str) -> Error {
    Error::MissingParam {
        command,
        name: name.to_string(),
    }
}

fn v2_hops(command: &StructuredCommand) -> Result<Vec<Hop>> {
    let tokens = command
        .param("path")
        .and_then(Value::as_array)
        .and_then(|items| items.iter().map(Value::as_address).collect::<Option<Vec<_>>>())
        .ok_or_else(|| missing(command.command, "path"))?;

    if tokens.len() < 2 {
        return Err(Error::UnusableRoute(format!(
            "V2 path needs at least two tokens, got {}",
            tokens.len()
        )));
    }

    Ok(tokens
        .windows(2)
        .map(|pair| Hop::unpriced(pair[0], pair[1]))
        .collect())
}

/// Collect swaps from decoded commands, in order.
///
/// Expanded sub-plans are searched too; raw ones are not.
pub fn extract_swaps(commands: &[StructuredCommand]) -> Result<Vec<SwapDescription>> {
    let mut swaps = Vec::new();
    collect_swaps(commands, &mut swaps)?;
    Ok(swaps)
}

fn collect_swaps(commands: &[StructuredCommand], out: &mut Vec<SwapDescription>) -> Result<()> {
    for command in commands {
        if let Some(swap) = SwapDescription::from_command(command)? {
            out.push(swap);
        }
        if let Some(children) = command.param("subPlan").and_then(Value::as_commands) {
            collect_swaps(children, out)?;
        }
    }
    Ok(())
}

/// How a router's calldata can be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouterKind {
    UniversalRouter,
    /// Recognised, but no decoder exists
    Unsupported,
}

/// A router contract the directory knows about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownRouter {
    pub name: String,
    pub kind: RouterKind,
}

impl KnownRouter {
    pub fn new(name: impl Into<String>, kind: RouterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Router contract address book
#[derive(Debug, Clone, Default)]
pub struct RouterDirectory {
    routers: HashMap<Address, KnownRouter>,
}

impl RouterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known Ethereum mainnet routers
    pub fn mainnet() -> Self {
        use RouterKind::*;

        let mut directory = Self::new();
        directory.insert(
            address!("3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad"),
            KnownRouter::new("Uniswap Universal Router", UniversalRouter),
        );

        for addr in [
            address!("1111111254fb6c44bac0bed2854e76f90643097d"),
            address!("e069cb01d06ba617bcdf789bf2ff0d5e5ca20c71"),
            address!("11111254369792b2ca5d084ab5eea397ca8fa48b"),
            address!("11111112542d85b3ef69ae05771c2dccff4faa26"),
            address!("111111125434b319222cdbf8c261674adb56f3ae"),
            address!("111111125421ca6dc452d289314280a0f8842a65"),
            address!("1111111254eeb25477b68fb85ed929f73a960582"),
        ] {
            directory.insert(addr, KnownRouter::new("1inch", Unsupported));
        }

        directory.insert(
            address!("881d40237659c251811cec9c364ef91dc08d300c"),
            KnownRouter::new("MetaMask Swap Router", Unsupported),
        );
        directory.insert(
            address!("1bd435f3c054b6e901b7b108a0ab7617c808677b"),
            KnownRouter::new("ParaSwap", Unsupported),
        );
        directory.insert(
            address!("3328f7f4a1d1c57c35df56bbf0c9dcafca309c49"),
            KnownRouter::new("Banana Gun Router", Unsupported),
        );

        directory
    }

    /// Add or replace a router, returning the previous entry
    pub fn insert(&mut self, address: Address, router: KnownRouter) -> Option<KnownRouter> {
        self.routers.insert(address, router)
    }

    pub fn get(&self, address: &Address) -> Option<&KnownRouter> {
        self.routers.get(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.routers.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Entries ordered by address
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &KnownRouter)> {
        let mut entries: Vec<_> = self.routers.iter().collect();
        entries.sort_by_key(|(addr, _)| **addr);
        entries.into_iter()
    }
}

/// Turns a transaction's target and input into swaps
#[derive(Debug, Clone)]
pub struct TransactionDecoder {
    directory: RouterDirectory,
    parser: CommandParser,
}

impl Default for TransactionDecoder {
    fn default() -> Self {
        Self::new(RouterDirectory::mainnet(), CommandParser::default())
    }
}

impl TransactionDecoder {
    pub fn new(directory: RouterDirectory, parser: CommandParser) -> Self {
        Self { directory, parser }
    }

    pub fn directory(&self) -> &RouterDirectory {
        &self.directory
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// Decode the swaps in a transaction sent to `to`.
    ///
    /// An empty result means the call was decoded and performs no swap.
    pub fn decode_swaps(&self, to: Address, input: &[u8]) -> Result<Vec<SwapDescription>> {
        let router = self.directory.get(&to).ok_or_else(|| {
            tracing::warn!(%to, "transaction target is not a known router");
            Error::UnknownRouter(to)
        })?;

        match router.kind {
            RouterKind::Unsupported => Err(Error::UnsupportedRouter {
                name: router.name.clone(),
                address: to,
            }),
            RouterKind::UniversalRouter => {
                let call = self.parser.parse_calldata(input)?;
                let swaps = extract_swaps(&call.commands)?;
                tracing::debug!(router = %router.name, swaps = swaps.len(), "decoded transaction");
                Ok(swaps)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Param;

    const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    const USDT: Address = address!("dac17f958d2ee523a2206206994597c13d831ec7");
    const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");

    fn v2_exact_in(path: Vec<Address>) -> StructuredCommand {
        StructuredCommand::new(
            CommandType::V2SwapExactIn,
            false,
            vec![
                Param::new("recipient", Address::ZERO),
                Param::new("amountIn", 10u64),
                Param::new("amountOutMin", 1u64),
                Param::new("path", path),
                Param::new("payerIsUser", true),
            ],
        )
    }

    #[test]
    fn test_v2_multi_hop() {
        let swap = SwapDescription::from_command(&v2_exact_in(vec![DAI, WETH, USDT]))
            .unwrap()
            .unwrap();

        assert_eq!(swap.version, PoolVersion::V2);
        assert_eq!(swap.token_in, DAI);
        assert_eq!(swap.token_out, USDT);
        assert_eq!(swap.amount_in, Some(U256::from(10u64)));
        assert_eq!(swap.amount_out, None);
        assert_eq!(
            swap.hops,
            vec![Hop::unpriced(DAI, WETH), Hop::unpriced(WETH, USDT)]
        );
    }

    #[test]
    fn test_v2_short_path() {
        let err = SwapDescription::from_command(&v2_exact_in(vec![DAI])).unwrap_err();
        assert!(matches!(err, Error::UnusableRoute(_)));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_v3_exact_out_uses_trade_order() {
        let command = StructuredCommand::new(
            CommandType::V3SwapExactOut,
            false,
            vec![
                Param::new("amountOut", 99u64),
                Param::new("path", vec![Hop::new(WETH, USDT, 500)]),
            ],
        );
        let swap = SwapDescription::from_command(&command).unwrap().unwrap();

        assert_eq!(swap.token_in, WETH);
        assert_eq!(swap.token_out, USDT);
        assert_eq!(swap.amount_out, Some(U256::from(99u64)));
        assert_eq!(swap.amount_in, None);
    }

    #[test]
    fn test_missing_param() {
        let command = StructuredCommand::new(CommandType::V3SwapExactIn, false, vec![]);
        let err = SwapDescription::from_command(&command).unwrap_err();
        assert!(matches!(err, Error::MissingParam { ref name, .. } if name == "amountIn"));
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_non_swaps_skipped_and_sub_plans_searched() {
        let wrap = StructuredCommand::new(CommandType::WrapEth, false, vec![]);
        let sub = StructuredCommand::new(
            CommandType::ExecuteSubPlan,
            true,
            vec![Param::new(
                "subPlan",
                Value::Commands(vec![v2_exact_in(vec![WETH, USDT])]),
            )],
        );

        let swaps = extract_swaps(&[wrap, v2_exact_in(vec![DAI, WETH]), sub]).unwrap();
        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps[0].token_in, DAI);
        assert_eq!(swaps[1].token_out, USDT);
    }

    #[test]
    fn test_directory_lookups() {
        let decoder = TransactionDecoder::default();
        assert_eq!(decoder.directory().len(), 11);

        let err = decoder.decode_swaps(WETH, &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownRouter(a) if a == WETH));

        let paraswap = address!("1bd435f3c054b6e901b7b108a0ab7617c808677b");
        let err = decoder.decode_swaps(paraswap, &[]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedRouter { ref name, .. } if name == "ParaSwap"));
    }

    #[test]
    fn test_router_kind_names() {
        assert_eq!(
            serde_json::to_string(&RouterKind::UniversalRouter).unwrap(),
            "\"universal-router\""
        );
        assert_eq!(serde_json::to_string(&PoolVersion::V3).unwrap(), "\"v3\"");
    }
}
