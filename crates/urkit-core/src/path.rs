//! Packed fee-tiered path encoding
//!
//! ```text
//! ┌──────────────┬────────┬──────────────┬────────┬──────────────┐
//! │ address (20) │ fee(3) │ address (20) │ fee(3) │ address (20) │ ...
//! └──────────────┴────────┴──────────────┴────────┴──────────────┘
//! ```
//!
//! Exact-in paths are read left to right: the first address is the input
//! token. Exact-out paths use the same bytes but are laid out tail-first: the
//! first address is the final output token and the last address is the token
//! actually paid in. Both decoders return hops in trade order.

use crate::{Error, Hop, Result};
use alloy_primitives::{Address, Bytes};
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

/// Address length in bytes
pub const ADDR_SIZE: usize = 20;

/// Fee tier length in bytes (uint24)
pub const FEE_SIZE: usize = 3;

/// One fee + address stride
pub const HOP_SIZE: usize = ADDR_SIZE + FEE_SIZE;

/// Shortest valid path: one complete hop
pub const MIN_PATH_SIZE: usize = ADDR_SIZE + HOP_SIZE;

/// Largest fee representable in the packed encoding
pub const MAX_FEE: u32 = 0x00ff_ffff;

/// Packed path direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathEncoding {
    /// Forward order, first address is the input token
    ExactIn,
    /// Reverse order, first address is the output token
    ExactOut,
}

impl PathEncoding {
    pub fn decode(self, path: &[u8]) -> Result<Vec<Hop>> {
        match self {
            PathEncoding::ExactIn => decode_exact_in(path),
            PathEncoding::ExactOut => decode_exact_out(path),
        }
    }

    pub fn encode(self, hops: &[Hop]) -> Result<Bytes> {
        match self {
            PathEncoding::ExactIn => encode_path_exact_in(hops),
            PathEncoding::ExactOut => encode_path_exact_out(hops),
        }
    }
}

/// Decode a forward (exact-in) path
pub fn decode_exact_in(path: &[u8]) -> Result<Vec<Hop>> {
    let count = hop_count(path)?;
    let mut hops = Vec::with_capacity(count);

    let mut token_in = Address::from_slice(&path[..ADDR_SIZE]);
    for stride in path[ADDR_SIZE..].chunks_exact(HOP_SIZE) {
        let fee = read_fee(&stride[..FEE_SIZE]);
        let token_out = Address::from_slice(&stride[FEE_SIZE..]);
        hops.push(Hop::new(token_in, token_out, fee));
        token_in = token_out;
    }

    tracing::trace!(hops = hops.len(), "decoded exact-in path");
    Ok(hops)
}

/// Decode a reverse (exact-out) path
pub fn decode_exact_out(path: &[u8]) -> Result<Vec<Hop>> {
    let count = hop_count(path)?;
    let mut hops = Vec::with_capacity(count);

    let tail = path.len() - ADDR_SIZE;
    let mut token_in = Address::from_slice(&path[tail..]);
    // Walk back in (address, fee) strides ending just before the tail address
    for stride in path[..tail].rchunks_exact(HOP_SIZE) {
        let token_out = Address::from_slice(&stride[..ADDR_SIZE]);
        let fee = read_fee(&stride[ADDR_SIZE..]);
        hops.push(Hop::new(token_in, token_out, fee));
        token_in = token_out;
    }

    tracing::trace!(hops = hops.len(), "decoded exact-out path");
    Ok(hops)
}

/// Pack hops (in trade order) as a forward path
pub fn encode_path_exact_in(hops: &[Hop]) -> Result<Bytes> {
    validate_route(hops)?;

    let mut buf = BytesMut::with_capacity(ADDR_SIZE + hops.len() * HOP_SIZE);
    buf.put_slice(hops[0].token_in.as_slice());
    for hop in hops {
        put_fee(&mut buf, hop)?;
        buf.put_slice(hop.token_out.as_slice());
    }

    Ok(Bytes::from(buf.freeze()))
}

/// Pack hops (in trade order) as a reverse path
pub fn encode_path_exact_out(hops: &[Hop]) -> Result<Bytes> {
    validate_route(hops)?;

    let mut buf = BytesMut::with_capacity(ADDR_SIZE + hops.len() * HOP_SIZE);
    buf.put_slice(hops[hops.len() - 1].token_out.as_slice());
    for hop in hops.iter().rev() {
        put_fee(&mut buf, hop)?;
        buf.put_slice(hop.token_in.as_slice());
    }

    Ok(Bytes::from(buf.freeze()))
}

/// Check that each hop starts where the previous one ended
pub fn is_continuous(hops: &[Hop]) -> bool {
    hops.windows(2).all(|w| w[0].token_out == w[1].token_in)
}

fn validate_route(hops: &[Hop]) -> Result<()> {
    if hops.is_empty() {
        return Err(Error::InvalidRoute("path has no hops".to_string()));
    }
    if !is_continuous(hops) {
        return Err(Error::InvalidRoute(
            "hop output does not match next hop input".to_string(),
        ));
    }
    Ok(())
}

fn hop_count(path: &[u8]) -> Result<usize> {
    if path.len() < MIN_PATH_SIZE || (path.len() - ADDR_SIZE) % HOP_SIZE != 0 {
        return Err(Error::MalformedPath { len: path.len() });
    }
    Ok((path.len() - ADDR_SIZE) / HOP_SIZE)
}

#[inline]
fn read_fee(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

fn put_fee(buf: &mut BytesMut, hop: &Hop) -> Result<()> {
    let fee = hop
        .fee
        .ok_or_else(|| Error::InvalidRoute("hop has no fee tier".to_string()))?;
    if fee > MAX_FEE {
        return Err(Error::InvalidRoute(format!(
            "fee {} does not fit in 24 bits",
            fee
        )));
    }
    buf.put_slice(&fee.to_be_bytes()[1..]);
    Ok(())
}
