//! Decoded argument values
//!
//! [`Value`] is what a decoded command param holds and what the planner takes
//! as command arguments. It mirrors the ABI value model, plus the shapes the
//! router adds on top: decoded hop paths, named nested params and expanded
//! sub-plans.

use crate::{Hop, Param, StructuredCommand};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, Bytes, B256, I256, U256};
use serde::{Deserialize, Serialize};

/// A decoded or encodable argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Address(Address),
    Uint(U256),
    Int(I256),
    Bytes(Bytes),
    /// `bytesN`, holding exactly N bytes
    FixedBytes(Bytes),
    String(String),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
    /// Packed path decoded into hops
    Path(Vec<Hop>),
    /// Named nested params (one nested action)
    Params(Vec<Param>),
    /// Recursively decoded sub-plan
    Commands(Vec<StructuredCommand>),
}

impl Value {
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Value::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) | Value::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&[Hop]> {
        match self {
            Value::Path(hops) => Some(hops),
            _ => None,
        }
    }

    pub fn as_params(&self) -> Option<&[Param]> {
        match self {
            Value::Params(params) => Some(params),
            _ => None,
        }
    }

    pub fn as_commands(&self) -> Option<&[StructuredCommand]> {
        match self {
            Value::Commands(commands) => Some(commands),
            _ => None,
        }
    }

    /// Convert to an ABI value of the given type.
    ///
    /// Returns `None` when the value does not fit: wrong kind, wrong arity,
    /// an integer wider than the declared bit size, or fixed bytes of the
    /// wrong length. Router-only shapes (`Path`, `Params`, `Commands`) never
    /// convert; callers pack them first.
    pub fn to_sol(&self, ty: &DynSolType) -> Option<DynSolValue> {
        match (ty, self) {
            (DynSolType::Bool, Value::Bool(b)) => Some(DynSolValue::Bool(*b)),
            (DynSolType::Address, Value::Address(a)) => Some(DynSolValue::Address(*a)),
            (DynSolType::Uint(bits), Value::Uint(v)) => {
                (v.bit_len() <= *bits).then(|| DynSolValue::Uint(*v, *bits))
            }
            (DynSolType::Int(bits), Value::Int(v)) => {
                fits_signed(v, *bits).then(|| DynSolValue::Int(*v, *bits))
            }
            (DynSolType::Bytes, Value::Bytes(b)) => Some(DynSolValue::Bytes(b.to_vec())),
            (DynSolType::FixedBytes(size), Value::FixedBytes(b)) if b.len() == *size => Some(
                DynSolValue::FixedBytes(B256::right_padding_from(b), *size),
            ),
            (DynSolType::String, Value::String(s)) => Some(DynSolValue::String(s.clone())),
            (DynSolType::Array(inner), Value::Array(items)) => items
                .iter()
                .map(|item| item.to_sol(inner))
                .collect::<Option<Vec<_>>>()
                .map(DynSolValue::Array),
            (DynSolType::FixedArray(inner, len), Value::Array(items)) if items.len() == *len => {
                items
                    .iter()
                    .map(|item| item.to_sol(inner))
                    .collect::<Option<Vec<_>>>()
                    .map(DynSolValue::FixedArray)
            }
            (DynSolType::Tuple(types), Value::Tuple(items)) if items.len() == types.len() => types
                .iter()
                .zip(items)
                .map(|(ty, item)| item.to_sol(ty))
                .collect::<Option<Vec<_>>>()
                .map(DynSolValue::Tuple),
            _ => None,
        }
    }
}

impl From<DynSolValue> for Value {
    fn from(value: DynSolValue) -> Self {
        match value {
            DynSolValue::Bool(b) => Value::Bool(b),
            DynSolValue::Int(v, _) => Value::Int(v),
            DynSolValue::Uint(v, _) => Value::Uint(v),
            DynSolValue::FixedBytes(word, size) => {
                Value::FixedBytes(Bytes::copy_from_slice(&word[..size]))
            }
            DynSolValue::Address(a) => Value::Address(a),
            DynSolValue::Function(f) => Value::FixedBytes(Bytes::copy_from_slice(f.as_slice())),
            DynSolValue::Bytes(b) => Value::Bytes(Bytes::from(b)),
            DynSolValue::String(s) => Value::String(s),
            DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            DynSolValue::Tuple(items) => Value::Tuple(items.into_iter().map(Value::from).collect()),
            // Struct values only exist when eip712 support is compiled in
            #[allow(unreachable_patterns)]
            other => Value::Tuple(
                other
                    .as_fixed_seq()
                    .map(|items| items.iter().cloned().map(Value::from).collect())
                    .unwrap_or_default(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(U256::from(v))
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Hop>> for Value {
    fn from(v: Vec<Hop>) -> Self {
        Value::Path(v)
    }
}

impl From<Vec<Address>> for Value {
    fn from(v: Vec<Address>) -> Self {
        Value::Array(v.into_iter().map(Value::Address).collect())
    }
}

impl From<Vec<Bytes>> for Value {
    fn from(v: Vec<Bytes>) -> Self {
        Value::Array(v.into_iter().map(Value::Bytes).collect())
    }
}

impl From<Vec<Param>> for Value {
    fn from(v: Vec<Param>) -> Self {
        Value::Params(v)
    }
}

/// Whether `v` survives truncation to `bits` and sign extension back
fn fits_signed(v: &I256, bits: usize) -> bool {
    let raw = v.into_raw();
    let magnitude = if v.is_negative() { !raw } else { raw };
    magnitude.bit_len() < bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_uint_width_checked() {
        let small = Value::from(0xffffu64);
        assert!(small.to_sol(&DynSolType::Uint(16)).is_some());
        assert!(small.to_sol(&DynSolType::Uint(8)).is_none());
        assert_eq!(
            small.to_sol(&DynSolType::Uint(256)),
            Some(DynSolValue::Uint(U256::from(0xffffu64), 256))
        );
    }

    #[test]
    fn test_int_width_checked() {
        let int24 = DynSolType::Int(24);
        let max = I256::from_raw(U256::from(8_388_607u64));
        let over = I256::from_raw(U256::from(8_388_608u64));

        assert!(Value::Int(max).to_sol(&int24).is_some());
        assert!(Value::Int(-max - I256::ONE).to_sol(&int24).is_some());
        assert!(Value::Int(over).to_sol(&int24).is_none());
        assert!(Value::Int(-over - I256::ONE).to_sol(&int24).is_none());
        assert!(Value::Int(I256::MINUS_ONE).to_sol(&int24).is_some());

        let tick = Value::Int(I256::from_raw(U256::from(1u64) << 40usize));
        assert!(tick.to_sol(&int24).is_none());
        assert!(tick.to_sol(&DynSolType::Int(256)).is_some());
    }

    #[test]
    fn test_kind_mismatch() {
        let addr = Value::Address(address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"));
        assert!(addr.to_sol(&DynSolType::Uint(256)).is_none());
        assert!(Value::Path(vec![]).to_sol(&DynSolType::Bytes).is_none());
    }

    #[test]
    fn test_tuple_arity() {
        let ty = DynSolType::Tuple(vec![DynSolType::Address, DynSolType::Uint(160)]);
        let one = Value::Tuple(vec![Value::Address(Address::ZERO)]);
        let two = Value::Tuple(vec![Value::Address(Address::ZERO), Value::from(1u64)]);

        assert!(one.to_sol(&ty).is_none());
        assert!(two.to_sol(&ty).is_some());
    }

    #[test]
    fn test_fixed_bytes_roundtrip() {
        let value = Value::FixedBytes(Bytes::from(vec![0xaa, 0xbb, 0xcc, 0xdd]));
        let sol = value.to_sol(&DynSolType::FixedBytes(4)).unwrap();
        assert_eq!(Value::from(sol), value);
        assert!(value.to_sol(&DynSolType::FixedBytes(32)).is_none());
    }

    #[test]
    fn test_json_shape() {
        let value = Value::Array(vec![Value::Bool(true), Value::from(7u64)]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "array");
        assert_eq!(json["value"][0]["type"], "bool");

        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
