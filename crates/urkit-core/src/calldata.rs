//! Router entry point calldata
//!
//! The router exposes two `execute` overloads, with and without a trailing
//! deadline. Both carry the same `(bytes commands, bytes[] inputs)` pair.

use crate::{Error, Result, Value};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Bytes, Selector, U256};

/// `execute` with deadline
pub const EXECUTE_SIGNATURE: &str = "execute(bytes,bytes[],uint256)";

/// `execute` without deadline
pub const EXECUTE_NO_DEADLINE_SIGNATURE: &str = "execute(bytes,bytes[])";

/// Function selector: first four bytes of the signature hash
pub fn selector(signature: &str) -> Selector {
    Selector::from_slice(&keccak256(signature.as_bytes())[..4])
}

/// Arguments of one `execute` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteCall {
    pub commands: Bytes,
    pub inputs: Vec<Bytes>,
    pub deadline: Option<U256>,
}

impl ExecuteCall {
    /// Split router calldata into its command bytes, inputs and deadline
    pub fn decode(calldata: &[u8]) -> Result<Self> {
        if calldata.len() < 4 {
            return Err(Error::CalldataTooShort {
                len: calldata.len(),
            });
        }

        let (head, data) = calldata.split_at(4);
        let sel = Selector::from_slice(head);
        let with_deadline = if sel == selector(EXECUTE_SIGNATURE) {
            true
        } else if sel == selector(EXECUTE_NO_DEADLINE_SIGNATURE) {
            false
        } else {
            tracing::warn!(selector = %sel, "calldata is not an execute call");
            return Err(Error::UnknownSelector(sel));
        };

        let decoded = envelope_type(with_deadline)
            .abi_decode_params(data)
            .map_err(Error::CalldataDecode)?;

        let Value::Tuple(fields) = Value::from(decoded) else {
            return Err(Error::UnexpectedShape("execute arguments"));
        };
        let mut fields = fields.into_iter();

        let commands = fields
            .next()
            .as_ref()
            .and_then(Value::as_bytes)
            .cloned()
            .ok_or(Error::UnexpectedShape("execute commands"))?;
        let inputs = fields
            .next()
            .as_ref()
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| item.as_bytes().cloned())
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or(Error::UnexpectedShape("execute inputs"))?;
        let deadline = fields.next().as_ref().and_then(Value::as_uint);

        Ok(Self {
            commands,
            inputs,
            deadline,
        })
    }

    /// Encode as calldata, picking the overload by deadline presence
    pub fn encode(&self) -> Bytes {
        let mut fields = vec![
            DynSolValue::Bytes(self.commands.to_vec()),
            DynSolValue::Array(
                self.inputs
                    .iter()
                    .map(|input| DynSolValue::Bytes(input.to_vec()))
                    .collect(),
            ),
        ];

        let signature = match self.deadline {
            Some(deadline) => {
                fields.push(DynSolValue::Uint(deadline, 256));
                EXECUTE_SIGNATURE
            }
            None => EXECUTE_NO_DEADLINE_SIGNATURE,
        };

        let mut out = selector(signature).to_vec();
        out.extend(DynSolValue::Tuple(fields).abi_encode_params());
        Bytes::from(out)
    }
}

fn envelope_type(with_deadline: bool) -> DynSolType {
    let mut types = vec![
        DynSolType::Bytes,
        DynSolType::Array(Box::new(DynSolType::Bytes)),
    ];
    if with_deadline {
        types.push(DynSolType::Uint(256));
    }
    DynSolType::Tuple(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn test_deadline_selector() {
        assert_eq!(selector(EXECUTE_SIGNATURE), Selector::new(hex!("3593564c")));
        assert_eq!(selector(EXECUTE_SIGNATURE), Selector::new(crate::EXECUTE_SELECTOR));
    }

    #[test]
    fn test_encode_decode_with_and_without_deadline() {
        let call = ExecuteCall {
            commands: Bytes::from(vec![0x0b, 0x00]),
            inputs: vec![Bytes::from(vec![1, 2, 3]), Bytes::new()],
            deadline: Some(U256::from(1_700_000_000u64)),
        };
        let encoded = call.encode();
        assert_eq!(&encoded[..4], &hex!("3593564c"));
        assert_eq!(ExecuteCall::decode(&encoded).unwrap(), call);

        let no_deadline = ExecuteCall {
            deadline: None,
            ..call
        };
        let encoded = no_deadline.encode();
        assert_eq!(&encoded[..4], selector(EXECUTE_NO_DEADLINE_SIGNATURE).as_slice());
        assert_eq!(ExecuteCall::decode(&encoded).unwrap(), no_deadline);
    }

    #[test]
    fn test_short_and_unknown() {
        assert!(matches!(
            ExecuteCall::decode(&[0x35, 0x93]),
            Err(Error::CalldataTooShort { len: 2 })
        ));
        assert!(matches!(
            ExecuteCall::decode(&hex!("a9059cbb")),
            Err(Error::UnknownSelector(_))
        ));
    }

    #[test]
    fn test_truncated_arguments() {
        let mut data = selector(EXECUTE_SIGNATURE).to_vec();
        data.extend_from_slice(&[0u8; 31]);
        assert!(matches!(
            ExecuteCall::decode(&data),
            Err(Error::CalldataDecode(_))
        ));
    }
}
