use alloy::primitives::{Bytes, U256};
use serde::{Deserialize, Serialize, Serializer};
use std::{fmt::Display, str::FromStr};

use super::command_stream::parse_hex_bytes;
use crate::error::DecodeError;

/// The arguments of `execute(bytes commands, bytes[] inputs, uint256 deadline)`,
/// already split out of the call envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteInput {
    pub commands: Bytes,
    pub inputs: Vec<Bytes>,
    /// Carried through to the result, never interpreted.
    pub deadline: Option<U256>,
}

impl ExecuteInput {
    pub fn new(commands: impl Into<Bytes>, inputs: Vec<Bytes>) -> Self {
        Self {
            commands: commands.into(),
            inputs,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: U256) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Build from `0x`-prefixed hex text, as block explorers show it.
    pub fn from_hex<S: AsRef<str>>(commands: &str, inputs: &[S]) -> Result<Self, DecodeError> {
        let commands = parse_hex_bytes(commands)?;
        let inputs = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                parse_hex_bytes(input.as_ref())
                    .map(Bytes::from)
                    .map_err(|e| DecodeError::MalformedInput(format!("input {i}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(commands, inputs))
    }
}

/// JSON shape accepted by the `router-decode` binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutePayload {
    pub commands: String,
    pub inputs: Vec<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

impl TryFrom<ExecutePayload> for ExecuteInput {
    type Error = DecodeError;

    fn try_from(payload: ExecutePayload) -> Result<Self, DecodeError> {
        let input = Self::from_hex(&payload.commands, &payload.inputs)?;
        match payload.deadline {
            Some(deadline) => {
                let deadline = U256::from_str(deadline.trim())
                    .map_err(|e| DecodeError::MalformedInput(format!("deadline: {e}")))?;
                Ok(input.with_deadline(deadline))
            }
            None => Ok(input),
        }
    }
}

/// Serialize an unsigned integer as a decimal string.
pub fn serialize_decimal<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
