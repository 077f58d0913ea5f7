// Parameter layouts of the decoded commands.
// https://docs.uniswap.org/contracts/universal-router/technical-reference
use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::{Address, U160, U256},
};
use serde::Serialize;
use std::sync::LazyLock;

use super::{
    structs::serialize_decimal, universal_router_commands::OperationKind, v3_path::decode_path,
};
use crate::{
    error::{DecodeError, OperandError},
    permit2_sdk::permit::PermitMessage,
};

// address recipient, uint256 amount, uint256 amount, bytes path, bool payerIsUser
static V3_SWAP_SCHEMA: LazyLock<DynSolType> = LazyLock::new(|| {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Uint(256),
        DynSolType::Uint(256),
        DynSolType::Bytes,
        DynSolType::Bool,
    ])
});

// address recipient, uint256 amount, uint256 amount, address[] path, bool payerIsUser
static V2_SWAP_SCHEMA: LazyLock<DynSolType> = LazyLock::new(|| {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Uint(256),
        DynSolType::Uint(256),
        DynSolType::Array(Box::new(DynSolType::Address)),
        DynSolType::Bool,
    ])
});

// address token, address recipient, uint160 amount
static TRANSFER_FROM_SCHEMA: LazyLock<DynSolType> = LazyLock::new(|| {
    DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Address,
        DynSolType::Uint(160),
    ])
});

// IAllowanceTransfer.PermitSingle permitSingle, bytes signature
static PERMIT_SCHEMA: LazyLock<DynSolType> = LazyLock::new(|| {
    let details = DynSolType::Tuple(vec![
        DynSolType::Address,
        DynSolType::Uint(160),
        DynSolType::Uint(48),
        DynSolType::Uint(48),
    ]);
    let permit_single =
        DynSolType::Tuple(vec![details, DynSolType::Address, DynSolType::Uint(256)]);
    DynSolType::Tuple(vec![permit_single, DynSolType::Bytes])
});

impl OperationKind {
    /// The ABI layout of this command's input, if it is decoded at all.
    pub fn schema(self) -> Option<&'static DynSolType> {
        match self {
            Self::V3SwapExactIn | Self::V3SwapExactOut => Some(&*V3_SWAP_SCHEMA),
            Self::V2SwapExactIn | Self::V2SwapExactOut => Some(&*V2_SWAP_SCHEMA),
            Self::Permit2TransferFrom => Some(&*TRANSFER_FROM_SCHEMA),
            Self::Permit2Permit => Some(&*PERMIT_SCHEMA),
            Self::UnwrapWeth => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapOperation {
    /// The recipient of the output of the trade
    pub recipient: Address,
    /// Tokens going in. For exact output swaps this is the maximum spend.
    #[serde(serialize_with = "serialize_decimal")]
    pub amount_in: U256,
    /// Tokens coming out. For exact input swaps this is the minimum received.
    #[serde(serialize_with = "serialize_decimal")]
    pub amount_out: U256,
    /// Tokens in trading order, input first
    pub path: Vec<Address>,
    /// Whether the input comes from msg.sender through Permit2 rather than the router balance
    pub payer_is_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferFromOperation {
    /// The token to fetch from Permit2
    pub token: Address,
    /// The recipient of the tokens fetched
    pub recipient: Address,
    /// The amount of token to fetch
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: U160,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "function")]
pub enum DecodedOperation {
    #[serde(rename = "V3_SWAP_EXACT_IN")]
    V3SwapExactIn(SwapOperation),
    #[serde(rename = "V3_SWAP_EXACT_OUT")]
    V3SwapExactOut(SwapOperation),
    #[serde(rename = "PERMIT2_TRANSFER_FROM")]
    Permit2TransferFrom(TransferFromOperation),
    #[serde(rename = "V2_SWAP_EXACT_IN")]
    V2SwapExactIn(SwapOperation),
    #[serde(rename = "V2_SWAP_EXACT_OUT")]
    V2SwapExactOut(SwapOperation),
    #[serde(rename = "PERMIT2_PERMIT")]
    Permit2Permit(PermitMessage),
}

impl DecodedOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::V3SwapExactIn(_) => OperationKind::V3SwapExactIn,
            Self::V3SwapExactOut(_) => OperationKind::V3SwapExactOut,
            Self::Permit2TransferFrom(_) => OperationKind::Permit2TransferFrom,
            Self::V2SwapExactIn(_) => OperationKind::V2SwapExactIn,
            Self::V2SwapExactOut(_) => OperationKind::V2SwapExactOut,
            Self::Permit2Permit(_) => OperationKind::Permit2Permit,
        }
    }

    pub fn as_swap(&self) -> Option<&SwapOperation> {
        match self {
            Self::V3SwapExactIn(swap)
            | Self::V3SwapExactOut(swap)
            | Self::V2SwapExactIn(swap)
            | Self::V2SwapExactOut(swap) => Some(swap),
            _ => None,
        }
    }

    pub fn as_permit(&self) -> Option<&PermitMessage> {
        match self {
            Self::Permit2Permit(permit) => Some(permit),
            _ => None,
        }
    }
}

/// Decode the input bytes of the command found at `position`.
pub fn decode_operation(
    kind: OperationKind,
    position: usize,
    data: &[u8],
) -> Result<DecodedOperation, DecodeError> {
    let operation = match kind {
        OperationKind::V3SwapExactIn => decode_fields(&V3_SWAP_SCHEMA, data, |f| v3_swap(f, false))
            .map(DecodedOperation::V3SwapExactIn),
        OperationKind::V3SwapExactOut => decode_fields(&V3_SWAP_SCHEMA, data, |f| v3_swap(f, true))
            .map(DecodedOperation::V3SwapExactOut),
        OperationKind::V2SwapExactIn => decode_fields(&V2_SWAP_SCHEMA, data, |f| v2_swap(f, false))
            .map(DecodedOperation::V2SwapExactIn),
        OperationKind::V2SwapExactOut => decode_fields(&V2_SWAP_SCHEMA, data, |f| v2_swap(f, true))
            .map(DecodedOperation::V2SwapExactOut),
        OperationKind::Permit2TransferFrom => {
            decode_fields(&TRANSFER_FROM_SCHEMA, data, transfer_from)
                .map(DecodedOperation::Permit2TransferFrom)
        }
        OperationKind::Permit2Permit => {
            decode_fields(&PERMIT_SCHEMA, data, PermitMessage::from_fields)
                .map(DecodedOperation::Permit2Permit)
        }
        OperationKind::UnwrapWeth => return Err(DecodeError::UnsupportedKind { kind, position }),
    };
    operation.map_err(|source| DecodeError::MalformedOperationInput {
        kind,
        position,
        source,
    })
}

fn decode_fields<T>(
    schema: &DynSolType,
    data: &[u8],
    build: impl FnOnce(&AbiFields<'_>) -> Result<T, OperandError>,
) -> Result<T, OperandError> {
    let value = schema
        .abi_decode_params(data)
        .map_err(|e| OperandError::Abi(e.to_string()))?;
    build(&AbiFields::from_value(&value)?)
}

/// Exact output swaps put the output amount first on the wire.
fn amounts(fields: &AbiFields<'_>, exact_output: bool) -> Result<(U256, U256), OperandError> {
    let first = fields.uint(1)?;
    let second = fields.uint(2)?;
    if exact_output {
        Ok((second, first))
    } else {
        Ok((first, second))
    }
}

fn v3_swap(fields: &AbiFields<'_>, exact_output: bool) -> Result<SwapOperation, OperandError> {
    let (amount_in, amount_out) = amounts(fields, exact_output)?;
    Ok(SwapOperation {
        recipient: fields.address(0)?,
        amount_in,
        amount_out,
        path: decode_path(fields.bytes(3)?, exact_output)?,
        payer_is_user: fields.bool(4)?,
    })
}

fn transfer_from(fields: &AbiFields<'_>) -> Result<TransferFromOperation, OperandError> {
    Ok(TransferFromOperation {
        token: fields.address(0)?,
        recipient: fields.address(1)?,
        amount: fields.bounded_uint(2, 160)?.to::<U160>(),
    })
}

fn v2_swap(fields: &AbiFields<'_>, exact_output: bool) -> Result<SwapOperation, OperandError> {
    let (amount_in, amount_out) = amounts(fields, exact_output)?;
    Ok(SwapOperation {
        recipient: fields.address(0)?,
        amount_in,
        amount_out,
        path: fields.addresses(3)?,
        payer_is_user: fields.bool(4)?,
    })
}

/// Positional, typed access to a decoded ABI tuple.
pub(crate) struct AbiFields<'a>(&'a [DynSolValue]);

impl<'a> AbiFields<'a> {
    pub(crate) fn from_value(value: &'a DynSolValue) -> Result<Self, OperandError> {
        match value {
            DynSolValue::Tuple(fields) => Ok(Self(fields)),
            _ => Err(OperandError::UnexpectedValue {
                index: 0,
                expected: "tuple",
            }),
        }
    }

    fn unexpected(index: usize, expected: &'static str) -> OperandError {
        OperandError::UnexpectedValue { index, expected }
    }

    pub(crate) fn address(&self, index: usize) -> Result<Address, OperandError> {
        match self.0.get(index) {
            Some(DynSolValue::Address(address)) => Ok(*address),
            _ => Err(Self::unexpected(index, "address")),
        }
    }

    pub(crate) fn uint(&self, index: usize) -> Result<U256, OperandError> {
        match self.0.get(index) {
            Some(DynSolValue::Uint(value, _)) => Ok(*value),
            _ => Err(Self::unexpected(index, "uint")),
        }
    }

    /// A uint that must fit in `bits`, whatever the word on the wire held.
    pub(crate) fn bounded_uint(&self, index: usize, bits: usize) -> Result<U256, OperandError> {
        let value = self.uint(index)?;
        if value.bit_len() > bits {
            return Err(OperandError::Overflow { index, bits });
        }
        Ok(value)
    }

    pub(crate) fn bool(&self, index: usize) -> Result<bool, OperandError> {
        match self.0.get(index) {
            Some(DynSolValue::Bool(flag)) => Ok(*flag),
            _ => Err(Self::unexpected(index, "bool")),
        }
    }

    pub(crate) fn bytes(&self, index: usize) -> Result<&'a [u8], OperandError> {
        match self.0.get(index) {
            Some(DynSolValue::Bytes(bytes)) => Ok(bytes.as_slice()),
            _ => Err(Self::unexpected(index, "bytes")),
        }
    }

    pub(crate) fn addresses(&self, index: usize) -> Result<Vec<Address>, OperandError> {
        let Some(DynSolValue::Array(items)) = self.0.get(index) else {
            return Err(Self::unexpected(index, "address[]"));
        };
        items
            .iter()
            .map(|item| match item {
                DynSolValue::Address(address) => Ok(*address),
                _ => Err(Self::unexpected(index, "address[]")),
            })
            .collect()
    }

    pub(crate) fn tuple(&self, index: usize) -> Result<AbiFields<'a>, OperandError> {
        match self.0.get(index) {
            Some(DynSolValue::Tuple(fields)) => Ok(AbiFields(fields)),
            _ => Err(Self::unexpected(index, "tuple")),
        }
    }
}
