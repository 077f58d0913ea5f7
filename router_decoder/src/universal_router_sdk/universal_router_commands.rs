// https://docs.uniswap.org/contracts/universal-router/technical-reference
// https://etherscan.io/address/0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad#code
use serde::{Deserialize, Serialize};
use std::fmt;

/// Low six bits of a command byte select the command type.
pub const COMMAND_TYPE_MASK: u8 = 0x3f;
/// Top bit marks a command whose revert must not revert the whole execute.
pub const FLAG_ALLOW_REVERT: u8 = 0x80;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversalRouterError {
    #[error("command 0x{0:02x} is not registered")]
    UnknownCommand(u8),
}

/// The router commands this crate knows how to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "V3_SWAP_EXACT_IN")]
    V3SwapExactIn,
    #[serde(rename = "V3_SWAP_EXACT_OUT")]
    V3SwapExactOut,
    #[serde(rename = "PERMIT2_TRANSFER_FROM")]
    Permit2TransferFrom,
    #[serde(rename = "V2_SWAP_EXACT_IN")]
    V2SwapExactIn,
    #[serde(rename = "V2_SWAP_EXACT_OUT")]
    V2SwapExactOut,
    #[serde(rename = "PERMIT2_PERMIT")]
    Permit2Permit,
    #[serde(rename = "UNWRAP_WETH")]
    UnwrapWeth,
}

/// Every registered command, in command byte order.
pub const COMMAND_REGISTRY: [(u8, OperationKind); 7] = [
    (0x00, OperationKind::V3SwapExactIn),
    (0x01, OperationKind::V3SwapExactOut),
    (0x02, OperationKind::Permit2TransferFrom),
    (0x08, OperationKind::V2SwapExactIn),
    (0x09, OperationKind::V2SwapExactOut),
    (0x0a, OperationKind::Permit2Permit),
    (0x0c, OperationKind::UnwrapWeth),
];

impl OperationKind {
    pub const fn from_command(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::V3SwapExactIn),
            0x01 => Some(Self::V3SwapExactOut),
            0x02 => Some(Self::Permit2TransferFrom),
            0x08 => Some(Self::V2SwapExactIn),
            0x09 => Some(Self::V2SwapExactOut),
            0x0a => Some(Self::Permit2Permit),
            0x0c => Some(Self::UnwrapWeth),
            _ => None,
        }
    }

    pub const fn as_command(self) -> u8 {
        match self {
            // 0x00 │  V3_SWAP_EXACT_IN
            Self::V3SwapExactIn => 0x00,
            // 0x01 │  V3_SWAP_EXACT_OUT
            Self::V3SwapExactOut => 0x01,
            // 0x02 │  PERMIT2_TRANSFER_FROM
            Self::Permit2TransferFrom => 0x02,
            // 0x08 │  V2_SWAP_EXACT_IN
            Self::V2SwapExactIn => 0x08,
            // 0x09 │  V2_SWAP_EXACT_OUT
            Self::V2SwapExactOut => 0x09,
            // 0x0a │  PERMIT2_PERMIT
            Self::Permit2Permit => 0x0a,
            // 0x0c │  UNWRAP_WETH
            Self::UnwrapWeth => 0x0c,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::V3SwapExactIn => "V3_SWAP_EXACT_IN",
            Self::V3SwapExactOut => "V3_SWAP_EXACT_OUT",
            Self::Permit2TransferFrom => "PERMIT2_TRANSFER_FROM",
            Self::V2SwapExactIn => "V2_SWAP_EXACT_IN",
            Self::V2SwapExactOut => "V2_SWAP_EXACT_OUT",
            Self::Permit2Permit => "PERMIT2_PERMIT",
            Self::UnwrapWeth => "UNWRAP_WETH",
        }
    }

    /// Exact output swaps carry the output amount first and their path backwards.
    pub const fn is_exact_output(self) -> bool {
        matches!(self, Self::V3SwapExactOut | Self::V2SwapExactOut)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for OperationKind {
    type Error = UniversalRouterError;

    fn try_from(value: u8) -> Result<Self, UniversalRouterError> {
        Self::from_command(value).ok_or(UniversalRouterError::UnknownCommand(value))
    }
}

impl From<OperationKind> for u8 {
    fn from(kind: OperationKind) -> u8 {
        kind.as_command()
    }
}

/// One byte of the `commands` argument of `execute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandCode(pub u8);

impl CommandCode {
    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn command_type(self) -> u8 {
        self.0 & COMMAND_TYPE_MASK
    }

    pub const fn allow_revert(self) -> bool {
        self.0 & FLAG_ALLOW_REVERT != 0
    }

    /// Registry lookup. With `honor_flag_bits` the flag bits are masked off
    /// first, otherwise the raw byte must match a registered command exactly.
    pub const fn kind(self, honor_flag_bits: bool) -> Option<OperationKind> {
        if honor_flag_bits {
            OperationKind::from_command(self.command_type())
        } else {
            OperationKind::from_command(self.0)
        }
    }
}

impl From<u8> for CommandCode {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
