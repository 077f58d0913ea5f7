use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::{command_params::DecodedOperation, structs::serialize_decimal};

/// Far-future deadline shown in place of the envelope's own.
pub const DISPLAY_DEADLINE: &str = "99999999999";

/// The UniswapV2Router02 method a swap reads as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegacySwapMethod {
    #[serde(rename = "swapExactETHForTokens")]
    SwapExactEthForTokens,
    #[serde(rename = "swapETHForExactTokens")]
    SwapEthForExactTokens,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCallParams {
    #[serde(serialize_with = "serialize_decimal")]
    pub amount_in: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub amount_out: U256,
    pub path: Vec<Address>,
    pub deadline: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCall {
    pub method_name: LegacySwapMethod,
    pub params: ContractCallParams,
}

impl ContractCall {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl DecodedOperation {
    /// Summarize a swap as a legacy router call. `None` for non-swap kinds.
    pub fn contract_call(&self) -> Option<ContractCall> {
        let method_name = match self {
            Self::V3SwapExactIn(_) | Self::V2SwapExactIn(_) => {
                LegacySwapMethod::SwapExactEthForTokens
            }
            Self::V3SwapExactOut(_) | Self::V2SwapExactOut(_) => {
                LegacySwapMethod::SwapEthForExactTokens
            }
            Self::Permit2TransferFrom(_) | Self::Permit2Permit(_) => return None,
        };
        let swap = self.as_swap()?;
        Some(ContractCall {
            method_name,
            params: ContractCallParams {
                amount_in: swap.amount_in,
                amount_out: swap.amount_out,
                path: swap.path.clone(),
                deadline: DISPLAY_DEADLINE,
            },
        })
    }
}
