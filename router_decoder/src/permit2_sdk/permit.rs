// https://github.com/Uniswap/permit2/blob/main/src/interfaces/IAllowanceTransfer.sol
use alloy::primitives::{aliases::U48, Address, Bytes, B256, U160, U256};
use alloy_sol_types::SolStruct;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::permit2_domain;
use crate::{
    error::OperandError,
    universal_router_sdk::{command_params::AbiFields, structs::serialize_decimal},
};

mod typed {
    alloy::sol! {
        #[allow(missing_docs)]
        struct PermitDetails {
            address token;
            uint160 amount;
            uint48 expiration;
            uint48 nonce;
        }

        #[allow(missing_docs)]
        struct PermitSingle {
            PermitDetails details;
            address spender;
            uint256 sigDeadline;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermitDetails {
    /// ERC20 token address
    pub token: Address,
    /// the maximum amount allowed to spend
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: U160,
    /// timestamp at which a spender's token allowances become invalid
    #[serde(serialize_with = "serialize_decimal")]
    pub expiration: U48,
    /// an incrementing value indexed per owner,token,and spender for each signature
    #[serde(serialize_with = "serialize_decimal")]
    pub nonce: U48,
}

/// The `PERMIT2_PERMIT` command input: a `PermitSingle` and its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitMessage {
    /// the permit data for a single token allowance
    #[serde(rename = "PermitDetails")]
    pub details: PermitDetails,
    /// address permissioned on the allowed tokens
    pub spender: Address,
    /// deadline on the permit signature
    #[serde(serialize_with = "serialize_decimal")]
    pub sig_deadline: U256,
    /// The signature to provide to Permit2
    #[serde(rename = "sig")]
    pub signature: Bytes,
}

impl PermitMessage {
    /// Build from `((address,uint160,uint48,uint48),address,uint256),bytes`.
    pub(crate) fn from_fields(fields: &AbiFields<'_>) -> Result<Self, OperandError> {
        let permit_single = fields.tuple(0)?;
        let details = permit_single.tuple(0)?;

        Ok(Self {
            details: PermitDetails {
                token: details.address(0)?,
                amount: details.bounded_uint(1, 160)?.to::<U160>(),
                expiration: details.bounded_uint(2, 48)?.to::<U48>(),
                nonce: details.bounded_uint(3, 48)?.to::<U48>(),
            },
            spender: permit_single.address(1)?,
            sig_deadline: permit_single.uint(2)?,
            signature: Bytes::copy_from_slice(fields.bytes(1)?),
        })
    }

    /// When the allowance granted by this permit stops being usable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.details.expiration).ok()?, 0)
    }

    /// When the signature over this permit stops being accepted.
    pub fn sig_deadline_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.sig_deadline).ok()?, 0)
    }

    /// EIP-712 digest the owner signed, under the Permit2 domain of `chain_id`.
    ///
    /// This is only the message hash; the signature is not checked against it.
    pub fn signing_hash(&self, chain_id: u64, permit2_address: Address) -> B256 {
        let domain = permit2_domain(permit2_address, U256::from(chain_id));
        self.typed().eip712_signing_hash(&domain)
    }

    fn typed(&self) -> typed::PermitSingle {
        typed::PermitSingle {
            details: typed::PermitDetails {
                token: self.details.token,
                amount: self.details.amount,
                expiration: self.details.expiration,
                nonce: self.details.nonce,
            },
            spender: self.spender,
            sigDeadline: self.sig_deadline,
        }
    }
}
