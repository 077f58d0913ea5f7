use alloy::primitives::{address, Address, U256};
use alloy_sol_types::Eip712Domain;
use std::borrow::Cow;

const PERMIT2_DOMAIN_NAME: &str = "Permit2";

/// Canonical Permit2 deployment, the same address on every chain.
pub const PERMIT2_ADDRESS: Address = address!("000000000022D473030F116dDEE9F6B43aC78BA3");

/// Permit2 signs without a version or salt.
pub fn permit2_domain(permit2_address: Address, chain_id: U256) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(PERMIT2_DOMAIN_NAME)),
        None,
        Some(chain_id),
        Some(permit2_address),
        None,
    )
}
