// https://uniswapv3book.com/milestone_4/path.html
// A V3 path is `token (fee token)*`: 20 byte addresses separated by 3 byte fee tiers.
use alloy::primitives::Address;
use serde::Serialize;

use crate::error::PathError;

pub const ADDRESS_SIZE: usize = 20;
pub const FEE_SIZE: usize = 3;
pub const HOP_SIZE: usize = ADDRESS_SIZE + FEE_SIZE;

const MAX_FEE: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct V3Path {
    /// Tokens in wire order
    pub tokens: Vec<Address>,
    /// Fee tier of each hop, in hundredths of a bip
    pub fees: Vec<u32>,
}

impl V3Path {
    pub fn decode(path: &[u8]) -> Result<Self, PathError> {
        let hops = hop_count(path.len())?;
        let mut tokens = Vec::with_capacity(hops + 1);
        let mut fees = Vec::with_capacity(hops);

        tokens.push(Address::from_slice(&path[..ADDRESS_SIZE]));
        for hop in path[ADDRESS_SIZE..].chunks_exact(HOP_SIZE) {
            let (fee, token) = hop.split_at(FEE_SIZE);
            fees.push(u32::from_be_bytes([0, fee[0], fee[1], fee[2]]));
            tokens.push(Address::from_slice(token));
        }

        Ok(Self { tokens, fees })
    }

    pub fn encode(&self) -> Result<Vec<u8>, PathError> {
        encode_path(&self.tokens, &self.fees)
    }

    /// The same route walked from the other end.
    pub fn reversed(&self) -> Self {
        Self {
            tokens: self.tokens.iter().rev().copied().collect(),
            fees: self.fees.iter().rev().copied().collect(),
        }
    }
}

/// Number of hops encoded in a path of `len` bytes.
pub fn hop_count(len: usize) -> Result<usize, PathError> {
    if len < ADDRESS_SIZE || (len - ADDRESS_SIZE) % HOP_SIZE != 0 {
        return Err(PathError::PathLengthInvalid { len });
    }
    Ok((len - ADDRESS_SIZE) / HOP_SIZE)
}

/// Decode the token list of a packed path, dropping the fee tiers.
///
/// Exact output swaps are executed hop by hop starting from the output token,
/// so their wire path lists the tokens last-to-first. Pass `reverse` to get
/// them back in the order the user trades them.
pub fn decode_path(path: &[u8], reverse: bool) -> Result<Vec<Address>, PathError> {
    let mut tokens = V3Path::decode(path)?.tokens;
    if reverse {
        tokens.reverse();
    }
    Ok(tokens)
}

pub fn encode_path(path: &[Address], fees: &[u32]) -> Result<Vec<u8>, PathError> {
    if path.is_empty() || fees.len() + 1 != path.len() {
        return Err(PathError::FeeCountMismatch {
            tokens: path.len(),
            fees: fees.len(),
        });
    }
    if let Some(fee) = fees.iter().copied().find(|fee| *fee > MAX_FEE) {
        return Err(PathError::FeeOutOfRange(fee));
    }

    let mut encoded = Vec::with_capacity(ADDRESS_SIZE + fees.len() * HOP_SIZE);
    encoded.extend_from_slice(path[0].as_slice());
    for (fee, token) in fees.iter().zip(&path[1..]) {
        encoded.extend_from_slice(&fee.to_be_bytes()[1..4]);
        encoded.extend_from_slice(token.as_slice());
    }
    Ok(encoded)
}
