use alloy::hex;

use super::universal_router_commands::CommandCode;
use crate::error::DecodeError;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode `0x`-prefixed (or bare) hex text into bytes.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = strip_0x(s.trim());
    if digits.len() % 2 != 0 {
        return Err(DecodeError::MalformedInput(format!(
            "odd number of hex digits ({})",
            digits.len()
        )));
    }
    hex::decode(digits).map_err(|e| DecodeError::MalformedInput(e.to_string()))
}

/// Split raw command bytes into one code per byte.
pub fn parse_commands(commands: &[u8]) -> Vec<CommandCode> {
    commands.iter().copied().map(CommandCode).collect()
}

/// Split a hex command string, e.g. `0x0a080c`, into one code per byte.
pub fn parse_commands_hex(commands: &str) -> Result<Vec<CommandCode>, DecodeError> {
    Ok(parse_commands(&parse_hex_bytes(commands)?))
}
