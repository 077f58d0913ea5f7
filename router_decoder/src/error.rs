use crate::universal_router_sdk::universal_router_commands::OperationKind;

/// Failure of a whole `execute` decode, or of one command inside it.
///
/// `MalformedInput` and `MisalignedInputs` abort the call. The remaining
/// variants are recorded against a single command position and never stop
/// the other commands from decoding.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("{commands} command codes but {inputs} inputs")]
    MisalignedInputs { commands: usize, inputs: usize },

    #[error("command {kind} at position {position} has no parameter schema")]
    UnsupportedKind { kind: OperationKind, position: usize },

    #[error("command {kind} at position {position} has malformed input: {source}")]
    MalformedOperationInput {
        kind: OperationKind,
        position: usize,
        source: OperandError,
    },
}

/// Why the parameter bytes of one command could not be turned into an operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OperandError {
    #[error("abi decode failed: {0}")]
    Abi(String),

    #[error("field {index} is not a {expected}")]
    UnexpectedValue { index: usize, expected: &'static str },

    #[error("field {index} does not fit in {bits} bits")]
    Overflow { index: usize, bits: usize },

    #[error("no input bytes for this command")]
    MissingInput,

    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("path length {len} is not of the form 20 + 23k")]
    PathLengthInvalid { len: usize },

    #[error("{tokens} path tokens need {expected} fee tiers, got {fees}", expected = .tokens.saturating_sub(1))]
    FeeCountMismatch { tokens: usize, fees: usize },

    #[error("fee tier {0} does not fit in 24 bits")]
    FeeOutOfRange(u32),
}
