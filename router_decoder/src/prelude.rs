pub use alloy::hex;
pub use alloy::primitives::Bytes;
pub use alloy::primitives::{Address, U160, U256};
pub use std::str::FromStr;

pub use crate::error::{DecodeError, OperandError, PathError};
pub use crate::permit2_sdk::{self, domain::PERMIT2_ADDRESS, permit::PermitMessage};
pub use crate::universal_router_sdk::{
    command_params::{decode_operation, DecodedOperation, SwapOperation, TransferFromOperation},
    contract_call::ContractCall,
    options::{DecoderOptions, DecoderOptionsBuilder},
    structs::ExecuteInput,
    universal_router_commands::{CommandCode, OperationKind},
    universal_router_decoder::{decode_execute, decode_execute_hex, DecodedExecute},
};
