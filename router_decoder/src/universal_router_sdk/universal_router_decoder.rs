use alloy::primitives::{Bytes, U256};
use serde::Serialize;
use std::fmt;

use super::{
    command_params::{decode_operation, DecodedOperation},
    command_stream::parse_commands,
    options::DecoderOptions,
    structs::ExecuteInput,
    universal_router_commands::{CommandCode, OperationKind},
};
use crate::error::{DecodeError, OperandError};

/// One registered command and the outcome of decoding its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCommand {
    /// Index into the command stream, and into `inputs`
    pub position: usize,
    pub code: CommandCode,
    pub kind: OperationKind,
    pub result: Result<DecodedOperation, DecodeError>,
}

impl DecodedCommand {
    pub fn operation(&self) -> Option<&DecodedOperation> {
        self.result.as_ref().ok()
    }

    pub fn allow_revert(&self) -> bool {
        self.code.allow_revert()
    }
}

/// A command byte with no registry entry. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedCommand {
    pub position: usize,
    pub code: CommandCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedExecute {
    /// Registered commands in stream order
    pub commands: Vec<DecodedCommand>,
    pub skipped: Vec<SkippedCommand>,
    pub deadline: Option<U256>,
}

impl DecodedExecute {
    pub fn operations(&self) -> impl Iterator<Item = (usize, &DecodedOperation)> {
        self.commands
            .iter()
            .filter_map(|command| command.operation().map(|op| (command.position, op)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &DecodeError)> {
        self.commands
            .iter()
            .filter_map(|command| command.result.as_ref().err().map(|e| (command.position, e)))
    }

    /// Every registered command decoded.
    pub fn is_complete(&self) -> bool {
        self.commands.iter().all(|command| command.result.is_ok())
    }
}

impl fmt::Display for DecodedExecute {
    /// One line per command byte, in stream order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut skipped = self.skipped.iter().peekable();
        for command in &self.commands {
            while let Some(skip) = skipped.next_if(|skip| skip.position < command.position) {
                writeln!(f, "[{}] {} skipped", skip.position, skip.code)?;
            }
            write!(f, "[{}] {} {}", command.position, command.code, command.kind)?;
            match &command.result {
                Ok(operation) => {
                    let json = serde_json::to_string(operation).map_err(|_| fmt::Error)?;
                    writeln!(f, " {json}")?;
                }
                Err(e) => writeln!(f, " error: {e}")?,
            }
        }
        for skip in skipped {
            writeln!(f, "[{}] {} skipped", skip.position, skip.code)?;
        }
        Ok(())
    }
}

/// Decode every registered command of an `execute` call.
///
/// Each command is decoded on its own: one bad input is recorded at its
/// position and the rest still decode. Only a command string that is not
/// aligned with the inputs fails the whole call.
pub fn decode_execute(
    input: &ExecuteInput,
    options: &DecoderOptions,
) -> Result<DecodedExecute, DecodeError> {
    let mut decoded = decode_commands(&parse_commands(&input.commands), &input.inputs, options)?;
    decoded.deadline = input.deadline;
    Ok(decoded)
}

/// Hex convenience over [`decode_execute`] with default options.
pub fn decode_execute_hex<S: AsRef<str>>(
    commands: &str,
    inputs: &[S],
) -> Result<DecodedExecute, DecodeError> {
    decode_execute(
        &ExecuteInput::from_hex(commands, inputs)?,
        &DecoderOptions::default(),
    )
}

pub fn decode_commands(
    codes: &[CommandCode],
    inputs: &[Bytes],
    options: &DecoderOptions,
) -> Result<DecodedExecute, DecodeError> {
    if options.require_aligned_inputs && codes.len() != inputs.len() {
        return Err(DecodeError::MisalignedInputs {
            commands: codes.len(),
            inputs: inputs.len(),
        });
    }

    let mut decoded = DecodedExecute::default();
    for (position, code) in codes.iter().copied().enumerate() {
        let Some(kind) = code.kind(options.honor_flag_bits) else {
            tracing::trace!(position, command = %code, "skipping unregistered router command");
            decoded.skipped.push(SkippedCommand { position, code });
            continue;
        };

        let result = match inputs.get(position) {
            Some(data) => decode_operation(kind, position, data),
            None => Err(DecodeError::MalformedOperationInput {
                kind,
                position,
                source: OperandError::MissingInput,
            }),
        };
        match &result {
            Ok(_) => tracing::debug!(position, command = %code, %kind, "decoded router command"),
            Err(e) => tracing::warn!(
                position,
                command = %code,
                %kind,
                error = %e,
                "failed to decode router command"
            ),
        }

        decoded.commands.push(DecodedCommand {
            position,
            code,
            kind,
            result,
        });
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use alloy::{
        dyn_abi::DynSolValue,
        hex,
        primitives::{Address, U256},
    };
    use std::str::FromStr;

    use super::*;
    use crate::{
        error::PathError,
        universal_router_sdk::{options::DecoderOptionsBuilder, v3_path::encode_path},
    };

    fn v2_input(amount_in: u64, amount_out: u64, path: &[Address]) -> Bytes {
        DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::from([0xb4; 20])),
            DynSolValue::Uint(U256::from(amount_in), 256),
            DynSolValue::Uint(U256::from(amount_out), 256),
            DynSolValue::Array(path.iter().copied().map(DynSolValue::Address).collect()),
            DynSolValue::Bool(true),
        ])
        .abi_encode_params()
        .into()
    }

    fn v3_input(first: u64, second: u64, path: Vec<u8>) -> Bytes {
        DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::from([0xc4; 20])),
            DynSolValue::Uint(U256::from(first), 256),
            DynSolValue::Uint(U256::from(second), 256),
            DynSolValue::Bytes(path),
            DynSolValue::Bool(false),
        ])
        .abi_encode_params()
        .into()
    }

    fn tokens() -> Vec<Address> {
        vec![Address::from([0xa1; 20]), Address::from([0xa2; 20])]
    }

    #[test]
    fn test_entire_tx() {
        // https://etherscan.io/tx/0x3b01f14e3c693d650474581dea684a954c25d663330667518b7e9fa13df10355
        // 0x0a080c0604: PERMIT2_PERMIT, V2_SWAP_EXACT_IN, UNWRAP_WETH, PAY_PORTION, SWEEP
        let inputs = [
            "0x0000000000000000000000003e66c9a569efcf704391b54fd1eebd8ca0556960000000000000000000000000ffffffffffffffffffffffffffffffffffffffff0000000000000000000000000000000000000000000000000000000079eb5d8f00000000000000000000000000000000000000000000000000000000000000000000000000000000000000003fc91a3afd70395cd496c647d5a6cc9d4b2b7fad0000000000000000000000000000000000000000000000000000000079eb5d8f00000000000000000000000000000000000000000000000000000000000000e0000000000000000000000000000000000000000000000000000000000000004170fd040dace04d798eba1edb5013e6e3bb74d3bef794a0ac03d800417093d80e35624ca55bdd0a4a932497c7675274dccf7211a8d1d061f227bd8170991846301c00000000000000000000000000000000000000000000000000000000000000",
            "0x000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000019981b4cf0ea9f06bf24400000000000000000000000000000000000000000000000000000089f91c7f3e8dda00000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000000020000000000000000000000003e66c9a569efcf704391b54fd1eebd8ca0556960000000000000000000000000c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "0x00000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000089f91c7f3e8dda",
            "0x0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000a74fa823bc8617fa320a966b3d11b0f722ef09ee000000000000000000000000000000000000000000000000000000000000005a",
            "0x000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000088bb38a8154981",
        ];
        let decoded = decode_execute_hex("0x0a080c0604", &inputs).unwrap();

        // PAY_PORTION and SWEEP are not registered
        assert_eq!(
            decoded.skipped,
            vec![
                SkippedCommand { position: 3, code: CommandCode(0x06) },
                SkippedCommand { position: 4, code: CommandCode(0x04) },
            ]
        );

        let kinds: Vec<OperationKind> = decoded.commands.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Permit2Permit,
                OperationKind::V2SwapExactIn,
                OperationKind::UnwrapWeth
            ]
        );

        let permit = decoded.commands[0].operation().unwrap().as_permit().unwrap();
        assert_eq!(
            permit.spender,
            Address::from_str("0x3fc91a3afd70395cd496c647d5a6cc9d4b2b7fad").unwrap()
        );

        let swap = decoded.commands[1].operation().unwrap().as_swap().unwrap();
        assert_eq!(swap.amount_out, U256::from(38835972598566362u128));

        assert_eq!(
            decoded.commands[2].result,
            Err(DecodeError::UnsupportedKind {
                kind: OperationKind::UnwrapWeth,
                position: 2
            })
        );
        assert_eq!(decoded.operations().count(), 2);
        assert!(!decoded.is_complete());
    }

    #[test]
    fn test_unregistered_ff_is_skipped() {
        let path = tokens();
        let inputs = vec![Bytes::from(vec![0xde, 0xad]), v2_input(1, 2, &path), Bytes::new()];
        let codes = parse_commands(&[0xff, 0x08, 0xff]);

        let decoded = decode_commands(&codes, &inputs, &DecoderOptions::default()).unwrap();
        assert_eq!(decoded.commands.len(), 1);
        assert_eq!(decoded.commands[0].position, 1);
        assert!(decoded.is_complete());
        assert_eq!(
            decoded.skipped.iter().map(|s| s.position).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_bad_command_does_not_stop_the_next() {
        let inputs = vec![
            v3_input(111, 1, vec![0xde; 21]),
            v2_input(333, 222, &tokens()),
        ];
        let input = ExecuteInput::new(vec![0x00, 0x08], inputs);

        let decoded = decode_execute(&input, &DecoderOptions::default()).unwrap();
        assert_eq!(decoded.commands.len(), 2);
        assert_eq!(
            decoded.failures().collect::<Vec<_>>(),
            vec![(
                0,
                &DecodeError::MalformedOperationInput {
                    kind: OperationKind::V3SwapExactIn,
                    position: 0,
                    source: OperandError::Path(PathError::PathLengthInvalid { len: 21 }),
                }
            )]
        );
        let (position, operation) = decoded.operations().next().unwrap();
        assert_eq!(position, 1);
        assert_eq!(operation.as_swap().unwrap().path, tokens());
    }

    #[test]
    fn test_multi_command_keeps_order() {
        let path = encode_path(&tokens(), &[3000]).unwrap();
        let inputs = vec![
            v3_input(10, 20, path.clone()),
            v2_input(5, 6, &tokens()),
            v3_input(30, 40, path),
        ];
        let input = ExecuteInput::new(vec![0x01, 0x09, 0x00], inputs)
            .with_deadline(U256::from(1730865534u64));

        let decoded = decode_execute(&input, &DecoderOptions::default()).unwrap();
        let ops: Vec<_> = decoded.operations().collect();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].1.kind(), OperationKind::V3SwapExactOut);
        assert_eq!(ops[1].1.kind(), OperationKind::V2SwapExactOut);
        assert_eq!(ops[2].1.kind(), OperationKind::V3SwapExactIn);

        let exact_out = ops[0].1.as_swap().unwrap();
        assert_eq!(exact_out.amount_in, U256::from(20u64));
        assert_eq!(exact_out.amount_out, U256::from(10u64));
        assert_eq!(exact_out.path, vec![tokens()[1], tokens()[0]]);

        let exact_in = ops[2].1.as_swap().unwrap();
        assert_eq!(exact_in.amount_in, U256::from(30u64));
        assert_eq!(exact_in.path, tokens());

        assert_eq!(decoded.deadline, Some(U256::from(1730865534u64)));
    }

    #[test]
    fn test_misaligned_inputs() {
        let input = ExecuteInput::new(vec![0x08, 0x0c], vec![v2_input(1, 2, &tokens())]);
        assert_eq!(
            decode_execute(&input, &DecoderOptions::default()),
            Err(DecodeError::MisalignedInputs {
                commands: 2,
                inputs: 1
            })
        );

        let lenient = DecoderOptionsBuilder::default()
            .require_aligned_inputs(false)
            .build()
            .unwrap();
        let input = ExecuteInput::new(vec![0x08, 0x09], vec![v2_input(1, 2, &tokens())]);
        let decoded = decode_execute(&input, &lenient).unwrap();
        assert!(decoded.commands[0].result.is_ok());
        assert_eq!(
            decoded.commands[1].result,
            Err(DecodeError::MalformedOperationInput {
                kind: OperationKind::V2SwapExactOut,
                position: 1,
                source: OperandError::MissingInput,
            })
        );
    }

    #[test]
    fn test_allow_revert_flag() {
        let input = ExecuteInput::new(vec![0x80 | 0x08], vec![v2_input(9_999, 555, &tokens())]);

        let decoded = decode_execute(&input, &DecoderOptions::default()).unwrap();
        assert!(decoded.commands.is_empty());
        assert_eq!(
            decoded.skipped,
            vec![SkippedCommand { position: 0, code: CommandCode(0x88) }]
        );

        let masked = DecoderOptionsBuilder::default()
            .honor_flag_bits(true)
            .build()
            .unwrap();
        let decoded = decode_execute(&input, &masked).unwrap();
        assert_eq!(decoded.commands.len(), 1);
        assert!(decoded.commands[0].allow_revert());
        assert_eq!(decoded.commands[0].kind, OperationKind::V2SwapExactIn);
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn test_only_registered_bytes_decode_by_default() {
        let path = encode_path(&tokens(), &[3000]).unwrap();
        let input = ExecuteInput::new(
            vec![0x48, 0x80, 0x40, 0xc9],
            vec![
                v2_input(1, 2, &tokens()),
                v3_input(3, 4, path.clone()),
                v3_input(5, 6, path),
                v2_input(7, 8, &tokens()),
            ],
        );

        let decoded = decode_execute(&input, &DecoderOptions::default()).unwrap();
        assert!(decoded.commands.is_empty());
        assert_eq!(
            decoded.skipped.iter().map(|s| s.code.raw()).collect::<Vec<_>>(),
            vec![0x48, 0x80, 0x40, 0xc9]
        );
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let path = encode_path(&tokens(), &[500]).unwrap();
        let input = ExecuteInput::new(
            vec![0x00, 0x0c, 0x08],
            vec![v3_input(1, 2, path), Bytes::new(), v2_input(3, 4, &tokens())],
        );
        let first = decode_execute(&input, &DecoderOptions::default()).unwrap();
        let second = decode_execute(&input, &DecoderOptions::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_malformed_command_hex() {
        assert!(matches!(
            decode_execute_hex("0x0", &["0x"]),
            Err(DecodeError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_display() {
        let input = ExecuteInput::new(
            vec![0x0c, 0x06],
            vec![Bytes::from(hex::decode("00").unwrap()), Bytes::new()],
        );
        let rendered = decode_execute(&input, &DecoderOptions::default())
            .unwrap()
            .to_string();
        assert_eq!(
            rendered,
            "[0] 0x0c UNWRAP_WETH error: command UNWRAP_WETH at position 0 has no parameter schema\n[1] 0x06 skipped\n"
        );
    }

    #[test]
    fn test_display_keeps_stream_order() {
        let input = ExecuteInput::new(vec![0x06, 0x0c, 0x04], vec![Bytes::new(); 3]);
        let rendered = decode_execute(&input, &DecoderOptions::default())
            .unwrap()
            .to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[0] 0x06 skipped");
        assert!(lines[1].starts_with("[1] 0x0c UNWRAP_WETH error:"), "{}", lines[1]);
        assert_eq!(lines[2], "[2] 0x04 skipped");
    }
}
