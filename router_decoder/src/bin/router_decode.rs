use anyhow::{Context, Result};
use clap::Parser;
use router_decoder::{
    logging::setup_logging,
    permit2_sdk::domain::PERMIT2_ADDRESS,
    universal_router_sdk::{
        options::DecoderOptionsBuilder,
        structs::{ExecuteInput, ExecutePayload},
        universal_router_decoder::{decode_execute, DecodedCommand},
    },
};
use serde_json::{json, Value};
use std::{
    io::{self, Read},
    path::PathBuf,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode Universal Router execute() commands")]
struct Cli {
    /// JSON file with {"commands", "inputs", "deadline"}; stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Bare level or EnvFilter directives
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Look commands up by their low six bits and report the allow-revert flag
    #[arg(long, default_value_t = false)]
    mask_flag_bits: bool,

    /// Decode what lines up when commands and inputs differ in length
    #[arg(long, default_value_t = false)]
    allow_misaligned: bool,

    /// Attach the legacy router call for swaps
    #[arg(long, default_value_t = false)]
    contract_call: bool,

    /// Attach the EIP-712 digest of permits signed for this chain
    #[arg(long)]
    chain_id: Option<u64>,

    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn read_payload(input: Option<&PathBuf>) -> Result<ExecutePayload> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).context("reading stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("parsing execute payload")
}

fn render(command: &DecodedCommand, cli: &Cli) -> Result<Value> {
    let mut entry = json!({
        "position": command.position,
        "command": command.code.to_string(),
        "kind": command.kind,
        "allowRevert": command.allow_revert(),
    });
    match &command.result {
        Ok(operation) => {
            entry["operation"] = serde_json::to_value(operation)?;
            if cli.contract_call {
                if let Some(call) = operation.contract_call() {
                    entry["contractCall"] = serde_json::to_value(call)?;
                }
            }
            if let Some(permit) = operation.as_permit() {
                if let Some(expires_at) = permit.expires_at() {
                    entry["expiresAt"] = json!(expires_at.to_rfc3339());
                }
                if let Some(chain_id) = cli.chain_id {
                    entry["signingHash"] =
                        json!(permit.signing_hash(chain_id, PERMIT2_ADDRESS).to_string());
                }
            }
        }
        Err(e) => entry["error"] = json!(e.to_string()),
    }
    Ok(entry)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.json_logs);

    let options = DecoderOptionsBuilder::default()
        .honor_flag_bits(cli.mask_flag_bits)
        .require_aligned_inputs(!cli.allow_misaligned)
        .build()?;

    let input = ExecuteInput::try_from(read_payload(cli.input.as_ref())?)?;
    let decoded = decode_execute(&input, &options)?;
    tracing::info!(
        decoded = decoded.operations().count(),
        failed = decoded.failures().count(),
        skipped = decoded.skipped.len(),
        "decoded execute payload"
    );

    for command in &decoded.commands {
        let entry = render(command, &cli)?;
        let line = if cli.pretty {
            serde_json::to_string_pretty(&entry)?
        } else {
            serde_json::to_string(&entry)?
        };
        println!("{line}");
    }
    Ok(())
}
