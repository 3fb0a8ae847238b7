mod config;
mod error;
mod logging;

use std::path::Path;

use clap::Parser;
use madfi_typed_data::TypedSchemaRegistry;
use madfi_typed_data::config::DomainConfig;
use madfi_typed_data::signing::{assert_signature_is_valid, parse_signature};
use serde_json::{Value, json};
use tracing::info;

use crate::config::{Cli, Command};
use crate::error::ErrorKind;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing()?;

    let config = cli.domain_config(DomainConfig::from_env().map_err(ErrorKind::from)?);
    let registry = config.registry().map_err(ErrorKind::from)?;
    info!(
        domain_separator = %registry.domain_separator(),
        chain_id = ?registry.domain().chain_id,
        "loaded ranked settle schema"
    );

    let output = run(&cli.command, &registry)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(command: &Command, registry: &TypedSchemaRegistry) -> Result<Value, ErrorKind> {
    match command {
        Command::Schema => Ok(serde_json::to_value(registry.schema_document())?),
        Command::Digest { message } => {
            let message = read_message(message)?;
            Ok(json!({
                "domainSeparator": registry.domain_separator(),
                "messageHash": registry.hash_struct(registry.primary_type(), &message)?,
                "digest": registry.signing_hash(&message)?,
            }))
        }
        Command::Verify {
            message,
            signature,
            signer,
        } => {
            let message = read_message(message)?;
            let signature = parse_signature(signature)?;
            assert_signature_is_valid(&registry.bind(&message), &signature, *signer)?;
            info!(%signer, "signature verified");
            Ok(json!({ "valid": true, "signer": signer }))
        }
    }
}

fn read_message(path: &Path) -> Result<Value, ErrorKind> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
