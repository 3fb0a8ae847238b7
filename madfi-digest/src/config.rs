use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use madfi_typed_data::config::DomainConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Chain id of the deployment, overrides `MADFI_DOMAIN_CHAIN_ID`
    #[arg(long, env = "CHAIN_ID", global = true)]
    pub(crate) chain_id: Option<u64>,

    /// Bounties contract address, overrides `MADFI_DOMAIN_VERIFYING_CONTRACT`
    #[arg(long, env = "VERIFYING_CONTRACT", global = true)]
    pub(crate) verifying_contract: Option<Address>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Print the schema document
    Schema,
    /// Print the domain separator, message hash and digest of a message
    Digest {
        /// JSON file holding a `RankedSettleInput` message
        #[arg(long)]
        message: PathBuf,
    },
    /// Check that a signature over a message recovers the expected signer
    Verify {
        /// JSON file holding a `RankedSettleInput` message
        #[arg(long)]
        message: PathBuf,
        /// 0x-prefixed 65 byte signature
        #[arg(long)]
        signature: String,
        /// Address expected to have signed the message
        #[arg(long)]
        signer: Address,
    },
}

impl Cli {
    /// Applies the command line overrides on top of the environment config.
    pub(crate) fn domain_config(&self, config: DomainConfig) -> DomainConfig {
        DomainConfig {
            chain_id: self.chain_id.or(config.chain_id),
            verifying_contract: self
                .verifying_contract
                .as_ref()
                .map(ToString::to_string)
                .or(config.verifying_contract),
            ..config
        }
    }
}
