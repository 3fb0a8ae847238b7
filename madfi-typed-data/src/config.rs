use std::str::FromStr;

use alloy_primitives::Address;
use serde::Deserialize;

use crate::errors::ConfigError;
use crate::registry::TypedSchemaRegistry;
use crate::schema::{DOMAIN_NAME, DOMAIN_VERSION, ranked_settle_registry};
use crate::types::typed_data::Domain;

pub const ENV_PREFIX: &str = "MADFI_DOMAIN_";

/// Deployment specific domain values, read from `MADFI_DOMAIN_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub verifying_contract: Option<String>,
}

fn default_name() -> String {
    DOMAIN_NAME.to_string()
}

fn default_version() -> String {
    DOMAIN_VERSION.to_string()
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            chain_id: None,
            verifying_contract: None,
        }
    }
}

impl DomainConfig {
    /// Loads `.env` if present, then reads the prefixed environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    pub fn into_domain(self) -> Result<Domain, ConfigError> {
        let verifying_contract = self
            .verifying_contract
            .map(|raw| {
                Address::from_str(&raw).map_err(|e| {
                    ConfigError::InvalidConfig(format!("verifying contract `{raw}`: {e}"))
                })
            })
            .transpose()?;

        Ok(Domain {
            chain_id: self.chain_id,
            verifying_contract,
            ..Domain::new(&self.name, &self.version)
        })
    }

    /// Builds the ranked settle registry for this deployment.
    pub fn registry(self) -> Result<TypedSchemaRegistry, ConfigError> {
        let domain = self.into_domain()?;
        ranked_settle_registry(domain).map_err(|e| ConfigError::InvalidConfig(e.to_string()))
    }
}
