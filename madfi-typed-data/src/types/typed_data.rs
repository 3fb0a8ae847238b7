use alloy_primitives::{Address, B256, U256, keccak256};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TypedDataError;
use crate::registry::TypedSchemaRegistry;
use crate::types::utils::flexible_option_u64;

pub const EIP712_DOMAIN_TYPE: &str = "EIP712Domain";

/// A single `{name, type}` entry of a type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub r#type: String,
}

impl Field {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
        }
    }
}

/// The EIP-712 domain. Absent fields are left out of the `EIP712Domain` type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        default,
        deserialize_with = "flexible_option_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<B256>,
}

impl Domain {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            version: Some(version.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    #[must_use]
    pub fn with_verifying_contract(mut self, verifying_contract: Address) -> Self {
        self.verifying_contract = Some(verifying_contract);
        self
    }

    #[must_use]
    pub fn with_salt(mut self, salt: B256) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Returns the `EIP712Domain` fields matching the populated values,
    /// in canonical order.
    pub fn eip712_fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(5);
        if self.name.is_some() {
            fields.push(Field::new("name", "string"));
        }
        if self.version.is_some() {
            fields.push(Field::new("version", "string"));
        }
        if self.chain_id.is_some() {
            fields.push(Field::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            fields.push(Field::new("verifyingContract", "address"));
        }
        if self.salt.is_some() {
            fields.push(Field::new("salt", "bytes32"));
        }
        fields
    }

    /// Returns `EIP712Domain(...)` for the populated fields.
    pub fn encode_type(&self) -> String {
        let params: Vec<String> = self
            .eip712_fields()
            .iter()
            .map(|f| format!("{} {}", f.r#type, f.name))
            .collect();
        format!("{EIP712_DOMAIN_TYPE}({})", params.join(","))
    }

    /// Computes the domain separator, `hashStruct(EIP712Domain, domain)`.
    pub fn separator(&self) -> B256 {
        let mut encoded = Vec::with_capacity(32 * 6);
        encoded.extend_from_slice(keccak256(self.encode_type()).as_slice());
        if let Some(name) = &self.name {
            encoded.extend_from_slice(keccak256(name.as_bytes()).as_slice());
        }
        if let Some(version) = &self.version {
            encoded.extend_from_slice(keccak256(version.as_bytes()).as_slice());
        }
        if let Some(chain_id) = self.chain_id {
            encoded.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
        }
        if let Some(verifying_contract) = self.verifying_contract {
            encoded.extend_from_slice(verifying_contract.into_word().as_slice());
        }
        if let Some(salt) = self.salt {
            encoded.extend_from_slice(salt.as_slice());
        }
        keccak256(&encoded)
    }
}

/// A full typed data document, as exchanged with `eth_signTypedData_v4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: IndexMap<String, Vec<Field>>,
    pub primary_type: String,
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub message: Value,
}

impl TypedData {
    pub fn new(
        types: IndexMap<String, Vec<Field>>,
        primary_type: &str,
        domain: Domain,
        message: Value,
    ) -> Self {
        Self {
            types,
            primary_type: primary_type.to_string(),
            domain,
            message,
        }
    }

    /// Builds and validates a registry out of this document's schema.
    pub fn registry(&self) -> Result<TypedSchemaRegistry, TypedDataError> {
        TypedSchemaRegistry::new(
            self.domain.clone(),
            &self.primary_type,
            self.types.clone(),
        )
    }

    /// Computes the EIP-712 digest of `message`.
    pub fn signing_hash(&self) -> Result<B256, TypedDataError> {
        self.registry()?.signing_hash(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_domain_type_follows_populated_fields() {
        let domain = Domain::new("MadFi Bounties", "1");
        assert_eq!(
            domain.encode_type(),
            "EIP712Domain(string name,string version)"
        );

        let domain = domain
            .with_chain_id(1)
            .with_verifying_contract(Address::with_last_byte(1));
        assert_eq!(
            domain.encode_type(),
            "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)"
        );
        assert_eq!(
            keccak256(domain.encode_type()),
            b256!("0x8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f")
        );
    }

    #[test]
    fn test_domain_separator() {
        let domain = Domain::new("Ether Mail", "1")
            .with_chain_id(1)
            .with_verifying_contract(address!("0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"));
        assert_eq!(
            domain.separator(),
            b256!("0xf2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f")
        );

        let bare = Domain::new("MadFi Bounties", "1");
        assert_eq!(
            bare.separator(),
            b256!("0x542f3ad74fa6b6891b79c95176394f39e86dbad0bd86ff2296cbf64ae221c30f")
        );
    }

    #[test]
    fn test_salted_domain() {
        let salt = B256::repeat_byte(0x11);
        let domain = Domain::new("Test", "1").with_salt(salt);
        assert_eq!(
            domain.encode_type(),
            "EIP712Domain(string name,string version,bytes32 salt)"
        );
        assert_eq!(
            domain.eip712_fields().last(),
            Some(&Field::new("salt", "bytes32"))
        );

        let mut encoded = keccak256(domain.encode_type()).to_vec();
        encoded.extend_from_slice(keccak256("Test").as_slice());
        encoded.extend_from_slice(keccak256("1").as_slice());
        encoded.extend_from_slice(salt.as_slice());
        assert_eq!(domain.separator(), keccak256(&encoded));
        assert_eq!(
            domain.separator(),
            b256!("0x3f38e72debc253c09e932bfe6b23f6762e4384a6bb4c3f6b288d7ea094e9bb6c")
        );
        assert_ne!(domain.separator(), Domain::new("Test", "1").separator());
    }

    #[test]
    fn test_domain_serde() {
        let raw = r#"{"name":"MadFi Bounties","version":"1","chainId":"0x89","verifyingContract":"0x0000000000000000000000000000000000000001"}"#;
        let domain: Domain = serde_json::from_str(raw).unwrap();
        assert_eq!(domain.chain_id, Some(137));
        assert_eq!(domain.verifying_contract, Some(Address::with_last_byte(1)));
        assert_eq!(domain.salt, None);

        let value = serde_json::to_value(Domain::new("MadFi Bounties", "1")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "name": "MadFi Bounties", "version": "1" })
        );
    }
}
