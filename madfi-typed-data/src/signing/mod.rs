use std::borrow::Cow;

use alloy_primitives::{Address, B256, Signature, hex};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::errors::TypedDataError;
use crate::registry::TypedSchemaRegistry;
use crate::types::bounty::Eip712Struct;
use crate::types::typed_data::TypedData;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] TypedDataError),
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    #[error("unauthorized: expected signer {expected}, recovered {recovered}")]
    Unauthorized {
        expected: Address,
        recovered: Address,
    },
}

pub trait Signable {
    fn try_get_hash(&self) -> Result<B256, TypedDataError>;
}

impl Signable for TypedData {
    fn try_get_hash(&self) -> Result<B256, TypedDataError> {
        self.signing_hash()
    }
}

/// A primary type message bound to the registry that encodes it.
#[derive(Debug, Clone)]
pub struct SignableMessage<'a> {
    registry: &'a TypedSchemaRegistry,
    message: Cow<'a, Value>,
}

impl Signable for SignableMessage<'_> {
    fn try_get_hash(&self) -> Result<B256, TypedDataError> {
        self.registry.signing_hash(&self.message)
    }
}

impl TypedSchemaRegistry {
    pub fn bind<'a>(&'a self, message: &'a Value) -> SignableMessage<'a> {
        SignableMessage {
            registry: self,
            message: Cow::Borrowed(message),
        }
    }

    pub fn bind_record<T: Eip712Struct>(
        &self,
        record: &T,
    ) -> Result<SignableMessage<'_>, TypedDataError> {
        self.ensure_primary(T::TYPE_NAME)?;
        Ok(SignableMessage {
            registry: self,
            message: Cow::Owned(record.to_message()?),
        })
    }
}

/// Parses a 0x-prefixed 65 byte `{r, s, v}` signature.
pub fn parse_signature(raw: &str) -> Result<Signature, SignerError> {
    let bytes = hex::decode(raw).map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(SignerError::InvalidSignature(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }
    Signature::try_from(bytes.as_slice())
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))
}

/// Recovers the address that signed the EIP-712 digest of `data`.
pub fn recover_signer(data: &impl Signable, signature: &Signature) -> Result<Address, SignerError> {
    let hash = data.try_get_hash()?;
    signature
        .recover_address_from_prehash(&hash)
        .map_err(|e| SignerError::InvalidSignature(e.to_string()))
}

/// Assert that `data` was signed by `expected_signer`.
pub fn assert_signature_is_valid(
    data: &impl Signable,
    signature: &Signature,
    expected_signer: Address,
) -> Result<(), SignerError> {
    let recovered = recover_signer(data, signature)?;
    if recovered != expected_signer {
        warn!(%expected_signer, %recovered, "signature does not match the expected signer");
        return Err(SignerError::Unauthorized {
            expected: expected_signer,
            recovered,
        });
    }
    Ok(())
}
