use alloy_primitives::{Address, B256, U256, hex, keccak256};
use serde_json::Value;
use tracing::trace;

use crate::errors::TypedDataError;
use crate::registry::TypedSchemaRegistry;
use crate::types::abi::AbiType;
use crate::types::bounty::Eip712Struct;
use crate::types::utils::is_0x_prefixed_hex_string;

/// `keccak256("\x19\x01" || domainSeparator || structHash)`
pub fn eip712_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(domain_separator.as_slice());
    buf[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

impl TypedSchemaRegistry {
    /// Encodes the data of a struct (`encodeData`): one 32-byte word per
    /// field, in declaration order.
    ///
    /// # Arguments
    ///
    /// * `type_name` - The struct to encode `value` as.
    /// * `value` - A JSON object holding every declared field.
    pub fn encode_value(&self, type_name: &str, value: &Value) -> Result<Vec<u8>, TypedDataError> {
        self.encode_data_at(type_name, value, type_name)
    }

    /// Computes `hashStruct`, `keccak256(typeHash || encodeData)`.
    pub fn hash_struct(&self, type_name: &str, value: &Value) -> Result<B256, TypedDataError> {
        self.hash_struct_at(type_name, value, type_name)
    }

    /// Computes the digest to sign for a message of the primary type.
    pub fn signing_hash(&self, message: &Value) -> Result<B256, TypedDataError> {
        let message_hash = self.hash_struct(self.primary_type(), message)?;
        Ok(eip712_digest(self.domain_separator(), message_hash))
    }

    pub fn hash_record<T: Eip712Struct>(&self, record: &T) -> Result<B256, TypedDataError> {
        self.hash_struct(T::TYPE_NAME, &record.to_message()?)
    }

    /// Computes the digest to sign for a typed record of the primary type.
    pub fn signing_hash_of<T: Eip712Struct>(&self, record: &T) -> Result<B256, TypedDataError> {
        self.ensure_primary(T::TYPE_NAME)?;
        self.signing_hash(&record.to_message()?)
    }

    pub(crate) fn ensure_primary(&self, type_name: &str) -> Result<(), TypedDataError> {
        if type_name == self.primary_type() {
            Ok(())
        } else {
            Err(TypedDataError::mismatch(
                type_name,
                self.primary_type(),
                "record is not of the primary type",
            ))
        }
    }

    fn hash_struct_at(
        &self,
        type_name: &str,
        value: &Value,
        path: &str,
    ) -> Result<B256, TypedDataError> {
        let type_hash = self.type_hash(type_name)?;
        let data = self.encode_data_at(type_name, value, path)?;

        let mut buf = Vec::with_capacity(32 + data.len());
        buf.extend_from_slice(type_hash.as_slice());
        buf.extend_from_slice(&data);
        Ok(keccak256(&buf))
    }

    fn encode_data_at(
        &self,
        type_name: &str,
        value: &Value,
        path: &str,
    ) -> Result<Vec<u8>, TypedDataError> {
        let fields = self.fields(type_name)?;
        let Some(object) = value.as_object() else {
            let reason = expected("an object", value);
            return Err(TypedDataError::mismatch(path, type_name, reason));
        };

        let mut encoded = Vec::with_capacity(32 * fields.len());
        for field in fields {
            let Some(field_value) = object.get(&field.name) else {
                return Err(TypedDataError::MissingField {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                });
            };
            let field_path = format!("{path}.{}", field.name);
            let word = self.encode_field(&field.abi, field_value, &field_path)?;
            encoded.extend_from_slice(word.as_slice());
        }

        trace!(type_name, path, len = encoded.len(), "encoded struct data");
        Ok(encoded)
    }

    /// Encodes one field into its 32-byte word.
    fn encode_field(
        &self,
        abi: &AbiType,
        value: &Value,
        path: &str,
    ) -> Result<B256, TypedDataError> {
        let mismatch = |reason: String| TypedDataError::mismatch(path, abi, reason);

        match abi {
            AbiType::Array { inner, len } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch(expected("an array", value)))?;
                if let Some(len) = len
                    && items.len() != *len
                {
                    return Err(mismatch(format!(
                        "expected {len} elements, got {}",
                        items.len()
                    )));
                }
                let mut buf = Vec::with_capacity(32 * items.len());
                for (i, item) in items.iter().enumerate() {
                    let word = self.encode_field(inner, item, &format!("{path}[{i}]"))?;
                    buf.extend_from_slice(word.as_slice());
                }
                Ok(keccak256(&buf))
            }
            AbiType::Struct(name) => self.hash_struct_at(name, value, path),
            AbiType::String => value
                .as_str()
                .map(|s| keccak256(s.as_bytes()))
                .ok_or_else(|| mismatch(expected("a string", value))),
            AbiType::Bytes => parse_bytes(value).map(keccak256).map_err(mismatch),
            AbiType::FixedBytes(width) => {
                let bytes = parse_bytes(value).map_err(mismatch)?;
                if bytes.len() != *width {
                    return Err(mismatch(format!(
                        "expected {width} bytes, got {}",
                        bytes.len()
                    )));
                }
                let mut word = B256::ZERO;
                word.0[..*width].copy_from_slice(&bytes);
                Ok(word)
            }
            AbiType::Address => parse_address(value)
                .map(|a| a.into_word())
                .map_err(mismatch),
            AbiType::Bool => value
                .as_bool()
                .map(|b| B256::with_last_byte(u8::from(b)))
                .ok_or_else(|| mismatch(expected("a boolean", value))),
            AbiType::Uint(bits) => parse_uint(value, *bits)
                .map(|v| B256::from(v.to_be_bytes::<32>()))
                .map_err(mismatch),
            AbiType::Int(bits) => parse_int(value, *bits)
                .map(|v| B256::from(v.to_be_bytes::<32>()))
                .map_err(mismatch),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn expected(what: &str, value: &Value) -> String {
    format!("expected {what}, got {}", kind(value))
}

fn numeric_text(value: &Value) -> Result<String, String> {
    match value {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(expected("a number or numeric string", other)),
    }
}

/// Parses a non-negative integer written in decimal or `0x` hex.
fn parse_magnitude(text: &str) -> Result<U256, String> {
    let (digits, radix) = match text.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(format!("`{text}` is not an integer"));
    }
    U256::from_str_radix(digits, u64::from(radix))
        .map_err(|_| format!("`{text}` does not fit in 256 bits"))
}

fn parse_uint(value: &Value, bits: usize) -> Result<U256, String> {
    let text = numeric_text(value)?;
    if text.starts_with('-') {
        return Err(format!("negative value `{text}`"));
    }
    let parsed = parse_magnitude(&text)?;
    if parsed.bit_len() > bits {
        return Err(format!("`{text}` exceeds {bits} bits"));
    }
    Ok(parsed)
}

/// Parses a signed integer and returns its 256-bit two's complement.
fn parse_int(value: &Value, bits: usize) -> Result<U256, String> {
    let text = numeric_text(value)?;
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let magnitude = parse_magnitude(digits)?;
    let bound = U256::from(1u8) << (bits - 1);
    if negative {
        if magnitude > bound {
            return Err(format!("`{text}` is below the int{bits} range"));
        }
        Ok(U256::ZERO.wrapping_sub(magnitude))
    } else {
        if magnitude >= bound {
            return Err(format!("`{text}` is above the int{bits} range"));
        }
        Ok(magnitude)
    }
}

fn parse_address(value: &Value) -> Result<Address, String> {
    let s = value
        .as_str()
        .ok_or_else(|| expected("a hex string", value))?;
    if s.len() != 42 || !is_0x_prefixed_hex_string(s) {
        return Err(format!("`{s}` is not a 0x-prefixed 20 byte hex address"));
    }
    let bytes = hex::decode(s).map_err(|e| e.to_string())?;
    Ok(Address::from_slice(&bytes))
}

fn parse_bytes(value: &Value) -> Result<Vec<u8>, String> {
    let s = value
        .as_str()
        .ok_or_else(|| expected("a hex string", value))?;
    if !is_0x_prefixed_hex_string(s) || !s.len().is_multiple_of(2) {
        return Err(format!("`{s}` is not 0x-prefixed, even-length hex"));
    }
    hex::decode(s).map_err(|e| e.to_string())
}
