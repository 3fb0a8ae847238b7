use std::str::FromStr;

use serde::{Deserialize as _, Deserializer};
use serde_json::Value;

/// Deserializes an optional u64 from a JSON string (decimal or 0x-hex) or number.
pub fn flexible_option_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<Value>::deserialize(deserializer)?;

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => parse_u64(&s).map(Some).map_err(D::Error::custom),
        Some(Value::Number(n)) => parse_u64(&n.to_string()).map(Some).map_err(D::Error::custom),
        Some(_) => Err(D::Error::custom("expected string or number")),
    }
}

fn parse_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    match s.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => u64::from_str(s),
    }
}

/// Returns true for a `0x`-prefixed string made only of hex digits.
pub fn is_0x_prefixed_hex_string(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
}
