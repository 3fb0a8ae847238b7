use std::fmt;

use crate::errors::TypedDataError;

/// A parsed EIP-712 field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiType {
    Uint(usize),
    Int(usize),
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Array {
        inner: Box<AbiType>,
        len: Option<usize>,
    },
    Struct(String),
}

impl AbiType {
    /// Parses a field type string such as `uint256`, `bytes[]` or `PostParams[2]`.
    ///
    /// # Arguments
    ///
    /// * `type_str` - The raw type string as declared in the schema.
    /// * `is_struct` - Tells whether a name refers to a declared struct type.
    pub fn parse(type_str: &str, is_struct: impl Fn(&str) -> bool) -> Result<Self, TypedDataError> {
        Self::parse_inner(type_str, &is_struct)
    }

    fn parse_inner(
        type_str: &str,
        is_struct: &dyn Fn(&str) -> bool,
    ) -> Result<Self, TypedDataError> {
        if let Some(head) = type_str.strip_suffix(']') {
            let open = head
                .rfind('[')
                .ok_or_else(|| TypedDataError::UnknownType(type_str.to_string()))?;
            let len = match &head[open + 1..] {
                "" => None,
                digits => Some(digits.parse::<usize>().map_err(|_| {
                    TypedDataError::InvalidSchema(format!("invalid array length in `{type_str}`"))
                })?),
            };
            let inner = Self::parse_inner(&head[..open], is_struct)?;
            return Ok(Self::Array {
                inner: Box::new(inner),
                len,
            });
        }

        match type_str {
            "address" => return Ok(Self::Address),
            "bool" => return Ok(Self::Bool),
            "string" => return Ok(Self::String),
            "bytes" => return Ok(Self::Bytes),
            _ => {}
        }

        if let Some(bits) = type_str.strip_prefix("uint").and_then(parse_int_width) {
            return Ok(Self::Uint(bits));
        }
        if let Some(bits) = type_str.strip_prefix("int").and_then(parse_int_width) {
            return Ok(Self::Int(bits));
        }
        if let Some(width) = type_str
            .strip_prefix("bytes")
            .and_then(|w| w.parse::<usize>().ok())
            .filter(|w| (1..=32).contains(w))
        {
            return Ok(Self::FixedBytes(width));
        }

        if is_struct(type_str) {
            Ok(Self::Struct(type_str.to_string()))
        } else {
            Err(TypedDataError::UnknownType(type_str.to_string()))
        }
    }

    /// Returns the struct name this type ultimately refers to, looking
    /// through any array layers.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            Self::Array { inner, .. } => inner.struct_name(),
            _ => None,
        }
    }
}

// Widths must be a multiple of 8 in 8..=256.
fn parse_int_width(bits: &str) -> Option<usize> {
    bits.parse::<usize>()
        .ok()
        .filter(|b| (8..=256).contains(b) && b.is_multiple_of(8))
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Int(bits) => write!(f, "int{bits}"),
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::Bytes => f.write_str("bytes"),
            Self::FixedBytes(width) => write!(f, "bytes{width}"),
            Self::Array { inner, len: None } => write!(f, "{inner}[]"),
            Self::Array {
                inner,
                len: Some(len),
            } => write!(f, "{inner}[{len}]"),
            Self::Struct(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn known(name: &str) -> bool {
        matches!(name, "PostParams" | "MirrorParams")
    }

    #[rstest]
    #[case("uint256", AbiType::Uint(256))]
    #[case("uint8", AbiType::Uint(8))]
    #[case("int128", AbiType::Int(128))]
    #[case("address", AbiType::Address)]
    #[case("bool", AbiType::Bool)]
    #[case("string", AbiType::String)]
    #[case("bytes", AbiType::Bytes)]
    #[case("bytes32", AbiType::FixedBytes(32))]
    #[case("PostParams", AbiType::Struct("PostParams".into()))]
    #[case("address[]", AbiType::Array { inner: Box::new(AbiType::Address), len: None })]
    #[case("uint256[3]", AbiType::Array { inner: Box::new(AbiType::Uint(256)), len: Some(3) })]
    fn test_parse(#[case] raw: &str, #[case] expected: AbiType) {
        let parsed = AbiType::parse(raw, known).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), raw);
    }

    #[test]
    fn test_parse_nested_array_of_structs() {
        let parsed = AbiType::parse("MirrorParams[2][]", known).unwrap();
        assert_eq!(parsed.struct_name(), Some("MirrorParams"));
        assert_eq!(parsed.to_string(), "MirrorParams[2][]");
    }

    #[rstest]
    #[case("uint7")]
    #[case("uint264")]
    #[case("bytes0")]
    #[case("bytes33")]
    #[case("Bogus")]
    #[case("Bogus[]")]
    fn test_parse_unknown(#[case] raw: &str) {
        assert!(matches!(
            AbiType::parse(raw, known),
            Err(TypedDataError::UnknownType(_))
        ));
    }

    #[test]
    fn test_parse_bad_array_length() {
        assert!(matches!(
            AbiType::parse("uint256[x]", known),
            Err(TypedDataError::InvalidSchema(_))
        ));
    }
}
