#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypedDataError {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("missing field `{field}` in `{type_name}`")]
    MissingField { type_name: String, field: String },
    #[error("cannot encode `{field}` as `{expected}`: {reason}")]
    TypeMismatch {
        field: String,
        expected: String,
        reason: String,
    },
    #[error("cyclic type reference: {}", .0.join(" -> "))]
    CyclicTypeReference(Vec<String>),
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("failed to serialize message: {0}")]
    Serialization(String),
}

impl TypedDataError {
    pub(crate) fn mismatch(
        field: impl Into<String>,
        expected: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("load config error: {0}")]
    LoadConfig(#[from] envy::Error),
    #[error("invalid domain config: {0}")]
    InvalidConfig(String),
}
