use std::collections::{BTreeSet, HashMap, HashSet};

use alloy_primitives::{B256, keccak256};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::TypedDataError;
use crate::types::abi::AbiType;
use crate::types::typed_data::{Domain, EIP712_DOMAIN_TYPE, Field, TypedData};

/// A named, ordered list of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    name: String,
    fields: Vec<Field>,
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedField {
    pub(crate) name: String,
    pub(crate) abi: AbiType,
}

#[derive(Debug, Clone)]
struct CompiledType {
    definition: TypeDefinition,
    fields: Vec<ResolvedField>,
    referenced: Vec<String>,
    encoded_type: String,
    type_hash: B256,
}

/// Immutable EIP-712 schema: a domain, a primary type and the struct types
/// reachable from it.
///
/// Every check (names, field types, dangling references, cycles) runs once in
/// [`TypedSchemaRegistry::new`]; afterwards the registry is read-only and can
/// be shared freely between threads.
#[derive(Debug, Clone)]
pub struct TypedSchemaRegistry {
    domain: Domain,
    domain_separator: B256,
    primary_type: String,
    types: IndexMap<String, CompiledType>,
}

impl TypedSchemaRegistry {
    /// Validates the type graph and precomputes every type hash.
    ///
    /// # Arguments
    ///
    /// * `domain` - The domain the signatures are bound to.
    /// * `primary_type` - The root type of signed messages.
    /// * `types` - Type name to ordered fields. An `EIP712Domain` entry is
    ///   ignored, the domain type is derived from `domain`.
    pub fn new(
        domain: Domain,
        primary_type: &str,
        mut types: IndexMap<String, Vec<Field>>,
    ) -> Result<Self, TypedDataError> {
        if types.shift_remove(EIP712_DOMAIN_TYPE).is_some() {
            debug!("ignoring declared {EIP712_DOMAIN_TYPE}, deriving it from the domain");
        }

        for (name, fields) in &types {
            validate_definition(name, fields)?;
        }

        if !types.contains_key(primary_type) {
            return Err(TypedDataError::UnknownType(primary_type.to_string()));
        }

        let mut resolved: IndexMap<String, Vec<ResolvedField>> =
            IndexMap::with_capacity(types.len());
        for (name, fields) in &types {
            let parsed = fields
                .iter()
                .map(|field| {
                    Ok(ResolvedField {
                        name: field.name.clone(),
                        abi: AbiType::parse(&field.r#type, |n| types.contains_key(n))?,
                    })
                })
                .collect::<Result<Vec<_>, TypedDataError>>()?;
            resolved.insert(name.clone(), parsed);
        }

        detect_cycles(&resolved)?;

        let signatures: HashMap<&str, String> = types
            .iter()
            .map(|(name, fields)| (name.as_str(), struct_signature(name, fields)))
            .collect();

        let mut compiled = IndexMap::with_capacity(types.len());
        for (name, fields) in &types {
            let mut referenced = dependencies(name, &resolved);
            referenced.remove(name.as_str());

            let encoded_type: String = std::iter::once(name.as_str())
                .chain(referenced.iter().copied())
                .map(|dep| signatures[dep].as_str())
                .collect();
            let type_hash = keccak256(encoded_type.as_bytes());

            compiled.insert(
                name.clone(),
                CompiledType {
                    definition: TypeDefinition {
                        name: name.clone(),
                        fields: fields.clone(),
                    },
                    fields: resolved.get(name).cloned().unwrap_or_default(),
                    referenced: referenced.into_iter().map(ToString::to_string).collect(),
                    encoded_type,
                    type_hash,
                },
            );
        }

        let domain_separator = domain.separator();
        debug!(
            primary_type,
            types = compiled.len(),
            domain_separator = %domain_separator,
            "built typed schema registry"
        );

        Ok(Self {
            domain,
            domain_separator,
            primary_type: primary_type.to_string(),
            types: compiled,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn domain_separator(&self) -> B256 {
        self.domain_separator
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    /// Declared type names, in declaration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn type_definition(&self, name: &str) -> Result<&TypeDefinition, TypedDataError> {
        self.compiled(name).map(|ty| &ty.definition)
    }

    /// Returns the `encodeType` string of a struct: its own signature followed
    /// by the sorted signatures of every struct it references.
    pub fn encode_type(&self, name: &str) -> Result<&str, TypedDataError> {
        self.compiled(name).map(|ty| ty.encoded_type.as_str())
    }

    pub fn type_hash(&self, name: &str) -> Result<B256, TypedDataError> {
        self.compiled(name).map(|ty| ty.type_hash)
    }

    /// Struct types transitively referenced by `name`, sorted, root excluded.
    pub fn referenced_types(&self, name: &str) -> Result<Vec<&str>, TypedDataError> {
        self.compiled(name)
            .map(|ty| ty.referenced.iter().map(String::as_str).collect())
    }

    /// Returns the serialized schema artifact: `EIP712Domain` first, then the
    /// declared types in declaration order.
    pub fn schema_document(&self) -> TypedData {
        let mut types = IndexMap::with_capacity(self.types.len() + 1);
        types.insert(EIP712_DOMAIN_TYPE.to_string(), self.domain.eip712_fields());
        for (name, ty) in &self.types {
            types.insert(name.clone(), ty.definition.fields.clone());
        }
        TypedData::new(types, &self.primary_type, self.domain.clone(), Value::Null)
    }

    pub(crate) fn fields(&self, name: &str) -> Result<&[ResolvedField], TypedDataError> {
        self.compiled(name).map(|ty| ty.fields.as_slice())
    }

    fn compiled(&self, name: &str) -> Result<&CompiledType, TypedDataError> {
        self.types
            .get(name)
            .ok_or_else(|| TypedDataError::UnknownType(name.to_string()))
    }
}

fn validate_definition(name: &str, fields: &[Field]) -> Result<(), TypedDataError> {
    if !is_identifier(name) {
        return Err(TypedDataError::InvalidSchema(format!(
            "invalid type name `{name}`"
        )));
    }
    if AbiType::parse(name, |_| false).is_ok() {
        return Err(TypedDataError::InvalidSchema(format!(
            "type name `{name}` shadows a primitive type"
        )));
    }

    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !is_identifier(&field.name) {
            return Err(TypedDataError::InvalidSchema(format!(
                "invalid field name `{}` in `{name}`",
                field.name
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(TypedDataError::InvalidSchema(format!(
                "duplicate field `{}` in `{name}`",
                field.name
            )));
        }
    }
    Ok(())
}

// `Name(type1 name1,type2 name2,...)`
fn struct_signature(name: &str, fields: &[Field]) -> String {
    let params: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.r#type, f.name))
        .collect();
    format!("{name}({})", params.join(","))
}

/// Collects `name` and every struct it transitively references.
fn dependencies<'a>(
    name: &'a str,
    resolved: &'a IndexMap<String, Vec<ResolvedField>>,
) -> BTreeSet<&'a str> {
    let mut deps = BTreeSet::new();
    collect_deps(name, resolved, &mut deps);
    deps
}

fn collect_deps<'a>(
    name: &'a str,
    resolved: &'a IndexMap<String, Vec<ResolvedField>>,
    deps: &mut BTreeSet<&'a str>,
) {
    let Some((key, fields)) = resolved.get_key_value(name) else {
        return;
    };
    if !deps.insert(key.as_str()) {
        return;
    }
    for field in fields {
        if let Some(child) = field.abi.struct_name() {
            collect_deps(child, resolved, deps);
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

fn detect_cycles(resolved: &IndexMap<String, Vec<ResolvedField>>) -> Result<(), TypedDataError> {
    let mut state: HashMap<&str, Visit> = HashMap::with_capacity(resolved.len());
    let mut stack = Vec::new();
    for name in resolved.keys() {
        visit(name, resolved, &mut state, &mut stack)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    resolved: &'a IndexMap<String, Vec<ResolvedField>>,
    state: &mut HashMap<&'a str, Visit>,
    stack: &mut Vec<&'a str>,
) -> Result<(), TypedDataError> {
    match state.get(name) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            let start = stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].iter().map(ToString::to_string).collect();
            cycle.push(name.to_string());
            return Err(TypedDataError::CyclicTypeReference(cycle));
        }
        None => {}
    }

    state.insert(name, Visit::InProgress);
    stack.push(name);
    if let Some(fields) = resolved.get(name) {
        for field in fields {
            if let Some(child) = field.abi.struct_name() {
                visit(child, resolved, state, stack)?;
            }
        }
    }
    stack.pop();
    state.insert(name, Visit::Done);
    Ok(())
}
