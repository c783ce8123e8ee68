//! Cairo 0 contract ABI as served by the gateway.
//!
//! Every parameter type is classified into a [ParamType] while the ABI is
//! deserialized, so the encoder, decoder and validator only ever match on a
//! closed set of shapes.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::registry::StructRegistry;

/// The wire shape of an input, output or struct member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// `felt`
    Felt,
    /// `felt*`, whose length travels in a preceding `<name>_len` felt.
    FeltArray,
    /// A struct declared elsewhere in the ABI, inlined on the wire.
    Struct(String),
}

impl ParamType {
    /// Human readable shape used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            ParamType::Felt => "felt".to_owned(),
            ParamType::FeltArray => "felt*".to_owned(),
            ParamType::Struct(name) => format!("struct {name}"),
        }
    }
}

impl std::str::FromStr for ParamType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "felt" => Ok(Self::Felt),
            "felt*" => Ok(Self::FeltArray),
            other if is_identifier(other) => Ok(Self::Struct(other.to_owned())),
            other => Err(SchemaError::UnsupportedType(other.to_owned())),
        }
    }
}

/// Struct names may be namespaced, e.g. `openzeppelin.Uint256`.
fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Felt => f.write_str("felt"),
            ParamType::FeltArray => f.write_str("felt*"),
            ParamType::Struct(name) => f.write_str(name),
        }
    }
}

impl Serialize for ParamType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParamType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TypedParameter {
    pub name: String,
    pub r#type: ParamType,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StructMember {
    pub name: String,
    pub r#type: ParamType,
    pub offset: u64,
}

/// Event parameters are never encoded or decoded by this crate, so their
/// types are kept verbatim.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawParameter {
    pub name: String,
    pub r#type: String,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum StateMutability {
    #[serde(rename = "view")]
    View,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FunctionAbiEntry {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<TypedParameter>,
    #[serde(default)]
    pub outputs: Vec<TypedParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "stateMutability")]
    pub state_mutability: Option<StateMutability>,
}

impl FunctionAbiEntry {
    pub fn mutability(&self) -> Mutability {
        match self.state_mutability {
            Some(StateMutability::View) => Mutability::View,
            None => Mutability::External,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StructAbiEntry {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub members: Vec<StructMember>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EventAbiEntry {
    pub name: String,
    #[serde(default)]
    pub keys: Vec<RawParameter>,
    #[serde(default)]
    pub data: Vec<RawParameter>,
}

/// One declared element of a contract.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum AbiEntry {
    #[serde(rename = "function")]
    Function(FunctionAbiEntry),
    #[serde(rename = "l1_handler")]
    L1Handler(FunctionAbiEntry),
    #[serde(rename = "constructor")]
    Constructor(FunctionAbiEntry),
    #[serde(rename = "struct")]
    Struct(StructAbiEntry),
    #[serde(rename = "event")]
    Event(EventAbiEntry),
}

impl AbiEntry {
    pub fn name(&self) -> &str {
        match self {
            AbiEntry::Function(f) | AbiEntry::L1Handler(f) | AbiEntry::Constructor(f) => &f.name,
            AbiEntry::Struct(s) => &s.name,
            AbiEntry::Event(e) => &e.name,
        }
    }

    /// Entries with inputs and outputs.
    pub fn as_function_like(&self) -> Option<&FunctionAbiEntry> {
        match self {
            AbiEntry::Function(f) | AbiEntry::L1Handler(f) | AbiEntry::Constructor(f) => Some(f),
            AbiEntry::Struct(_) | AbiEntry::Event(_) => None,
        }
    }
}

/// Whether a function may change state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mutability {
    External,
    View,
}

/// The kind of request a method is used for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallKind {
    /// A state-changing transaction.
    Invoke,
    /// A read-only call.
    Call,
}

impl CallKind {
    pub fn permits(&self, mutability: Mutability) -> bool {
        matches!(
            (self, mutability),
            (CallKind::Invoke, Mutability::External) | (CallKind::Call, Mutability::View)
        )
    }
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            CallKind::Invoke => "invokeable",
            CallKind::Call => "viewable",
        })
    }
}

/// A contract ABI indexed for lookups.
///
/// Built once per contract handle and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct ContractAbi {
    entries: Vec<AbiEntry>,
    functions: HashMap<String, usize>,
    structs: StructRegistry,
}

impl ContractAbi {
    /// Indexes the entries. Fails if a struct or function name is declared
    /// twice.
    pub fn new(entries: Vec<AbiEntry>) -> Result<Self, SchemaError> {
        let structs = StructRegistry::new(&entries)?;

        let mut functions = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.as_function_like().is_some()
                && functions.insert(entry.name().to_owned(), index).is_some()
            {
                return Err(SchemaError::DuplicateFunction(entry.name().to_owned()));
            }
        }

        tracing::debug!(
            entries = entries.len(),
            functions = functions.len(),
            structs = structs.len(),
            "Indexed contract ABI"
        );

        Ok(Self {
            entries,
            functions,
            structs,
        })
    }

    /// Parses the JSON ABI array served alongside a contract class.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let entries = serde_json::from_str::<Vec<AbiEntry>>(json)
            .map_err(|e| SchemaError::Malformed(e.to_string()))?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[AbiEntry] {
        &self.entries
    }

    pub fn structs(&self) -> &StructRegistry {
        &self.structs
    }

    pub fn struct_entry(&self, name: &str) -> Result<&StructAbiEntry, SchemaError> {
        self.structs.get(name)
    }

    /// Looks up a function, l1 handler or constructor by name.
    pub fn function(&self, name: &str) -> Option<&FunctionAbiEntry> {
        self.functions
            .get(name)
            .and_then(|index| self.entries[*index].as_function_like())
    }

    /// Resolves a plain `function` entry usable for the given [CallKind].
    pub fn resolve(&self, kind: CallKind, name: &str) -> Result<&FunctionAbiEntry, SchemaError> {
        let function = match self.functions.get(name).map(|index| &self.entries[*index]) {
            Some(AbiEntry::Function(function)) => function,
            _ => return Err(SchemaError::MethodNotFound(name.to_owned())),
        };

        if kind.permits(function.mutability()) {
            Ok(function)
        } else {
            Err(SchemaError::WrongMutability {
                method: name.to_owned(),
                kind,
            })
        }
    }
}

/// A named, typed slot: a function input/output or a struct member.
pub(crate) type Field<'a> = (&'a str, &'a ParamType);

pub(crate) fn parameter_fields(params: &[TypedParameter]) -> Vec<Field<'_>> {
    params
        .iter()
        .map(|p| (p.name.as_str(), &p.r#type))
        .collect()
}

pub(crate) fn member_fields(members: &[StructMember]) -> Vec<Field<'_>> {
    members
        .iter()
        .map(|m| (m.name.as_str(), &m.r#type))
        .collect()
}

/// If `fields[index]` is the `<name>_len` felt of a later `<name>: felt*`,
/// returns that array's name.
pub(crate) fn length_companion_of<'a>(fields: &[Field<'a>], index: usize) -> Option<&'a str> {
    let (name, ty) = fields[index];
    let array = name.strip_suffix("_len")?;
    if *ty != ParamType::Felt {
        return None;
    }
    fields[index + 1..]
        .iter()
        .find(|(n, t)| *n == array && **t == ParamType::FeltArray)
        .map(|(n, _)| *n)
}
