use std::collections::HashMap;

use crate::abi::{AbiEntry, StructAbiEntry};
use crate::error::SchemaError;

/// Struct declarations of a contract keyed by name.
#[derive(Clone, Debug, Default)]
pub struct StructRegistry(HashMap<String, StructAbiEntry>);

impl StructRegistry {
    /// Collects every `struct` entry. A name declared twice is an error
    /// rather than silently overwritten.
    pub fn new(entries: &[AbiEntry]) -> Result<Self, SchemaError> {
        let mut structs = HashMap::new();
        for entry in entries {
            if let AbiEntry::Struct(s) = entry {
                if structs.insert(s.name.clone(), s.clone()).is_some() {
                    return Err(SchemaError::DuplicateStruct(s.name.clone()));
                }
            }
        }
        Ok(Self(structs))
    }

    pub fn get(&self, name: &str) -> Result<&StructAbiEntry, SchemaError> {
        self.0
            .get(name)
            .ok_or_else(|| SchemaError::UnknownStruct(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
