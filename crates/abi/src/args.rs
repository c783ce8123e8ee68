//! Structured call arguments and decoded results.
//!
//! [Args] keeps insertion order since the wire format is positional: the
//! order of an [Args] is the order its values are encoded in.
use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use starkcall_common::Felt;

/// Insertion ordered mapping of argument names to values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args(Vec<(String, Value)>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style [Args::insert].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Appends the value, or replaces an existing one in place keeping its
    /// position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(n, _)| n == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.position(name)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = Args::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

impl IntoIterator for Args {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single argument or result value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// A felt numeral as supplied by the caller or as returned by the
    /// network.
    Felt(String),
    /// `felt*`; the length is implied.
    Array(Vec<String>),
    Struct(StructValue),
}

impl Value {
    /// Shape name used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Felt(_) => "felt",
            Value::Array(_) => "felt*",
            Value::Struct(_) => "struct",
        }
    }

    pub fn as_felt(&self) -> Option<&str> {
        match self {
            Value::Felt(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }
}

/// A struct value tagged with its declared type name.
///
/// The tag only disambiguates the value's shape, it is never encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructValue {
    pub type_name: String,
    pub fields: Args,
}

impl StructValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Args::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name, value);
        self
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Felt(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Felt(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Felt(value.to_string())
    }
}

impl From<Felt> for Value {
    fn from(value: Felt) -> Self {
        Value::Felt(value.to_dec_string())
    }
}

impl<T: Into<String>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<StructValue> for Value {
    fn from(value: StructValue) -> Self {
        Value::Struct(value)
    }
}

/// Key under which a struct value carries its type name in JSON.
const TYPE_KEY: &str = "type";

impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Felt(felt) => serializer.serialize_str(felt),
            Value::Array(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Struct(s) => {
                let mut map = serializer.serialize_map(Some(s.fields.len() + 1))?;
                map.serialize_entry(TYPE_KEY, &s.type_name)?;
                for (name, value) in s.fields.iter() {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

/// Deserializes from a JSON object. Entries keep the order in which the
/// deserializer yields them, which for JSON text is document order.
impl<'de> Deserialize<'de> for Args {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArgsVisitor;

        impl<'de> Visitor<'de> for ArgsVisitor {
            type Value = Args;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an object of named arguments")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut args = Args::new();
                while let Some((name, value)) = map.next_entry::<String, Value>()? {
                    if args.insert(name.clone(), value).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate argument {name:?}"
                        )));
                    }
                }
                Ok(args)
            }
        }

        deserializer.deserialize_map(ArgsVisitor)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a numeral, an array of numerals or a typed struct object")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Value::Felt(v.to_owned()))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Value::Felt(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Value::Felt(v.to_string()))
            }

            // Kept verbatim so validation can point at the offending field.
            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Value::Felt(v.to_string()))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Value::Felt(v.to_string()))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or_default());
                while let Some(element) = seq.next_element::<Value>()? {
                    match element {
                        Value::Felt(felt) => elements.push(felt),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "array elements must be numerals, found a {}",
                                other.shape()
                            )))
                        }
                    }
                }
                Ok(Value::Array(elements))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut type_name = None;
                let mut fields = Args::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == TYPE_KEY {
                        if type_name.is_some() {
                            return Err(serde::de::Error::duplicate_field(TYPE_KEY));
                        }
                        type_name = Some(map.next_value::<String>()?);
                        continue;
                    }
                    let value = map.next_value::<Value>()?;
                    if fields.insert(key.clone(), value).is_some() {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate struct member {key:?}"
                        )));
                    }
                }
                let type_name = type_name.ok_or_else(|| serde::de::Error::missing_field(TYPE_KEY))?;
                Ok(Value::Struct(StructValue { type_name, fields }))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
