//! Cairo 0 ABI codec.
//!
//! Translates between named, structured [Args] and the flat felt sequences
//! a contract receives as calldata and returns as a call result. The wire
//! format has no tags or delimiters: array lengths travel in a preceding
//! `<name>_len` felt and structs are inlined member by member, so both
//! directions walk the [ContractAbi] in declaration order.
pub mod abi;
mod args;
pub mod decode;
pub mod encode;
pub mod error;
pub mod felt;
pub mod registry;
pub mod validate;

pub use abi::{AbiEntry, CallKind, ContractAbi, FunctionAbiEntry, ParamType, StructAbiEntry};
pub use args::{Args, StructValue, Value};
pub use decode::{decode, Cursor};
pub use encode::{encode, encode_for};
pub use error::{
    DecodingError,
    EncodingError,
    Error,
    Problem,
    ProblemKind,
    SchemaError,
    ValidationError,
};
pub use felt::{is_felt, to_felt};
pub use registry::StructRegistry;
pub use validate::validate;

/// Dotted path of a field below `prefix`.
fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}
