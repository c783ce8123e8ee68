//! Error types of the ABI codec.
use starkcall_common::FeltParseError;

use crate::abi::CallKind;

/// Any failure of the codec.
///
/// None of these are transient: each one means the caller and the ABI
/// disagree, so nothing here is ever retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

/// The ABI itself is malformed or does not declare what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("malformed ABI: {0}")]
    Malformed(String),
    #[error("unsupported ABI type {0:?}")]
    UnsupportedType(String),
    #[error("struct {0:?} is declared more than once")]
    DuplicateStruct(String),
    #[error("function {0:?} is declared more than once")]
    DuplicateFunction(String),
    #[error("struct {0:?} not found in ABI")]
    UnknownStruct(String),
    #[error("method {0:?} not found in ABI")]
    MethodNotFound(String),
    #[error("{kind} method {method:?} not found in ABI")]
    WrongMutability { method: String, kind: CallKind },
}

/// One or more supplied arguments do not match the declared inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The method being validated, if the check ran against one.
    pub method: Option<String>,
    /// Every problem found, in declaration order.
    pub problems: Vec<Problem>,
}

impl std::error::Error for ValidationError {}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid arguments")?;
        if let Some(method) = &self.method {
            write!(f, " for {method:?}")?;
        }
        f.write_str(": ")?;
        for (i, problem) in self.problems.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{problem}")?;
        }
        Ok(())
    }
}

impl ValidationError {
    pub(crate) fn single(path: impl Into<String>, kind: ProblemKind) -> Self {
        Self {
            method: None,
            problems: vec![Problem::new(path, kind)],
        }
    }
}

/// A single bad argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {kind}")]
pub struct Problem {
    /// Dotted path to the argument, with the index for array elements,
    /// e.g. `point.x` or `data[2]`.
    pub path: String,
    pub kind: ProblemKind,
}

impl Problem {
    pub fn new(path: impl Into<String>, kind: ProblemKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProblemKind {
    #[error("required argument is missing")]
    Missing,
    #[error("argument is not declared by the ABI")]
    Undeclared,
    #[error("argument is supplied out of declaration order")]
    OutOfOrder,
    #[error("should be a decimal or hexadecimal felt: {0}")]
    InvalidFelt(FeltParseError),
    #[error("should be a {expected}, found a {found}")]
    UnexpectedShape {
        expected: String,
        found: &'static str,
    },
    #[error("should be struct {expected:?}, found struct {found:?}")]
    StructMismatch { expected: String, found: String },
    #[error("length {found:?} does not match the {expected} array elements")]
    LengthMismatch { expected: usize, found: String },
}

/// Flattening failed on a value that never went through validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("argument {0:?} is missing")]
    MissingArgument(String),
    #[error("struct {type_name:?} is missing member {member:?}")]
    MissingMember { type_name: String, member: String },
    #[error("argument {path:?} should be a {expected}, found a {found}")]
    UnexpectedShape {
        path: String,
        expected: String,
        found: &'static str,
    },
}

/// The response does not have the shape the ABI declares.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodingError {
    #[error("length of array {field:?} is not known: {field}_len must be declared before it")]
    MissingLength { field: String },
    #[error("length of array {field:?} is not a valid count: {value:?}")]
    InvalidLength { field: String, value: String },
    #[error("unexpected end of response decoding {field:?}: needed {needed} more elements, {available} left")]
    UnexpectedEnd {
        field: String,
        needed: usize,
        available: usize,
    },
    #[error("struct {type_name:?} of field {field:?} not found in ABI")]
    UnknownStruct { field: String, type_name: String },
}
