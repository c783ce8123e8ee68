//! Flattening of structured arguments into calldata.
//!
//! Arrays are written as their length followed by the elements and structs
//! are inlined member by member. Nothing on the wire marks where a value
//! ends, so the decoder has to walk the same shapes in the same order.
use starkcall_common::{CallParam, Felt};

use crate::abi::{
    length_companion_of,
    member_fields,
    parameter_fields,
    ContractAbi,
    Field,
    ParamType,
};
use crate::args::{Args, Value};
use crate::error::{EncodingError, Error, ProblemKind, SchemaError, ValidationError};
use crate::felt::to_felt;
use crate::field_path;

/// Encodes `args` in insertion order.
///
/// A felt `X_len` next to an array `X` in the same [Args] is treated as
/// that array's length and must agree with it, wherever the two appear. It
/// is written once, by the array.
///
/// Either the complete calldata is returned or nothing is.
pub fn encode(args: &Args) -> Result<Vec<CallParam>, Error> {
    let mut calldata = Vec::new();
    encode_args(args, "", &mut calldata)?;
    Ok(calldata)
}

fn encode_args(args: &Args, prefix: &str, out: &mut Vec<CallParam>) -> Result<(), Error> {
    for (name, value) in args.iter() {
        let path = field_path(prefix, name);

        let array = name
            .strip_suffix("_len")
            .and_then(|array| args.get(array)?.as_array());
        match (value, array) {
            (Value::Felt(length), Some(elements)) => check_length(length, elements.len(), &path)?,
            (value, _) => encode_value(value, &path, out)?,
        }
    }
    Ok(())
}

fn encode_value(value: &Value, path: &str, out: &mut Vec<CallParam>) -> Result<(), Error> {
    match value {
        Value::Felt(felt) => out.push(normalize(felt, path)?),
        Value::Array(elements) => encode_array(elements, path, out)?,
        Value::Struct(value) => encode_args(&value.fields, path, out)?,
    }
    Ok(())
}

/// Encodes `args` in the declared input order of `method`, looking members
/// up by name instead of relying on insertion order.
///
/// Length companions are always derived from their arrays.
pub fn encode_for(abi: &ContractAbi, method: &str, args: &Args) -> Result<Vec<CallParam>, Error> {
    let function = abi
        .function(method)
        .ok_or_else(|| SchemaError::MethodNotFound(method.to_owned()))?;

    let mut calldata = Vec::new();
    encode_fields(
        abi,
        &parameter_fields(&function.inputs),
        args,
        None,
        "",
        &mut calldata,
    )?;

    tracing::trace!(method, length = calldata.len(), "Encoded calldata");
    Ok(calldata)
}

fn encode_fields(
    abi: &ContractAbi,
    fields: &[Field<'_>],
    args: &Args,
    owner: Option<&str>,
    prefix: &str,
    out: &mut Vec<CallParam>,
) -> Result<(), Error> {
    for (index, (name, ty)) in fields.iter().enumerate() {
        let path = field_path(prefix, name);

        if let Some(array) = length_companion_of(fields, index) {
            if let (Some(Value::Felt(length)), Some(Value::Array(elements))) =
                (args.get(name), args.get(array))
            {
                check_length(length, elements.len(), &path)?;
            }
            continue;
        }

        let value = args.get(name).ok_or_else(|| match owner {
            Some(type_name) => EncodingError::MissingMember {
                type_name: type_name.to_owned(),
                member: (*name).to_owned(),
            },
            None => EncodingError::MissingArgument(path.clone()),
        })?;

        match (ty, value) {
            (ParamType::Felt, Value::Felt(felt)) => out.push(normalize(felt, &path)?),
            (ParamType::FeltArray, Value::Array(elements)) => encode_array(elements, &path, out)?,
            (ParamType::Struct(type_name), Value::Struct(value)) => {
                let entry = abi.struct_entry(type_name)?;
                encode_fields(
                    abi,
                    &member_fields(&entry.members),
                    &value.fields,
                    Some(type_name.as_str()),
                    &path,
                    out,
                )?;
            }
            (ty, other) => {
                return Err(EncodingError::UnexpectedShape {
                    path,
                    expected: ty.describe(),
                    found: other.shape(),
                }
                .into())
            }
        }
    }
    Ok(())
}

fn encode_array(elements: &[String], path: &str, out: &mut Vec<CallParam>) -> Result<(), Error> {
    out.push(CallParam(Felt::from(elements.len())));
    for (i, element) in elements.iter().enumerate() {
        out.push(normalize(element, &format!("{path}[{i}]"))?);
    }
    Ok(())
}

fn normalize(felt: &str, path: &str) -> Result<CallParam, Error> {
    to_felt(felt)
        .map(CallParam)
        .map_err(|e| ValidationError::single(path, ProblemKind::InvalidFelt(e)).into())
}

fn check_length(length: &str, expected: usize, path: &str) -> Result<(), Error> {
    let felt = to_felt(length)
        .map_err(|e| ValidationError::single(path, ProblemKind::InvalidFelt(e)))?;
    if felt.to_u64() == Some(expected as u64) {
        Ok(())
    } else {
        Err(ValidationError::single(
            path,
            ProblemKind::LengthMismatch {
                expected,
                found: length.to_owned(),
            },
        )
        .into())
    }
}
