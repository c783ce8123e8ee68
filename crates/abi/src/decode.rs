//! Reconstruction of structured results from a flat response.
use starkcall_common::Felt;

use crate::abi::{member_fields, parameter_fields, ContractAbi, Field, ParamType};
use crate::args::{Args, StructValue, Value};
use crate::error::{DecodingError, Error, SchemaError};
use crate::field_path;

/// Forward-only reader over a flat response. Every element is consumed
/// exactly once.
#[derive(Debug)]
pub struct Cursor<'a, S> {
    data: &'a [S],
    position: usize,
}

impl<'a, S: AsRef<str>> Cursor<'a, S> {
    pub fn new(data: &'a [S]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn next(&mut self, field: &str) -> Result<&'a str, DecodingError> {
        Ok(self.take(1, field)?[0].as_ref())
    }

    fn take(&mut self, count: usize, field: &str) -> Result<&'a [S], DecodingError> {
        if count > self.remaining() {
            return Err(DecodingError::UnexpectedEnd {
                field: field.to_owned(),
                needed: count,
                available: self.remaining(),
            });
        }
        let taken = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(taken)
    }
}

/// Decodes the response of `method` according to its declared outputs.
///
/// Elements are returned as received. Elements left over after the last
/// output are ignored.
pub fn decode<S: AsRef<str>>(
    abi: &ContractAbi,
    method: &str,
    response: &[S],
) -> Result<Args, Error> {
    let function = abi
        .function(method)
        .ok_or_else(|| SchemaError::MethodNotFound(method.to_owned()))?;

    let mut cursor = Cursor::new(response);
    let result = decode_fields(abi, &parameter_fields(&function.outputs), &mut cursor, "")?;

    if cursor.remaining() > 0 {
        tracing::debug!(
            method,
            consumed = cursor.position(),
            trailing = cursor.remaining(),
            "Response longer than the declared outputs"
        );
    }

    Ok(result)
}

/// Decodes a single struct value of type `type_name` at the cursor.
///
/// Error paths are relative to the struct, e.g. `x` for its member `x`.
pub fn decode_struct<S: AsRef<str>>(
    abi: &ContractAbi,
    type_name: &str,
    cursor: &mut Cursor<'_, S>,
) -> Result<StructValue, Error> {
    let entry = abi.struct_entry(type_name)?;
    let fields = decode_fields(abi, &member_fields(&entry.members), cursor, "")?;
    Ok(StructValue {
        type_name: type_name.to_owned(),
        fields,
    })
}

fn decode_fields<S: AsRef<str>>(
    abi: &ContractAbi,
    fields: &[Field<'_>],
    cursor: &mut Cursor<'_, S>,
    prefix: &str,
) -> Result<Args, DecodingError> {
    // Siblings decoded so far at this level; array lengths are read from it.
    let mut decoded = Args::new();

    for (name, ty) in fields {
        let path = field_path(prefix, name);

        let value = match ty {
            ParamType::Felt => Value::Felt(cursor.next(&path)?.to_owned()),
            ParamType::FeltArray => {
                let Some(Value::Felt(length)) = decoded.get(&format!("{name}_len")) else {
                    return Err(DecodingError::MissingLength { field: path });
                };
                let count = length
                    .parse::<Felt>()
                    .ok()
                    .and_then(|felt| felt.to_u64())
                    .and_then(|count| usize::try_from(count).ok())
                    .ok_or_else(|| DecodingError::InvalidLength {
                        field: path.clone(),
                        value: length.clone(),
                    })?;

                let elements = cursor.take(count, &path)?;
                Value::Array(elements.iter().map(|e| e.as_ref().to_owned()).collect())
            }
            ParamType::Struct(type_name) => {
                let entry = abi.structs().get(type_name).map_err(|_| {
                    DecodingError::UnknownStruct {
                        field: path.clone(),
                        type_name: type_name.clone(),
                    }
                })?;
                let fields = decode_fields(abi, &member_fields(&entry.members), cursor, &path)?;
                Value::Struct(StructValue {
                    type_name: type_name.clone(),
                    fields,
                })
            }
        };

        decoded.insert(*name, value);
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use pretty_assertions_sorted::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::test_abi::abi;

    #[test]
    fn scalar() {
        let result = decode(&abi(), "balance_of", &["0"]).unwrap();
        assert_eq!(result, Args::new().with("res", "0"));
    }

    #[test]
    fn values_are_returned_verbatim() {
        let result = decode(&abi(), "balance_of", &["0x00ff"]).unwrap();
        assert_eq!(result, Args::new().with("res", "0x00ff"));
    }

    #[test]
    fn array_reads_its_length_sibling() {
        let result = decode(&abi(), "get_data", &["3", "1", "2", "3"]).unwrap();
        assert_eq!(
            result,
            Args::new()
                .with("data_len", "3")
                .with("data", vec!["1", "2", "3"])
        );
    }

    #[test]
    fn hex_length() {
        let response = ["0x2", "1", "2"];
        let result = decode(&abi(), "get_data", &response).unwrap();
        assert_eq!(result.get("data"), Some(&Value::from(vec!["1", "2"])));
    }

    #[test]
    fn empty_array() {
        let result = decode(&abi(), "get_data", &["0"]).unwrap();
        assert_eq!(
            result,
            Args::new()
                .with("data_len", "0")
                .with("data", Vec::<String>::new())
        );
    }

    #[test]
    fn struct_consumes_its_members_only() {
        let abi = abi();
        let response = ["5", "7", "9"];
        let mut cursor = Cursor::new(&response);

        let point = decode_struct(&abi, "Point", &mut cursor).unwrap();
        assert_eq!(point, StructValue::new("Point").with("x", "5").with("y", "7"));
        assert_eq!(cursor.position(), 2);

        let result = decode(&abi, "get_point", &response).unwrap();
        assert_eq!(
            result,
            Args::new()
                .with("point", StructValue::new("Point").with("x", "5").with("y", "7"))
                .with("z", "9")
        );
    }

    #[test]
    fn struct_errors_name_the_member() {
        let response = ["5"];
        let mut cursor = Cursor::new(&response);

        assert_eq!(
            decode_struct(&abi(), "Point", &mut cursor).unwrap_err(),
            Error::Decoding(DecodingError::UnexpectedEnd {
                field: "y".to_owned(),
                needed: 1,
                available: 0
            })
        );
    }

    #[test]
    fn nested_struct_with_array() {
        let response = ["1", "2", "2", "8", "9"];
        let result = decode(&abi(), "get_line", &response).unwrap();

        let line = StructValue::new("Line")
            .with("start", StructValue::new("Point").with("x", "1").with("y", "2"))
            .with("tags_len", "2")
            .with("tags", vec!["8", "9"]);
        assert_eq!(result, Args::new().with("line", line));
    }

    #[test]
    fn trailing_elements_are_ignored() {
        let result = decode(&abi(), "balance_of", &["1", "2"]).unwrap();
        assert_eq!(result, Args::new().with("res", "1"));
    }

    #[test]
    fn missing_length_sibling() {
        assert_eq!(
            decode(&abi(), "bad_array", &["0", "1"]).unwrap_err(),
            Error::Decoding(DecodingError::MissingLength {
                field: "items".to_owned()
            })
        );
    }

    #[rstest]
    #[case::short_array(&["3", "1", "2"], DecodingError::UnexpectedEnd { field: "data".to_owned(), needed: 3, available: 2 })]
    #[case::no_length(&[], DecodingError::UnexpectedEnd { field: "data_len".to_owned(), needed: 1, available: 0 })]
    #[case::bad_length(&["three"], DecodingError::InvalidLength { field: "data".to_owned(), value: "three".to_owned() })]
    #[case::huge_length(
        &["0x100000000000000000"],
        DecodingError::InvalidLength { field: "data".to_owned(), value: "0x100000000000000000".to_owned() }
    )]
    fn malformed_responses(#[case] response: &[&str], #[case] expected: DecodingError) {
        assert_eq!(
            decode(&abi(), "get_data", response).unwrap_err(),
            Error::Decoding(expected)
        );
    }

    #[test]
    fn unknown_struct() {
        assert_eq!(
            decode(&abi(), "get_ghost", &["1"]).unwrap_err(),
            Error::Decoding(DecodingError::UnknownStruct {
                field: "ghost".to_owned(),
                type_name: "Ghost".to_owned()
            })
        );
    }

    #[test]
    fn unknown_method() {
        assert_eq!(
            decode(&abi(), "nope", &["1"]).unwrap_err(),
            Error::Schema(SchemaError::MethodNotFound("nope".to_owned()))
        );
    }
}
