//! Structural argument checks run before anything is encoded.
use crate::abi::{
    length_companion_of,
    member_fields,
    parameter_fields,
    CallKind,
    ContractAbi,
    Field,
    ParamType,
};
use crate::args::{Args, Value};
use crate::error::{Error, Problem, ProblemKind, SchemaError, ValidationError};
use crate::felt::to_felt;
use crate::field_path;

/// Checks `args` against the inputs of `method`.
///
/// Fails with [Error::Schema] if the method cannot be used for `kind` or
/// references an undeclared struct. Otherwise every argument is checked and
/// all problems are reported together, in declaration order followed by any
/// undeclared arguments.
pub fn validate(
    abi: &ContractAbi,
    kind: CallKind,
    method: &str,
    args: &Args,
) -> Result<(), Error> {
    let function = abi.resolve(kind, method)?;

    let mut problems = Vec::new();
    check_fields(
        abi,
        &parameter_fields(&function.inputs),
        args,
        "",
        &mut problems,
    )?;

    if problems.is_empty() {
        Ok(())
    } else {
        tracing::trace!(method, problems = problems.len(), "Arguments rejected");
        Err(ValidationError {
            method: Some(method.to_owned()),
            problems,
        }
        .into())
    }
}

fn check_fields(
    abi: &ContractAbi,
    fields: &[Field<'_>],
    args: &Args,
    prefix: &str,
    problems: &mut Vec<Problem>,
) -> Result<(), SchemaError> {
    let mut last_position = None;

    for (index, (name, ty)) in fields.iter().enumerate() {
        let path = field_path(prefix, name);
        let companion_of = length_companion_of(fields, index);

        let Some(position) = args.position(name) else {
            // Length companions are derived from their array when omitted.
            if companion_of.is_none() {
                problems.push(Problem::new(path, ProblemKind::Missing));
            }
            continue;
        };

        match last_position {
            Some(last) if position < last => {
                problems.push(Problem::new(path.clone(), ProblemKind::OutOfOrder));
            }
            _ => last_position = Some(position),
        }

        let Some(value) = args.get(name) else {
            continue;
        };
        match companion_of {
            Some(array) => check_companion(value, args.get(array), &path, problems),
            None => check_value(abi, ty, value, &path, problems)?,
        }
    }

    for name in args.keys() {
        if !fields.iter().any(|(declared, _)| *declared == name) {
            problems.push(Problem::new(
                field_path(prefix, name),
                ProblemKind::Undeclared,
            ));
        }
    }

    Ok(())
}

fn check_companion(value: &Value, array: Option<&Value>, path: &str, problems: &mut Vec<Problem>) {
    let length = match value {
        Value::Felt(length) => length,
        other => {
            problems.push(Problem::new(
                path,
                ProblemKind::UnexpectedShape {
                    expected: ParamType::Felt.describe(),
                    found: other.shape(),
                },
            ));
            return;
        }
    };

    let felt = match to_felt(length) {
        Ok(felt) => felt,
        Err(e) => {
            problems.push(Problem::new(path, ProblemKind::InvalidFelt(e)));
            return;
        }
    };

    // A missing or misshapen array is reported on its own.
    if let Some(Value::Array(elements)) = array {
        if felt.to_u64() != Some(elements.len() as u64) {
            problems.push(Problem::new(
                path,
                ProblemKind::LengthMismatch {
                    expected: elements.len(),
                    found: length.clone(),
                },
            ));
        }
    }
}

fn check_value(
    abi: &ContractAbi,
    ty: &ParamType,
    value: &Value,
    path: &str,
    problems: &mut Vec<Problem>,
) -> Result<(), SchemaError> {
    match (ty, value) {
        (ParamType::Felt, Value::Felt(felt)) => {
            if let Err(e) = to_felt(felt) {
                problems.push(Problem::new(path, ProblemKind::InvalidFelt(e)));
            }
        }
        (ParamType::FeltArray, Value::Array(elements)) => {
            for (i, element) in elements.iter().enumerate() {
                if let Err(e) = to_felt(element) {
                    problems.push(Problem::new(
                        format!("{path}[{i}]"),
                        ProblemKind::InvalidFelt(e),
                    ));
                }
            }
        }
        (ParamType::Struct(type_name), Value::Struct(value)) => {
            let entry = abi.struct_entry(type_name)?;
            if value.type_name != *type_name {
                problems.push(Problem::new(
                    path,
                    ProblemKind::StructMismatch {
                        expected: type_name.clone(),
                        found: value.type_name.clone(),
                    },
                ));
            } else {
                check_fields(
                    abi,
                    &member_fields(&entry.members),
                    &value.fields,
                    path,
                    problems,
                )?;
            }
        }
        (ty, other) => problems.push(Problem::new(
            path,
            ProblemKind::UnexpectedShape {
                expected: ty.describe(),
                found: other.shape(),
            },
        )),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions_sorted::assert_eq;
    use starkcall_common::FeltParseError;

    use super::*;
    use crate::args::StructValue;
    use crate::test_abi::abi;

    fn problems(method: &str, args: &Args) -> Vec<Problem> {
        assert_matches!(
            validate(&abi(), CallKind::Invoke, method, args),
            Err(Error::Validation(ValidationError { method: Some(m), problems })) => {
                assert_eq!(m, method);
                problems
            }
        )
    }

    #[test]
    fn accepts_well_typed_arguments() {
        let abi = abi();
        validate(&abi, CallKind::Call, "balance_of", &Args::new().with("user", "10")).unwrap();
        validate(
            &abi,
            CallKind::Invoke,
            "store",
            &Args::new().with("data", vec!["1", "0x2"]),
        )
        .unwrap();
        validate(
            &abi,
            CallKind::Invoke,
            "store",
            &Args::new().with("data_len", "2").with("data", vec!["1", "0x2"]),
        )
        .unwrap();
        validate(
            &abi,
            CallKind::Invoke,
            "move_to",
            &Args::new()
                .with("point", StructValue::new("Point").with("x", "5").with("y", "7"))
                .with("fee", "1"),
        )
        .unwrap();
    }

    #[test]
    fn invalid_felt_names_the_field() {
        let error = validate(
            &abi(),
            CallKind::Call,
            "balance_of",
            &Args::new().with("user", "not-a-number"),
        )
        .unwrap_err();

        assert_eq!(
            error,
            Error::Validation(ValidationError {
                method: Some("balance_of".to_owned()),
                problems: vec![Problem::new(
                    "user",
                    ProblemKind::InvalidFelt(FeltParseError::InvalidCharacter {
                        character: 'n',
                        position: 0
                    })
                )],
            })
        );
        assert!(error.to_string().starts_with(r#"invalid arguments for "balance_of": user: "#));
    }

    #[test]
    fn array_problems_carry_the_index() {
        let problems = problems("store", &Args::new().with("data", vec!["1", "x", "3", "-4"]));
        let paths = problems.iter().map(|p| p.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["data[1]", "data[3]"]);
    }

    #[test]
    fn reports_every_problem_in_declaration_order() {
        let args = Args::new()
            .with("extra", "1")
            .with("point", StructValue::new("Point").with("x", "0x").with("z", "1"))
            .with("fee", vec!["1"]);

        assert_eq!(
            problems("move_to", &args),
            vec![
                Problem::new("point.x", ProblemKind::InvalidFelt(FeltParseError::Empty)),
                Problem::new("point.y", ProblemKind::Missing),
                Problem::new("point.z", ProblemKind::Undeclared),
                Problem::new(
                    "fee",
                    ProblemKind::UnexpectedShape {
                        expected: "felt".to_owned(),
                        found: "felt*"
                    }
                ),
                Problem::new("extra", ProblemKind::Undeclared),
            ]
        );
    }

    #[test]
    fn missing_and_out_of_order() {
        assert_eq!(
            problems("move_to", &Args::new()),
            vec![
                Problem::new("point", ProblemKind::Missing),
                Problem::new("fee", ProblemKind::Missing),
            ]
        );

        let args = Args::new()
            .with("fee", "1")
            .with("point", StructValue::new("Point").with("x", "5").with("y", "7"));
        assert_eq!(
            problems("move_to", &args),
            vec![Problem::new("fee", ProblemKind::OutOfOrder)]
        );
    }

    #[test]
    fn struct_type_is_not_coerced() {
        let args = Args::new()
            .with("point", StructValue::new("Other").with("x", "5").with("y", "7"))
            .with("fee", "1");
        assert_eq!(
            problems("move_to", &args),
            vec![Problem::new(
                "point",
                ProblemKind::StructMismatch {
                    expected: "Point".to_owned(),
                    found: "Other".to_owned()
                }
            )]
        );
    }

    #[test]
    fn length_companion_must_match() {
        let args = Args::new().with("data_len", "3").with("data", vec!["1"]);
        assert_eq!(
            problems("store", &args),
            vec![Problem::new(
                "data_len",
                ProblemKind::LengthMismatch {
                    expected: 1,
                    found: "3".to_owned()
                }
            )]
        );
    }

    #[test]
    fn nested_companions_may_be_omitted() {
        let args = Args::new().with(
            "line",
            StructValue::new("Line")
                .with("start", StructValue::new("Point").with("x", "1").with("y", "2"))
                .with("tags", vec!["7"]),
        );
        validate(&abi(), CallKind::Invoke, "draw", &args).unwrap();
    }

    #[test]
    fn schema_failures() {
        let abi = abi();
        let args = Args::new();

        assert_eq!(
            validate(&abi, CallKind::Call, "missing", &args).unwrap_err(),
            Error::Schema(SchemaError::MethodNotFound("missing".to_owned()))
        );
        assert_eq!(
            validate(&abi, CallKind::Invoke, "balance_of", &args).unwrap_err(),
            Error::Schema(SchemaError::WrongMutability {
                method: "balance_of".to_owned(),
                kind: CallKind::Invoke
            })
        );
        assert_eq!(
            validate(
                &abi,
                CallKind::Invoke,
                "broken",
                &Args::new().with("ghost", StructValue::new("Ghost"))
            )
            .unwrap_err(),
            Error::Schema(SchemaError::UnknownStruct("Ghost".to_owned()))
        );
    }
}
