//! Decoding what was encoded gives back the arguments, plus the `_len`
//! companions the encoder derived.
use proptest::prelude::*;
use starkcall_abi::{decode, encode, encode_for, validate, Args, CallKind, ContractAbi, StructValue, Value};

const ABI: &str = r#"[
    {
        "members": [
            {"name": "x", "offset": 0, "type": "felt"},
            {"name": "y", "offset": 1, "type": "felt"}
        ],
        "name": "Point",
        "size": 2,
        "type": "struct"
    },
    {
        "members": [
            {"name": "start", "offset": 0, "type": "Point"},
            {"name": "tags_len", "offset": 2, "type": "felt"},
            {"name": "tags", "offset": 3, "type": "felt*"},
            {"name": "end", "offset": 4, "type": "Point"}
        ],
        "name": "Line",
        "size": 7,
        "type": "struct"
    },
    {
        "inputs": [
            {"name": "a", "type": "felt"},
            {"name": "data_len", "type": "felt"},
            {"name": "data", "type": "felt*"},
            {"name": "line", "type": "Line"},
            {"name": "b", "type": "felt"}
        ],
        "name": "echo",
        "outputs": [
            {"name": "a", "type": "felt"},
            {"name": "data_len", "type": "felt"},
            {"name": "data", "type": "felt*"},
            {"name": "line", "type": "Line"},
            {"name": "b", "type": "felt"}
        ],
        "stateMutability": "view",
        "type": "function"
    }
]"#;

fn felt() -> impl Strategy<Value = String> {
    any::<u128>().prop_map(|n| n.to_string())
}

fn point() -> impl Strategy<Value = StructValue> {
    (felt(), felt()).prop_map(|(x, y)| StructValue::new("Point").with("x", x).with("y", y))
}

fn echo_args() -> impl Strategy<Value = Args> {
    (
        felt(),
        prop::collection::vec(felt(), 0..8),
        point(),
        prop::collection::vec(felt(), 0..4),
        point(),
        felt(),
    )
        .prop_map(|(a, data, start, tags, end, b)| {
            let line = StructValue::new("Line")
                .with("start", start)
                .with("tags", tags)
                .with("end", end);
            Args::new()
                .with("a", a)
                .with("data", data)
                .with("line", line)
                .with("b", b)
        })
}

/// Removes the length companions the decoder returns alongside arrays.
fn without_lengths(args: Args) -> Args {
    let names = args
        .iter()
        .filter(|(_, v)| matches!(v, Value::Array(_)))
        .map(|(n, _)| format!("{n}_len"))
        .collect::<Vec<_>>();

    args.into_iter()
        .filter(|(name, _)| !names.contains(name))
        .map(|(name, value)| match value {
            Value::Struct(s) => (
                name,
                Value::Struct(StructValue {
                    type_name: s.type_name,
                    fields: without_lengths(s.fields),
                }),
            ),
            other => (name, other),
        })
        .collect()
}

proptest! {
    #[test]
    fn decode_inverts_encode(args in echo_args()) {
        let abi = ContractAbi::from_json(ABI).unwrap();
        validate(&abi, CallKind::Call, "echo", &args).unwrap();

        let calldata = encode(&args).unwrap();
        prop_assert_eq!(&calldata, &encode_for(&abi, "echo", &args).unwrap());

        // The network echoes the calldata back as decimal numerals.
        let response = calldata.iter().map(|c| c.0.to_dec_string()).collect::<Vec<_>>();
        let decoded = decode(&abi, "echo", &response).unwrap();

        prop_assert_eq!(without_lengths(decoded), args);
    }
}
