//! Structures used for deserializing replies from the Starknet gateway REST API.

/// Result of a `call_contract` request.
///
/// The gateway may group result felts in nested arrays; they are flattened
/// here so the result is a single felt sequence in wire order. Elements are
/// kept as the strings the gateway returned.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallContract {
    #[serde(deserialize_with = "flatten_result")]
    pub result: Vec<String>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ResultElement {
    Felt(String),
    Nested(Vec<String>),
}

fn flatten_result<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let elements = Vec::<ResultElement>::deserialize(deserializer)?;
    let mut result = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            ResultElement::Felt(felt) => result.push(felt),
            ResultElement::Nested(felts) => result.extend(felts),
        }
    }
    Ok(result)
}

pub mod add_transaction {
    use starkcall_common::TransactionHash;

    /// API response for an INVOKE_FUNCTION transaction
    #[derive(Clone, Debug, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
    #[serde(deny_unknown_fields)]
    pub struct InvokeResponse {
        pub code: String, // TRANSACTION_RECEIVED
        pub transaction_hash: TransactionHash,
    }

}
