//! Structures used for serializing requests to the Starknet gateway REST API.
use serde_with::serde_as;
use starkcall_common::{CallParam, ContractAddress, EntryPoint, TransactionSignatureElem};
use starkcall_serde::FeltAsDecimalStr;

/// Read-only contract call, sent to the feeder gateway's `call_contract`.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
pub struct CallContract {
    pub contract_address: ContractAddress,
    pub entry_point_selector: EntryPoint,
    #[serde_as(as = "Vec<FeltAsDecimalStr>")]
    pub calldata: Vec<CallParam>,
    #[serde_as(as = "Vec<FeltAsDecimalStr>")]
    #[serde(default)]
    pub signature: Vec<TransactionSignatureElem>,
}

pub mod add_transaction {
    use starkcall_common::{Fee, TransactionNonce, TransactionVersion};

    use super::*;

    /// Invoke contract transaction details.
    #[serde_as]
    #[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
    pub struct InvokeFunction {
        // Transaction properties
        pub version: TransactionVersion,

        // AccountTransaction properties
        pub max_fee: Fee,
        #[serde_as(as = "Vec<FeltAsDecimalStr>")]
        pub signature: Vec<TransactionSignatureElem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub nonce: Option<TransactionNonce>,

        pub contract_address: ContractAddress,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub entry_point_selector: Option<EntryPoint>,
        #[serde_as(as = "Vec<FeltAsDecimalStr>")]
        pub calldata: Vec<CallParam>,
    }

    /// Add transaction API operation.
    ///
    /// This adds the "type" attribute to the JSON request.
    #[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
    #[serde(tag = "type")]
    pub enum AddTransaction {
        #[serde(rename = "INVOKE_FUNCTION")]
        Invoke(InvokeFunction),
    }

}

#[cfg(test)]
mod tests {
    use pretty_assertions_sorted::assert_eq;
    use starkcall_common::macro_prelude::*;

    use super::*;

    #[test]
    fn call_contract_json() {
        let call = CallContract {
            contract_address: contract_address!("0x1234"),
            entry_point_selector: EntryPoint::hashed(b"balance_of"),
            calldata: vec![call_param!("0xa")],
            signature: vec![],
        };

        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["contract_address"], "0x1234");
        assert_eq!(json["calldata"], serde_json::json!(["10"]));
        assert_eq!(json["signature"], serde_json::json!([]));
        assert_eq!(
            json["entry_point_selector"],
            serde_json::json!(call.entry_point_selector.0.to_hex_str())
        );
    }
}
