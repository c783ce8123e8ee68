//! Gateway related error types.
use serde::{Deserialize, Serialize};

/// Errors returned by the gateway transport.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    /// Starknet specific errors.
    #[error(transparent)]
    StarknetError(#[from] StarknetError),
    /// Errors directly coming from reqwest
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// The gateway answered with an error status but the body was not a
    /// Starknet error.
    #[error("error decoding response body: invalid error variant")]
    InvalidStarknetErrorVariant,
}

/// Error body returned by the gateway with a 400 or 500 status.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StarknetError {
    pub code: StarknetErrorCode,
    pub message: String,
    // `problems` is omitted; the message already carries the details.
}

impl std::error::Error for StarknetError {}

impl std::fmt::Display for StarknetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            StarknetErrorCode::Known(code) => write!(f, "{code:?}: {}", self.message),
            StarknetErrorCode::Unknown(code) => write!(f, "{code}: {}", self.message),
        }
    }
}

/// A Starknet error code reported by the gateway.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StarknetErrorCode {
    Known(KnownStarknetErrorCode),
    Unknown(String),
}

impl From<KnownStarknetErrorCode> for StarknetErrorCode {
    fn from(value: KnownStarknetErrorCode) -> Self {
        Self::Known(value)
    }
}

/// Error codes the gateway reports for calls and invoke transactions.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub enum KnownStarknetErrorCode {
    #[serde(rename = "StarknetErrorCode.BLOCK_NOT_FOUND")]
    BlockNotFound,
    #[serde(rename = "StarknetErrorCode.ENTRY_POINT_NOT_FOUND_IN_CONTRACT")]
    EntryPointNotFound,
    #[serde(rename = "StarknetErrorCode.OUT_OF_RANGE_CONTRACT_ADDRESS")]
    OutOfRangeContractAddress,
    #[serde(rename = "StarkErrorCode.SCHEMA_VALIDATION_ERROR")]
    SchemaValidationError,
    #[serde(rename = "StarknetErrorCode.TRANSACTION_FAILED")]
    TransactionFailed,
    #[serde(rename = "StarknetErrorCode.UNINITIALIZED_CONTRACT")]
    UninitializedContract,
    #[serde(rename = "StarkErrorCode.MALFORMED_REQUEST")]
    MalformedRequest,
    #[serde(rename = "StarknetErrorCode.UNSUPPORTED_SELECTOR_FOR_FEE")]
    UnsupportedSelectorForFee,
    #[serde(rename = "StarknetErrorCode.TRANSACTION_LIMIT_EXCEEDED")]
    TransactionLimitExceeded,
    #[serde(rename = "StarknetErrorCode.INVALID_TRANSACTION_NONCE")]
    InvalidTransactionNonce,
    #[serde(rename = "StarknetErrorCode.OUT_OF_RANGE_FEE")]
    OutOfRangeFee,
    #[serde(rename = "StarknetErrorCode.INVALID_TRANSACTION_VERSION")]
    InvalidTransactionVersion,
    #[serde(rename = "StarknetErrorCode.UNAUTHORIZED_ENTRY_POINT_FOR_INVOKE")]
    UnauthorizedEntryPointForInvoke,
    #[serde(rename = "StarkErrorCode.INVALID_SIGNATURE")]
    InvalidSignature,
    #[serde(rename = "StarknetErrorCode.INSUFFICIENT_ACCOUNT_BALANCE")]
    InsufficientAccountBalance,
    #[serde(rename = "StarknetErrorCode.INSUFFICIENT_MAX_FEE")]
    InsufficientMaxFee,
    #[serde(rename = "StarknetErrorCode.VALIDATE_FAILURE")]
    ValidateFailure,
    #[serde(rename = "StarknetErrorCode.DUPLICATED_TRANSACTION")]
    DuplicatedTransaction,
}

#[cfg(test)]
mod tests {
    use pretty_assertions_sorted::assert_eq;

    use super::*;

    #[test]
    fn known_error_code() {
        let e = serde_json::from_str::<StarknetErrorCode>(
            r#""StarknetErrorCode.ENTRY_POINT_NOT_FOUND_IN_CONTRACT""#,
        )
        .unwrap();
        assert_eq!(e, KnownStarknetErrorCode::EntryPointNotFound.into())
    }

    #[test]
    fn unknown_error_code() {
        let e = serde_json::from_str::<StarknetErrorCode>(r#""StarknetErrorCode.UNKNOWN_ERROR""#)
            .unwrap();
        assert_eq!(
            e,
            StarknetErrorCode::Unknown("StarknetErrorCode.UNKNOWN_ERROR".to_owned())
        )
    }

    #[test]
    fn display() {
        let known = StarknetError {
            code: KnownStarknetErrorCode::UninitializedContract.into(),
            message: "Requested contract address 0x1 is not deployed.".to_owned(),
        };
        assert_eq!(
            known.to_string(),
            "UninitializedContract: Requested contract address 0x1 is not deployed."
        );

        let unknown = StarknetError {
            code: StarknetErrorCode::Unknown("StarknetErrorCode.NEW".to_owned()),
            message: "oops".to_owned(),
        };
        assert_eq!(unknown.to_string(), "StarknetErrorCode.NEW: oops");
    }
}
