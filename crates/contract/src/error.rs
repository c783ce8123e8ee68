use starkcall_abi::{DecodingError, EncodingError, SchemaError, ValidationError};
use starkcall_gateway_types::error::SequencerError;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("contract is not connected to an address")]
    NotConnected,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// Returned by the gateway, unmodified.
    #[error(transparent)]
    Transport(#[from] SequencerError),
}

impl From<starkcall_abi::Error> for ContractError {
    fn from(error: starkcall_abi::Error) -> Self {
        use starkcall_abi::Error;

        match error {
            Error::Schema(e) => Self::Schema(e),
            Error::Validation(e) => Self::Validation(e),
            Error::Encoding(e) => Self::Encoding(e),
            Error::Decoding(e) => Self::Decoding(e),
        }
    }
}
