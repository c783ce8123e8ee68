//! Contains the [Felt] type and the felt newtypes used throughout starkcall.
//!
//! The wrappers add type safety on top of [Felt] so that, for example, a
//! contract address can not be passed where calldata is expected.
mod felt;
mod macros;

pub use felt::{Felt, FeltParseError, OverflowError};

/// User agent used in http clients
pub const USER_AGENT: &str = concat!("starkcall/", env!("CARGO_PKG_VERSION"));

macros::felt_newtypes!([
    CallParam,
    ContractAddress,
    EntryPoint,
    Fee,
    TransactionHash,
    TransactionNonce,
    TransactionSignatureElem,
    TransactionVersion,
]);

impl EntryPoint {
    /// Returns a new EntryPoint which has been truncated to fit from Keccak256 digest of input.
    ///
    /// See: <https://starknet.io/documentation/contracts/#function_selector>
    pub fn hashed(input: &[u8]) -> Self {
        use sha3::Digest;
        EntryPoint(truncated_keccak(<[u8; 32]>::from(sha3::Keccak256::digest(
            input,
        ))))
    }

    /// The constructor [EntryPoint], defined as the truncated keccak of b"constructor".
    pub const CONSTRUCTOR: Self = EntryPoint(crate::felt!(
        "0x028FFE4FF0F226A9107253E17A904099AA4F63A02A5621DE0576E5AA71BC5194"
    ));
}

impl TransactionVersion {
    pub const ONE: Self = Self(Felt::ONE);
}

/// Block against which a read-only call is executed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BlockId {
    Number(u64),
    #[default]
    Latest,
    Pending,
}

impl From<u64> for BlockId {
    fn from(number: u64) -> Self {
        Self::Number(number)
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockId::Number(number) => write!(f, "{number}"),
            BlockId::Latest => f.write_str("latest"),
            BlockId::Pending => f.write_str("pending"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid block {0:?}, expected a block number, \"latest\" or \"pending\"")]
pub struct ParseBlockIdError(String);

impl std::str::FromStr for BlockId {
    type Err = ParseBlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "pending" => Ok(Self::Pending),
            number => number
                .parse::<u64>()
                .map(Self::Number)
                .map_err(|_| ParseBlockIdError(s.to_owned())),
        }
    }
}

/// See:
/// <https://github.com/starkware-libs/cairo-lang/blob/64a7f6aed9757d3d8d6c28bd972df73272b0cb0a/src/starkware/starknet/public/abi.py#L21-L26>
pub fn truncated_keccak(mut plain: [u8; 32]) -> Felt {
    // python code masks with (2**250 - 1) which starts 0x03 and is followed by 31 0xff in be
    // truncation is needed not to overflow the field element.
    plain[0] &= 0x03;
    match Felt::from_be_bytes(plain) {
        Ok(felt) => felt,
        Err(_) => unreachable!("cannot overflow: smaller than modulus"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions_sorted::assert_eq;

    use crate::macro_prelude::*;
    use crate::{truncated_keccak, EntryPoint, Felt};

    #[test]
    fn constructor_entry_point() {
        use sha3::{Digest, Keccak256};

        let mut keccak = Keccak256::default();
        keccak.update(b"constructor");
        let expected = EntryPoint(truncated_keccak(<[u8; 32]>::from(keccak.finalize())));

        assert_eq!(EntryPoint::CONSTRUCTOR, expected);
        assert_eq!(EntryPoint::hashed(b"constructor"), expected);
    }

    #[test]
    fn truncated_keccak_matches_pythonic() {
        use sha3::{Digest, Keccak256};

        let all_set = Keccak256::digest([0xffu8; 32]);
        assert!(all_set[0] > 0xf);
        let truncated = truncated_keccak(all_set.into());
        assert_eq!(
            truncated,
            felt!("01c584056064687e149968cbab758a3376d22aedc6a55823d1b3ecbee81b8fb9")
        );
    }

    #[test]
    fn block_id() {
        use crate::BlockId;

        assert_eq!("latest".parse::<BlockId>().unwrap(), BlockId::Latest);
        assert_eq!("pending".parse::<BlockId>().unwrap(), BlockId::Pending);
        assert_eq!("42".parse::<BlockId>().unwrap(), BlockId::Number(42));
        assert!("-1".parse::<BlockId>().is_err());
        assert_eq!(BlockId::Number(7).to_string(), "7");
        assert_eq!(BlockId::default().to_string(), "latest");
    }

    #[test]
    fn newtype_formatting() {
        let address = contract_address!("0xabc");
        assert_eq!(address.to_string(), "0xabc");
        assert_eq!(format!("{address:?}"), "ContractAddress(0xabc)");
        assert_eq!(*address.as_inner(), Felt::from(0xabcu64));
    }
}
