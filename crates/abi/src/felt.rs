//! Normalization of caller supplied numerals into [Felt]s.
use starkcall_common::{CallParam, Felt, FeltParseError};

/// Anything a caller may hand in where a felt is expected.
pub trait IntoFelt {
    fn into_felt(self) -> Result<Felt, FeltParseError>;
}

impl IntoFelt for &str {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        self.parse()
    }
}

impl IntoFelt for &String {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        self.parse()
    }
}

impl IntoFelt for String {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        self.parse()
    }
}

impl IntoFelt for Felt {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        Ok(self)
    }
}

impl IntoFelt for CallParam {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        Ok(self.0)
    }
}

impl IntoFelt for u64 {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        Ok(Felt::from(self))
    }
}

impl IntoFelt for u128 {
    fn into_felt(self) -> Result<Felt, FeltParseError> {
        Ok(Felt::from(self))
    }
}

/// Converts a decimal numeral, a `0x` prefixed hex numeral or an already
/// numeric value into a [Felt].
pub fn to_felt(candidate: impl IntoFelt) -> Result<Felt, FeltParseError> {
    candidate.into_felt()
}

/// Non-failing probe over [to_felt].
pub fn is_felt(candidate: impl IntoFelt) -> bool {
    to_felt(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions_sorted::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::decimal("10", 10)]
    #[case::hex("0x10", 16)]
    #[case::upper_hex_prefix("0X1f", 31)]
    fn accepts(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(to_felt(input).unwrap(), Felt::from(expected));
        assert!(is_felt(input));
    }

    #[rstest]
    #[case::not_a_number("not-a-number")]
    #[case::empty("")]
    #[case::signed("+1")]
    #[case::negative("-1")]
    #[case::float("1.0")]
    #[case::exponent("1e18")]
    #[case::padded("1 ")]
    #[case::modulus(
        "3618502788666131213697322783095070105623107215331596699973092056135872020481"
    )]
    fn rejects(#[case] input: &str) {
        assert!(to_felt(input).is_err());
        assert!(!is_felt(input));
    }

    #[test]
    fn numeric_values_pass_through() {
        assert_eq!(to_felt(7u64).unwrap(), Felt::from(7u64));
        assert_eq!(to_felt(u128::MAX).unwrap(), Felt::from(u128::MAX));
        assert_eq!(to_felt(Felt::ONE).unwrap(), Felt::ONE);
        assert_eq!(to_felt(CallParam(Felt::ONE)).unwrap(), Felt::ONE);
        assert_eq!(to_felt(String::from("3")).unwrap(), Felt::from(3u64));
    }
}
