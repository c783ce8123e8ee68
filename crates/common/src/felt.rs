use primitive_types::U256;

/// The Stark field prime `2^251 + 17 * 2^192 + 1` in big-endian.
const MODULUS: [u8; 32] = [
    0x08, 0, 0, 0, 0, 0, 0, 0x11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0x01,
];

/// A Starknet field element.
///
/// Stored as 32 big-endian bytes, always strictly smaller than the field
/// modulus.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Felt([u8; 32]);

/// Value does not fit into the field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("value exceeds the field modulus")]
pub struct OverflowError;

/// Error returned when a numeral string is not a valid [Felt].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeltParseError {
    #[error("empty numeral")]
    Empty,
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("value exceeds the field modulus")]
    Overflow,
}

impl From<OverflowError> for FeltParseError {
    fn from(_: OverflowError) -> Self {
        Self::Overflow
    }
}

impl Felt {
    pub const ZERO: Felt = Felt([0u8; 32]);
    pub const ONE: Felt = {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        Felt(bytes)
    };

    /// Creates a [Felt] from big-endian bytes, failing if the value is not
    /// below the modulus.
    pub const fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, OverflowError> {
        // Range comparison is not const, walk the bytes instead.
        let mut i = 0;
        while i < 32 {
            if bytes[i] < MODULUS[i] {
                return Ok(Self(bytes));
            }
            if bytes[i] > MODULUS[i] {
                return Err(OverflowError);
            }
            i += 1;
        }
        Err(OverflowError)
    }

    /// Big-endian slice of at most 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Result<Self, OverflowError> {
        if bytes.len() > 32 {
            return Err(OverflowError);
        }
        let mut buf = [0u8; 32];
        buf[32 - bytes.len()..].copy_from_slice(bytes);
        Self::from_be_bytes(buf)
    }

    pub const fn as_be_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub const fn to_be_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Parses hex digits with an optional `0x` or `0X` prefix.
    ///
    /// Leading zeros beyond 64 digits are accepted.
    pub const fn from_hex_str(s: &str) -> Result<Self, FeltParseError> {
        const fn nibble(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        let digits = s.as_bytes();
        let start = if digits.len() >= 2 && digits[0] == b'0' && (digits[1] | 0x20) == b'x' {
            2
        } else {
            0
        };
        if digits.len() == start {
            return Err(FeltParseError::Empty);
        }

        let mut i = start;
        while i < digits.len() {
            if nibble(digits[i]).is_none() {
                return Err(FeltParseError::InvalidCharacter {
                    character: digits[i] as char,
                    position: i,
                });
            }
            i += 1;
        }

        let mut bytes = [0u8; 32];
        let mut count = 0;
        let mut i = digits.len();
        while i > start {
            i -= 1;
            let n = match nibble(digits[i]) {
                Some(n) => n,
                None => unreachable!(),
            };
            if count >= 64 {
                if n != 0 {
                    return Err(FeltParseError::Overflow);
                }
            } else if count % 2 == 0 {
                bytes[31 - count / 2] |= n;
            } else {
                bytes[31 - count / 2] |= n << 4;
            }
            count += 1;
        }

        match Self::from_be_bytes(bytes) {
            Ok(felt) => Ok(felt),
            Err(_) => Err(FeltParseError::Overflow),
        }
    }

    /// Parses a plain decimal numeral.
    pub fn from_dec_str(s: &str) -> Result<Self, FeltParseError> {
        if s.is_empty() {
            return Err(FeltParseError::Empty);
        }
        if let Some((position, character)) = s.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
            return Err(FeltParseError::InvalidCharacter {
                character,
                position,
            });
        }

        // Only overflow is possible once every character is a digit.
        let value = U256::from_dec_str(s).map_err(|_| FeltParseError::Overflow)?;
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);

        Ok(Self::from_be_bytes(bytes)?)
    }

    /// `0x` prefixed hex with leading zeros trimmed, `0x0` for zero.
    pub fn to_hex_str(&self) -> String {
        let hex = self
            .0
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>();
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_owned()
        } else {
            format!("0x{trimmed}")
        }
    }

    pub fn to_dec_string(&self) -> String {
        U256::from_big_endian(&self.0).to_string()
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(buf))
    }
}

impl std::str::FromStr for Felt {
    type Err = FeltParseError;

    /// Accepts `0x` prefixed hex or plain decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [b'0', b'x' | b'X', ..] => Self::from_hex_str(s),
            _ => Self::from_dec_str(s),
        }
    }
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<usize> for Felt {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl std::fmt::Display for Felt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex_str())
    }
}

impl std::fmt::Debug for Felt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Felt({})", self.to_hex_str())
    }
}

impl serde::Serialize for Felt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_str())
    }
}

impl<'de> serde::Deserialize<'de> for Felt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FeltVisitor;

        impl serde::de::Visitor<'_> for FeltVisitor {
            type Value = Felt;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a hex string of up to 64 digits with an optional '0x' prefix")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Felt::from_hex_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(FeltVisitor)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions_sorted::assert_eq;
    use rstest::rstest;

    use super::*;

    const MAX: &str = "0x800000000000011000000000000000000000000000000000000000000000000";
    const MAX_DEC: &str =
        "3618502788666131213697322783095070105623107215331596699973092056135872020480";

    #[rstest]
    #[case::zero("0", Felt::ZERO)]
    #[case::one("1", Felt::ONE)]
    #[case::leading_zeros("0010", Felt::from(10u64))]
    #[case::hex("0xa", Felt::from(10u64))]
    #[case::upper_hex("0XFF", Felt::from(255u64))]
    #[case::u128_max("340282366920938463463374607431768211455", Felt::from(u128::MAX))]
    fn parses(#[case] input: &str, #[case] expected: Felt) {
        assert_eq!(input.parse::<Felt>().unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", FeltParseError::Empty)]
    #[case::bare_prefix("0x", FeltParseError::Empty)]
    #[case::word("abc", FeltParseError::InvalidCharacter { character: 'a', position: 0 })]
    #[case::negative("-1", FeltParseError::InvalidCharacter { character: '-', position: 0 })]
    #[case::float("1.5", FeltParseError::InvalidCharacter { character: '.', position: 1 })]
    #[case::exponent("1e3", FeltParseError::InvalidCharacter { character: 'e', position: 1 })]
    #[case::whitespace(" 1", FeltParseError::InvalidCharacter { character: ' ', position: 0 })]
    #[case::bad_hex("0xfg", FeltParseError::InvalidCharacter { character: 'g', position: 3 })]
    fn rejects(#[case] input: &str, #[case] expected: FeltParseError) {
        assert_eq!(input.parse::<Felt>().unwrap_err(), expected);
    }

    #[test]
    fn max_value() {
        let hex = Felt::from_hex_str(MAX).unwrap();
        let dec = Felt::from_dec_str(MAX_DEC).unwrap();
        assert_eq!(hex, dec);
        assert_eq!(hex.to_hex_str(), MAX);
        assert_eq!(dec.to_dec_string(), MAX_DEC);
    }

    #[test]
    fn modulus_overflows() {
        let modulus = "0x800000000000011000000000000000000000000000000000000000000000001";
        assert_eq!(Felt::from_hex_str(modulus), Err(FeltParseError::Overflow));

        let modulus_dec =
            "3618502788666131213697322783095070105623107215331596699973092056135872020481";
        assert_eq!(Felt::from_dec_str(modulus_dec), Err(FeltParseError::Overflow));

        let beyond_u256 = "1".repeat(80);
        assert_eq!(Felt::from_dec_str(&beyond_u256), Err(FeltParseError::Overflow));
        assert_eq!(
            Felt::from_hex_str(&format!("0x{}", "f".repeat(65))),
            Err(FeltParseError::Overflow)
        );
    }

    #[test]
    fn leading_hex_zeros_beyond_64_digits() {
        let padded = format!("0x{}{}", "0".repeat(70), "1");
        assert_eq!(Felt::from_hex_str(&padded).unwrap(), Felt::ONE);
    }

    #[test]
    fn formatting() {
        let felt = Felt::from(0x1234u64);
        assert_eq!(felt.to_hex_str(), "0x1234");
        assert_eq!(felt.to_dec_string(), "4660");
        assert_eq!(Felt::ZERO.to_hex_str(), "0x0");
        assert_eq!(Felt::ZERO.to_dec_string(), "0");
    }

    #[test]
    fn to_u64() {
        assert_eq!(Felt::from(7u64).to_u64(), Some(7));
        assert_eq!(Felt::from(u128::MAX).to_u64(), None);
    }

    #[test]
    fn serde() {
        let felt = Felt::from(0xabcu64);
        let json = serde_json::to_string(&felt).unwrap();
        assert_eq!(json, r#""0xabc""#);
        assert_eq!(serde_json::from_str::<Felt>(&json).unwrap(), felt);
    }
}
