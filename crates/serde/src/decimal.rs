use starkcall_common::Felt;

use crate::newtype::NewType;

/// Serializes a felt (or felt newtype) as a decimal numeral string, the
/// representation the gateway expects for calldata and signatures.
///
/// Deserialization also accepts `0x` prefixed hex.
pub struct FeltAsDecimalStr;

impl<T> serde_with::SerializeAs<T> for FeltAsDecimalStr
where
    T: NewType<Felt> + Clone,
{
    fn serialize_as<S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&value.clone().into_inner().to_dec_string())
    }
}

impl<'de, T> serde_with::DeserializeAs<'de, T> for FeltAsDecimalStr
where
    T: NewType<Felt>,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = Felt;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a decimal or '0x' prefixed hex numeral string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<Felt>().map_err(serde::de::Error::custom)
            }
        }

        deserializer
            .deserialize_str(DecimalVisitor)
            .map(T::from_inner)
    }
}
