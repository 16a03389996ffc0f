//! Base-10 text at the boundary.
//!
//! All integers cross the crate boundary as decimal strings: command line arguments, printed
//! output and the serde representations of shares, group parameters and commitments.

use num_bigint::BigUint;
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

use crate::error::{Result, ShardError};

/// Parses a non-negative base-10 integer, ignoring surrounding whitespace.
pub fn parse_decimal(text: &str) -> Result<BigUint> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ShardError::Parse("empty integer".to_string()));
    }
    BigUint::parse_bytes(text.as_bytes(), 10)
        .ok_or_else(|| ShardError::Parse(format!("{text:?} is not a decimal integer")))
}

/// Parses `x:y` or `x:y:r` into its components.
pub fn parse_point(text: &str) -> Result<(BigUint, BigUint, Option<BigUint>)> {
    let parts: Vec<&str> = text.split(':').collect();
    match parts.as_slice() {
        [x, y] => Ok((parse_decimal(x)?, parse_decimal(y)?, None)),
        [x, y, r] => Ok((parse_decimal(x)?, parse_decimal(y)?, Some(parse_decimal(r)?))),
        _ => Err(ShardError::Parse(format!(
            "{text:?} is not of the form x:y or x:y:r"
        ))),
    }
}

pub fn serialize<S>(value: &BigUint, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_decimal(&text).map_err(D::Error::custom)
}

/// Same representation for optional values; absent values serialize as `null`.
pub mod option {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&v.to_str_radix(10)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Option<BigUint>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse_decimal(&text).map_err(D::Error::custom))
            .transpose()
    }
}

/// Same representation for sequences.
pub mod vec {
    use super::*;
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;

    pub fn serialize<S>(values: &[BigUint], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            seq.serialize_element(&v.to_str_radix(10))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<BigUint>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|text| parse_decimal(text).map_err(D::Error::custom))
            .collect()
    }
}
