//! Rule tables written by hand mark "unset" numeric limits with `-1`;
//! in Rust those fields are `Option<u32>`.

use serde::{de::Error, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_i64(i64::from(*v)),
        None => serializer.serialize_i64(-1),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(-1) => Ok(None),
        Some(v) => u32::try_from(v)
            .map(Some)
            .map_err(|_| D::Error::custom("expected -1 or a non-negative 32-bit integer")),
    }
}
