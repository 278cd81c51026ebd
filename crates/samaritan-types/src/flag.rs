//! Boolean flags that older clients still send as `0`/`1`.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Bool(bool),
    Int(i64),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Repr::deserialize(deserializer)? {
        Repr::Bool(b) => Ok(b),
        Repr::Int(0) => Ok(false),
        Repr::Int(1) => Ok(true),
        Repr::Int(n) => Err(D::Error::custom(format!("expected 0 or 1, got {n}"))),
    }
}
