//! Denomination/amount pairs.

use serde::{Deserialize, Serialize};

/// A token amount in a single denomination.
///
/// The amount is kept as the decimal string both wire formats carry, so
/// arbitrarily large integers survive unchanged.
#[derive(Clone, PartialEq, Eq, ::prost::Message, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. `aevmos`.
    #[prost(string, tag = "1")]
    #[serde(default)]
    pub denom: String,
    /// Decimal amount.
    #[prost(string, tag = "2")]
    #[serde(default)]
    pub amount: String,
}

impl Coin {
    /// Creates a coin from a denomination and a decimal amount.
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_coin_json_field_names() {
        let coin = Coin::new("aevmos", "1000");
        let json = serde_json::to_string(&coin).unwrap();
        assert_eq!(json, r#"{"denom":"aevmos","amount":"1000"}"#);
    }

    #[test]
    fn test_coin_protobuf_decode() {
        let coin = Coin::new("uatom", "42");
        let bytes = coin.encode_to_vec();
        assert_eq!(Coin::decode(bytes.as_slice()).unwrap(), coin);
    }
}
