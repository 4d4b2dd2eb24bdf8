//! Bank module messages (`cosmos.bank.v1beta1`).

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coin::Coin;
use crate::error::CodecError;
use crate::msg::{Msg, RegisteredMsg, amino_value, parse_address};

/// Transfers coins from one account to another.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct MsgSend {
    /// Sending account; the only signer.
    #[prost(string, tag = "1")]
    pub from_address: String,
    /// Receiving account.
    #[prost(string, tag = "2")]
    pub to_address: String,
    /// Coins to transfer.
    #[prost(message, repeated, tag = "3")]
    pub amount: Vec<Coin>,
}

impl Msg for MsgSend {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn legacy_type_tag(&self) -> &'static str {
        Self::AMINO_NAME
    }

    fn signers(&self) -> Result<Vec<Address>, CodecError> {
        Ok(vec![parse_address("from_address", &self.from_address)?])
    }

    fn legacy_value(&self) -> Result<Value, CodecError> {
        amino_value(self)
    }
}

impl RegisteredMsg for MsgSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
    const AMINO_NAME: &'static str = "cosmos-sdk/MsgSend";
}

/// One funding side of a [`MsgMultiSend`].
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Input {
    /// Funding account; a signer of the enclosing message.
    #[prost(string, tag = "1")]
    pub address: String,
    /// Coins moved through this side.
    #[prost(message, repeated, tag = "2")]
    pub coins: Vec<Coin>,
}

/// One receiving side of a [`MsgMultiSend`].
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    /// Receiving account.
    #[prost(string, tag = "1")]
    pub address: String,
    /// Coins moved through this side.
    #[prost(message, repeated, tag = "2")]
    pub coins: Vec<Coin>,
}

/// Transfers coins from several inputs to several outputs.
///
/// Every input address signs, so a multi-input send never passes single-signer
/// validation.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct MsgMultiSend {
    /// Funding sides.
    #[prost(message, repeated, tag = "1")]
    pub inputs: Vec<Input>,
    /// Receiving sides.
    #[prost(message, repeated, tag = "2")]
    pub outputs: Vec<Output>,
}

impl Msg for MsgMultiSend {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn legacy_type_tag(&self) -> &'static str {
        Self::AMINO_NAME
    }

    fn signers(&self) -> Result<Vec<Address>, CodecError> {
        self.inputs
            .iter()
            .map(|input| parse_address("inputs.address", &input.address))
            .collect()
    }

    fn legacy_value(&self) -> Result<Value, CodecError> {
        amino_value(self)
    }
}

impl RegisteredMsg for MsgMultiSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgMultiSend";
    const AMINO_NAME: &'static str = "cosmos-sdk/MsgMultiSend";
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";
    const BOB: &str = "0x2B5AD5c4795c026514f8317c7a215E218DcCD6cF";

    #[test]
    fn test_msg_send_legacy_value_is_sorted() {
        let msg = MsgSend {
            from_address: ALICE.into(),
            to_address: BOB.into(),
            amount: vec![Coin::new("aevmos", "1")],
        };
        let bytes = msg.legacy_encode().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            format!(
                r#"{{"type":"cosmos-sdk/MsgSend","value":{{"amount":[{{"amount":"1","denom":"aevmos"}}],"from_address":"{ALICE}","to_address":"{BOB}"}}}}"#
            )
        );
    }

    #[test]
    fn test_msg_send_rejects_bech32_signer() {
        let msg = MsgSend {
            from_address: "evmos1abcdef".into(),
            ..MsgSend::default()
        };
        assert!(matches!(
            msg.signers(),
            Err(CodecError::InvalidAddress {
                field: "from_address",
                ..
            })
        ));
    }

    #[test]
    fn test_msg_multi_send_signers_are_inputs() {
        let msg = MsgMultiSend {
            inputs: vec![
                Input {
                    address: ALICE.into(),
                    coins: vec![],
                },
                Input {
                    address: BOB.into(),
                    coins: vec![],
                },
            ],
            outputs: vec![],
        };
        let signers = msg.signers().unwrap();
        assert_eq!(signers.len(), 2);
        assert_eq!(signers[1].to_checksum(None), BOB);
    }
}
