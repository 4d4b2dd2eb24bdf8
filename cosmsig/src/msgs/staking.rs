//! Staking module messages (`cosmos.staking.v1beta1`).

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coin::Coin;
use crate::error::CodecError;
use crate::msg::{Msg, RegisteredMsg, amino_value, parse_address};

/// Delegates tokens from an account to a validator.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(default)]
pub struct MsgDelegate {
    /// Delegating account; the only signer.
    #[prost(string, tag = "1")]
    pub delegator_address: String,
    /// Operator address of the validator.
    #[prost(string, tag = "2")]
    pub validator_address: String,
    /// Amount to delegate.
    #[prost(message, optional, tag = "3")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Coin>,
}

impl Msg for MsgDelegate {
    fn type_url(&self) -> &'static str {
        Self::TYPE_URL
    }

    fn legacy_type_tag(&self) -> &'static str {
        Self::AMINO_NAME
    }

    fn signers(&self) -> Result<Vec<Address>, CodecError> {
        Ok(vec![parse_address(
            "delegator_address",
            &self.delegator_address,
        )?])
    }

    fn legacy_value(&self) -> Result<Value, CodecError> {
        amino_value(self)
    }
}

impl RegisteredMsg for MsgDelegate {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgDelegate";
    const AMINO_NAME: &'static str = "cosmos-sdk/MsgDelegate";
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_msg_delegate_amino_decode() {
        let msg: MsgDelegate = serde_json::from_str(
            r#"{"delegator_address":"0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf","validator_address":"evmosvaloper1xyz","amount":{"denom":"aevmos","amount":"10"}}"#,
        )
        .unwrap();
        assert_eq!(msg.amount, Some(Coin::new("aevmos", "10")));
        assert_eq!(msg.signers().unwrap().len(), 1);
    }

    #[test]
    fn test_msg_delegate_omits_missing_amount() {
        let msg = MsgDelegate {
            delegator_address: "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".into(),
            validator_address: "evmosvaloper1xyz".into(),
            amount: None,
        };
        let value = msg.legacy_value().unwrap();
        assert!(value.get("amount").is_none());
        let decoded = MsgDelegate::decode(msg.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }
}
