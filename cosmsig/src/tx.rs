//! Canonical sign-document model.
//!
//! Both wire formats decode into [`CanonicalSignDoc`]. Everything downstream,
//! from validation to EIP-712 projection, works on this one shape.

use alloy_primitives::Address;
use serde_json::Value;

use crate::coin::Coin;
use crate::error::CodecError;
use crate::msg::Msg;

/// Transaction fee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalFee {
    /// Fee coins, in order.
    pub amount: Vec<Coin>,
    /// Gas limit.
    pub gas: u64,
    /// Account paying the fee, when it is not the first signer.
    pub payer: Option<String>,
    /// Account granting a fee allowance.
    pub granter: Option<String>,
}

/// Transaction tip. An empty `tipper` makes the document unencodable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTip {
    /// Tip coins.
    pub amount: Vec<Coin>,
    /// Account paying the tip.
    pub tipper: String,
}

/// A decoded message together with its resolved signers.
#[derive(Debug)]
pub struct CanonicalMessage {
    payload: Box<dyn Msg>,
    signers: Vec<Address>,
}

impl CanonicalMessage {
    /// Wraps a decoded message, resolving its signers once.
    ///
    /// # Errors
    ///
    /// Returns an error if the message's signer fields are not valid
    /// addresses.
    pub fn new(payload: Box<dyn Msg>) -> Result<Self, CodecError> {
        let signers = payload.signers()?;
        Ok(Self { payload, signers })
    }

    /// The decoded message.
    #[must_use]
    pub fn payload(&self) -> &dyn Msg {
        self.payload.as_ref()
    }

    /// Signers, in the order the message declares them.
    #[must_use]
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    /// Reads the Amino `type` tag back out of the message's encoded form.
    ///
    /// Returns `None` when the encoded form carries no non-empty string tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be encoded.
    pub fn type_tag(&self) -> Result<Option<String>, CodecError> {
        let encoded: Value = serde_json::from_slice(&self.payload.legacy_encode()?)?;
        Ok(encoded
            .get("type")
            .and_then(Value::as_str)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned))
    }
}

/// The transaction content a signer commits to.
#[derive(Debug)]
pub struct CanonicalSignDoc {
    /// Signer account number.
    pub account_number: u64,
    /// Signer sequence.
    pub sequence: u64,
    /// Timeout block height, 0 when unset.
    pub timeout_height: u64,
    /// Textual chain identifier, e.g. `evmos_9001-2`.
    pub chain_id: String,
    /// Free-form memo.
    pub memo: String,
    /// Transaction fee.
    pub fee: CanonicalFee,
    /// Messages, in transaction order.
    pub msgs: Vec<CanonicalMessage>,
    /// `None` when the transaction carries no tip.
    pub tip: Option<CanonicalTip>,
}

impl CanonicalSignDoc {
    /// Signer of the first message, by convention the fee payer.
    #[must_use]
    pub fn first_signer(&self) -> Option<Address> {
        self.msgs.first()?.signers().first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::bank::MsgSend;

    #[test]
    fn test_canonical_message_resolves_signers() {
        let msg = MsgSend {
            from_address: "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".into(),
            ..MsgSend::default()
        };
        let canonical = CanonicalMessage::new(Box::new(msg)).unwrap();
        assert_eq!(canonical.signers().len(), 1);
        assert_eq!(
            canonical.type_tag().unwrap().as_deref(),
            Some("cosmos-sdk/MsgSend")
        );
    }

    #[test]
    fn test_canonical_message_rejects_bad_signer() {
        let msg = MsgSend::default();
        assert!(CanonicalMessage::new(Box::new(msg)).is_err());
    }

    #[test]
    fn test_first_signer_of_empty_doc() {
        let doc = CanonicalSignDoc {
            account_number: 0,
            sequence: 0,
            timeout_height: 0,
            chain_id: String::new(),
            memo: String::new(),
            fee: CanonicalFee::default(),
            msgs: vec![],
            tip: None,
        };
        assert_eq!(doc.first_signer(), None);
    }
}
