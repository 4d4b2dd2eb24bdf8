//! Protobuf sign-document schema (`cosmos.tx.v1beta1`).
//!
//! Only the fields the signing path reads are declared; unknown fields are
//! skipped by the decoder. Messages travel as [`prost_types::Any`] and are
//! resolved through the [`CodecRegistry`](crate::registry::CodecRegistry).

use prost_types::Any;

use crate::coin::Coin;

/// The document signed in `SIGN_MODE_DIRECT`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignDoc {
    /// Encoded [`TxBody`].
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: Vec<u8>,
    /// Encoded [`AuthInfo`].
    #[prost(bytes = "vec", tag = "2")]
    pub auth_info_bytes: Vec<u8>,
    /// Textual chain identifier.
    #[prost(string, tag = "3")]
    pub chain_id: String,
    /// Signer account number.
    #[prost(uint64, tag = "4")]
    pub account_number: u64,
}

/// Transaction body.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxBody {
    /// Packed messages.
    #[prost(message, repeated, tag = "1")]
    pub messages: Vec<Any>,
    /// Free-form memo.
    #[prost(string, tag = "2")]
    pub memo: String,
    /// Timeout block height; must be 0 for EIP-712 signing.
    #[prost(uint64, tag = "3")]
    pub timeout_height: u64,
    /// Critical extensions; must be empty for EIP-712 signing.
    #[prost(message, repeated, tag = "1023")]
    pub extension_options: Vec<Any>,
    /// Non-critical extensions; must be empty for EIP-712 signing.
    #[prost(message, repeated, tag = "2047")]
    pub non_critical_extension_options: Vec<Any>,
}

/// Signer and fee information.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthInfo {
    /// One entry per signer.
    #[prost(message, repeated, tag = "1")]
    pub signer_infos: Vec<SignerInfo>,
    /// Transaction fee.
    #[prost(message, optional, tag = "2")]
    pub fee: Option<Fee>,
    /// Optional tip.
    #[prost(message, optional, tag = "3")]
    pub tip: Option<Tip>,
}

/// Per-signer information. The sign mode (tag 2) is not read.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignerInfo {
    /// Packed public key, absent for accounts whose key is already on chain.
    #[prost(message, optional, tag = "1")]
    pub public_key: Option<Any>,
    /// Signer sequence.
    #[prost(uint64, tag = "3")]
    pub sequence: u64,
}

/// Transaction fee.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Fee {
    /// Fee coins.
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    /// Gas limit.
    #[prost(uint64, tag = "2")]
    pub gas_limit: u64,
    /// Fee payer, empty when it is the first signer.
    #[prost(string, tag = "3")]
    pub payer: String,
    /// Fee granter.
    #[prost(string, tag = "4")]
    pub granter: String,
}

/// Transaction tip.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Tip {
    /// Tip coins.
    #[prost(message, repeated, tag = "1")]
    pub amount: Vec<Coin>,
    /// Account paying the tip.
    #[prost(string, tag = "2")]
    pub tipper: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_sign_doc_field_tags() {
        let doc = SignDoc {
            body_bytes: vec![1],
            auth_info_bytes: vec![2],
            chain_id: "a".into(),
            account_number: 5,
        };
        assert_eq!(
            doc.encode_to_vec(),
            vec![0x0a, 0x01, 0x01, 0x12, 0x01, 0x02, 0x1a, 0x01, b'a', 0x20, 0x05]
        );
    }

    #[test]
    fn test_tx_body_extension_options_round_trip() {
        let body = TxBody {
            extension_options: vec![Any {
                type_url: "/x.Ext".into(),
                value: vec![],
            }],
            ..TxBody::default()
        };
        let decoded = TxBody::decode(body.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.extension_options.len(), 1);
        assert!(decoded.non_critical_extension_options.is_empty());
    }

    #[test]
    fn test_signer_info_skips_mode_info() {
        // public_key absent, mode_info {single: {mode: 1}}, sequence 7
        let bytes = [0x12, 0x04, 0x0a, 0x02, 0x08, 0x01, 0x18, 0x07];
        let info = SignerInfo::decode(bytes.as_slice()).unwrap();
        assert_eq!(info.sequence, 7);
        assert!(info.public_key.is_none());
    }
}
