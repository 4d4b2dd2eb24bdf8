//! Legacy Amino-JSON sign documents.
//!
//! The legacy signing mode signs a compact JSON document whose object keys
//! are sorted byte-wise at every level and whose strings use the HTML-safe
//! escaping of Go's `encoding/json`. [`std_sign_bytes`] produces exactly those
//! bytes from a [`CanonicalSignDoc`] and [`parse_std_sign_doc`] reads them back.
//!
//! # Wire Format
//!
//! ```json
//! {"account_number":"1","chain_id":"evmos_9000-1","fee":{"amount":[],"gas":"200000"},
//!  "memo":"","msgs":[{"type":"cosmos-sdk/MsgSend","value":{...}}],"sequence":"0"}
//! ```
//!
//! Integers are strings, `timeout_height` is omitted when zero and `tip` is
//! omitted when absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use serde_with::{DefaultOnNull, serde_as};
use std::io;
use std::str::FromStr;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::coin::Coin;
use crate::error::CodecError;
use crate::registry::CodecRegistry;
use crate::tx::{CanonicalFee, CanonicalMessage, CanonicalSignDoc, CanonicalTip};

/// A `u64` value that serializes as a string.
///
/// Amino-JSON encodes every 64-bit integer as a decimal string so that
/// JavaScript clients keep full precision.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct U64String(u64);

impl U64String {
    /// Returns the inner `u64` value.
    #[must_use]
    pub const fn inner(&self) -> u64 {
        self.0
    }
}

impl FromStr for U64String {
    type Err = <u64 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl From<u64> for U64String {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<U64String> for u64 {
    fn from(value: U64String) -> Self {
        value.0
    }
}

impl Serialize for U64String {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U64String {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u64>().map(Self).map_err(serde::de::Error::custom)
    }
}

/// Compact JSON formatter that escapes like Go's `encoding/json`.
///
/// `<`, `>`, `&`, U+2028 and U+2029 are written as `\u` escapes.
#[derive(Debug, Default, Clone, Copy)]
struct GoCompatFormatter;

impl serde_json::ser::Formatter for GoCompatFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if matches!(ch, '<' | '>' | '&' | '\u{2028}' | '\u{2029}') {
                writer.write_all(&fragment.as_bytes()[start..i])?;
                write!(writer, "\\u{:04x}", u32::from(ch))?;
                start = i + ch.len_utf8();
            }
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Rebuilds a JSON value with every object's keys in byte-wise order.
#[must_use]
pub fn sort_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_value(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_value).collect()),
        other => other,
    }
}

/// Serializes a JSON value compactly with sorted keys and Go-compatible escaping.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_sorted_json_bytes(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let sorted = sort_value(value.clone());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, GoCompatFormatter);
    sorted.serialize(&mut serializer)?;
    Ok(out)
}

/// Parses arbitrary JSON and re-emits it in sorted canonical form.
///
/// # Errors
///
/// Returns an error if `bytes` is not valid JSON.
pub fn sort_json(bytes: &[u8]) -> Result<Vec<u8>, serde_json::Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    to_sorted_json_bytes(&value)
}

/// Raw shape of an Amino-JSON sign document.
///
/// `fee` and `msgs` stay unparsed so that each can be decoded (and fail)
/// on its own.
#[derive(Debug, Deserialize)]
pub struct StdSignDoc {
    /// Signer account number.
    pub account_number: U64String,
    /// Signer sequence.
    pub sequence: U64String,
    /// Block height after which the transaction is invalid; 0 when unset.
    #[serde(default)]
    pub timeout_height: U64String,
    /// Textual chain identifier.
    pub chain_id: String,
    /// Free-form memo.
    #[serde(default)]
    pub memo: String,
    /// Encoded [`StdFee`].
    pub fee: Box<RawValue>,
    /// Encoded `{type, value}` messages.
    pub msgs: Vec<Box<RawValue>>,
    /// Encoded [`StdTip`], if any.
    #[serde(default)]
    pub tip: Option<Box<RawValue>>,
}

/// Amino-JSON fee.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// Fee coins; `null` decodes as empty and empty encodes as `[]`.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub amount: Vec<Coin>,
    /// Gas limit.
    pub gas: U64String,
    /// Fee payer, omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub payer: String,
    /// Fee granter, omitted when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub granter: String,
}

impl From<&CanonicalFee> for StdFee {
    fn from(fee: &CanonicalFee) -> Self {
        Self {
            amount: fee.amount.clone(),
            gas: fee.gas.into(),
            payer: fee.payer.clone().unwrap_or_default(),
            granter: fee.granter.clone().unwrap_or_default(),
        }
    }
}

impl From<StdFee> for CanonicalFee {
    fn from(fee: StdFee) -> Self {
        Self {
            amount: fee.amount,
            gas: fee.gas.inner(),
            payer: Some(fee.payer).filter(|p| !p.is_empty()),
            granter: Some(fee.granter).filter(|g| !g.is_empty()),
        }
    }
}

/// Amino-JSON tip.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTip {
    /// Tip coins.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub amount: Vec<Coin>,
    /// Account paying the tip.
    #[serde(default)]
    pub tipper: String,
}

/// Produces the canonical Amino-JSON signing bytes of a sign document.
///
/// # Errors
///
/// Returns [`CodecError::EmptyTipper`] if a tip names no tipper, or a codec
/// error if a message cannot be encoded.
pub fn std_sign_bytes(sign_doc: &CanonicalSignDoc) -> Result<Vec<u8>, CodecError> {
    let msgs = sign_doc
        .msgs
        .iter()
        .map(|msg| msg.payload().legacy_json())
        .collect::<Result<Vec<_>, _>>()?;

    let mut doc = Map::new();
    doc.insert(
        "account_number".into(),
        serde_json::to_value(U64String::from(sign_doc.account_number))?,
    );
    doc.insert("chain_id".into(), Value::String(sign_doc.chain_id.clone()));
    doc.insert(
        "fee".into(),
        serde_json::to_value(StdFee::from(&sign_doc.fee))?,
    );
    doc.insert("memo".into(), Value::String(sign_doc.memo.clone()));
    doc.insert("msgs".into(), Value::Array(msgs));
    doc.insert(
        "sequence".into(),
        serde_json::to_value(U64String::from(sign_doc.sequence))?,
    );
    if sign_doc.timeout_height != 0 {
        doc.insert(
            "timeout_height".into(),
            serde_json::to_value(U64String::from(sign_doc.timeout_height))?,
        );
    }
    if let Some(tip) = &sign_doc.tip {
        if tip.tipper.is_empty() {
            return Err(CodecError::EmptyTipper);
        }
        let tip = StdTip {
            amount: tip.amount.clone(),
            tipper: tip.tipper.clone(),
        };
        doc.insert("tip".into(), serde_json::to_value(tip)?);
    }

    Ok(to_sorted_json_bytes(&Value::Object(doc))?)
}

/// Decodes Amino-JSON signing bytes into a canonical sign document.
///
/// Messages are resolved through `registry` by their Amino name.
///
/// # Errors
///
/// Returns a codec error if the document, its fee, its tip or any message
/// fails to decode. Element failures are located with [`CodecError::AtPath`]
/// (`fee`, `tip`, `msgs[i]`).
#[cfg_attr(feature = "telemetry", instrument(skip_all, err))]
pub fn parse_std_sign_doc(
    bytes: &[u8],
    registry: &CodecRegistry,
) -> Result<CanonicalSignDoc, CodecError> {
    let doc: StdSignDoc = serde_json::from_slice(bytes)?;

    let fee: StdFee =
        serde_json::from_str(doc.fee.get()).map_err(|e| CodecError::from(e).at("fee"))?;

    let msgs = doc
        .msgs
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            registry
                .decode_amino(raw)
                .and_then(CanonicalMessage::new)
                .map_err(|e| e.at(format!("msgs[{i}]")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let tip = doc
        .tip
        .map(|raw| serde_json::from_str::<StdTip>(raw.get()))
        .transpose()
        .map_err(|e| CodecError::from(e).at("tip"))?
        .map(|tip| CanonicalTip {
            amount: tip.amount,
            tipper: tip.tipper,
        });

    Ok(CanonicalSignDoc {
        account_number: doc.account_number.inner(),
        sequence: doc.sequence.inner(),
        timeout_height: doc.timeout_height.inner(),
        chain_id: doc.chain_id,
        memo: doc.memo,
        fee: fee.into(),
        msgs,
        tip,
    })
}
