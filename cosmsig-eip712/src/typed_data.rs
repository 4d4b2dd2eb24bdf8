//! EIP-712 typed data and its hash.
//!
//! [`TypedData`] mirrors the JSON object wallets receive through
//! `eth_signTypedData_v4`: a domain, a type schema, a primary type name and
//! the message itself. [`TypedData::eip712_bytes`] produces the 66-byte
//! `0x19 0x01 ‖ domainSeparator ‖ hashStruct(message)` preimage whose
//! keccak-256 digest is what the wallet signs.

use alloy_primitives::{B256, U256, keccak256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use crate::error::Eip712Error;

/// Name of the domain type in the schema.
pub const DOMAIN_TYPE: &str = "EIP712Domain";

/// Type schema: type name to ordered field list.
pub type Types = BTreeMap<String, Vec<TypedField>>;

/// One field of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedField {
    /// Field name as it appears in the message.
    pub name: String,
    /// EIP-712 type, e.g. `string`, `Coin[]` or `TypeMsgSend0`.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypedField {
    /// Creates a field declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// The EIP-712 signing domain. Only populated fields take part in hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    /// Human-readable signing domain name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Domain version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Serialized as a `0x`-prefixed hex string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U256>,
    /// Declared as `string`, not `address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<String>,
    /// Declared as `string`, not `bytes32`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl TypedDataDomain {
    /// Returns `true` if no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// The `EIP712Domain` declaration matching the populated fields.
    #[must_use]
    pub fn type_fields(&self) -> Vec<TypedField> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push(TypedField::new("name", "string"));
        }
        if self.version.is_some() {
            fields.push(TypedField::new("version", "string"));
        }
        if self.chain_id.is_some() {
            fields.push(TypedField::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            fields.push(TypedField::new("verifyingContract", "string"));
        }
        if self.salt.is_some() {
            fields.push(TypedField::new("salt", "string"));
        }
        fields
    }

    /// The domain separator: `hashStruct(EIP712Domain)`.
    #[must_use]
    pub fn separator(&self) -> B256 {
        let fields = self.type_fields();
        let encode_type = format!(
            "{DOMAIN_TYPE}({})",
            fields
                .iter()
                .map(|f| format!("{} {}", f.type_name, f.name))
                .collect::<Vec<_>>()
                .join(",")
        );

        let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
        encoded.extend_from_slice(keccak256(encode_type.as_bytes()).as_slice());
        let strings = [&self.name, &self.version];
        for value in strings.into_iter().flatten() {
            encoded.extend_from_slice(keccak256(value.as_bytes()).as_slice());
        }
        if let Some(chain_id) = self.chain_id {
            encoded.extend_from_slice(&chain_id.to_be_bytes::<32>());
        }
        let strings = [&self.verifying_contract, &self.salt];
        for value in strings.into_iter().flatten() {
            encoded.extend_from_slice(keccak256(value.as_bytes()).as_slice());
        }
        keccak256(encoded)
    }
}

/// An EIP-712 typed-data object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    /// Struct declarations, including `EIP712Domain`.
    pub types: Types,
    /// Name of the message's struct type.
    pub primary_type: String,
    /// The signing domain.
    pub domain: TypedDataDomain,
    /// The message being signed.
    pub message: Map<String, Value>,
}

impl TypedData {
    /// Validity gate applied before a projection is accepted.
    ///
    /// The message, the schema and the primary type must be non-empty and the
    /// domain must have at least one populated field.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.message.is_empty()
            && !self.types.is_empty()
            && !self.primary_type.is_empty()
            && !self.domain.is_empty()
    }

    /// Rejects message fields the schema does not declare.
    ///
    /// The hashing routine silently ignores extra fields, so signing data
    /// with extra fields would commit to less than the wallet displayed.
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::UndeclaredField`] naming the first extra field,
    /// or [`Eip712Error::InvalidTypedData`] if the primary type is undeclared.
    pub fn ensure_no_undeclared_fields(&self) -> Result<(), Eip712Error> {
        if !self.types.contains_key(&self.primary_type) {
            return Err(Eip712Error::InvalidTypedData("primary type is not declared"));
        }
        check_struct(&self.types, &self.primary_type, &self.message, "")
    }

    /// `hashStruct(message)` for the primary type.
    ///
    /// # Errors
    ///
    /// Returns an error if the message does not match the schema.
    pub fn hash_struct(&self) -> Result<B256, Eip712Error> {
        self.ensure_no_undeclared_fields()?;

        let mut types = self.types.clone();
        types.remove(DOMAIN_TYPE);
        let typed: alloy_dyn_abi::TypedData = serde_json::from_value(json!({
            "types": types,
            "primaryType": self.primary_type,
            "domain": {},
            "message": self.message,
        }))?;
        Ok(typed.hash_struct()?)
    }

    /// The signing preimage `0x19 0x01 ‖ domainSeparator ‖ hashStruct(message)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared domain type disagrees with the domain
    /// or if the message does not match the schema.
    pub fn eip712_bytes(&self) -> Result<Vec<u8>, Eip712Error> {
        if let Some(declared) = self.types.get(DOMAIN_TYPE) {
            if *declared != self.domain.type_fields() {
                return Err(Eip712Error::InvalidTypedData(
                    "EIP712Domain declaration does not match the domain",
                ));
            }
        }

        let struct_hash = self.hash_struct()?;
        let mut bytes = Vec::with_capacity(66);
        bytes.extend_from_slice(&[0x19, 0x01]);
        bytes.extend_from_slice(self.domain.separator().as_slice());
        bytes.extend_from_slice(struct_hash.as_slice());
        Ok(bytes)
    }

    /// keccak-256 of [`eip712_bytes`](Self::eip712_bytes).
    ///
    /// # Errors
    ///
    /// See [`eip712_bytes`](Self::eip712_bytes).
    pub fn signing_hash(&self) -> Result<B256, Eip712Error> {
        Ok(keccak256(self.eip712_bytes()?))
    }
}

fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_owned()
    } else {
        format!("{parent}.{field}")
    }
}

fn check_struct(
    types: &Types,
    type_name: &str,
    object: &Map<String, Value>,
    path: &str,
) -> Result<(), Eip712Error> {
    let fields = types.get(type_name).map_or(&[][..], Vec::as_slice);
    for (key, value) in object {
        let field_path = join_path(path, key);
        let Some(field) = fields.iter().find(|f| f.name == *key) else {
            return Err(Eip712Error::UndeclaredField { path: field_path });
        };
        check_value(types, &field.type_name, value, &field_path)?;
    }
    Ok(())
}

fn check_value(types: &Types, type_name: &str, value: &Value, path: &str) -> Result<(), Eip712Error> {
    if let Some(element) = type_name.strip_suffix("[]") {
        if let Value::Array(items) = value {
            for (i, item) in items.iter().enumerate() {
                check_value(types, element, item, &format!("{path}[{i}]"))?;
            }
        }
        return Ok(());
    }
    match value {
        Value::Object(object) if types.contains_key(type_name) => {
            check_struct(types, type_name, object, path)
        }
        _ => Ok(()),
    }
}
