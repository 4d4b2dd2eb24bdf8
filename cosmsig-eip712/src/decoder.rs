//! Dual-format sign-document decoding.
//!
//! A wallet may hand over either Amino-JSON or protobuf `SignDoc` bytes and
//! the bytes do not say which. [`SignDocDecoder`] tries the Amino path first,
//! then the protobuf path, and keeps the first one that yields valid typed
//! data.

use cosmsig::amino::{parse_std_sign_doc, std_sign_bytes};
use cosmsig::proto::{AuthInfo, SignDoc, TxBody};
use cosmsig::{
    CanonicalFee, CanonicalMessage, CanonicalSignDoc, CanonicalTip, ChainDomainId, CodecError,
    CodecRegistry, EncodingConfig, ValidationError, parse_chain_id, validate_payload_messages,
};
use prost::Message;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::error::Eip712Error;
use crate::projector::{
    CurrentProjector, FeeDelegationOptions, LegacyProjector, ProjectionInput, Projector,
};
use crate::typed_data::TypedData;

/// Decodes sign documents in either wire format and projects them into
/// EIP-712 typed data.
#[derive(Debug, Clone, Default)]
pub struct SignDocDecoder {
    config: Option<EncodingConfig>,
}

impl SignDocDecoder {
    /// Creates a decoder over the given codec configuration.
    #[must_use]
    pub const fn new(config: EncodingConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    /// A decoder without codecs. Every operation fails with
    /// [`Eip712Error::CodecNotInitialized`].
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self { config: None }
    }

    fn registry(&self) -> Result<&CodecRegistry, Eip712Error> {
        self.config
            .as_ref()
            .map(EncodingConfig::registry)
            .ok_or(Eip712Error::CodecNotInitialized)
    }

    /// Decodes Amino-JSON signing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::DecodeFailure`] naming the part that failed.
    pub fn decode_amino(&self, bytes: &[u8]) -> Result<CanonicalSignDoc, Eip712Error> {
        let registry = self.registry()?;
        parse_std_sign_doc(bytes, registry).map_err(|e| Eip712Error::decode_failure("sign_doc", e))
    }

    /// Decodes protobuf `SignDoc` bytes.
    ///
    /// The sequence of the returned document is taken from the lone signer
    /// info. The fee payer and granter are not carried over.
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::DecodeFailure`] for malformed bytes,
    /// [`Eip712Error::UnsupportedField`] if the body sets a timeout height or
    /// extension options, and [`Eip712Error::InvalidSignerCount`] unless
    /// exactly one signer info is present.
    pub fn decode_protobuf(&self, bytes: &[u8]) -> Result<CanonicalSignDoc, Eip712Error> {
        let registry = self.registry()?;

        let sign_doc = SignDoc::decode(bytes)
            .map_err(|e| Eip712Error::decode_failure("sign_doc", e.into()))?;
        let auth_info = AuthInfo::decode(sign_doc.auth_info_bytes.as_slice())
            .map_err(|e| Eip712Error::decode_failure("auth_info", e.into()))?;
        let body = TxBody::decode(sign_doc.body_bytes.as_slice())
            .map_err(|e| Eip712Error::decode_failure("body", e.into()))?;

        if body.timeout_height != 0 {
            return Err(Eip712Error::UnsupportedField {
                name: "timeout_height",
            });
        }
        if !body.extension_options.is_empty() {
            return Err(Eip712Error::UnsupportedField {
                name: "extension_options",
            });
        }
        if !body.non_critical_extension_options.is_empty() {
            return Err(Eip712Error::UnsupportedField {
                name: "non_critical_extension_options",
            });
        }

        let [signer_info] = auth_info.signer_infos.as_slice() else {
            return Err(Eip712Error::InvalidSignerCount {
                got: auth_info.signer_infos.len(),
            });
        };
        let sequence = signer_info.sequence;

        let msgs = body
            .messages
            .iter()
            .enumerate()
            .map(|(i, any)| {
                registry
                    .unpack_any(any)
                    .and_then(CanonicalMessage::new)
                    .map_err(|e| Eip712Error::decode_failure(&format!("msgs[{i}]"), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let fee = auth_info.fee.ok_or_else(|| {
            Eip712Error::decode_failure("auth_info.fee", CodecError::MissingField("fee"))
        })?;

        Ok(CanonicalSignDoc {
            account_number: sign_doc.account_number,
            sequence,
            timeout_height: body.timeout_height,
            chain_id: sign_doc.chain_id,
            memo: body.memo,
            fee: CanonicalFee {
                amount: fee.amount,
                gas: fee.gas_limit,
                payer: None,
                granter: None,
            },
            msgs,
            tip: auth_info.tip.map(|tip| CanonicalTip {
                amount: tip.amount,
                tipper: tip.tipper,
            }),
        })
    }

    /// Projects Amino-JSON signing bytes with `projector`.
    ///
    /// The original bytes are projected as-is.
    ///
    /// # Errors
    ///
    /// Returns decode, validation and projection failures. A malformed chain
    /// id is reported as [`Eip712Error::InvalidChainIdArgument`].
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(projector = projector.name())))]
    pub fn amino_typed_data(
        &self,
        projector: &dyn Projector,
        bytes: &[u8],
    ) -> Result<TypedData, Eip712Error> {
        let doc = self.decode_amino(bytes)?;
        validate_payload_messages(&doc.msgs, projector.validation_mode())?;
        let chain_id =
            parse_chain_id(&doc.chain_id).map_err(|_| Eip712Error::InvalidChainIdArgument)?;
        project(projector, chain_id, bytes, &doc)
    }

    /// Projects protobuf `SignDoc` bytes with `projector`.
    ///
    /// The canonical Amino signing bytes are rebuilt from the decoded
    /// document before projection.
    ///
    /// # Errors
    ///
    /// Returns decode, validation and projection failures, or
    /// [`Eip712Error::InvalidChainId`] for a malformed chain id.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(projector = projector.name())))]
    pub fn protobuf_typed_data(
        &self,
        projector: &dyn Projector,
        bytes: &[u8],
    ) -> Result<TypedData, Eip712Error> {
        let doc = self.decode_protobuf(bytes)?;
        validate_payload_messages(&doc.msgs, projector.validation_mode())?;
        let chain_id = parse_chain_id(&doc.chain_id)?;
        let sign_bytes =
            std_sign_bytes(&doc).map_err(|e| Eip712Error::decode_failure("sign_doc", e))?;
        project(projector, chain_id, &sign_bytes, &doc)
    }

    /// Projects sign-document bytes of either format with `projector`.
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::CodecNotInitialized`] for an unconfigured
    /// decoder and [`Eip712Error::AmbiguousOrUnparsableSignDoc`] when neither
    /// format yields valid typed data.
    pub fn typed_data_with(
        &self,
        projector: &dyn Projector,
        bytes: &[u8],
    ) -> Result<TypedData, Eip712Error> {
        self.registry()?;
        first_valid(
            || self.amino_typed_data(projector, bytes),
            || self.protobuf_typed_data(projector, bytes),
        )
    }

    /// Typed data in the current shape.
    ///
    /// # Errors
    ///
    /// See [`typed_data_with`](Self::typed_data_with).
    pub fn typed_data(&self, bytes: &[u8]) -> Result<TypedData, Eip712Error> {
        self.typed_data_with(&CurrentProjector, bytes)
    }

    /// Typed data in the legacy shape.
    ///
    /// # Errors
    ///
    /// See [`typed_data_with`](Self::typed_data_with).
    pub fn legacy_typed_data(&self, bytes: &[u8]) -> Result<TypedData, Eip712Error> {
        self.typed_data_with(&LegacyProjector, bytes)
    }

    /// EIP-712 signing preimage in the current shape.
    ///
    /// # Errors
    ///
    /// Returns decoding, projection or hashing failures.
    pub fn eip712_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, Eip712Error> {
        self.typed_data(bytes)?.eip712_bytes()
    }

    /// EIP-712 signing preimage in the legacy shape.
    ///
    /// # Errors
    ///
    /// Returns decoding, projection or hashing failures.
    pub fn legacy_eip712_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, Eip712Error> {
        self.legacy_typed_data(bytes)?.eip712_bytes()
    }

    /// Canonical Amino signing bytes of a document in either format.
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::AmbiguousOrUnparsableSignDoc`] if neither
    /// format decodes.
    pub fn canonical_sign_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, Eip712Error> {
        self.registry()?;
        let doc = first_valid(|| self.decode_amino(bytes), || self.decode_protobuf(bytes))?;
        std_sign_bytes(&doc).map_err(|e| Eip712Error::decode_failure("sign_doc", e))
    }
}

fn project(
    projector: &dyn Projector,
    chain_id: ChainDomainId,
    sign_bytes: &[u8],
    doc: &CanonicalSignDoc,
) -> Result<TypedData, Eip712Error> {
    let primary = doc.msgs.first().ok_or(ValidationError::NoMessages)?;
    let input = ProjectionInput {
        chain_id,
        sign_bytes,
        primary_msg: primary.payload(),
        fee_delegation: doc
            .first_signer()
            .map(|fee_payer| FeeDelegationOptions { fee_payer }),
    };

    let typed = projector.project(&input)?;
    if !typed.is_valid() {
        return Err(Eip712Error::InvalidTypedData("typed data has empty fields"));
    }
    Ok(typed)
}

/// Runs the Amino attempt, then the protobuf attempt, returning the first
/// success or both failures.
fn first_valid<T>(
    amino: impl FnOnce() -> Result<T, Eip712Error>,
    protobuf: impl FnOnce() -> Result<T, Eip712Error>,
) -> Result<T, Eip712Error> {
    match amino() {
        Ok(value) => Ok(value),
        Err(amino) => protobuf().map_err(|protobuf| Eip712Error::AmbiguousOrUnparsableSignDoc {
            amino: Box::new(amino),
            protobuf: Box::new(protobuf),
        }),
    }
}
