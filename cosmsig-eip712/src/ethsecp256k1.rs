//! `eth_secp256k1` public keys and signature verification.
//!
//! Keys are compressed secp256k1 points whose account address is derived the
//! Ethereum way. A signature is accepted if it covers the raw message, the
//! current EIP-712 projection of the message, or the legacy EIP-712
//! projection, in that order.

use alloy_primitives::{Address, hex, keccak256};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};
use std::fmt;
use std::str::FromStr;

use crate::decoder::SignDocDecoder;
use crate::projector::{PROJECTORS, Projector};

/// Key type name.
pub const KEY_TYPE: &str = "eth_secp256k1";

/// Length of a compressed public key.
pub const PUB_KEY_SIZE: usize = 33;

/// Length of an `[R ‖ S]` signature.
pub const SIGNATURE_SIZE: usize = 64;

/// Length of an `[R ‖ S ‖ V]` signature.
pub const RECOVERABLE_SIGNATURE_SIZE: usize = 65;

/// Why bytes could not be read as an `eth_secp256k1` public key.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PubKeyError {
    /// The key does not have the compressed length.
    #[error("invalid pubkey size, expected {PUB_KEY_SIZE}, got {0}")]
    InvalidSize(usize),
    /// The bytes are not a point on the curve.
    #[error("invalid secp256k1 public key")]
    InvalidPoint,
    /// The textual key is not hex.
    #[error("invalid hex public key: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// A compressed secp256k1 public key with Ethereum address derivation.
#[derive(Clone)]
pub struct PubKey {
    key: [u8; PUB_KEY_SIZE],
    verifying_key: VerifyingKey,
}

impl PubKey {
    /// Reads a 33-byte compressed key.
    ///
    /// # Errors
    ///
    /// Returns [`PubKeyError::InvalidSize`] for any other length and
    /// [`PubKeyError::InvalidPoint`] if the bytes are not a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PubKeyError> {
        let key: [u8; PUB_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| PubKeyError::InvalidSize(bytes.len()))?;
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&key).map_err(|_| PubKeyError::InvalidPoint)?;
        Ok(Self { key, verifying_key })
    }

    /// Account address: the last 20 bytes of the keccak-256 hash of the
    /// uncompressed point.
    #[must_use]
    pub fn address(&self) -> Address {
        Address::from_public_key(&self.verifying_key)
    }

    /// The compressed key bytes.
    #[must_use]
    pub const fn bytes(&self) -> &[u8; PUB_KEY_SIZE] {
        &self.key
    }

    /// Always [`KEY_TYPE`].
    #[must_use]
    pub const fn key_type(&self) -> &'static str {
        KEY_TYPE
    }

    /// Checks an ECDSA signature over `keccak256(msg)`.
    ///
    /// `sig` must be `[R ‖ S]`; a trailing recovery byte is dropped. Signatures
    /// with a high `S` value are rejected.
    #[must_use]
    pub fn verify_signature_ecdsa(&self, msg: &[u8], sig: &[u8]) -> bool {
        let sig = match sig.len() {
            RECOVERABLE_SIGNATURE_SIZE => &sig[..SIGNATURE_SIZE],
            SIGNATURE_SIZE => sig,
            _ => return false,
        };
        let Ok(signature) = Signature::from_slice(sig) else {
            return false;
        };
        if signature.normalize_s().is_some() {
            return false;
        }
        self.verifying_key
            .verify_prehash(keccak256(msg).as_slice(), &signature)
            .is_ok()
    }
}

impl PartialEq for PubKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PubKey {}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthPubKeySecp256k1{{{}}}", hex::encode_upper(self.key))
    }
}

impl FromStr for PubKey {
    type Err = PubKeyError;

    /// Parses a hex key, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&hex::decode(s)?)
    }
}

/// Verifies `eth_secp256k1` signatures over raw or EIP-712 encoded sign
/// documents.
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier {
    decoder: SignDocDecoder,
}

impl SignatureVerifier {
    /// Creates a verifier that projects sign documents with `decoder`.
    #[must_use]
    pub const fn new(decoder: SignDocDecoder) -> Self {
        Self { decoder }
    }

    /// The decoder used for the EIP-712 attempts.
    #[must_use]
    pub const fn decoder(&self) -> &SignDocDecoder {
        &self.decoder
    }

    /// Returns `true` if `sig` signs `msg` directly or one of its EIP-712
    /// projections.
    ///
    /// Decoding and projection failures count as a failed attempt; they never
    /// surface to the caller.
    #[must_use]
    pub fn verify(&self, pubkey: &PubKey, msg: &[u8], sig: &[u8]) -> bool {
        pubkey.verify_signature_ecdsa(msg, sig)
            || PROJECTORS
                .iter()
                .any(|projector| self.verify_eip712(*projector, pubkey, msg, sig))
    }

    fn verify_eip712(
        &self,
        projector: &dyn Projector,
        pubkey: &PubKey,
        msg: &[u8],
        sig: &[u8],
    ) -> bool {
        match self
            .decoder
            .typed_data_with(projector, msg)
            .and_then(|typed| typed.eip712_bytes())
        {
            Ok(eip712_bytes) => pubkey.verify_signature_ecdsa(&eip712_bytes, sig),
            Err(err) => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(projector = projector.name(), error = %err, "EIP-712 encoding rejected");
                #[cfg(not(feature = "telemetry"))]
                let _ = err;
                false
            }
        }
    }
}
