#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! EIP-712 signing for Cosmos-SDK sign documents.
//!
//! Ethereum wallets cannot sign Cosmos transactions directly, but they can
//! sign EIP-712 typed data. This crate projects a sign document, in either
//! Amino-JSON or protobuf form, into typed data, hashes it, and verifies
//! `eth_secp256k1` signatures over the raw bytes or either projection.
//!
//! ```no_run
//! use cosmsig::EncodingConfig;
//! use cosmsig_eip712::{PubKey, SignDocDecoder, SignatureVerifier};
//!
//! # fn run(doc: &[u8], pubkey: &PubKey, sig: &[u8]) -> Result<(), cosmsig_eip712::Eip712Error> {
//! let decoder = SignDocDecoder::new(EncodingConfig::standard());
//! let _preimage = decoder.eip712_bytes(doc)?;
//! let verifier = SignatureVerifier::new(decoder);
//! assert!(verifier.verify(pubkey, doc, sig));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`decoder`] - Dual-format sign-document decoding
//! - [`error`] - Error type for decoding, projection and hashing
//! - [`ethsecp256k1`] - Public keys and the signature verifier
//! - [`projector`] - Current and legacy typed-data projections
//! - [`schema`] - Type inference from JSON messages
//! - [`typed_data`] - Typed data and its EIP-712 hash
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod decoder;
pub mod error;
pub mod ethsecp256k1;
pub mod projector;
pub mod schema;
pub mod typed_data;

pub use decoder::SignDocDecoder;
pub use error::Eip712Error;
pub use ethsecp256k1::{KEY_TYPE, PubKey, PubKeyError, SignatureVerifier};
pub use projector::{
    CurrentProjector, FeeDelegationOptions, LegacyProjector, PROJECTORS, ProjectionError,
    ProjectionInput, Projector,
};
pub use typed_data::{TypedData, TypedDataDomain, TypedField, Types};
