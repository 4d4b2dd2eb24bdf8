#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Canonical sign-doc model and codecs for Cosmos-SDK transactions.
//!
//! A transaction signer on a Cosmos-SDK chain signs one of two documents: the
//! legacy Amino-JSON `StdSignDoc` or the protobuf `SignDoc` used by
//! `SIGN_MODE_DIRECT`. This crate decodes both into a single
//! [`CanonicalSignDoc`](tx::CanonicalSignDoc) and reproduces the canonical,
//! sorted-key Amino signing bytes from it. It is the foundation for the
//! EIP-712 projection in `cosmsig-eip712`.
//!
//! # Modules
//!
//! - [`amino`] - Legacy Amino-JSON codec and canonical signing bytes
//! - [`chain_id`] - `<name>_<eip155>-<epoch>` chain identifier parsing
//! - [`coin`] - Denomination/amount pairs shared by both wire formats
//! - [`config`] - Explicit codec configuration handed to decoders
//! - [`error`] - Codec error type
//! - [`msg`] - The message capability trait
//! - [`msgs`] - Built-in bank and staking messages
//! - [`proto`] - Protobuf `cosmos.tx.v1beta1` sign-doc schema
//! - [`registry`] - Amino-name and type-URL message resolution
//! - [`tx`] - Canonical sign-doc model
//! - [`validate`] - Single-signer payload validation
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod amino;
pub mod chain_id;
pub mod coin;
pub mod config;
pub mod error;
pub mod msg;
pub mod msgs;
pub mod proto;
pub mod registry;
pub mod tx;
pub mod validate;

pub use chain_id::{ChainDomainId, InvalidChainId, parse_chain_id};
pub use config::EncodingConfig;
pub use error::CodecError;
pub use msg::{Msg, RegisteredMsg};
pub use registry::CodecRegistry;
pub use tx::{CanonicalFee, CanonicalMessage, CanonicalSignDoc, CanonicalTip};
pub use validate::{ValidationError, ValidationMode, validate_payload_messages};
