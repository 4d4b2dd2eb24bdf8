//! Command execution.

use alloy_primitives::hex;
use cosmsig::{EncodingConfig, parse_chain_id};
use cosmsig_eip712::{PubKey, SignDocDecoder, SignatureVerifier};
use std::io::Write;

use crate::config::{Cli, Command};
use crate::error::CliError;
use crate::input::read_input;

/// Runs one command, writing its result to `out`.
///
/// # Errors
///
/// Returns a [`CliError`] if an input is malformed, the document cannot be
/// decoded, or a signature does not verify.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let decoder = SignDocDecoder::new(EncodingConfig::standard());

    match cli.command {
        Command::ChainId { chain_id } => {
            let id = parse_chain_id(&chain_id)?;
            writeln!(out, "{id}")?;
        }
        Command::TypedData {
            legacy,
            preimage,
            doc,
        } => {
            let doc = read_input(&doc, cli.encoding)?;
            let typed = if legacy {
                decoder.legacy_typed_data(&doc)?
            } else {
                decoder.typed_data(&doc)?
            };
            tracing::debug!(legacy, primary_type = %typed.primary_type, "projected sign document");

            if preimage {
                writeln!(out, "0x{}", hex::encode(typed.eip712_bytes()?))?;
            } else {
                serde_json::to_writer_pretty(&mut *out, &typed)?;
                writeln!(out)?;
            }
        }
        Command::SignBytes { doc } => {
            let doc = read_input(&doc, cli.encoding)?;
            out.write_all(&decoder.canonical_sign_bytes(&doc)?)?;
            writeln!(out)?;
        }
        Command::Verify {
            pubkey,
            signature,
            doc,
        } => {
            let pubkey: PubKey = pubkey.trim().parse()?;
            let signature = hex::decode(signature.trim())?;
            let doc = read_input(&doc, cli.encoding)?;

            let verifier = SignatureVerifier::new(decoder);
            let address = pubkey.address();
            if !verifier.verify(&pubkey, &doc, &signature) {
                return Err(CliError::InvalidSignature { address });
            }
            writeln!(out, "valid signature from {address}")?;
        }
    }

    Ok(())
}
