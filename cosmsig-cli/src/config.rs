//! Command-line configuration.
//!
//! Every option can also come from the environment; a `.env` file in the
//! working directory is loaded before parsing.
//!
//! # Environment Variables
//!
//! - `COSMSIG_ENCODING` - Encoding of sign-document inputs (default: `hex`)
//! - `RUST_LOG` - Log level filter (default: `warn`)

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(
    name = "cosmsig",
    version,
    about = "Inspect Cosmos-SDK sign documents and verify eth_secp256k1 signatures"
)]
pub struct Cli {
    /// Encoding of sign-document inputs.
    #[arg(
        long,
        short,
        value_enum,
        global = true,
        env = "COSMSIG_ENCODING",
        default_value_t = Encoding::Hex
    )]
    pub encoding: Encoding,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// How a sign-document argument is turned into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    /// Hex, with or without a `0x` prefix.
    Hex,
    /// Standard base64 with padding.
    Base64,
    /// The text itself, e.g. an Amino-JSON document.
    Raw,
}

/// Subcommands.
///
/// Sign-document arguments are literal strings or `@path` to read a file.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a chain identifier and print its EIP-155 chain id.
    ChainId {
        /// Identifier such as `evmos_9001-2`.
        chain_id: String,
    },
    /// Print the EIP-712 typed data of a sign document.
    TypedData {
        /// Use the legacy projection.
        #[arg(long)]
        legacy: bool,
        /// Print the hex EIP-712 signing preimage instead of the JSON.
        #[arg(long)]
        preimage: bool,
        /// Amino-JSON or protobuf sign document.
        doc: String,
    },
    /// Print the canonical Amino-JSON signing bytes of a sign document.
    SignBytes {
        /// Amino-JSON or protobuf sign document.
        doc: String,
    },
    /// Verify a signature over a sign document.
    Verify {
        /// Compressed secp256k1 public key, hex.
        #[arg(long)]
        pubkey: String,
        /// `[R || S]` or `[R || S || V]` signature, hex.
        #[arg(long)]
        signature: String,
        /// Amino-JSON or protobuf sign document.
        doc: String,
    },
}
