//! `cosmsig`: inspect Cosmos-SDK sign documents and verify eth_secp256k1
//! signatures.
//!
//! # Usage
//!
//! ```bash
//! # EIP-155 chain id of a Cosmos chain identifier
//! cosmsig chain-id evmos_9001-2
//!
//! # Typed data of an Amino-JSON document stored in a file
//! cosmsig --encoding raw typed-data @sign_doc.json
//!
//! # Verify a signature over a hex protobuf SignDoc
//! cosmsig verify --pubkey 02... --signature 0x... 0a9c01...
//!
//! # Show why EIP-712 encodings were rejected
//! RUST_LOG=debug cosmsig --encoding base64 verify --pubkey 02... --signature 0x... CpwB...
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cosmsig_cli::{Cli, run};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(cli, &mut stdout) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
