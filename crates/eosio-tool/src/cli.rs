use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// eosio - signature, key and base58 utilities
#[derive(Parser)]
#[command(name = "eosio")]
#[command(about = "Inspect, verify and recover EOSIO signatures")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "eosio.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "eosio.json")]
        output: PathBuf,
    },

    /// Base58-encode hex data
    Encode {
        /// Data as hex
        data: String,

        /// Append a checksum using the given curve tag as context
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        check: Option<String>,
    },

    /// Decode base58 text to hex
    Decode {
        /// Base58 text
        text: String,

        /// Verify and strip a checksum using the given curve tag as context
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        check: Option<String>,

        /// Maximum decoded size in bytes (defaults to the text length)
        #[arg(long)]
        size: Option<usize>,
    },

    /// Show the fields of a signature as JSON
    Inspect {
        /// Signature string (SIG_...) or hex of its ABI bytes
        signature: String,
    },

    /// Recover the public key that produced a signature
    Recover {
        /// Signature string (SIG_...)
        signature: String,

        #[command(flatten)]
        digest: DigestArgs,
    },

    /// Verify a signature against a public key
    Verify {
        /// Signature string (SIG_...)
        signature: String,

        /// Public key (PUB_... or legacy EOS...)
        public_key: String,

        #[command(flatten)]
        digest: DigestArgs,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct DigestArgs {
    /// SHA-256 digest as hex
    #[arg(long)]
    pub digest: Option<String>,

    /// Message text, hashed with SHA-256
    #[arg(long)]
    pub message: Option<String>,
}
