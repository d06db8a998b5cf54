use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use eosio_core::encoding::{base58, base58check, Ripemd160Extra};
use eosio_core::{serialize, Checksum256, CurveTag, PublicKey, Signature};
use serde::Serialize;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;

use cli::{Cli, Commands, DigestArgs};
use config::{KeyFormat, ToolConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = if cli.config.exists() {
        Some(ToolConfig::load(&cli.config)?)
    } else {
        None
    };
    let config = loaded.clone().unwrap_or_default();

    // Initialize logging
    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();

    if loaded.is_none() && !matches!(cli.command, Commands::Init { .. }) {
        warn!(
            "Configuration file not found: {:?}, using defaults",
            cli.config
        );
    }

    match cli.command {
        Commands::Init { output } => init_config(&output)?,
        Commands::Encode { data, check } => encode(&config, &data, check)?,
        Commands::Decode { text, check, size } => decode(&config, &text, check, size)?,
        Commands::Inspect { signature } => inspect(&signature)?,
        Commands::Recover { signature, digest } => recover(&config, &signature, &digest)?,
        Commands::Verify {
            signature,
            public_key,
            digest,
        } => {
            if !verify(&signature, &public_key, &digest)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Initialize a new configuration file
fn init_config(output: &Path) -> Result<()> {
    let config = ToolConfig::default();
    config.save(output)?;
    info!("Configuration saved to {:?}", output);
    Ok(())
}

/// Resolve the `--check` argument to a curve tag
fn checksum_tag(config: &ToolConfig, check: &str) -> Result<CurveTag> {
    let tag = if check.is_empty() {
        config.checksum_tag.as_str()
    } else {
        check
    };
    Ok(CurveTag::parse(tag)?)
}

fn encode(config: &ToolConfig, data: &str, check: Option<String>) -> Result<()> {
    let bytes = hex::decode(data).context("data must be hex")?;
    let encoded = match check {
        Some(check) => {
            let tag = checksum_tag(config, &check)?;
            base58check::encode(&bytes, &Ripemd160Extra::new(tag.as_bytes()))
        }
        None => base58::encode(&bytes),
    };
    println!("{}", encoded);
    Ok(())
}

fn decode(
    config: &ToolConfig,
    text: &str,
    check: Option<String>,
    size: Option<usize>,
) -> Result<()> {
    let decoded = match check {
        Some(check) => {
            let tag = checksum_tag(config, &check)?;
            let recipe = Ripemd160Extra::new(tag.as_bytes());
            match size {
                Some(size) => base58check::decode(text, &recipe, size)?,
                None => base58check::decode_any(text, &recipe)?,
            }
        }
        None => base58::decode(text, size.unwrap_or(text.len()))?,
    };
    debug!("Decoded {} bytes", decoded.len());
    println!("{}", hex::encode(decoded));
    Ok(())
}

/// Fields printed by `inspect`
#[derive(Debug, Serialize)]
struct SignatureSummary {
    signature: Signature,
    curve: String,
    recovery_id: Option<i8>,
    data: String,
    abi: Option<String>,
}

/// Accepts a `SIG_` string or the hex of its ABI bytes
fn summarize(input: &str) -> Result<SignatureSummary> {
    let signature: Signature = if input.starts_with("SIG_") {
        input.parse()?
    } else {
        serialize::from_abi_hex(input).context("expected a SIG_ string or ABI hex")?
    };
    Ok(SignatureSummary {
        curve: signature.curve().to_string(),
        recovery_id: signature.recovery_id(),
        data: hex::encode(signature.data()),
        abi: serialize::to_abi_hex(&signature).ok(),
        signature,
    })
}

fn inspect(input: &str) -> Result<()> {
    let summary = summarize(input)?;
    println!("{}", serialize::to_json_pretty(&summary)?);
    Ok(())
}

fn message_digest(args: &DigestArgs) -> Result<Checksum256> {
    match (&args.digest, &args.message) {
        (Some(digest), _) => Ok(Checksum256::from_hex(digest)?),
        (None, Some(message)) => Ok(Checksum256::hash(message.as_bytes())),
        (None, None) => anyhow::bail!("either --digest or --message is required"),
    }
}

fn format_key(config: &ToolConfig, key: &PublicKey) -> Result<String> {
    match config.key_format {
        KeyFormat::Modern => Ok(key.string_value()),
        KeyFormat::Legacy => Ok(key.legacy_string_value(&config.legacy_prefix)?),
    }
}

fn recover(config: &ToolConfig, signature: &str, digest: &DigestArgs) -> Result<()> {
    let signature = Signature::from_string_value(signature)?;
    let digest = message_digest(digest)?;
    let key = signature.recover_public_key(&digest)?;
    println!("{}", format_key(config, &key)?);
    Ok(())
}

fn verify(signature: &str, public_key: &str, digest: &DigestArgs) -> Result<bool> {
    let signature = Signature::from_string_value(signature)?;
    let key: PublicKey = public_key.parse()?;
    let digest = message_digest(digest)?;
    let valid = signature.verify(&digest, &key);
    if !valid {
        warn!("Signature does not match {}", key);
    }
    println!("{}", valid);
    Ok(valid)
}
