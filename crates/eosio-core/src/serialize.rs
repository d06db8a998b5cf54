//! Structured serialization entry points.
//!
//! Signature, key and digest fields pick their form from the format: bincode
//! carries their ABI bytes, JSON carries their string forms.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::abi::{self, AbiDecodable, AbiEncodable};
use crate::error::CoreError;

fn serialization(e: impl Display) -> CoreError {
    CoreError::Serialization(e.to_string())
}

fn deserialization(e: impl Display) -> CoreError {
    CoreError::Deserialization(e.to_string())
}

pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    bincode::serialize(value).map_err(serialization)
}

pub fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, CoreError> {
    bincode::deserialize(bytes).map_err(deserialization)
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string(value).map_err(serialization)
}

/// Indented JSON, for tool output
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(serialization)
}

pub fn from_json<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, CoreError> {
    serde_json::from_str(json).map_err(deserialization)
}

/// Hex of a value's ABI bytes
pub fn to_abi_hex<T: AbiEncodable + ?Sized>(value: &T) -> Result<String, CoreError> {
    abi::to_abi_bytes(value).map(hex::encode)
}

/// Decode a value from the hex of its ABI bytes; a `0x` prefix is allowed.
pub fn from_abi_hex<T: AbiDecodable>(text: &str) -> Result<T, CoreError> {
    let bytes = hex::decode(text.strip_prefix("0x").unwrap_or(text))?;
    abi::from_abi_bytes(&bytes)
}
