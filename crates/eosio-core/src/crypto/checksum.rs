use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::abi::{AbiDecodable, AbiDecoder, AbiEncodable, AbiEncoder};
use crate::crypto::hash::sha256;
use crate::error::CoreError;

/// A 32-byte SHA-256 digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Checksum256(pub [u8; 32]);

impl Checksum256 {
    pub const ZERO: Checksum256 = Checksum256([0u8; 32]);

    /// Hash data with SHA-256
    pub fn hash(data: &[u8]) -> Self {
        Checksum256(sha256(data))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CoreError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| CoreError::WrongByteLength {
            expected: 32,
            actual: slice.len(),
        })?;
        Ok(Checksum256(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Checksum256 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Checksum256::from_hex(s)
    }
}

impl fmt::Debug for Checksum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum256({})", self.to_hex())
    }
}

impl fmt::Display for Checksum256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AbiEncodable for Checksum256 {
    fn abi_encode(&self, encoder: &mut AbiEncoder) -> Result<(), CoreError> {
        encoder.write_bytes(&self.0);
        Ok(())
    }
}

impl AbiDecodable for Checksum256 {
    fn abi_decode(decoder: &mut AbiDecoder<'_>) -> Result<Self, CoreError> {
        Ok(Checksum256(decoder.read_array()?))
    }
}

impl Serialize for Checksum256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Checksum256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Checksum256::from_hex(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Checksum256::from_slice(&bytes).map_err(serde::de::Error::custom)
        }
    }
}
