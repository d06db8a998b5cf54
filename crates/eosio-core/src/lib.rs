//! EOSIO Core - Base58 codecs and cryptographic value types
//!
//! This crate provides the canonical text and binary encodings of EOSIO
//! signatures, public keys and digests, plus the base58 / base58check codecs
//! they are built on. Curve math is delegated to an [`EcEngine`].

pub mod abi;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod serialize;

pub use abi::{from_abi_bytes, to_abi_bytes, AbiDecodable, AbiDecoder, AbiEncodable, AbiEncoder};
pub use crypto::{
    secp256k1, Checksum256, CurveTag, EcEngine, PublicKey, RecoveryError, Secp256k1, Signature,
    LEGACY_PREFIX,
};
pub use error::CoreError;
