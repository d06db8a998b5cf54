//! Elliptic-curve engine seam.
//!
//! Signature types never do curve math themselves; they hand raw bytes to an
//! [`EcEngine`]. Implementations must be callable from many threads at once.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("invalid recovery id {0}")]
    InvalidRecoveryId(i32),

    #[error("malformed signature")]
    MalformedSignature,

    #[error("no public key recoverable from signature")]
    Unrecoverable,
}

pub trait EcEngine: Send + Sync {
    /// Check a compact `r || s` signature over a 32-byte digest.
    fn verify(&self, signature: &[u8; 64], message: &[u8; 32], public_key: &[u8]) -> bool;

    /// Recover the compressed SEC1 public key that produced `signature`.
    fn recover(
        &self,
        message: &[u8; 32],
        signature: &[u8; 64],
        recovery_id: i32,
    ) -> Result<Vec<u8>, RecoveryError>;
}

/// secp256k1 engine backed by `k256`. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1;

static SECP256K1: Secp256k1 = Secp256k1;

/// Shared secp256k1 engine
pub fn secp256k1() -> &'static Secp256k1 {
    &SECP256K1
}

impl EcEngine for Secp256k1 {
    fn verify(&self, signature: &[u8; 64], message: &[u8; 32], public_key: &[u8]) -> bool {
        let Ok(signature) = EcdsaSignature::from_slice(signature) else {
            return false;
        };
        let Ok(key) = VerifyingKey::from_sec1_bytes(public_key) else {
            return false;
        };
        key.verify_prehash(message, &signature).is_ok()
    }

    fn recover(
        &self,
        message: &[u8; 32],
        signature: &[u8; 64],
        recovery_id: i32,
    ) -> Result<Vec<u8>, RecoveryError> {
        let id = u8::try_from(recovery_id)
            .ok()
            .and_then(RecoveryId::from_byte)
            .ok_or(RecoveryError::InvalidRecoveryId(recovery_id))?;
        let signature =
            EcdsaSignature::from_slice(signature).map_err(|_| RecoveryError::MalformedSignature)?;
        let key = VerifyingKey::recover_from_prehash(message, &signature, id)
            .map_err(|_| RecoveryError::Unrecoverable)?;
        Ok(key.to_encoded_point(true).as_bytes().to_vec())
    }
}
