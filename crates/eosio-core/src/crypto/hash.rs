use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Compute SHA-256 of data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute double SHA-256 of data
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 over the concatenation of `parts`
pub fn ripemd160(parts: &[&[u8]]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
