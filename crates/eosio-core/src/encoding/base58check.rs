//! Base58Check: base-58 over `payload ++ checksum`.
//!
//! The checksum is the prefix of a digest produced by a [`ChecksumRecipe`].
//! Recipes may mix context bytes (such as a curve tag) into the digest so a
//! string valid for one type fails to decode as another.

use tracing::debug;

use crate::crypto::hash::{ripemd160, sha256d};
use crate::encoding::base58;
use crate::error::CoreError;

/// Produces the digest whose leading bytes form the checksum.
pub trait ChecksumRecipe {
    fn digest(&self, payload: &[u8]) -> Vec<u8>;

    /// Number of digest bytes appended to the payload.
    fn checksum_len(&self) -> usize {
        4
    }
}

/// RIPEMD-160 over `payload ++ context`.
#[derive(Debug, Clone, Copy)]
pub struct Ripemd160Extra<'a> {
    context: &'a [u8],
}

impl<'a> Ripemd160Extra<'a> {
    pub fn new(context: &'a [u8]) -> Self {
        Ripemd160Extra { context }
    }
}

impl ChecksumRecipe for Ripemd160Extra<'_> {
    fn digest(&self, payload: &[u8]) -> Vec<u8> {
        ripemd160(&[payload, self.context]).to_vec()
    }
}

/// RIPEMD-160 over the payload alone, used by legacy key strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ripemd160Plain;

impl ChecksumRecipe for Ripemd160Plain {
    fn digest(&self, payload: &[u8]) -> Vec<u8> {
        ripemd160(&[payload]).to_vec()
    }
}

/// Double SHA-256 over the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256d;

impl ChecksumRecipe for Sha256d {
    fn digest(&self, payload: &[u8]) -> Vec<u8> {
        sha256d(payload).to_vec()
    }
}

fn checksum_of<R: ChecksumRecipe + ?Sized>(payload: &[u8], recipe: &R) -> Vec<u8> {
    let mut digest = recipe.digest(payload);
    digest.truncate(recipe.checksum_len());
    digest
}

/// Append the recipe's checksum to `payload` and base-58 encode the result.
pub fn encode<R: ChecksumRecipe + ?Sized>(payload: &[u8], recipe: &R) -> String {
    let mut data = Vec::with_capacity(payload.len() + recipe.checksum_len());
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum_of(payload, recipe));
    base58::encode(&data)
}

/// Decode a string carrying a payload of at most `expected_len` bytes and
/// verify its checksum.
pub fn decode<R: ChecksumRecipe + ?Sized>(
    input: &str,
    recipe: &R,
    expected_len: usize,
) -> Result<Vec<u8>, CoreError> {
    let checksum_len = recipe.checksum_len();
    let capacity = expected_len
        .checked_add(checksum_len)
        .ok_or(CoreError::CapacityExceeded {
            requested: expected_len,
            max: base58::MAX_DECODE_LEN,
        })?;
    let mut data = base58::decode(input, capacity)?;
    if data.len() < checksum_len {
        return Err(CoreError::ChecksumTooShort(data.len()));
    }

    let checksum = data.split_off(data.len() - checksum_len);
    if checksum_of(&data, recipe) != checksum {
        debug!("Checksum mismatch decoding {}", input);
        return Err(CoreError::ChecksumMismatch);
    }
    Ok(data)
}

/// Decode a payload of unknown length.
///
/// The string length bounds the decoded size, since every symbol carries
/// less than one byte.
pub fn decode_any<R: ChecksumRecipe + ?Sized>(
    input: &str,
    recipe: &R,
) -> Result<Vec<u8>, CoreError> {
    let checksum_len = recipe.checksum_len();
    let capacity = input.len().saturating_sub(checksum_len);
    decode(input, recipe, capacity)
}
