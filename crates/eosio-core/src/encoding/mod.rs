pub mod base58;
pub mod base58check;

pub use base58check::{ChecksumRecipe, Ripemd160Extra, Ripemd160Plain, Sha256d};
