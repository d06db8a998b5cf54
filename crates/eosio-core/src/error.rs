use thiserror::Error;

use crate::crypto::engine::RecoveryError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Malformed string: {0}")]
    MalformedString(String),

    #[error("Invalid curve tag: {0:?}")]
    InvalidCurveTag(String),

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Checksum missing: decoded {0} bytes")]
    ChecksumTooShort(usize),

    #[error("Wrong byte length: expected {expected}, got {actual}")]
    WrongByteLength { expected: usize, actual: usize },

    #[error("Value too large for buffer")]
    BufferTooLarge,

    #[error("Requested buffer of {requested} bytes exceeds maximum of {max}")]
    CapacityExceeded { requested: usize, max: usize },

    #[error("Invalid base58 character {0:?}")]
    InvalidCharacter(char),

    #[error("Unsupported signature type: {0}")]
    UnsupportedSignatureType(String),

    #[error("Curve {0} cannot be encoded in this format")]
    UnencodableCurve(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Trailing bytes after value: {0}")]
    TrailingBytes(usize),

    #[error("{operation} failed: {source}")]
    Recovery {
        operation: &'static str,
        #[source]
        source: RecoveryError,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
