pub mod checksum;
pub mod curve;
pub mod engine;
pub mod hash;
pub mod keys;
pub mod signature;

pub use checksum::Checksum256;
pub use curve::CurveTag;
pub use engine::{secp256k1, EcEngine, RecoveryError, Secp256k1};
pub use hash::{ripemd160, sha256, sha256d};
pub use keys::{PublicKey, LEGACY_PREFIX};
pub use signature::Signature;
