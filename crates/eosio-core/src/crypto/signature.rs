//! Signatures over the supported curve families.
//!
//! Text form is `SIG_<TAG>_<base58check>` where the checksum mixes in the tag
//! bytes. Binary form is a type id followed by the curve payload; for K1 the
//! payload is the recovery byte (`id + 31`) then the 64-byte compact signature.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::abi::{self, AbiDecodable, AbiDecoder, AbiEncodable, AbiEncoder};
use crate::crypto::checksum::Checksum256;
use crate::crypto::curve::CurveTag;
use crate::crypto::engine::{secp256k1, EcEngine};
use crate::crypto::keys::PublicKey;
use crate::encoding::base58check::{self, Ripemd160Extra};
use crate::error::CoreError;

/// Recovery byte plus compact signature
pub const K1_SIGNATURE_LEN: usize = 65;

/// Offset added to the recovery id when it is stored
pub const RECOVERY_ID_BIAS: u8 = 31;

const SIGNATURE_PREFIX: &str = "SIG";

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    /// Recoverable secp256k1 signature
    K1 { sig: [u8; 64], recovery_id: i8 },
    /// Any other curve; cannot be verified or recovered here
    Unknown { curve: CurveTag, data: Vec<u8> },
}

impl Signature {
    /// Build from the 65-byte `recovery byte || r || s` form.
    pub fn from_recoverable_bytes(data: &[u8]) -> Result<Self, CoreError> {
        if data.len() != K1_SIGNATURE_LEN {
            return Err(CoreError::WrongByteLength {
                expected: K1_SIGNATURE_LEN,
                actual: data.len(),
            });
        }
        let mut sig = [0u8; 64];
        sig.copy_from_slice(&data[1..]);
        Ok(Signature::K1 {
            sig,
            recovery_id: data[0].wrapping_sub(RECOVERY_ID_BIAS) as i8,
        })
    }

    pub fn from_k1(sig: [u8; 64], recovery_id: i8) -> Self {
        Signature::K1 { sig, recovery_id }
    }

    /// Build from a curve tag and its raw payload. A `K1` tag goes through
    /// [`Signature::from_recoverable_bytes`].
    pub fn from_curve(curve: &str, data: Vec<u8>) -> Result<Self, CoreError> {
        let curve = CurveTag::parse(curve)?;
        if curve == CurveTag::K1 {
            return Self::from_recoverable_bytes(&data);
        }
        Ok(Signature::Unknown { curve, data })
    }

    /// Parse `SIG_<TAG>_<payload>`.
    pub fn from_string_value(s: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 3 {
            return Err(CoreError::MalformedString(format!(
                "expected 3 fields in signature, got {}",
                parts.len()
            )));
        }
        if parts[0] != SIGNATURE_PREFIX {
            return Err(CoreError::MalformedString(format!(
                "expected {} prefix, got {:?}",
                SIGNATURE_PREFIX, parts[0]
            )));
        }

        let curve = CurveTag::parse(parts[1])?;
        let recipe = Ripemd160Extra::new(curve.as_bytes());
        if curve == CurveTag::K1 {
            let data = base58check::decode(parts[2], &recipe, K1_SIGNATURE_LEN)?;
            Self::from_recoverable_bytes(&data)
        } else {
            let data = base58check::decode_any(parts[2], &recipe)?;
            Ok(Signature::Unknown { curve, data })
        }
    }

    pub fn curve(&self) -> CurveTag {
        match self {
            Signature::K1 { .. } => CurveTag::K1,
            Signature::Unknown { curve, .. } => *curve,
        }
    }

    pub fn recovery_id(&self) -> Option<i8> {
        match self {
            Signature::K1 { recovery_id, .. } => Some(*recovery_id),
            Signature::Unknown { .. } => None,
        }
    }

    /// Canonical payload: the 65-byte recoverable form for K1, raw data otherwise
    pub fn data(&self) -> Vec<u8> {
        match self {
            Signature::K1 { sig, recovery_id } => recoverable_bytes(sig, *recovery_id).to_vec(),
            Signature::Unknown { data, .. } => data.clone(),
        }
    }

    /// The 65-byte recoverable form, for K1 only
    pub fn k1_bytes(&self) -> Option<[u8; K1_SIGNATURE_LEN]> {
        match self {
            Signature::K1 { sig, recovery_id } => Some(recoverable_bytes(sig, *recovery_id)),
            Signature::Unknown { .. } => None,
        }
    }

    /// `SIG_<TAG>_<base58check>`
    pub fn string_value(&self) -> String {
        let curve = self.curve();
        let encoded = base58check::encode(&self.data(), &Ripemd160Extra::new(curve.as_bytes()));
        format!("{}_{}_{}", SIGNATURE_PREFIX, curve, encoded)
    }

    /// Verify against a digest with the shared secp256k1 engine.
    pub fn verify(&self, hash: &Checksum256, key: &PublicKey) -> bool {
        self.verify_with(secp256k1(), hash, key)
    }

    /// Hash `message` with SHA-256, then verify.
    pub fn verify_message(&self, message: &[u8], key: &PublicKey) -> bool {
        self.verify(&Checksum256::hash(message), key)
    }

    pub fn verify_with(&self, engine: &dyn EcEngine, hash: &Checksum256, key: &PublicKey) -> bool {
        match (self, key) {
            (Signature::K1 { sig, .. }, PublicKey::K1 { data }) => {
                engine.verify(sig, hash.as_bytes(), data)
            }
            _ => false,
        }
    }

    /// Recover the signer's key with the shared secp256k1 engine.
    pub fn recover_public_key(&self, hash: &Checksum256) -> Result<PublicKey, CoreError> {
        self.recover_public_key_with(secp256k1(), hash)
    }

    pub fn recover_public_key_with(
        &self,
        engine: &dyn EcEngine,
        hash: &Checksum256,
    ) -> Result<PublicKey, CoreError> {
        match self {
            Signature::K1 { sig, recovery_id } => {
                let recovered = engine
                    .recover(hash.as_bytes(), sig, i32::from(*recovery_id))
                    .map_err(|source| {
                        debug!("Recovery failed for {}: {}", hash, source);
                        CoreError::Recovery {
                            operation: "recover_public_key",
                            source,
                        }
                    })?;
                PublicKey::from_k1_bytes(&recovered)
            }
            Signature::Unknown { curve, .. } => {
                Err(CoreError::UnsupportedSignatureType(curve.to_string()))
            }
        }
    }
}

impl FromStr for Signature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Signature::from_string_value(s)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.string_value())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_value())
    }
}

fn recoverable_bytes(sig: &[u8; 64], recovery_id: i8) -> [u8; K1_SIGNATURE_LEN] {
    let mut bytes = [0u8; K1_SIGNATURE_LEN];
    bytes[0] = (recovery_id as u8).wrapping_add(RECOVERY_ID_BIAS);
    bytes[1..].copy_from_slice(sig);
    bytes
}

/// WA payload: compact signature, then authenticator data and client JSON blobs.
fn check_webauthn_payload(data: &[u8]) -> Result<(), CoreError> {
    if data.len() < K1_SIGNATURE_LEN {
        return Err(CoreError::WrongByteLength {
            expected: K1_SIGNATURE_LEN,
            actual: data.len(),
        });
    }
    abi::check_blobs(&data[K1_SIGNATURE_LEN..], 2)
        .map_err(|e| CoreError::Serialization(format!("malformed WA signature: {}", e)))
}

impl AbiEncodable for Signature {
    fn abi_encode(&self, encoder: &mut AbiEncoder) -> Result<(), CoreError> {
        let curve = self.curve();
        let abi_type = curve.abi_type()?;
        if let Signature::Unknown { data, .. } = self {
            if curve == CurveTag::WA {
                check_webauthn_payload(data)?;
            } else if data.len() != K1_SIGNATURE_LEN {
                return Err(CoreError::WrongByteLength {
                    expected: K1_SIGNATURE_LEN,
                    actual: data.len(),
                });
            }
        }
        encoder.write_u8(abi_type);
        encoder.write_bytes(&self.data());
        Ok(())
    }
}

impl AbiDecodable for Signature {
    fn abi_decode(decoder: &mut AbiDecoder<'_>) -> Result<Self, CoreError> {
        let type_id = decoder.read_u8()?;
        let curve = CurveTag::from_abi_type(type_id);
        let compact = decoder.read_bytes(K1_SIGNATURE_LEN)?;
        match curve {
            CurveTag::K1 => Self::from_recoverable_bytes(compact),
            CurveTag::WA => {
                // compact signature, authenticator data, client JSON
                let mut tail = AbiEncoder::new();
                tail.write_blob(decoder.read_blob()?)?;
                tail.write_blob(decoder.read_blob()?)?;
                let mut data = compact.to_vec();
                data.extend_from_slice(&tail.into_bytes());
                Ok(Signature::Unknown { curve, data })
            }
            CurveTag::R1 => Ok(Signature::Unknown {
                curve,
                data: compact.to_vec(),
            }),
            _ => {
                warn!("Decoding signature with reserved type id {}", type_id);
                Ok(Signature::Unknown {
                    curve,
                    data: compact.to_vec(),
                })
            }
        }
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.string_value())
        } else {
            let bytes = abi::to_abi_bytes(self).map_err(serde::ser::Error::custom)?;
            serializer.serialize_bytes(&bytes)
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Signature::from_string_value(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            abi::from_abi_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::engine::RecoveryError;

    // Payload 0x20 || 01..40, produced by an independent base58check encoder
    const VECTOR: &str = "SIG_K1_KUsxwGpwJaFLKPyrje7k1HPjyv4HxrUP41rM9WhJSfHr43AJGJ2Wm8qdamPfmhiwGqFBLQFYAZXdghaKdH2it5G7XdhNZK";

    fn vector_payload() -> Vec<u8> {
        let mut data = vec![0x20];
        data.extend(1..=64u8);
        data
    }

    #[test]
    fn test_known_string() {
        let sig = Signature::from_recoverable_bytes(&vector_payload()).unwrap();
        assert_eq!(sig.recovery_id(), Some(1));
        assert_eq!(sig.string_value(), VECTOR);
        assert_eq!(VECTOR.parse::<Signature>().unwrap(), sig);
    }

    #[test]
    fn test_recovery_byte_is_biased() {
        let sig = Signature::from_k1([9u8; 64], 0);
        assert_eq!(sig.data()[0], 31);
        assert_eq!(Signature::from_k1([9u8; 64], 3).data()[0], 34);
    }

    #[test]
    fn test_wrong_byte_length() {
        assert!(matches!(
            Signature::from_recoverable_bytes(&[31u8; 64]),
            Err(CoreError::WrongByteLength {
                expected: 65,
                actual: 64
            })
        ));
    }

    #[test]
    fn test_string_roundtrip_recovery_ids() {
        for recovery_id in 0..4i8 {
            let sig = Signature::from_k1([0xab; 64], recovery_id);
            let parsed: Signature = sig.string_value().parse().unwrap();
            assert_eq!(parsed, sig);
        }
    }

    #[test]
    fn test_malformed_strings() {
        assert!(matches!(
            Signature::from_string_value("SIG_K1_"),
            Err(CoreError::ChecksumTooShort(0))
        ));
        assert!(matches!(
            Signature::from_string_value("BAD_K1_xxx"),
            Err(CoreError::MalformedString(_))
        ));
        assert!(matches!(
            Signature::from_string_value("SIG_K1"),
            Err(CoreError::MalformedString(_))
        ));
        assert!(matches!(
            Signature::from_string_value("SIG_K1_abc_def"),
            Err(CoreError::MalformedString(_))
        ));
        assert!(matches!(
            Signature::from_string_value("SIG_k1_abc"),
            Err(CoreError::InvalidCurveTag(_))
        ));
    }

    #[test]
    fn test_tag_is_checksum_context() {
        let swapped = VECTOR.replacen("K1", "R1", 1);
        assert!(matches!(
            Signature::from_string_value(&swapped),
            Err(CoreError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_from_curve() {
        assert!(matches!(
            Signature::from_curve("r1", vec![1, 2, 3]),
            Err(CoreError::InvalidCurveTag(_))
        ));
        let sig = Signature::from_curve("R1", vec![1, 2, 3]).unwrap();
        assert_eq!(sig.curve(), CurveTag::R1);
        assert_eq!(sig.recovery_id(), None);
        assert_eq!(sig.string_value().parse::<Signature>().unwrap(), sig);

        let k1 = Signature::from_curve("K1", vector_payload()).unwrap();
        assert_eq!(k1.curve(), CurveTag::K1);
    }

    #[test]
    fn test_unknown_cannot_verify_or_recover() {
        let sig = Signature::from_curve("R1", vec![7u8; 65]).unwrap();
        let key = PublicKey::from_curve("R1", vec![2u8; 33]).unwrap();
        let hash = Checksum256::hash(b"message");
        assert!(!sig.verify(&hash, &key));
        assert!(!sig.verify_message(b"message", &key));
        assert!(matches!(
            sig.recover_public_key(&hash),
            Err(CoreError::UnsupportedSignatureType(_))
        ));
    }

    #[test]
    fn test_recovery_failure_is_wrapped() {
        let sig = Signature::from_k1([0u8; 64], 0);
        let err = sig
            .recover_public_key(&Checksum256::hash(b"message"))
            .unwrap_err();
        match err {
            CoreError::Recovery { operation, source } => {
                assert_eq!(operation, "recover_public_key");
                assert_eq!(source, RecoveryError::MalformedSignature);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_abi_k1_layout() {
        let sig = Signature::from_recoverable_bytes(&vector_payload()).unwrap();
        let bytes = abi::to_abi_bytes(&sig).unwrap();
        assert_eq!(bytes.len(), 66);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..], &vector_payload()[..]);
        assert_eq!(abi::from_abi_bytes::<Signature>(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_abi_short_read() {
        let bytes = [0u8; 40];
        assert!(matches!(
            abi::from_abi_bytes::<Signature>(&bytes),
            Err(CoreError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            abi::from_abi_bytes::<Signature>(&[]),
            Err(CoreError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_abi_reserved_type_roundtrip() {
        let mut bytes = vec![200u8];
        bytes.extend_from_slice(&[5u8; 65]);
        let sig: Signature = abi::from_abi_bytes(&bytes).unwrap();
        assert!(matches!(sig, Signature::Unknown { .. }));
        assert_eq!(abi::to_abi_bytes(&sig).unwrap(), bytes);
    }

    #[test]
    fn test_abi_webauthn_reads_variable_tail() {
        let mut bytes = vec![2u8];
        bytes.extend_from_slice(&[0x1f; 65]);
        bytes.push(37);
        bytes.extend_from_slice(&[0xaa; 37]);
        let client_json = br#"{"type":"webauthn.get"}"#;
        bytes.push(client_json.len() as u8);
        bytes.extend_from_slice(client_json);

        let sig: Signature = abi::from_abi_bytes(&bytes).unwrap();
        assert_eq!(sig.curve(), CurveTag::WA);
        assert_eq!(abi::to_abi_bytes(&sig).unwrap(), bytes);
        assert_eq!(sig.string_value().parse::<Signature>().unwrap(), sig);
    }

    #[test]
    fn test_abi_rejects_unencodable_unknown() {
        let wrong_len = Signature::from_curve("R1", vec![1u8; 10]).unwrap();
        assert!(matches!(
            abi::to_abi_bytes(&wrong_len),
            Err(CoreError::WrongByteLength { .. })
        ));
        let no_type = Signature::from_curve("ZZ", vec![1u8; 65]).unwrap();
        assert!(matches!(
            abi::to_abi_bytes(&no_type),
            Err(CoreError::UnencodableCurve(_))
        ));
    }

    #[test]
    fn test_abi_rejects_malformed_webauthn() {
        let short = Signature::from_curve("WA", vec![1u8; 10]).unwrap();
        assert!(matches!(
            abi::to_abi_bytes(&short),
            Err(CoreError::WrongByteLength {
                expected: 65,
                actual: 10
            })
        ));

        // missing client JSON blob
        let mut data = vec![0x1f; 65];
        data.extend_from_slice(&[3, 1, 2, 3]);
        let one_blob = Signature::from_curve("WA", data.clone()).unwrap();
        assert!(matches!(
            abi::to_abi_bytes(&one_blob),
            Err(CoreError::Serialization(_))
        ));

        data.extend_from_slice(&[0, 9]);
        let trailing = Signature::from_curve("WA", data).unwrap();
        assert!(matches!(
            abi::to_abi_bytes(&trailing),
            Err(CoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_k1_bytes() {
        let sig = Signature::from_recoverable_bytes(&vector_payload()).unwrap();
        assert_eq!(sig.k1_bytes().unwrap().to_vec(), vector_payload());
        assert_eq!(sig.k1_bytes().unwrap().to_vec(), sig.data());
        let r1 = Signature::from_curve("R1", vec![7u8; 65]).unwrap();
        assert_eq!(r1.k1_bytes(), None);
    }
}
