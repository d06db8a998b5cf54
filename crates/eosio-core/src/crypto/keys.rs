use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::abi::{self, AbiDecodable, AbiDecoder, AbiEncodable, AbiEncoder};
use crate::crypto::curve::CurveTag;
use crate::encoding::base58check::{self, Ripemd160Extra, Ripemd160Plain};
use crate::error::CoreError;

/// Length of a compressed SEC1 point
pub const K1_KEY_LEN: usize = 33;

/// Prefix of legacy key strings
pub const LEGACY_PREFIX: &str = "EOS";

const KEY_PREFIX: &str = "PUB";

/// Public key over one of the supported curve families
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PublicKey {
    /// Compressed secp256k1 point
    K1 { data: [u8; K1_KEY_LEN] },
    /// Any other curve, payload kept opaque
    Unknown { curve: CurveTag, data: Vec<u8> },
}

impl PublicKey {
    /// Wrap a compressed secp256k1 key.
    pub fn from_k1_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let data: [u8; K1_KEY_LEN] = bytes.try_into().map_err(|_| CoreError::WrongByteLength {
            expected: K1_KEY_LEN,
            actual: bytes.len(),
        })?;
        if data[0] != 0x02 && data[0] != 0x03 {
            return Err(CoreError::InvalidPublicKey(format!(
                "not a compressed point (prefix {:#04x})",
                data[0]
            )));
        }
        Ok(PublicKey::K1 { data })
    }

    pub fn from_curve(curve: &str, data: Vec<u8>) -> Result<Self, CoreError> {
        let curve = CurveTag::parse(curve)?;
        if curve == CurveTag::K1 {
            return Self::from_k1_bytes(&data);
        }
        Ok(PublicKey::Unknown { curve, data })
    }

    pub fn curve(&self) -> CurveTag {
        match self {
            PublicKey::K1 { .. } => CurveTag::K1,
            PublicKey::Unknown { curve, .. } => *curve,
        }
    }

    pub fn data(&self) -> &[u8] {
        match self {
            PublicKey::K1 { data } => data.as_slice(),
            PublicKey::Unknown { data, .. } => data.as_slice(),
        }
    }

    /// `PUB_<TAG>_<base58check>`
    pub fn string_value(&self) -> String {
        let curve = self.curve();
        let encoded = base58check::encode(self.data(), &Ripemd160Extra::new(curve.as_bytes()));
        format!("{}_{}_{}", KEY_PREFIX, curve, encoded)
    }

    /// Legacy `<prefix><base58check>` form, only defined for K1 keys.
    pub fn legacy_string_value(&self, prefix: &str) -> Result<String, CoreError> {
        match self {
            PublicKey::K1 { data } => Ok(format!(
                "{}{}",
                prefix,
                base58check::encode(data, &Ripemd160Plain)
            )),
            PublicKey::Unknown { curve, .. } => Err(CoreError::UnencodableCurve(curve.to_string())),
        }
    }

    /// Parse the modern `PUB_` form.
    pub fn from_string_value(s: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 3 {
            return Err(CoreError::MalformedString(format!(
                "expected 3 fields in public key, got {}",
                parts.len()
            )));
        }
        if parts[0] != KEY_PREFIX {
            return Err(CoreError::MalformedString(format!(
                "expected {} prefix, got {:?}",
                KEY_PREFIX, parts[0]
            )));
        }
        let curve = CurveTag::parse(parts[1])?;
        let recipe = Ripemd160Extra::new(curve.as_bytes());
        let data = if curve == CurveTag::K1 {
            base58check::decode(parts[2], &recipe, K1_KEY_LEN)?
        } else {
            base58check::decode_any(parts[2], &recipe)?
        };
        Self::from_curve(curve.as_str(), data)
    }

    /// Parse the legacy form carrying `prefix`.
    pub fn from_legacy_string(s: &str, prefix: &str) -> Result<Self, CoreError> {
        let encoded = s.strip_prefix(prefix).ok_or_else(|| {
            CoreError::MalformedString(format!("expected {} prefix", prefix))
        })?;
        let data = base58check::decode(encoded, &Ripemd160Plain, K1_KEY_LEN)?;
        Self::from_k1_bytes(&data)
    }
}

impl FromStr for PublicKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("PUB_") {
            PublicKey::from_string_value(s)
        } else {
            PublicKey::from_legacy_string(s, LEGACY_PREFIX)
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.string_value())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_value())
    }
}

/// WA key: compressed point, user presence flag, relying party id blob
fn check_webauthn_key(data: &[u8]) -> Result<(), CoreError> {
    if data.len() <= K1_KEY_LEN {
        return Err(CoreError::WrongByteLength {
            expected: K1_KEY_LEN + 1,
            actual: data.len(),
        });
    }
    abi::check_blobs(&data[K1_KEY_LEN + 1..], 1)
        .map_err(|e| CoreError::Serialization(format!("malformed WA key: {}", e)))
}

impl AbiEncodable for PublicKey {
    fn abi_encode(&self, encoder: &mut AbiEncoder) -> Result<(), CoreError> {
        let curve = self.curve();
        let abi_type = curve.abi_type()?;
        if curve == CurveTag::WA {
            check_webauthn_key(self.data())?;
        } else if self.data().len() != K1_KEY_LEN {
            return Err(CoreError::WrongByteLength {
                expected: K1_KEY_LEN,
                actual: self.data().len(),
            });
        }
        encoder.write_u8(abi_type);
        encoder.write_bytes(self.data());
        Ok(())
    }
}

impl AbiDecodable for PublicKey {
    fn abi_decode(decoder: &mut AbiDecoder<'_>) -> Result<Self, CoreError> {
        let curve = CurveTag::from_abi_type(decoder.read_u8()?);
        let point = decoder.read_bytes(K1_KEY_LEN)?;
        match curve {
            CurveTag::K1 => Self::from_k1_bytes(point),
            CurveTag::WA => {
                // point, user presence flag, relying party id
                let mut data = point.to_vec();
                data.push(decoder.read_u8()?);
                let mut rpid = AbiEncoder::new();
                rpid.write_blob(decoder.read_blob()?)?;
                data.extend_from_slice(&rpid.into_bytes());
                Ok(PublicKey::Unknown { curve, data })
            }
            _ => Ok(PublicKey::Unknown {
                curve,
                data: point.to_vec(),
            }),
        }
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.string_value())
        } else {
            let bytes = abi::to_abi_bytes(self).map_err(serde::ser::Error::custom)?;
            serializer.serialize_bytes(&bytes)
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            abi::from_abi_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}
