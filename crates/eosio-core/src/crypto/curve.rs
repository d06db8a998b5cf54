use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Two-letter curve code such as `K1`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurveTag([u8; 2]);

impl CurveTag {
    /// secp256k1
    pub const K1: CurveTag = CurveTag(*b"K1");
    /// secp256r1
    pub const R1: CurveTag = CurveTag(*b"R1");
    /// WebAuthn over secp256r1
    pub const WA: CurveTag = CurveTag(*b"WA");

    /// Parse a tag of exactly two uppercase ASCII characters (letters or digits).
    pub fn parse(tag: &str) -> Result<Self, CoreError> {
        let bytes = tag.as_bytes();
        let valid = bytes.len() == 2
            && bytes
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            return Err(CoreError::InvalidCurveTag(tag.to_string()));
        }
        Ok(CurveTag([bytes[0], bytes[1]]))
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }

    /// Tag for a binary type id
    ///
    /// Ids without a named curve get a synthetic tag spelling the id in
    /// base 26, so they survive a decode/encode cycle.
    pub fn from_abi_type(id: u8) -> Self {
        match id {
            0 => CurveTag::K1,
            1 => CurveTag::R1,
            2 => CurveTag::WA,
            other => CurveTag([b'A' + other / 26, b'A' + other % 26]),
        }
    }

    /// Binary type id for this tag
    pub fn abi_type(&self) -> Result<u8, CoreError> {
        match *self {
            CurveTag::K1 => Ok(0),
            CurveTag::R1 => Ok(1),
            CurveTag::WA => Ok(2),
            CurveTag([high, low]) if high.is_ascii_uppercase() && low.is_ascii_uppercase() => {
                let id = u32::from(high - b'A') * 26 + u32::from(low - b'A');
                match u8::try_from(id) {
                    Ok(id) if id >= 3 => Ok(id),
                    _ => Err(CoreError::UnencodableCurve(self.to_string())),
                }
            }
            _ => Err(CoreError::UnencodableCurve(self.to_string())),
        }
    }
}

impl FromStr for CurveTag {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurveTag::parse(s)
    }
}

impl fmt::Debug for CurveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurveTag({})", self.as_str())
    }
}

impl fmt::Display for CurveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(CurveTag::parse("K1").unwrap(), CurveTag::K1);
        assert_eq!(CurveTag::parse("WA").unwrap(), CurveTag::WA);
        assert_eq!(CurveTag::parse("XY").unwrap().as_str(), "XY");
        assert_eq!(CurveTag::parse("2K").unwrap().as_str(), "2K");
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "K", "k1", "K1X", "é1", "K_", "a "] {
            assert!(matches!(
                CurveTag::parse(bad),
                Err(CoreError::InvalidCurveTag(_))
            ));
        }
    }

    #[test]
    fn test_known_abi_types() {
        assert_eq!(CurveTag::K1.abi_type().unwrap(), 0);
        assert_eq!(CurveTag::R1.abi_type().unwrap(), 1);
        assert_eq!(CurveTag::WA.abi_type().unwrap(), 2);
        assert_eq!(CurveTag::from_abi_type(1), CurveTag::R1);
    }

    #[test]
    fn test_reserved_abi_types_roundtrip() {
        for id in 3..=255u8 {
            let tag = CurveTag::from_abi_type(id);
            assert_eq!(tag.abi_type().unwrap(), id);
        }
    }

    #[test]
    fn test_unencodable_tags() {
        // "AB" spells 1, which belongs to R1
        assert!(CurveTag::parse("AB").unwrap().abi_type().is_err());
        // "ZZ" spells 675
        assert!(CurveTag::parse("ZZ").unwrap().abi_type().is_err());
        assert!(CurveTag::parse("P2").unwrap().abi_type().is_err());
    }
}
