//! Base-58 conversion between big-endian byte buffers and text.
//!
//! Leading zero bytes map one-to-one onto leading `1` symbols; the remaining
//! magnitude is converted numerically. Decoding works against a caller-declared
//! capacity and accumulates into 32-bit limbs with 64-bit intermediates.

use crate::error::CoreError;

/// Symbols ordered by digit value.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Largest buffer a single decode call may request.
pub const MAX_DECODE_LEN: usize = 4096;

const ZERO_SYMBOL: char = '1';
const LIMB_BYTES: usize = 4;
const LIMB_BITS: u32 = 32;

/// Digit value per ASCII code point, -1 where the symbol is not in the alphabet.
const DIGIT_MAP: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, //
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, //
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, //
    -1, 0, 1, 2, 3, 4, 5, 6, 7, 8, -1, -1, -1, -1, -1, -1, //
    -1, 9, 10, 11, 12, 13, 14, 15, 16, -1, 17, 18, 19, 20, 21, -1, //
    22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, -1, -1, -1, -1, -1, //
    -1, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, -1, 44, 45, 46, //
    47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, -1, -1, -1, -1, -1, //
];

fn digit_value(symbol: char) -> Option<u32> {
    if !symbol.is_ascii() {
        return None;
    }
    match DIGIT_MAP[symbol as usize] {
        -1 => None,
        digit => Some(digit as u32),
    }
}

/// Encode `data` as base-58.
///
/// An empty buffer encodes to an empty string; `k` leading zero bytes produce
/// exactly `k` leading `1` symbols.
pub fn encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits of the non-zero-prefixed magnitude.
    let mut digits: Vec<u8> = Vec::with_capacity((data.len() - zeros) * 138 / 100 + 1);
    for &byte in &data[zeros..] {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut encoded = String::with_capacity(zeros + digits.len());
    encoded.extend(std::iter::repeat(ZERO_SYMBOL).take(zeros));
    encoded.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    encoded
}

/// Decode `input` into at most `capacity` bytes.
///
/// Returns the canonical bytes: one zero byte per leading `1` symbol followed
/// by the significant bytes of the magnitude, so the result may be shorter
/// than `capacity`.
pub fn decode(input: &str, capacity: usize) -> Result<Vec<u8>, CoreError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if capacity > MAX_DECODE_LEN {
        return Err(CoreError::CapacityExceeded {
            requested: capacity,
            max: MAX_DECODE_LEN,
        });
    }
    if capacity == 0 {
        return Err(CoreError::BufferTooLarge);
    }

    let limb_count = capacity.div_ceil(LIMB_BYTES);
    let bytes_left = capacity % LIMB_BYTES;
    // Bits of the most significant limb that fall outside the buffer.
    let overflow_mask: u32 = if bytes_left > 0 {
        u32::MAX << (bytes_left * 8)
    } else {
        0
    };

    let zeros = input.chars().take_while(|&c| c == ZERO_SYMBOL).count();
    let mut limbs = vec![0u32; limb_count];

    for symbol in input.chars().skip(zeros) {
        let mut carry = digit_value(symbol).ok_or(CoreError::InvalidCharacter(symbol))?;
        for limb in limbs.iter_mut().rev() {
            let t = u64::from(*limb) * 58 + u64::from(carry);
            carry = (t >> LIMB_BITS) as u32;
            *limb = t as u32;
        }
        if carry != 0 || limbs[0] & overflow_mask != 0 {
            return Err(CoreError::BufferTooLarge);
        }
    }

    let mut buffer = Vec::with_capacity(capacity);
    let full_limbs = if bytes_left > 0 {
        let head = limbs[0].to_be_bytes();
        buffer.extend_from_slice(&head[LIMB_BYTES - bytes_left..]);
        &limbs[1..]
    } else {
        &limbs[..]
    };
    for limb in full_limbs {
        buffer.extend_from_slice(&limb.to_be_bytes());
    }

    let leading = buffer.iter().take_while(|&&b| b == 0).count();
    if leading < buffer.len() && zeros > leading {
        return Err(CoreError::BufferTooLarge);
    }
    let significant = &buffer[leading..];
    if zeros + significant.len() > capacity {
        return Err(CoreError::BufferTooLarge);
    }

    let mut decoded = vec![0u8; zeros];
    decoded.extend_from_slice(significant);
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VECTORS: &[(&str, &str)] = &[
        ("", ""),
        ("61", "2g"),
        ("626262", "a3gV"),
        ("636363", "aPEr"),
        ("572e4794", "3EFU7m"),
        ("10c8511e", "Rt5zm"),
        ("516b6fcd0f", "ABnLTmg"),
        ("bf4f89001e670274dd", "3SEo3LWLoPntC"),
        ("00000000000000000000", "1111111111"),
        (
            "00eb15231dfceb60925886b67d065299925915aeb172c06647",
            "1NS17iag9jJgTHD1VXjvLCEnZuQ3rJDE9L",
        ),
    ];

    #[test]
    fn test_known_vectors() {
        for (hex_data, text) in VECTORS {
            let data = hex::decode(hex_data).unwrap();
            assert_eq!(encode(&data), *text);
            assert_eq!(decode(text, data.len().max(1)).unwrap(), data);
        }
    }

    #[test]
    fn test_encode_hello_world() {
        assert_eq!(encode(b"hello world"), "StV1DL6CwTryKyV");
    }

    #[test]
    fn test_leading_zero_symbols_match_zero_bytes() {
        for k in 0..6 {
            let mut data = vec![0u8; k];
            data.extend_from_slice(&[0x01, 0x00, 0xff]);
            let text = encode(&data);
            let ones = text.chars().take_while(|&c| c == '1').count();
            assert_eq!(ones, k);
        }
    }

    #[test]
    fn test_all_zero_input() {
        assert_eq!(encode(&[0, 0, 0]), "111");
        assert_eq!(decode("111", 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_roundtrip_lengths() {
        for len in 0..=64usize {
            let data: Vec<u8> = (0..len)
                .map(|i| if i < len / 4 { 0 } else { (i * 37 + len) as u8 | 1 })
                .collect();
            let text = encode(&data);
            assert_eq!(decode(&text, len.max(1)).unwrap(), data, "length {}", len);
        }
    }

    #[test]
    fn test_decode_reports_significant_length() {
        assert_eq!(decode("2g", 8).unwrap(), vec![0x61]);
        assert_eq!(decode("112", 8).unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn test_decode_value_too_large() {
        assert!(matches!(decode("a3gV", 2), Err(CoreError::BufferTooLarge)));
        assert!(matches!(decode("111", 2), Err(CoreError::BufferTooLarge)));
        assert!(matches!(decode("112", 2), Err(CoreError::BufferTooLarge)));
        assert!(matches!(decode("2g", 0), Err(CoreError::BufferTooLarge)));
    }

    #[test]
    fn test_decode_carry_out_of_top_limb() {
        // 2^32 needs five bytes
        let text = encode(&[1, 0, 0, 0, 0]);
        assert!(matches!(decode(&text, 4), Err(CoreError::BufferTooLarge)));
        assert_eq!(decode(&text, 5).unwrap(), vec![1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_invalid_symbols() {
        for bad in ["0", "O", "I", "l", "2g!", "é"] {
            assert!(matches!(decode(bad, 8), Err(CoreError::InvalidCharacter(_))));
        }
    }

    #[test]
    fn test_decode_capacity_limit() {
        assert!(matches!(
            decode("2g", MAX_DECODE_LEN + 1),
            Err(CoreError::CapacityExceeded { .. })
        ));
    }
}
