//! Leaf codec for the chain's binary (ABI) wire format.
//!
//! Structured serializers call into [`AbiEncodable`] / [`AbiDecodable`] for
//! signature, key and checksum fields; this module only knows about bytes,
//! fixed-size runs and LEB128 `varuint32` lengths.

use crate::error::CoreError;

/// Growable output buffer
#[derive(Debug, Default)]
pub struct AbiEncoder {
    buffer: Vec<u8>,
}

impl AbiEncoder {
    pub fn new() -> Self {
        AbiEncoder::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_varuint32(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buffer.push(byte);
                break;
            }
            self.buffer.push(byte | 0x80);
        }
    }

    /// Length-prefixed byte run
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), CoreError> {
        let len = u32::try_from(bytes.len())
            .map_err(|_| CoreError::Serialization(format!("blob of {} bytes", bytes.len())))?;
        self.write_varuint32(len);
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

/// Cursor over an input slice
#[derive(Debug)]
pub struct AbiDecoder<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> AbiDecoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        AbiDecoder { input, position: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    pub fn read_u8(&mut self) -> Result<u8, CoreError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CoreError> {
        if count > self.remaining() {
            return Err(CoreError::UnexpectedEof {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.input[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    pub fn read_varuint32(&mut self) -> Result<u32, CoreError> {
        let mut value: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 28 {
                return Err(CoreError::Deserialization("varuint32 too long".to_string()));
            }
        }
        u32::try_from(value)
            .map_err(|_| CoreError::Deserialization("varuint32 out of range".to_string()))
    }

    /// Length-prefixed byte run
    pub fn read_blob(&mut self) -> Result<&'a [u8], CoreError> {
        let len = self.read_varuint32()? as usize;
        self.read_bytes(len)
    }
}

pub trait AbiEncodable {
    fn abi_encode(&self, encoder: &mut AbiEncoder) -> Result<(), CoreError>;
}

pub trait AbiDecodable: Sized {
    fn abi_decode(decoder: &mut AbiDecoder<'_>) -> Result<Self, CoreError>;
}

/// Encode a single value to its wire bytes
pub fn to_abi_bytes<T: AbiEncodable + ?Sized>(value: &T) -> Result<Vec<u8>, CoreError> {
    let mut encoder = AbiEncoder::new();
    value.abi_encode(&mut encoder)?;
    Ok(encoder.into_bytes())
}

/// Decode a single value that must span all of `bytes`
pub fn from_abi_bytes<T: AbiDecodable>(bytes: &[u8]) -> Result<T, CoreError> {
    let mut decoder = AbiDecoder::new(bytes);
    let value = T::abi_decode(&mut decoder)?;
    match decoder.remaining() {
        0 => Ok(value),
        extra => Err(CoreError::TrailingBytes(extra)),
    }
}

/// Check that `bytes` is exactly `count` length-prefixed blobs
pub fn check_blobs(bytes: &[u8], count: usize) -> Result<(), CoreError> {
    let mut decoder = AbiDecoder::new(bytes);
    for _ in 0..count {
        decoder.read_blob()?;
    }
    match decoder.remaining() {
        0 => Ok(()),
        extra => Err(CoreError::TrailingBytes(extra)),
    }
}
