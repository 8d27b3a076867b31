/// Alphanumeric mode encoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
use crate::encoder::bit_buffer::BitBuffer;
use crate::encoder::segment::Mode;
use crate::error::EncodeError;

const ALPHANUMERIC_TABLE: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericEncoder;

impl AlphanumericEncoder {
    /// Index of `byte` in the alphanumeric table
    pub fn value_of(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'A'..=b'Z' => Some(byte - b'A' + 10),
            _ => ALPHANUMERIC_TABLE[36..]
                .iter()
                .position(|&c| c == byte)
                .map(|i| 36 + i as u8),
        }
    }

    /// True for characters in the 45-entry table
    pub fn is_alphanumeric(byte: u8) -> bool {
        Self::value_of(byte).is_some()
    }

    /// Character for a table index, used when reading symbols back
    pub fn char_of(value: u16) -> Option<u8> {
        ALPHANUMERIC_TABLE.get(value as usize).copied()
    }

    /// Bits needed for `count` characters
    pub fn bit_length(count: usize) -> usize {
        count / 2 * 11 + (count % 2) * 6
    }

    /// Append the packed pairs, failing on the first byte outside the table
    pub fn encode(data: &[u8], out: &mut BitBuffer) -> Result<(), EncodeError> {
        for pair in data.chunks(2) {
            let mut value = 0u32;
            for &byte in pair {
                let v = Self::value_of(byte).ok_or(EncodeError::InvalidCharacterForMode {
                    byte,
                    mode: Mode::Alphanumeric,
                })?;
                value = value * 45 + u32::from(v);
            }
            out.push_bits(value, if pair.len() == 2 { 11 } else { 6 });
        }
        Ok(())
    }
}
