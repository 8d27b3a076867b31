/// Numeric mode encoder (Mode 0001)
/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
use crate::encoder::bit_buffer::BitBuffer;
use crate::encoder::segment::Mode;
use crate::error::EncodeError;

/// Packs digit groups into 10, 7 or 4 bits
pub struct NumericEncoder;

impl NumericEncoder {
    /// True for ASCII `0`-`9`
    pub fn is_numeric(byte: u8) -> bool {
        byte.is_ascii_digit()
    }

    /// Bits needed for `count` digits
    pub fn bit_length(count: usize) -> usize {
        count / 3 * 10
            + match count % 3 {
                1 => 4,
                2 => 7,
                _ => 0,
            }
    }

    /// Append the packed digits, failing on the first non-digit byte
    pub fn encode(data: &[u8], out: &mut BitBuffer) -> Result<(), EncodeError> {
        for group in data.chunks(3) {
            let mut value = 0u32;
            for &byte in group {
                if !Self::is_numeric(byte) {
                    return Err(EncodeError::InvalidCharacterForMode {
                        byte,
                        mode: Mode::Numeric,
                    });
                }
                value = value * 10 + u32::from(byte - b'0');
            }
            out.push_bits(value, group.len() * 3 + 1);
        }
        Ok(())
    }
}
