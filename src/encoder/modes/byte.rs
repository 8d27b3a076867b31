/// Byte mode encoder (Mode 0100) for 8-bit data
use crate::encoder::bit_buffer::BitBuffer;

/// Eight bits per byte, no transformation
pub struct ByteEncoder;

impl ByteEncoder {
    /// Bits needed for `count` bytes
    pub fn bit_length(count: usize) -> usize {
        count * 8
    }

    /// Append `data` verbatim
    pub fn encode(data: &[u8], out: &mut BitBuffer) {
        for &byte in data {
            out.push_bits(u32::from(byte), 8);
        }
    }
}
