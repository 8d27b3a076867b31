/// Append-only bit sequence, MSB first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer with room for `bits` bits
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    /// Number of bits written
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when no bits have been written
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Append the low `count` bits of `value`, most significant first
    pub fn push_bits(&mut self, value: u32, count: usize) {
        debug_assert!(count <= 31 && value >> count == 0);
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Append every bit of `other`
    pub fn extend(&mut self, other: &BitBuffer) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Bits in write order
    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    /// Pack into bytes. A trailing partial byte is zero-filled.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
            })
            .collect()
    }
}
