//! Data segmentation
//!
//! The payload is split into runs of numeric, alphanumeric and byte mode
//! characters. [`segment_optimally`] picks the mode sequence with the
//! shortest total bit length for a given version group, paying a mode
//! indicator and character count for every switch.

use crate::encoder::bit_buffer::BitBuffer;
use crate::encoder::modes::{
    alphanumeric::AlphanumericEncoder, byte::ByteEncoder, numeric::NumericEncoder,
};
use crate::error::EncodeError;
use crate::models::Version;

/// Character encoding mode of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Digits 0-9
    Numeric,
    /// 0-9, A-Z, space and `$%*+-./:`
    Alphanumeric,
    /// Arbitrary bytes
    Byte,
}

impl Mode {
    /// Four-bit mode indicator
    pub fn indicator(&self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
        }
    }

    /// Mode for a four-bit indicator, if it is one this crate writes
    pub fn from_indicator(bits: u32) -> Option<Self> {
        match bits {
            0b0001 => Some(Mode::Numeric),
            0b0010 => Some(Mode::Alphanumeric),
            0b0100 => Some(Mode::Byte),
            _ => None,
        }
    }

    /// Width of the character count field
    pub fn char_count_bits(&self, version: Version) -> usize {
        let widths = match self {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
        };
        widths[version.group()]
    }

    /// Length of the character data for `count` characters, without header
    pub fn data_bits(&self, count: usize) -> usize {
        match self {
            Mode::Numeric => NumericEncoder::bit_length(count),
            Mode::Alphanumeric => AlphanumericEncoder::bit_length(count),
            Mode::Byte => ByteEncoder::bit_length(count),
        }
    }

    fn supports(&self, byte: u8) -> bool {
        match self {
            Mode::Numeric => NumericEncoder::is_numeric(byte),
            Mode::Alphanumeric => AlphanumericEncoder::is_alphanumeric(byte),
            Mode::Byte => true,
        }
    }

    // Per-character cost in sixths of a bit: 10/3, 11/2 and 8 bits.
    fn char_cost(&self) -> usize {
        match self {
            Mode::Numeric => 20,
            Mode::Alphanumeric => 33,
            Mode::Byte => 48,
        }
    }
}

/// One run of characters encoded in a single mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: Mode,
    num_chars: usize,
    data: BitBuffer,
}

impl Segment {
    /// Encode `data` in `mode`
    pub fn new(mode: Mode, data: &[u8]) -> Result<Self, EncodeError> {
        let mut bits = BitBuffer::with_capacity(mode.data_bits(data.len()));
        match mode {
            Mode::Numeric => NumericEncoder::encode(data, &mut bits)?,
            Mode::Alphanumeric => AlphanumericEncoder::encode(data, &mut bits)?,
            Mode::Byte => ByteEncoder::encode(data, &mut bits),
        }
        Ok(Self {
            mode,
            num_chars: data.len(),
            data: bits,
        })
    }

    /// Mode the characters are encoded in
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Characters in the segment, as written to the count field
    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    /// Header plus data length, `None` when the count does not fit its field
    pub fn encoded_len(&self, version: Version) -> Option<usize> {
        let count_bits = self.mode.char_count_bits(version);
        if self.num_chars >= 1 << count_bits {
            return None;
        }
        Some(4 + count_bits + self.data.len())
    }

    /// Append mode indicator, character count and data to `out`
    pub fn write_to(&self, version: Version, out: &mut BitBuffer) {
        out.push_bits(self.mode.indicator(), 4);
        out.push_bits(self.num_chars as u32, self.mode.char_count_bits(version));
        out.extend(&self.data);
    }
}

/// Total encoded length of `segments` at `version`
pub fn total_bits(segments: &[Segment], version: Version) -> Option<usize> {
    segments
        .iter()
        .try_fold(0usize, |acc, s| Some(acc + s.encoded_len(version)?))
}

const MODES: [Mode; 3] = [Mode::Byte, Mode::Alphanumeric, Mode::Numeric];

/// Split `data` into the segment sequence with the fewest bits at `version`
pub fn segment_optimally(data: &[u8], version: Version) -> Result<Vec<Segment>, EncodeError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let modes = compute_char_modes(data, version);

    let mut segments = Vec::new();
    let mut start = 0;
    for i in 1..=data.len() {
        if i == data.len() || modes[i] != modes[start] {
            segments.push(Segment::new(modes[start], &data[start..i])?);
            start = i;
        }
    }
    Ok(segments)
}

// Shortest-path over (position, open mode). `from[i][j]` is the mode that
// byte i was encoded in when the state after byte i is mode j.
fn compute_char_modes(data: &[u8], version: Version) -> Vec<Mode> {
    let head: [usize; 3] = MODES.map(|m| (4 + m.char_count_bits(version)) * 6);
    let mut prev: [Option<usize>; 3] = head.map(Some);
    let mut from: Vec<[usize; 3]> = Vec::with_capacity(data.len());

    for &byte in data {
        let mut extended = [None; 3];
        for (j, mode) in MODES.iter().enumerate() {
            if mode.supports(byte) {
                extended[j] = prev[j].map(|c| c + mode.char_cost());
            }
        }

        let mut cur = extended;
        let mut step = [0usize, 1, 2];
        for j in 0..MODES.len() {
            for k in 0..MODES.len() {
                let Some(cost) = extended[k] else { continue };
                // close the k segment on a whole bit, then open a j segment
                let switched = cost.div_ceil(6) * 6 + head[j];
                if cur[j].is_none_or(|c| switched < c) {
                    cur[j] = Some(switched);
                    step[j] = k;
                }
            }
        }
        from.push(step);
        prev = cur;
    }

    let mut state = (0..MODES.len())
        .filter(|&j| prev[j].is_some())
        .min_by_key(|&j| prev[j].map(|c| c.div_ceil(6)))
        .unwrap_or(0);

    let mut result = vec![Mode::Byte; data.len()];
    for i in (0..data.len()).rev() {
        state = from[i][state];
        result[i] = MODES[state];
    }
    result
}
