//! Segment parsing for data codewords read back from a symbol

use crate::encoder::modes::alphanumeric::AlphanumericEncoder;
use crate::encoder::segment::Mode;
use crate::error::ReadError;
use crate::models::Version;

/// Parse mode/count/data segments until the terminator or the end of the
/// data codewords. Returns the concatenated payload bytes.
pub fn parse_segments(data_codewords: &[u8], version: Version) -> Result<Vec<u8>, ReadError> {
    let mut reader = BitReader::new(data_codewords);
    let mut data = Vec::new();

    while reader.remaining() >= 4 {
        let indicator = reader.read_bits(4)?;
        if indicator == 0 {
            break;
        }
        let mode = Mode::from_indicator(indicator)
            .ok_or(ReadError::MalformedPayload("unsupported mode indicator"))?;
        let count = reader.read_bits(mode.char_count_bits(version))? as usize;

        match mode {
            Mode::Numeric => read_numeric(&mut reader, count, &mut data)?,
            Mode::Alphanumeric => read_alphanumeric(&mut reader, count, &mut data)?,
            Mode::Byte => {
                for _ in 0..count {
                    data.push(reader.read_bits(8)? as u8);
                }
            }
        }
    }

    Ok(data)
}

fn read_numeric(reader: &mut BitReader, count: usize, out: &mut Vec<u8>) -> Result<(), ReadError> {
    let mut left = count;
    while left > 0 {
        let digits = left.min(3);
        let bits = match digits {
            3 => 10,
            2 => 7,
            _ => 4,
        };
        let value = reader.read_bits(bits)?;
        if value >= 10u32.pow(digits as u32) {
            return Err(ReadError::MalformedPayload("numeric group out of range"));
        }
        let text = format!("{value:0digits$}");
        out.extend_from_slice(text.as_bytes());
        left -= digits;
    }
    Ok(())
}

fn read_alphanumeric(
    reader: &mut BitReader,
    count: usize,
    out: &mut Vec<u8>,
) -> Result<(), ReadError> {
    let invalid = ReadError::MalformedPayload("alphanumeric value out of range");
    for _ in 0..count / 2 {
        let value = reader.read_bits(11)? as u16;
        let first = AlphanumericEncoder::char_of(value / 45).ok_or(invalid.clone())?;
        let second = AlphanumericEncoder::char_of(value % 45).ok_or(invalid.clone())?;
        out.push(first);
        out.push(second);
    }
    if count % 2 == 1 {
        let value = reader.read_bits(6)? as u16;
        out.push(AlphanumericEncoder::char_of(value).ok_or(invalid)?);
    }
    Ok(())
}

/// MSB-first reader over codeword bytes
struct BitReader<'a> {
    bytes: &'a [u8],
    idx: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, idx: 0 }
    }

    fn remaining(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.idx)
    }

    fn read_bits(&mut self, n: usize) -> Result<u32, ReadError> {
        if n > self.remaining() {
            return Err(ReadError::MalformedPayload("segment runs past the data codewords"));
        }
        let mut val = 0u32;
        for _ in 0..n {
            let bit = (self.bytes[self.idx / 8] >> (7 - self.idx % 8)) & 1;
            val = (val << 1) | u32::from(bit);
            self.idx += 1;
        }
        Ok(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello_world() {
        let data = [
            0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11,
        ];
        assert_eq!(parse_segments(&data, Version::MIN).unwrap(), b"HELLO WORLD");
    }

    #[test]
    fn test_parse_numeric() {
        // 0001 | 0000001000 | 0000001100 0101011001 1000011 | terminator
        let data = [0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0x00];
        assert_eq!(parse_segments(&data, Version::MIN).unwrap(), b"01234567");
    }

    #[test]
    fn test_terminator_only() {
        let data = [0x00, 0xEC, 0x11];
        assert!(parse_segments(&data, Version::MIN).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_segment() {
        // byte mode, count 5, only one data byte follows
        let data = [0x40, 0x54, 0x10];
        assert_eq!(
            parse_segments(&data, Version::MIN),
            Err(ReadError::MalformedPayload("segment runs past the data codewords"))
        );
    }

    #[test]
    fn test_unknown_mode() {
        let data = [0x70, 0x00];
        assert!(matches!(
            parse_segments(&data, Version::MIN),
            Err(ReadError::MalformedPayload(_))
        ));
    }
}
