/// Format information for QR code symbols
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// Format info is 15 bits (5 data + 10 ECC)
/// Located at fixed positions in QR code corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Error correction level
    pub ec_level: ECLevel,
    /// Data mask
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Format information for a level and mask
    pub fn new(ec_level: ECLevel, mask_pattern: MaskPattern) -> Self {
        Self {
            ec_level,
            mask_pattern,
        }
    }

    /// Masked 15-bit codeword
    pub fn encode(&self) -> u16 {
        // BCH(15,5) generator polynomial: x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
        const GENERATOR: u16 = 0x537;
        const MASK: u16 = 0x5412;
        let data = (u16::from(self.ec_level.format_bits()) << 3) | u16::from(self.mask_pattern.id());
        let mut rem = data;
        for _ in 0..10 {
            rem = (rem << 1) ^ ((rem >> 9) * GENERATOR);
        }
        ((data << 10) | (rem & 0x3FF)) ^ MASK
    }

    /// Nearest valid format for a read codeword, up to three bit errors
    pub fn decode(bits: u16) -> Option<Self> {
        Self::all()
            .map(|info| (info, (info.encode() ^ bits).count_ones()))
            .filter(|&(_, distance)| distance <= 3)
            .min_by_key(|&(_, distance)| distance)
            .map(|(info, _)| info)
    }

    // Every 5-bit data word: EC level in the top two bits, mask id below.
    fn all() -> impl Iterator<Item = FormatInfo> {
        (0u8..32).filter_map(|data| {
            let mask = MaskPattern::from_bits(data & 0x07)?;
            Some(FormatInfo::new(ECLevel::from_format_bits(data >> 3), mask))
        })
    }

    /// Write both copies of the format information
    pub fn draw(&self, matrix: &mut BitMatrix) {
        let bits = self.encode();
        for (i, (a, b)) in Self::positions(matrix.width()).enumerate() {
            let bit = (bits >> i) & 1 == 1;
            matrix.set(a.0, a.1, bit);
            matrix.set(b.0, b.1, bit);
        }
    }

    /// Read the copy around the top-left finder and the split copy
    pub fn read(matrix: &BitMatrix) -> (u16, u16) {
        Self::positions(matrix.width()).enumerate().fold(
            (0, 0),
            |(first, second), (i, (a, b))| {
                (
                    first | (u16::from(matrix.get(a.0, a.1)) << i),
                    second | (u16::from(matrix.get(b.0, b.1)) << i),
                )
            },
        )
    }

    // (x, y) of bit i in the top-left copy and in the split copy.
    fn positions(size: usize) -> impl Iterator<Item = ((usize, usize), (usize, usize))> {
        (0..15usize).map(move |i| {
            let first = match i {
                0..=5 => (8, i),
                6 => (8, 7),
                7 => (8, 8),
                8 => (7, 8),
                _ => (14 - i, 8),
            };
            let second = if i < 8 {
                (size - 1 - i, 8)
            } else {
                (8, size - 15 + i)
            };
            (first, second)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_encode_vectors() {
        let cases = [
            (ECLevel::M, MaskPattern::Pattern0, 0b101010000010010),
            (ECLevel::L, MaskPattern::Pattern0, 0b111011111000100),
            (ECLevel::Q, MaskPattern::Pattern3, 0b011101000000110),
            (ECLevel::H, MaskPattern::Pattern7, 0b000100000111011),
        ];
        for (ec, mask, expected) in cases {
            assert_eq!(FormatInfo::new(ec, mask).encode(), expected, "{ec} {mask:?}");
        }
    }

    #[test]
    fn test_every_format_decodes_to_itself() {
        for ec in ECLevel::ALL {
            for mask in MaskPattern::ALL {
                let info = FormatInfo::new(ec, mask);
                assert_eq!(FormatInfo::decode(info.encode()), Some(info));
            }
        }
        assert_eq!(FormatInfo::all().count(), 32);
    }

    #[test]
    fn test_format_decode_with_errors() {
        let info = FormatInfo::new(ECLevel::Q, MaskPattern::Pattern5);
        let damaged = info.encode() ^ 0b100_0001_0000_0001;
        assert_eq!(FormatInfo::decode(damaged), Some(info));
    }

    #[test]
    fn test_draw_then_read() {
        let mut matrix = BitMatrix::square(25);
        let info = FormatInfo::new(ECLevel::H, MaskPattern::Pattern2);
        info.draw(&mut matrix);
        let (first, second) = FormatInfo::read(&matrix);
        assert_eq!(first, info.encode());
        assert_eq!(second, info.encode());
        // timing cells are never touched
        assert!(!matrix.get(8, 6));
        assert!(!matrix.get(6, 8));
    }
}
