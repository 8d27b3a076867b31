/// Version information for QR codes v7+
use crate::models::{BitMatrix, Version};

/// Version info is 18 bits (6 data + 12 ECC) for versions 7-40
pub struct VersionInfo;

impl VersionInfo {
    /// 18-bit version information codeword
    pub fn encode(version: Version) -> u32 {
        // BCH(18,6) generator: x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
        const GENERATOR: u32 = 0x1F25;
        let data = u32::from(version.number());
        let mut rem = data;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * GENERATOR);
        }
        (data << 12) | (rem & 0xFFF)
    }

    /// Nearest valid version for a read codeword, up to three bit errors
    pub fn decode(bits: u32) -> Option<Version> {
        (7..=40)
            .filter_map(Version::new)
            .map(|v| (v, (Self::encode(v) ^ bits).count_ones()))
            .filter(|&(_, distance)| distance <= 3)
            .min_by_key(|&(_, distance)| distance)
            .map(|(v, _)| v)
    }

    /// Read the top-right copy (6 rows x 3 columns)
    pub fn read_top_right(matrix: &BitMatrix) -> u32 {
        let size = matrix.width();
        (0..18).fold(0, |bits, i| {
            bits | (u32::from(matrix.get(size - 11 + i % 3, i / 3)) << i)
        })
    }

    /// Read the bottom-left copy (3 rows x 6 columns)
    pub fn read_bottom_left(matrix: &BitMatrix) -> u32 {
        let size = matrix.width();
        (0..18).fold(0, |bits, i| {
            bits | (u32::from(matrix.get(i / 3, size - 11 + i % 3)) << i)
        })
    }
}

/// Write both version information blocks (no-op below version 7)
pub fn draw_version_info(matrix: &mut BitMatrix, version: Version) {
    if version.number() < 7 {
        return;
    }
    let size = matrix.width();
    let bits = VersionInfo::encode(version);
    for i in 0..18 {
        let bit = (bits >> i) & 1 == 1;
        let a = size - 11 + i % 3;
        let b = i / 3;
        matrix.set(a, b, bit);
        matrix.set(b, a, bit);
    }
}
