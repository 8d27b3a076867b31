//! Symbol capacity tables (Model 2, versions 1-40)

use crate::models::{ECLevel, Version};

/// Block structure of one version / error correction level combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// Number of Reed-Solomon blocks
    pub num_blocks: usize,
    /// Error correction codewords in every block
    pub ecc_per_block: usize,
}

// Index: [ec_level][version], L/M/Q/H rows, column 0 unused.
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

const NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];

/// Block layout for a version and level
pub fn ec_block_info(version: Version, ec_level: ECLevel) -> EcBlockInfo {
    let row = ec_level.table_index();
    let col = version.number() as usize;
    EcBlockInfo {
        num_blocks: NUM_ERROR_CORRECTION_BLOCKS[row][col] as usize,
        ecc_per_block: ECC_CODEWORDS_PER_BLOCK[row][col] as usize,
    }
}

/// Modules left for codewords once every function pattern is drawn,
/// including the remainder bits that do not fill a whole codeword.
pub fn num_raw_data_modules(version: Version) -> usize {
    let v = version.number() as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            // two version information blocks
            result -= 36;
        }
    }
    result
}

/// Total codewords (data + error correction) in the symbol
pub fn num_total_codewords(version: Version) -> usize {
    num_raw_data_modules(version) / 8
}

/// Data codewords available at a version and level
pub fn num_data_codewords(version: Version, ec_level: ECLevel) -> usize {
    let info = ec_block_info(version, ec_level);
    num_total_codewords(version) - info.num_blocks * info.ecc_per_block
}

/// Trailing light modules after the last codeword (0, 3, 4 or 7)
pub fn remainder_bits(version: Version) -> usize {
    num_raw_data_modules(version) % 8
}
