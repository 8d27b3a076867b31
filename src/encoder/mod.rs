//! QR code encoding modules
//!
//! This module contains every stage between a payload and a finished symbol:
//! - Segmentation into numeric, alphanumeric and byte runs
//! - Data codewords, Reed-Solomon error correction and block interleaving
//! - Function patterns, zig-zag codeword placement
//! - Mask selection and format/version information

/// Bit accumulator used while building data codewords
pub mod bit_buffer;
/// Version selection, padding and interleaving
pub mod codewords;
/// Format information (EC level, mask pattern)
pub mod format;
/// Function module mask and structural pattern drawing
pub mod function_mask;
/// Mask patterns and penalty scoring
pub mod mask;
/// Per-mode data encoders (numeric, alphanumeric, byte)
pub mod modes;
/// Zig-zag codeword placement
pub mod placement;
/// Reed-Solomon error correction over GF(256)
pub mod reed_solomon;
/// Data segmentation
pub mod segment;
/// QR specification tables (ECC codewords/blocks)
pub mod tables;
/// Version information (versions 7-40)
pub mod version;

use tracing::debug;

use crate::error::EncodeError;
use crate::models::{ECLevel, MaskPattern, QRCode, Version};

use codewords::{add_ecc_and_interleave, data_codewords, plan};
use function_mask::build_matrix;
use mask::{masked_symbol, select_mask};
use placement::place_codewords;

/// Parameters of a single encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Requested error correction level
    pub ec_level: ECLevel,
    /// Smallest version to consider
    pub min_version: Version,
    /// Largest version to consider
    pub max_version: Version,
    /// Fixed mask instead of penalty-based selection
    pub mask: Option<MaskPattern>,
    /// Raise the EC level when the chosen version has room for it
    pub boost_ec_level: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ec_level: ECLevel::M,
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ec_level: false,
        }
    }
}

/// Run the full pipeline: segment, pick a version, add error correction,
/// place, mask.
pub fn encode_with(data: &[u8], options: &EncodeOptions) -> Result<QRCode, EncodeError> {
    let plan = plan(
        data,
        options.ec_level,
        options.min_version,
        options.max_version,
        options.boost_ec_level,
    )?;

    let data_words = data_codewords(&plan);
    let all_words = add_ecc_and_interleave(&data_words, plan.version, plan.ec_level);

    let (mut matrix, func) = build_matrix(plan.version);
    let placed = place_codewords(&mut matrix, &func, &all_words);
    debug_assert_eq!(placed, all_words.len() * 8);

    let (modules, mask_pattern) = match options.mask {
        Some(mask) => (masked_symbol(&matrix, &func, plan.ec_level, mask), mask),
        None => select_mask(&matrix, &func, plan.ec_level),
    };

    debug!(
        len = data.len(),
        version = plan.version.number(),
        ec_level = %plan.ec_level,
        mask = mask_pattern.id(),
        "encoded symbol"
    );

    Ok(QRCode {
        data: data.to_vec(),
        version: plan.version,
        error_correction: plan.ec_level,
        mask_pattern,
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_symbol() {
        let options = EncodeOptions {
            mask: Some(MaskPattern::Pattern2),
            ..EncodeOptions::default()
        };
        let code = encode_with(b"HELLO WORLD", &options).unwrap();
        assert_eq!(code.version, Version::MIN);
        assert_eq!(code.size(), 21);
        assert_eq!(code.mask_pattern, MaskPattern::Pattern2);
        // format bits for M / mask 2: 101111001111100, bit 14 first along row 8
        let row8: String = (0..6)
            .map(|x| if code.is_dark(x, 8) { '1' } else { '0' })
            .collect();
        assert_eq!(row8, "101111");
    }

    #[test]
    fn test_explicit_mask_is_used() {
        for mask in MaskPattern::ALL {
            let options = EncodeOptions {
                mask: Some(mask),
                ..EncodeOptions::default()
            };
            let code = encode_with(b"mask", &options).unwrap();
            assert_eq!(code.mask_pattern, mask);
        }
    }
}
