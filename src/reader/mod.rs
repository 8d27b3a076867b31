//! Reading finished symbols back to their payload
//!
//! The reader works on symbols whose geometry is already known: a module
//! matrix as produced by the encoder, or a raster produced by
//! [`crate::render::to_image`] with a known scale and quiet zone. It checks
//! the error correction codewords but does not correct errors.

/// Segment parsing
pub mod payload;

use image::GrayImage;
use tracing::debug;

use crate::encoder::format::FormatInfo;
use crate::encoder::function_mask::FunctionMask;
use crate::encoder::mask::apply_mask;
use crate::encoder::placement::ZigZag;
use crate::encoder::reed_solomon::ReedSolomonEncoder;
use crate::encoder::tables::{ec_block_info, num_total_codewords};
use crate::encoder::version::VersionInfo;
use crate::error::ReadError;
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

use payload::parse_segments;

/// Luma below this value reads as a dark module
const DARK_THRESHOLD: u8 = 128;

/// Payload and metadata recovered from a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Payload bytes
    pub data: Vec<u8>,
    /// Symbol version
    pub version: Version,
    /// Error correction level from the format information
    pub ec_level: ECLevel,
    /// Mask pattern from the format information
    pub mask_pattern: MaskPattern,
}

impl Decoded {
    /// Payload as UTF-8 text, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Read a module matrix (no quiet zone, one cell per module)
pub fn read_matrix(matrix: &BitMatrix) -> Result<Decoded, ReadError> {
    let size = matrix.width();
    if matrix.height() != size {
        return Err(ReadError::InvalidDimension(size));
    }
    let version = Version::from_size(size).ok_or(ReadError::InvalidDimension(size))?;

    if version.number() >= 7 {
        let read = VersionInfo::decode(VersionInfo::read_top_right(matrix))
            .or_else(|| VersionInfo::decode(VersionInfo::read_bottom_left(matrix)));
        if read != Some(version) {
            return Err(ReadError::VersionMismatch);
        }
    }

    let (first, second) = FormatInfo::read(matrix);
    let format = FormatInfo::decode(first)
        .or_else(|| FormatInfo::decode(second))
        .ok_or(ReadError::FormatInfo)?;

    let func = FunctionMask::new(version);
    let mut unmasked = matrix.clone();
    apply_mask(&mut unmasked, format.mask_pattern, &func);

    let total = num_total_codewords(version);
    let mut codewords = vec![0u8; total];
    for (i, (x, y)) in ZigZag::new(&func).take(total * 8).enumerate() {
        if unmasked.get(x, y) {
            codewords[i / 8] |= 0x80 >> (i % 8);
        }
    }

    let data_codewords = deinterleave_and_check(&codewords, version, format.ec_level)?;
    let data = parse_segments(&data_codewords, version)?;

    debug!(
        version = version.number(),
        ec_level = %format.ec_level,
        mask = format.mask_pattern.id(),
        len = data.len(),
        "read symbol"
    );

    Ok(Decoded {
        data,
        version,
        ec_level: format.ec_level,
        mask_pattern: format.mask_pattern,
    })
}

/// Sample module centres of a rendered raster and read the result
pub fn read_raster(image: &GrayImage, scale: u32, border: u32) -> Result<Decoded, ReadError> {
    let (width, height) = image.dimensions();
    let invalid = ReadError::InvalidDimension(width as usize);
    if width != height || scale == 0 || width % scale != 0 {
        return Err(invalid);
    }
    let modules = border
        .checked_mul(2)
        .and_then(|margin| (width / scale).checked_sub(margin))
        .ok_or(invalid)? as usize;

    let mut matrix = BitMatrix::square(modules);
    for y in 0..modules {
        for x in 0..modules {
            let px = (border + x as u32) * scale + scale / 2;
            let py = (border + y as u32) * scale + scale / 2;
            let luma = image.get_pixel(px, py).0[0];
            matrix.set(x, y, luma < DARK_THRESHOLD);
        }
    }
    read_matrix(&matrix)
}

/// Undo block interleaving and confirm every block's error correction
/// codewords. Returns the data codewords in block order.
fn deinterleave_and_check(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>, ReadError> {
    let info = ec_block_info(version, ec_level);
    let total = codewords.len();
    let num_long_blocks = total % info.num_blocks;
    let num_short_blocks = info.num_blocks - num_long_blocks;
    let short_len = total / info.num_blocks - info.ecc_per_block;
    let block_len = |b: usize| {
        if b < num_short_blocks {
            short_len
        } else {
            short_len + 1
        }
    };

    let mut data_blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|b| Vec::with_capacity(block_len(b)))
        .collect();
    let mut ecc_blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(info.ecc_per_block))
        .collect();

    let mut stream = codewords.iter().copied();
    for i in 0..=short_len {
        for (b, block) in data_blocks.iter_mut().enumerate() {
            if i < block_len(b) {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in ecc_blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonEncoder::new(info.ecc_per_block);
    let mut data = Vec::with_capacity(total - info.num_blocks * info.ecc_per_block);
    for (block, (data_block, ecc_block)) in data_blocks.iter().zip(&ecc_blocks).enumerate() {
        if rs.encode(data_block) != *ecc_block {
            return Err(ReadError::Checksum { block });
        }
        data.extend_from_slice(data_block);
    }
    Ok(data)
}
