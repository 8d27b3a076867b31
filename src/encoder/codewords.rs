//! Version selection, data codeword assembly and block interleaving

use tracing::debug;

use crate::encoder::bit_buffer::BitBuffer;
use crate::encoder::reed_solomon::ReedSolomonEncoder;
use crate::encoder::segment::{Segment, segment_optimally, total_bits};
use crate::encoder::tables::{ec_block_info, num_data_codewords, num_total_codewords};
use crate::error::EncodeError;
use crate::models::{ECLevel, Version};

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Outcome of fitting a payload into a symbol
#[derive(Debug, Clone)]
pub struct Plan {
    /// Smallest version that holds the segments
    pub version: Version,
    /// Level after any boost
    pub ec_level: ECLevel,
    /// Segmentation computed for `version`
    pub segments: Vec<Segment>,
}

/// Pick the smallest version in `min..=max` whose capacity holds `data`
pub fn plan(
    data: &[u8],
    ec_level: ECLevel,
    min: Version,
    max: Version,
    boost_ec_level: bool,
) -> Result<Plan, EncodeError> {
    if min > max {
        return Err(EncodeError::InvalidVersion {
            min: min.number(),
            max: max.number(),
        });
    }

    // Segmentation only changes with the count-width group.
    let mut by_group: [Option<Vec<Segment>>; 3] = [None, None, None];

    for version in Version::all().filter(|v| (min..=max).contains(v)) {
        let group = version.group();
        if by_group[group].is_none() {
            by_group[group] = Some(segment_optimally(data, version)?);
        }
        let Some(segments) = &by_group[group] else {
            continue;
        };
        let Some(used) = total_bits(segments, version) else {
            continue;
        };
        if used > num_data_codewords(version, ec_level) * 8 {
            continue;
        }

        let mut level = ec_level;
        if boost_ec_level {
            for candidate in ECLevel::ALL.into_iter().skip(ec_level.table_index() + 1) {
                if used <= num_data_codewords(version, candidate) * 8 {
                    level = candidate;
                }
            }
        }

        debug!(
            version = version.number(),
            ec_level = %level,
            bits = used,
            segments = segments.len(),
            "selected symbol version"
        );
        return Ok(Plan {
            version,
            ec_level: level,
            segments: segments.clone(),
        });
    }

    Err(EncodeError::CapacityExceeded {
        len: data.len(),
        ec_level,
        max_version: max,
    })
}

/// Segments, terminator, byte alignment and pad bytes, filling exactly the
/// data capacity of the plan's version and level.
pub fn data_codewords(plan: &Plan) -> Vec<u8> {
    let capacity_bits = num_data_codewords(plan.version, plan.ec_level) * 8;
    let mut bits = BitBuffer::with_capacity(capacity_bits);
    for segment in &plan.segments {
        segment.write_to(plan.version, &mut bits);
    }
    debug_assert!(bits.len() <= capacity_bits);

    let terminator = (capacity_bits - bits.len()).min(4);
    bits.push_bits(0, terminator);
    let align = (8 - bits.len() % 8) % 8;
    bits.push_bits(0, align);

    let mut codewords = bits.to_bytes();
    let capacity = capacity_bits / 8;
    let mut pad = PAD_BYTES.iter().cycle();
    while codewords.len() < capacity {
        codewords.extend(pad.next());
    }
    codewords
}

/// Split data into blocks, append each block's ECC, and interleave
pub fn add_ecc_and_interleave(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
    let info = ec_block_info(version, ec_level);
    let total = num_total_codewords(version);
    debug_assert_eq!(data.len(), total - info.num_blocks * info.ecc_per_block);

    let num_long_blocks = total % info.num_blocks;
    let num_short_blocks = info.num_blocks - num_long_blocks;
    let short_len = total / info.num_blocks - info.ecc_per_block;

    let rs = ReedSolomonEncoder::new(info.ecc_per_block);
    let mut data_blocks: Vec<&[u8]> = Vec::with_capacity(info.num_blocks);
    let mut ecc_blocks: Vec<Vec<u8>> = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for b in 0..info.num_blocks {
        let len = if b < num_short_blocks {
            short_len
        } else {
            short_len + 1
        };
        let block = &data[offset..offset + len];
        ecc_blocks.push(rs.encode(block));
        data_blocks.push(block);
        offset += len;
    }

    let mut result = Vec::with_capacity(total);
    for i in 0..=short_len {
        for block in &data_blocks {
            if let Some(&c) = block.get(i) {
                result.push(c);
            }
        }
    }
    for i in 0..info.ecc_per_block {
        for block in &ecc_blocks {
            result.push(block[i]);
        }
    }
    result
}
