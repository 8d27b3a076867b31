//! Error types returned by the encoder, renderer and reader

use thiserror::Error;

use crate::encoder::segment::Mode;
use crate::models::{ECLevel, Version};

/// Failure while turning a payload into a symbol
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The payload does not fit even the largest allowed version
    #[error(
        "payload of {len} bytes does not fit in a version {max_version} symbol at error correction level {ec_level}"
    )]
    CapacityExceeded {
        /// Payload length in bytes
        len: usize,
        /// Requested error correction level
        ec_level: ECLevel,
        /// Largest version that was tried
        max_version: Version,
    },
    /// A mode encoder was handed a byte outside its character set
    #[error("byte {byte:#04x} cannot be encoded in {mode:?} mode")]
    InvalidCharacterForMode {
        /// Offending byte
        byte: u8,
        /// Mode that rejected it
        mode: Mode,
    },
    /// Version bounds outside 1..=40 or min > max
    #[error("invalid version range {min}..={max}")]
    InvalidVersion {
        /// Requested lower bound
        min: u8,
        /// Requested upper bound
        max: u8,
    },
}

/// Failure while rasterizing or writing an image
#[derive(Debug, Error)]
pub enum RenderError {
    /// Module scale of zero pixels
    #[error("module scale must be at least one pixel")]
    InvalidScale,
    /// Rendered image would not fit in `u32` pixel dimensions
    #[error("rendered image of {0} pixels per side is too large")]
    TooLarge(usize),
    /// PNG encoding failed
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Failure while reading a symbol back to its payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Matrix or raster does not describe a 17 + 4v square
    #[error("{0} modules is not a valid symbol size")]
    InvalidDimension(usize),
    /// Version information disagrees with the symbol size
    #[error("version information does not match symbol size")]
    VersionMismatch,
    /// Neither copy of the format information is readable
    #[error("format information is unreadable")]
    FormatInfo,
    /// Error correction codewords do not match the data of a block
    #[error("error correction check failed in block {block}")]
    Checksum {
        /// Zero-based block index
        block: usize,
    },
    /// Segment headers or counts run past the data codewords
    #[error("malformed payload: {0}")]
    MalformedPayload(&'static str),
}
