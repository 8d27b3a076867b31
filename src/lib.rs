//! qr_forge - QR code generation in pure Rust
//!
//! Encodes text or bytes into QR Model 2 symbols (versions 1-40, all four
//! error correction levels), renders them to PNG, and ships a small HTTP
//! service and CLI on top.
//!
//! ```
//! use qr_forge::{ECLevel, encode, render};
//!
//! let code = encode(b"HELLO WORLD", ECLevel::M).unwrap();
//! assert_eq!(code.version.number(), 1);
//! let png = render::render_png(&code, 10, 4).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Service configuration from the environment
pub mod config;
/// QR code encoding modules (segmentation, error correction, placement, masking)
pub mod encoder;
/// Error types
pub mod error;
/// Core data structures (QRCode, BitMatrix, Version, etc.)
pub mod models;
/// Reading finished symbols back to their payload
pub mod reader;
/// PNG and terminal rendering
pub mod render;
/// HTTP service
pub mod server;

pub use encoder::EncodeOptions;
pub use error::{EncodeError, ReadError, RenderError};
pub use models::{BitMatrix, ECLevel, MaskPattern, QRCode, Version};

/// Encode bytes at the given error correction level, using the smallest
/// version that fits and the lowest-penalty mask.
///
/// # Example
/// ```
/// use qr_forge::{ECLevel, encode};
///
/// let code = encode(b"01234567", ECLevel::H).unwrap();
/// assert_eq!(code.size(), 21);
/// ```
pub fn encode(data: &[u8], ec_level: ECLevel) -> Result<QRCode, EncodeError> {
    Encoder::new().ec_level(ec_level).encode(data)
}

/// Encode the UTF-8 bytes of `text` at the default level (M)
pub fn encode_text(text: &str) -> Result<QRCode, EncodeError> {
    Encoder::new().encode(text.as_bytes())
}

/// Encoder with configuration options
///
/// ```
/// use qr_forge::{ECLevel, Encoder, MaskPattern, Version};
///
/// let code = Encoder::new()
///     .ec_level(ECLevel::Q)
///     .min_version(Version::new(5).unwrap())
///     .mask(MaskPattern::Pattern3)
///     .encode(b"hello")
///     .unwrap();
/// assert_eq!(code.version.number(), 5);
/// assert_eq!(code.mask_pattern, MaskPattern::Pattern3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    options: EncodeOptions,
}

impl Encoder {
    /// Create an encoder with default settings (level M, versions 1-40,
    /// automatic mask)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error correction level
    pub fn ec_level(mut self, ec_level: ECLevel) -> Self {
        self.options.ec_level = ec_level;
        self
    }

    /// Smallest version to consider
    pub fn min_version(mut self, version: Version) -> Self {
        self.options.min_version = version;
        self
    }

    /// Largest version to consider
    pub fn max_version(mut self, version: Version) -> Self {
        self.options.max_version = version;
        self
    }

    /// Use a fixed mask pattern instead of penalty scoring
    pub fn mask(mut self, mask: MaskPattern) -> Self {
        self.options.mask = Some(mask);
        self
    }

    /// Raise the error correction level while the data still fits the
    /// chosen version
    pub fn boost_ec_level(mut self, boost: bool) -> Self {
        self.options.boost_ec_level = boost;
        self
    }

    /// Current options
    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encode a byte payload
    pub fn encode(&self, data: &[u8]) -> Result<QRCode, EncodeError> {
        encoder::encode_with(data, &self.options)
    }
}
