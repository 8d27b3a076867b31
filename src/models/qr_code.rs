use std::fmt;
use std::str::FromStr;

use super::BitMatrix;

/// QR code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest version
    pub const MIN: Version = Version(1);
    /// Largest version
    pub const MAX: Version = Version(40);

    /// Create a version, `None` outside 1..=40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Version inferred from a symbol side length (`17 + 4 * v`)
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((size - 17) / 4).ok().and_then(Self::new)
    }

    /// The version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        4 * (self.0 as usize) + 17
    }

    /// Index of the character-count width group (1-9, 10-26, 27-40)
    pub fn group(&self) -> usize {
        match self.0 {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        }
    }

    /// All versions in ascending order
    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    #[default]
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// Levels ordered from least to most redundancy
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Two-bit value stored in the format information (L=01, M=00, Q=11, H=10)
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Inverse of [`ECLevel::format_bits`]
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// Row index into the per-level block tables
    pub(crate) fn table_index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ECLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ECLevel::L => "L",
            ECLevel::M => "M",
            ECLevel::Q => "Q",
            ECLevel::H => "H",
        };
        f.write_str(name)
    }
}

impl FromStr for ECLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(ECLevel::L),
            "M" | "MEDIUM" => Ok(ECLevel::M),
            "Q" | "QUARTILE" => Ok(ECLevel::Q),
            "H" | "HIGH" => Ok(ECLevel::H),
            other => Err(format!("unknown error correction level '{other}'")),
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// All eight patterns in id order
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    /// Mask pattern from its three-bit id
    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.get(bits as usize).copied()
    }

    /// Three-bit id of the pattern
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Whether the module at row `i`, column `j` is flipped
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// A finished QR code symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QRCode {
    /// Encoded payload bytes
    pub data: Vec<u8>,
    /// Symbol version
    pub version: Version,
    /// Error correction level written into the format information
    pub error_correction: ECLevel,
    /// Mask pattern applied to the data modules
    pub mask_pattern: MaskPattern,
    /// Module matrix (true = dark)
    pub modules: BitMatrix,
}

impl QRCode {
    /// Side length in modules
    pub fn size(&self) -> usize {
        self.version.size()
    }

    /// Whether the module at column `x`, row `y` is dark
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules.get(x, y)
    }
}
