//! Per-mode data encoders
//!
//! - Numeric: digits 0-9, three per 10 bits
//! - Alphanumeric: the 45-character set, two per 11 bits
//! - Byte: arbitrary 8-bit data

/// Alphanumeric mode
pub mod alphanumeric;
/// Byte mode
pub mod byte;
/// Numeric mode
pub mod numeric;
