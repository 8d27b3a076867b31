/// Packed module grid
pub mod matrix;
/// Version, EC level, mask and the finished symbol
pub mod qr_code;

pub use matrix::BitMatrix;
pub use qr_code::{ECLevel, MaskPattern, QRCode, Version};
