//! Codeword placement along the zig-zag module path
use crate::encoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Data module coordinates `(x, y)` in placement order.
///
/// Column pairs are walked from the right edge, skipping the vertical
/// timing column, alternating upward and downward; within a row the right
/// column comes first. Function modules are skipped.
pub struct ZigZag<'a> {
    func: &'a FunctionMask,
    dimension: usize,
    // right column of the current pair
    col: usize,
    // step within the pair: row index * 2 + column offset
    step: usize,
    upward: bool,
    done: bool,
}

impl<'a> ZigZag<'a> {
    /// Start at the bottom-right corner, moving up
    pub fn new(func: &'a FunctionMask) -> Self {
        let dimension = func.size();
        Self {
            func,
            dimension,
            col: dimension - 1,
            step: 0,
            upward: true,
            done: false,
        }
    }

    fn advance_pair(&mut self) {
        if self.col < 2 {
            self.done = true;
            return;
        }
        self.col -= 2;
        if self.col == 6 {
            self.col = 5;
        }
        self.step = 0;
        self.upward = !self.upward;
    }
}

impl Iterator for ZigZag<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.step == self.dimension * 2 {
                self.advance_pair();
                continue;
            }
            let vert = self.step / 2;
            let x = self.col - self.step % 2;
            let y = if self.upward {
                self.dimension - 1 - vert
            } else {
                vert
            };
            self.step += 1;
            if !self.func.is_function(x, y) {
                return Some((x, y));
            }
        }
        None
    }
}

/// Write codeword bits MSB-first into the data modules. Returns the number
/// of modules written; modules past the last bit are left light.
pub fn place_codewords(matrix: &mut BitMatrix, func: &FunctionMask, codewords: &[u8]) -> usize {
    let total_bits = codewords.len() * 8;
    let mut placed = 0;
    for (x, y) in ZigZag::new(func) {
        if placed == total_bits {
            break;
        }
        let bit = (codewords[placed / 8] >> (7 - placed % 8)) & 1 == 1;
        matrix.set(x, y, bit);
        placed += 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tables::{num_total_codewords, remainder_bits};
    use crate::models::Version;
    use std::collections::HashSet;

    #[test]
    fn test_zigzag_start() {
        let func = FunctionMask::new(Version::MIN);
        let first: Vec<(usize, usize)> = ZigZag::new(&func).take(5).collect();
        assert_eq!(first, vec![(20, 20), (19, 20), (20, 19), (19, 19), (20, 18)]);
    }

    #[test]
    fn test_zigzag_turns_at_top() {
        // v1 rightmost pair holds rows 9..=20; the next pair walks downward
        let func = FunctionMask::new(Version::MIN);
        let path: Vec<(usize, usize)> = ZigZag::new(&func).skip(24).take(2).collect();
        assert_eq!(path, vec![(18, 9), (17, 9)]);
    }

    #[test]
    fn test_zigzag_visits_every_data_module_once() {
        for version in Version::all() {
            let func = FunctionMask::new(version);
            let mut seen = HashSet::new();
            for (x, y) in ZigZag::new(&func) {
                assert!(!func.is_function(x, y));
                assert!(x != 6, "timing column visited");
                assert!(seen.insert((x, y)), "v{version} ({x}, {y}) visited twice");
            }
            assert_eq!(seen.len(), func.data_modules_count());
            assert_eq!(
                seen.len(),
                num_total_codewords(version) * 8 + remainder_bits(version)
            );
        }
    }

    #[test]
    fn test_place_codewords_bit_order() {
        let version = Version::MIN;
        let func = FunctionMask::new(version);
        let mut matrix = BitMatrix::square(version.size());
        let mut codewords = vec![0u8; num_total_codewords(version)];
        codewords[0] = 0b1010_0000;
        let placed = place_codewords(&mut matrix, &func, &codewords);
        assert_eq!(placed, 26 * 8);
        assert!(matrix.get(20, 20));
        assert!(!matrix.get(19, 20));
        assert!(matrix.get(20, 19));
        assert_eq!(matrix.count_dark(), 2);
    }

    #[test]
    fn test_remainder_modules_stay_light() {
        let version = Version::new(2).unwrap();
        let func = FunctionMask::new(version);
        let mut matrix = BitMatrix::square(version.size());
        let codewords = vec![0xFF; num_total_codewords(version)];
        let placed = place_codewords(&mut matrix, &func, &codewords);
        assert_eq!(placed, 44 * 8);
        assert_eq!(matrix.count_dark(), 44 * 8);
        assert_eq!(func.data_modules_count() - placed, 7);
    }
}
