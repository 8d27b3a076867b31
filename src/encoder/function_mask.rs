use crate::encoder::version::draw_version_info;
use crate::models::{BitMatrix, Version};

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    mask: BitMatrix,
}

impl FunctionMask {
    /// Mark every function module of `version`
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::square(size);

        // Finder patterns + separators (up to 9x9 areas, clipped to bounds)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            for dy in 0..5 {
                for dx in 0..5 {
                    mask.set(cx - 2 + dx, cy - 2 + dy, true);
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        // Version info (v7+)
        if version.number() >= 7 {
            for dy in 0..6 {
                for dx in 0..3 {
                    mask.set(size - 11 + dx, dy, true);
                    mask.set(dy, size - 11 + dx, true);
                }
            }
        }

        Self { mask }
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// True when (x, y) is not a data module
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Modules left for codewords and remainder bits
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_dark()
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 7 + 1).min(size);
        let end_y = (y + 7 + 1).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Blank symbol with every structural pattern drawn, plus its function
/// mask. Format information cells are reserved but left light.
pub fn build_matrix(version: Version) -> (BitMatrix, FunctionMask) {
    let size = version.size();
    let mut matrix = BitMatrix::square(size);

    for i in 0..size {
        matrix.set(6, i, i % 2 == 0);
        matrix.set(i, 6, i % 2 == 0);
    }

    draw_finder(&mut matrix, 3, 3);
    draw_finder(&mut matrix, size - 4, 3);
    draw_finder(&mut matrix, 3, size - 4);

    for (cx, cy) in alignment_centers(version) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let ring = dx.abs().max(dy.abs());
                let x = (cx as i32 + dx) as usize;
                let y = (cy as i32 + dy) as usize;
                matrix.set(x, y, ring != 1);
            }
        }
    }

    // Dark module
    matrix.set(8, size - 8, true);

    draw_version_info(&mut matrix, version);

    (matrix, FunctionMask::new(version))
}

// 7x7 finder centred on (cx, cy) with its light separator ring.
fn draw_finder(matrix: &mut BitMatrix, cx: usize, cy: usize) {
    for dy in -4i32..=4 {
        for dx in -4i32..=4 {
            let x = cx as i32 + dx;
            let y = cy as i32 + dy;
            if x < 0 || y < 0 {
                continue;
            }
            let ring = dx.abs().max(dy.abs());
            matrix.set(x as usize, y as usize, ring != 2 && ring != 4);
        }
    }
}

/// Alignment pattern centers for a given version.
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let size = version.size();
    let step = if v == 32 {
        26
    } else {
        // even spacing from the last centre back towards 6
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let mut positions = vec![0usize; num_align];
    positions[0] = 6;
    let mut pos = size - 7;
    for i in (1..num_align).rev() {
        positions[i] = pos;
        pos = pos.saturating_sub(step);
    }
    positions
}

// Every pairing of positions except the three that sit on a finder.
fn alignment_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &cx) in positions.iter().enumerate() {
        for (j, &cy) in positions.iter().enumerate() {
            let on_finder = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !on_finder {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tables::num_raw_data_modules;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(v(1)).is_empty());
        assert_eq!(alignment_pattern_positions(v(2)), vec![6, 18]);
        assert_eq!(alignment_pattern_positions(v(7)), vec![6, 22, 38]);
        assert_eq!(alignment_pattern_positions(v(32)), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(
            alignment_pattern_positions(v(40)),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
    }

    #[test]
    fn test_data_module_count_matches_capacity_formula() {
        for version in Version::all() {
            let mask = FunctionMask::new(version);
            assert_eq!(
                mask.data_modules_count(),
                num_raw_data_modules(version),
                "version {version}"
            );
        }
    }

    #[test]
    fn test_finder_pattern_shape() {
        let (matrix, _) = build_matrix(v(1));
        let row0: Vec<bool> = (0..8).map(|x| matrix.get(x, 0)).collect();
        assert_eq!(row0, vec![true, true, true, true, true, true, true, false]);
        let row2: Vec<bool> = (0..8).map(|x| matrix.get(x, 2)).collect();
        assert_eq!(row2, vec![true, false, true, true, true, false, true, false]);
        // top-right finder mirrors it
        assert!(matrix.get(20, 0) && matrix.get(14, 0) && !matrix.get(13, 0));
        // bottom-left finder
        assert!(matrix.get(0, 20) && matrix.get(0, 14) && !matrix.get(0, 13));
    }

    #[test]
    fn test_timing_and_dark_module() {
        let (matrix, func) = build_matrix(v(2));
        for i in 8..17 {
            assert_eq!(matrix.get(i, 6), i % 2 == 0);
            assert_eq!(matrix.get(6, i), i % 2 == 0);
        }
        assert!(matrix.get(8, 25 - 8));
        assert!(func.is_function(8, 25 - 8));
    }

    #[test]
    fn test_alignment_pattern_drawn() {
        let (matrix, func) = build_matrix(v(2));
        assert!(matrix.get(18, 18));
        assert!(!matrix.get(17, 18));
        assert!(matrix.get(16, 16));
        assert!(func.is_function(16, 20));
        assert!(!func.is_function(15, 20));
    }

    #[test]
    fn test_only_function_cells_are_drawn() {
        for n in [1, 7, 22] {
            let (matrix, func) = build_matrix(v(n));
            for y in 0..matrix.height() {
                for x in 0..matrix.width() {
                    if matrix.get(x, y) {
                        assert!(func.is_function(x, y), "v{n} ({x}, {y})");
                    }
                }
            }
        }
    }
}
