//! Data masking and mask selection
//!
//! Every candidate pattern is applied to a copy of the placed symbol, its
//! format information drawn, and the result scored with the four penalty
//! rules. Candidates are scored in parallel; the lowest score wins and ties
//! go to the lowest mask id, so the choice does not depend on scheduling.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::encoder::format::FormatInfo;
use crate::encoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

const FINDER_CORE: [bool; 7] = [true, false, true, true, true, false, true];

/// XOR the mask predicate over every data module
pub fn apply_mask(matrix: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let width = matrix.width();
    let height = matrix.height();

    for y in 0..height {
        for x in 0..width {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

/// Penalty score split by rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Penalty {
    /// Runs of five or more same-colour modules
    pub runs: u32,
    /// 2x2 same-colour blocks
    pub blocks: u32,
    /// 1:1:3:1:1 patterns with a light margin
    pub finder_like: u32,
    /// Dark/light imbalance
    pub balance: u32,
}

impl Penalty {
    /// Sum of the four rules
    pub fn total(&self) -> u32 {
        self.runs + self.blocks + self.finder_like + self.balance
    }
}

/// Score a finished symbol (lower is better)
pub fn penalty(matrix: &BitMatrix) -> Penalty {
    let size = matrix.width();
    let rows: Vec<Vec<bool>> = matrix.rows().collect();
    let cols: Vec<Vec<bool>> = (0..size)
        .map(|x| (0..size).map(|y| matrix.get(x, y)).collect())
        .collect();

    let lines = || rows.iter().chain(cols.iter());

    let runs = lines().map(|line| run_penalty(line)).sum();
    let finder_like = lines().map(|line| finder_penalty(line)).sum();

    let mut blocks = 0;
    for y in 0..size.saturating_sub(1) {
        for x in 0..size - 1 {
            let c = rows[y][x];
            if rows[y][x + 1] == c && rows[y + 1][x] == c && rows[y + 1][x + 1] == c {
                blocks += N2;
            }
        }
    }

    let total = size * size;
    let dark = matrix.count_dark();
    let deviation = (dark * 20).abs_diff(total * 10) / total;
    let balance = deviation as u32 * N4;

    Penalty {
        runs,
        blocks,
        finder_like,
        balance,
    }
}

fn run_penalty(line: &[bool]) -> u32 {
    let mut score = 0;
    let mut run = 0;
    for (i, &module) in line.iter().enumerate() {
        if i > 0 && module == line[i - 1] {
            run += 1;
        } else {
            run = 1;
        }
        if run == 5 {
            score += N1;
        } else if run > 5 {
            score += 1;
        }
    }
    score
}

fn finder_penalty(line: &[bool]) -> u32 {
    // Modules outside the symbol count as light.
    let light = |from: isize, to: isize| {
        (from..to).all(|i| i < 0 || i as usize >= line.len() || !line[i as usize])
    };
    let mut score = 0;
    for start in 0..line.len().saturating_sub(6) {
        if line[start..start + 7] != FINDER_CORE {
            continue;
        }
        let s = start as isize;
        if light(s - 4, s) || light(s + 7, s + 11) {
            score += N3;
        }
    }
    score
}

/// Apply the best of the eight masks and draw the matching format
/// information. Returns the finished matrix and the chosen pattern.
pub fn select_mask(
    matrix: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
) -> (BitMatrix, MaskPattern) {
    let candidate = MaskPattern::ALL
        .par_iter()
        .map(|&mask| {
            let masked = masked_symbol(matrix, func, ec_level, mask);
            let score = penalty(&masked);
            trace!(mask = mask.id(), ?score, total = score.total(), "mask candidate");
            (score.total(), mask, masked)
        })
        .min_by_key(|(score, mask, _)| (*score, *mask));

    match candidate {
        Some((score, mask, masked)) => {
            debug!(mask = mask.id(), score, "selected mask pattern");
            (masked, mask)
        }
        // ALL is never empty
        None => (
            masked_symbol(matrix, func, ec_level, MaskPattern::Pattern0),
            MaskPattern::Pattern0,
        ),
    }
}

/// Copy of `matrix` with `mask` applied and format information drawn
pub fn masked_symbol(
    matrix: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
    mask: MaskPattern,
) -> BitMatrix {
    let mut masked = matrix.clone();
    apply_mask(&mut masked, mask, func);
    FormatInfo::new(ec_level, mask).draw(&mut masked);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::function_mask::build_matrix;
    use crate::encoder::placement::place_codewords;
    use crate::encoder::tables::num_total_codewords;
    use crate::models::Version;

    fn line(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_apply_mask_skips_function_modules() {
        let func = FunctionMask::new(Version::MIN);
        let mut matrix = BitMatrix::square(21);
        apply_mask(&mut matrix, MaskPattern::Pattern0, &func);
        // Pattern0: (i + j) % 2 == 0
        assert!(matrix.get(10, 10));
        assert!(!matrix.get(11, 10));
        assert!(!matrix.get(0, 0));
        apply_mask(&mut matrix, MaskPattern::Pattern0, &func);
        assert_eq!(matrix.count_dark(), 0);
    }

    #[test]
    fn test_run_penalty() {
        assert_eq!(run_penalty(&line("1111")), 0);
        assert_eq!(run_penalty(&line("11111")), 3);
        assert_eq!(run_penalty(&line("0111111100000")), 5 + 3);
    }

    #[test]
    fn test_finder_penalty() {
        assert_eq!(finder_penalty(&line("00001011101")), 40);
        assert_eq!(finder_penalty(&line("10111010000")), 40);
        // at the symbol edge the outside counts as light
        assert_eq!(finder_penalty(&line("1011101")), 40);
        assert_eq!(finder_penalty(&line("11011101011")), 0);
        assert_eq!(finder_penalty(&line("000010111010000")), 40);
    }

    #[test]
    fn test_block_and_balance_penalty() {
        let all_light = BitMatrix::square(21);
        let p = penalty(&all_light);
        assert_eq!(p.blocks, 20 * 20 * 3);
        assert_eq!(p.balance, 100);
        assert_eq!(p.runs, 42 * (3 + 16));
        assert_eq!(p.finder_like, 0);
    }

    #[test]
    fn test_selected_mask_has_lowest_penalty() {
        let version = Version::new(3).unwrap();
        let (mut matrix, func) = build_matrix(version);
        let codewords: Vec<u8> = (0..num_total_codewords(version))
            .map(|i| (i as u8).wrapping_mul(73).wrapping_add(11))
            .collect();
        place_codewords(&mut matrix, &func, &codewords);

        let (chosen, mask) = select_mask(&matrix, &func, ECLevel::Q);
        let chosen_score = penalty(&chosen).total();
        for other in MaskPattern::ALL {
            let score = penalty(&masked_symbol(&matrix, &func, ECLevel::Q, other)).total();
            assert!(chosen_score <= score, "mask {other:?} beats {mask:?}");
            if score == chosen_score {
                assert!(mask <= other);
            }
        }
        assert_eq!(chosen, masked_symbol(&matrix, &func, ECLevel::Q, mask));
    }
}
