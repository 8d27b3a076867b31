/// Packed matrix of modules, one bit per cell (true = dark)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create an all-light matrix with the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Create an all-light square matrix
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Matrix width in modules
    pub fn width(&self) -> usize {
        self.width
    }

    /// Matrix height in modules
    pub fn height(&self) -> usize {
        self.height
    }

    /// Module at column `x`, row `y`. Out-of-range cells read as light.
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (byte_index, bit_index) = self.locate(x, y);
        (self.data[byte_index] >> bit_index) & 1 == 1
    }

    /// Set the module at column `x`, row `y`. Out-of-range writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (byte_index, bit_index) = self.locate(x, y);
        if value {
            self.data[byte_index] |= 1 << bit_index;
        } else {
            self.data[byte_index] &= !(1 << bit_index);
        }
    }

    /// Flip the module at column `x`, row `y`
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (byte_index, bit_index) = self.locate(x, y);
        self.data[byte_index] ^= 1 << bit_index;
    }

    /// Number of dark modules
    pub fn count_dark(&self) -> usize {
        // Padding bits past width * height are never set.
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Rows of the matrix as booleans, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        (0..self.height).map(move |y| (0..self.width).map(|x| self.get(x, y)).collect())
    }

    fn locate(&self, x: usize, y: usize) -> (usize, usize) {
        let index = y * self.width + x;
        (index / 8, index % 8)
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
