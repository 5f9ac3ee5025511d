//! 2x2 integer matrices and the operation set spells are built from.
//!
//! A [`Matrix`] is a plain `Copy` value laid out row-major as
//! `[[a, b], [c, d]]`. Every operation returns a fresh matrix; nothing in this
//! module mutates its inputs. All arithmetic saturates so the functions are
//! total over `i32`.

mod operation;

pub use operation::{Operation, apply};

use std::fmt;

/// Row-major 2x2 matrix of integer cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
}

impl Matrix {
    pub const ZERO: Self = Self::new(0, 0, 0, 0);
    pub const IDENTITY: Self = Self::new(1, 0, 0, 1);

    pub const fn new(a: i32, b: i32, c: i32, d: i32) -> Self {
        Self { a, b, c, d }
    }

    /// Builds a matrix with every cell set to `value`.
    pub const fn splat(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    pub const fn from_cells(cells: [i32; 4]) -> Self {
        Self::new(cells[0], cells[1], cells[2], cells[3])
    }

    /// Cells in row-major order.
    pub const fn cells(&self) -> [i32; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Returns the cell at `(row, col)`, or `None` outside the 2x2 range.
    pub const fn get(&self, row: usize, col: usize) -> Option<i32> {
        match (row, col) {
            (0, 0) => Some(self.a),
            (0, 1) => Some(self.b),
            (1, 0) => Some(self.c),
            (1, 1) => Some(self.d),
            _ => None,
        }
    }

    pub const fn row(&self, row: usize) -> [i32; 2] {
        if row == 0 {
            [self.a, self.b]
        } else {
            [self.c, self.d]
        }
    }

    /// Applies `f` to every cell.
    pub fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self::new(f(self.a), f(self.b), f(self.c), f(self.d))
    }

    /// Combines corresponding cells of two matrices.
    pub fn zip_with(self, other: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self::new(
            f(self.a, other.a),
            f(self.b, other.b),
            f(self.c, other.c),
            f(self.d, other.d),
        )
    }

    /// Sum of absolute cell values.
    pub fn magnitude(&self) -> u32 {
        self.cells()
            .iter()
            .fold(0u32, |acc, cell| acc.saturating_add(cell.unsigned_abs()))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Clamps every cell into `[floor, ceiling]`.
    pub fn clamp(self, floor: i32, ceiling: i32) -> Self {
        let ceiling = ceiling.max(floor);
        self.map(|cell| cell.clamp(floor, ceiling))
    }

    /// Scales every cell by `percent / 100`, rounding toward zero.
    pub fn scale_percent(self, percent: u32) -> Self {
        let percent = i64::from(percent);
        self.map(|cell| {
            let scaled = i64::from(cell) * percent / 100;
            scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        })
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}, {}], [{}, {}]]", self.a, self.b, self.c, self.d)
    }
}

impl From<[i32; 4]> for Matrix {
    fn from(cells: [i32; 4]) -> Self {
        Self::from_cells(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_sums_absolute_values() {
        assert_eq!(Matrix::new(1, -2, 3, -4).magnitude(), 10);
        assert_eq!(Matrix::ZERO.magnitude(), 0);
    }

    #[test]
    fn clamp_applies_floor_and_ceiling() {
        let clamped = Matrix::new(-5, 3, 120, 0).clamp(0, 99);
        assert_eq!(clamped, Matrix::new(0, 3, 99, 0));
    }

    #[test]
    fn get_uses_row_major_layout() {
        let m = Matrix::new(1, 2, 3, 4);
        assert_eq!(m.get(0, 1), Some(2));
        assert_eq!(m.get(1, 0), Some(3));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn scale_percent_rounds_toward_zero() {
        assert_eq!(Matrix::new(3, -3, 10, 1).scale_percent(150), Matrix::new(4, -4, 15, 1));
    }
}
