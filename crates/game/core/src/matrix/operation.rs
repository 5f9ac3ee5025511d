//! Binary (and one unary) operations over [`Matrix`] values.

use super::Matrix;

/// Operation a fragment contributes when it is folded into a health matrix.
///
/// The enum is non-exhaustive so catalogs can grow new variants without
/// breaking downstream matches.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[non_exhaustive]
pub enum Operation {
    /// Elementwise sum.
    Add,
    /// Elementwise difference (`left - right`).
    Subtract,
    /// Elementwise (Hadamard) product.
    Multiply,
    /// Elementwise mean, rounded half-up.
    Average,
    /// Unary: discards both inputs and yields [`Matrix::IDENTITY`].
    Reset,
    /// Row-vector dot products: `out[i][j] = row_i(left) · row_j(right)`.
    DotProduct,
}

impl Operation {
    /// Returns true if the operation ignores its right-hand operand.
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Reset)
    }
}

/// Applies `op` to `left` and `right`.
///
/// Total over all inputs: arithmetic saturates instead of overflowing.
pub fn apply(op: Operation, left: Matrix, right: Matrix) -> Matrix {
    match op {
        Operation::Add => left.zip_with(right, i32::saturating_add),
        Operation::Subtract => left.zip_with(right, i32::saturating_sub),
        Operation::Multiply => left.zip_with(right, i32::saturating_mul),
        Operation::Average => left.zip_with(right, average_half_up),
        Operation::Reset => Matrix::IDENTITY,
        Operation::DotProduct => dot_rows(left, right),
    }
}

fn average_half_up(x: i32, y: i32) -> i32 {
    // i64 keeps the intermediate sum exact; the result always fits in i32.
    ((i64::from(x) + i64::from(y) + 1).div_euclid(2)) as i32
}

fn dot_rows(left: Matrix, right: Matrix) -> Matrix {
    let dot = |l: [i32; 2], r: [i32; 2]| {
        l[0].saturating_mul(r[0])
            .saturating_add(l[1].saturating_mul(r[1]))
    };
    let (l0, l1) = (left.row(0), left.row(1));
    let (r0, r1) = (right.row(0), right.row(1));
    Matrix::new(dot(l0, r0), dot(l0, r1), dot(l1, r0), dot(l1, r1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn add_then_subtract_restores_left_operand() {
        let samples = [
            (Matrix::new(0, 0, 0, 0), Matrix::new(3, 1, 4, 1)),
            (Matrix::new(5, 9, 2, 6), Matrix::new(5, 3, 5, 8)),
            (Matrix::new(100, 0, 7, 1), Matrix::new(0, 0, 0, 0)),
        ];
        for (a, b) in samples {
            let sum = apply(Operation::Add, a, b);
            assert_eq!(apply(Operation::Subtract, sum, b), a);
        }
    }

    #[test]
    fn multiply_is_elementwise() {
        let out = apply(Operation::Multiply, Matrix::new(1, 2, 3, 4), Matrix::new(2, 0, -1, 3));
        assert_eq!(out, Matrix::new(2, 0, -3, 12));
    }

    #[test]
    fn average_rounds_half_up() {
        let out = apply(Operation::Average, Matrix::new(1, 2, -3, 0), Matrix::new(2, 2, 0, -1));
        // 1.5 -> 2, 2 -> 2, -1.5 -> -1, -0.5 -> 0
        assert_eq!(out, Matrix::new(2, 2, -1, 0));
    }

    #[test]
    fn reset_ignores_operands() {
        let out = apply(Operation::Reset, Matrix::splat(9), Matrix::splat(-4));
        assert_eq!(out, Matrix::IDENTITY);
        assert!(Operation::Reset.is_unary());
    }

    #[test]
    fn dot_product_uses_row_vectors() {
        let left = Matrix::new(1, 2, 3, 4);
        let right = Matrix::new(5, 6, 7, 8);
        // rows: l0=(1,2) l1=(3,4) r0=(5,6) r1=(7,8)
        assert_eq!(
            apply(Operation::DotProduct, left, right),
            Matrix::new(17, 23, 39, 53)
        );
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let big = Matrix::splat(i32::MAX);
        for op in Operation::iter() {
            let _ = apply(op, big, big);
        }
        assert_eq!(apply(Operation::Add, big, big), big);
    }

    #[test]
    fn names_round_trip_through_strum() {
        assert_eq!(Operation::DotProduct.to_string(), "dot_product");
        assert_eq!("average".parse::<Operation>().ok(), Some(Operation::Average));
    }
}
