//! Dense row-major value buffers handed to the host.

use std::fmt;

use rayon::prelude::*;

/// Row-major dense buffer with one label per column and per row.
///
/// `values.len() == rows() * columns()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    /// Cell values, row after row.
    pub values: Vec<T>,
    /// One label per column (dimension names).
    pub column_header: Vec<String>,
    /// One label per row (sample names).
    pub row_header: Vec<String>,
}

impl<T> Matrix<T> {
    /// Create a matrix from its parts.
    pub fn new(values: Vec<T>, column_header: Vec<String>, row_header: Vec<String>) -> Self {
        debug_assert_eq!(values.len(), column_header.len() * row_header.len());
        Self {
            values,
            column_header,
            row_header,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.row_header.len()
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.column_header.len()
    }

    /// Cell at `(row, column)`.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        if row < self.rows() && column < self.columns() {
            self.values.get(row * self.columns() + column)
        } else {
            None
        }
    }

    /// All cells of one row.
    pub fn row(&self, row: usize) -> &[T] {
        let columns = self.columns();
        &self.values[row * columns..(row + 1) * columns]
    }
}

impl<T: Clone + Send + Sync> Matrix<T> {
    /// Swap rows and columns, headers included.
    pub fn transposed(&self) -> Matrix<T> {
        let rows = self.rows();
        let columns = self.columns();
        let values: Vec<T> = (0..columns)
            .into_par_iter()
            .flat_map_iter(|c| (0..rows).map(move |r| self.values[r * columns + c].clone()))
            .collect();
        Matrix::new(values, self.row_header.clone(), self.column_header.clone())
    }
}

/// 16-bit brain floating point value: the upper half of an IEEE `f32`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BFloat16(u16);

impl BFloat16 {
    /// Largest finite value.
    pub const MAX: BFloat16 = BFloat16(0x7F7F);
    /// Most negative finite value.
    pub const MIN: BFloat16 = BFloat16(0xFF7F);

    /// Narrow an `f32` with round-to-nearest-even.
    ///
    /// Finite values that would round to infinity saturate at [`Self::MAX`]
    /// or [`Self::MIN`].
    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        if value.is_nan() {
            return Self(((bits >> 16) as u16) | 0x0040);
        }
        let rounding = 0x7FFF + ((bits >> 16) & 1);
        let narrowed = Self((bits.wrapping_add(rounding) >> 16) as u16);
        if value.is_finite() && narrowed.to_f32().is_infinite() {
            if value.is_sign_negative() { Self::MIN } else { Self::MAX }
        } else {
            narrowed
        }
    }

    /// Widen back to `f32` (exact).
    #[inline]
    pub fn to_f32(self) -> f32 {
        f32::from_bits(u32::from(self.0) << 16)
    }

    /// Raw bit pattern.
    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0
    }
}

impl From<f32> for BFloat16 {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl fmt::Debug for BFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_f32())
    }
}

impl fmt::Display for BFloat16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_matrix_access() {
        let m = Matrix::new(vec![1, 2, 3, 4, 5, 6], labels("c", 3), labels("r", 2));
        assert_eq!(m.rows(), 2);
        assert_eq!(m.columns(), 3);
        assert_eq!(m.get(1, 0), Some(&4));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(0), &[1, 2, 3]);
    }

    #[test]
    fn test_transposed() {
        let m = Matrix::new(vec![1, 2, 3, 4, 5, 6], labels("c", 3), labels("r", 2));
        let t = m.transposed();
        assert_eq!(t.values, vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(t.column_header, labels("r", 2));
        assert_eq!(t.row_header, labels("c", 3));
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn test_bfloat16_rounding() {
        assert_eq!(BFloat16::from_f32(1.0).to_f32(), 1.0);
        assert_eq!(BFloat16::from_f32(-2.5).to_f32(), -2.5);
        // 1 + 2^-8 is halfway between two bf16 values and rounds to even.
        assert_eq!(BFloat16::from_f32(1.0 + 1.0 / 256.0).to_f32(), 1.0);
        assert!(BFloat16::from_f32(f32::NAN).to_f32().is_nan());
    }

    #[test]
    fn test_bfloat16_saturates() {
        assert_eq!(BFloat16::from_f32(f32::MAX), BFloat16::MAX);
        assert_eq!(BFloat16::from_f32(f32::MIN), BFloat16::MIN);
        assert!(BFloat16::from_f32(f32::INFINITY).to_f32().is_infinite());
    }
}
