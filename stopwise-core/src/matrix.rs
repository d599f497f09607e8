// src/matrix.rs

use crate::error::StopwiseError;
use std::fmt;

/// A dense, row-major `f32` matrix.
///
/// This is the only numeric container the models work with: inputs are
/// `[batch, features]`, weights are `[n_in, n_out]` and biases are `[1, n_out]`.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Creates a matrix from a row-major buffer.
    ///
    /// # Errors
    /// Returns `StopwiseError::MatrixCreationError` if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self, StopwiseError> {
        if data.len() != rows * cols {
            return Err(StopwiseError::MatrixCreationError {
                data_len: data.len(),
                shape: vec![rows, cols],
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Creates a matrix by stacking rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, StopwiseError> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(StopwiseError::ShapeMismatch {
                    expected: vec![cols],
                    actual: vec![row.len()],
                    operation: "Matrix::from_rows".to_string(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix { rows: rows.len(), cols, data })
    }

    /// Creates a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Creates a matrix filled with `value`.
    pub fn full(rows: usize, cols: usize, value: f32) -> Self {
        Matrix { rows, cols, data: vec![value; rows * cols] }
    }

    /// Creates a `[1, n]` row vector.
    pub fn row_vector(data: Vec<f32>) -> Self {
        let cols = data.len();
        Matrix { rows: 1, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `[rows, cols]`.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Returns the element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Returns row `index` as a slice.
    pub fn row(&self, index: usize) -> Result<&[f32], StopwiseError> {
        if index >= self.rows {
            return Err(StopwiseError::IndexOutOfBounds { index, len: self.rows });
        }
        Ok(&self.data[index * self.cols..(index + 1) * self.cols])
    }

    fn check_same_shape(&self, other: &Matrix, operation: &str) -> Result<(), StopwiseError> {
        if self.shape() != other.shape() {
            return Err(StopwiseError::ShapeMismatch {
                expected: self.shape().to_vec(),
                actual: other.shape().to_vec(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Matrix product `self @ other`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if `self.cols() != other.rows()`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix, StopwiseError> {
        if self.cols != other.rows {
            return Err(StopwiseError::ShapeMismatch {
                expected: vec![self.cols, other.cols],
                actual: other.shape().to_vec(),
                operation: "matmul".to_string(),
            });
        }
        let mut out = vec![0.0f32; self.rows * other.cols];
        for i in 0..self.rows {
            let out_row = &mut out[i * other.cols..(i + 1) * other.cols];
            for k in 0..self.cols {
                let a = self.data[i * self.cols + k];
                if a == 0.0 {
                    continue;
                }
                let b_row = &other.data[k * other.cols..(k + 1) * other.cols];
                for (o, &b) in out_row.iter_mut().zip(b_row) {
                    *o += a * b;
                }
            }
        }
        Ok(Matrix { rows: self.rows, cols: other.cols, data: out })
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = vec![0.0f32; self.data.len()];
        for i in 0..self.rows {
            for j in 0..self.cols {
                out[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix { rows: self.cols, cols: self.rows, data: out }
    }

    /// Adds a `[1, cols]` row vector to every row (bias broadcast).
    pub fn add_row_vector(&self, bias: &Matrix) -> Result<Matrix, StopwiseError> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(StopwiseError::ShapeMismatch {
                expected: vec![1, self.cols],
                actual: bias.shape().to_vec(),
                operation: "add_row_vector".to_string(),
            });
        }
        let mut out = self.clone();
        for row in out.data.chunks_mut(self.cols.max(1)) {
            for (v, b) in row.iter_mut().zip(&bias.data) {
                *v += b;
            }
        }
        Ok(out)
    }

    /// Applies `f` elementwise.
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix, StopwiseError> {
        self.check_same_shape(other, "hadamard")?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(a, b)| a * b).collect(),
        })
    }

    /// Elementwise `self - other`.
    pub fn sub(&self, other: &Matrix) -> Result<Matrix, StopwiseError> {
        self.check_same_shape(other, "sub")?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect(),
        })
    }

    /// In-place `self += alpha * other`.
    pub fn add_scaled_(&mut self, alpha: f32, other: &Matrix) -> Result<(), StopwiseError> {
        self.check_same_shape(other, "add_scaled_")?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += alpha * b;
        }
        Ok(())
    }

    pub fn scale(&self, factor: f32) -> Matrix {
        self.map(|v| v * factor)
    }

    /// Sums every column, producing a `[1, cols]` row vector.
    pub fn column_sums(&self) -> Matrix {
        let mut out = vec![0.0f32; self.cols];
        for row in self.data.chunks(self.cols.max(1)) {
            for (o, v) in out.iter_mut().zip(row) {
                *o += v;
            }
        }
        Matrix::row_vector(out)
    }

    /// Index of the largest entry of every row. Ties resolve to the first index.
    pub fn argmax_rows(&self) -> Vec<usize> {
        if self.cols == 0 {
            return vec![0; self.rows];
        }
        self.data
            .chunks(self.cols)
            .map(|row| {
                let mut best = 0;
                for (j, &v) in row.iter().enumerate() {
                    if v > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Sum of absolute values (L1 norm of the flattened matrix).
    pub fn abs_sum(&self) -> f32 {
        self.data.iter().map(|v| v.abs()).sum()
    }

    /// Sum of squares (squared L2 norm of the flattened matrix).
    pub fn squared_sum(&self) -> f32 {
        self.data.iter().map(|v| v * v).sum()
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.len() <= 16 {
            write!(f, "Matrix({}x{}, {:?})", self.rows, self.cols, self.data)
        } else {
            write!(f, "Matrix({}x{}, [{} elements])", self.rows, self.cols, self.data.len())
        }
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod tests;
