// src/tensor/mod.rs

use crate::error::GradnetError;
use std::fmt;

pub mod create;
pub mod math;

pub use create::{from_rows, row_vector, scalar, zeros};

/// A dense, row-major 2-D matrix of `f64` values.
///
/// This is the only data representation flowing through a [`Graph`](crate::Graph).
/// Vectors are stored as `1 x n` row tensors and scalars as `1 x 1` tensors.
/// Once a tensor has been produced by a graph node it is never mutated; only
/// [`Variable`](crate::Variable)s change, and only through `Graph::step`.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: Vec<f64>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl Tensor {
    /// Creates a tensor from row-major data.
    ///
    /// # Errors
    /// Returns `GradnetError::TensorCreationError` if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self, GradnetError> {
        if data.len() != rows * cols {
            return Err(GradnetError::TensorCreationError {
                data_len: data.len(),
                shape: vec![rows, cols],
            });
        }
        Ok(Tensor { data, rows, cols })
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Shape as a `Vec`, the form used in error reports.
    pub fn shape_vec(&self) -> Vec<usize> {
        vec![self.rows, self.cols]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of entries.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True for `1 x 1` tensors.
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// Row-major view of the values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns one row as a slice.
    pub fn row(&self, row: usize) -> Result<&[f64], GradnetError> {
        if row >= self.rows {
            return Err(GradnetError::IndexOutOfBounds {
                index: vec![row],
                shape: self.shape_vec(),
            });
        }
        Ok(&self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Returns the value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, GradnetError> {
        if row >= self.rows || col >= self.cols {
            return Err(GradnetError::IndexOutOfBounds {
                index: vec![row, col],
                shape: self.shape_vec(),
            });
        }
        Ok(self.data[row * self.cols + col])
    }

    /// Returns the single value of a `1 x 1` tensor.
    pub fn item(&self) -> Option<f64> {
        if self.is_scalar() {
            Some(self.data[0])
        } else {
            None
        }
    }

    /// Iterates over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        let cols = self.cols;
        (0..self.rows).map(move |r| &self.data[r * cols..(r + 1) * cols])
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({}x{}) ", self.rows, self.cols)?;
        f.debug_list().entries(self.iter_rows()).finish()
    }
}
