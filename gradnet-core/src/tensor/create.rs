// src/tensor/create.rs

use crate::error::GradnetError;
use crate::tensor::Tensor;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Creates a tensor of the given shape filled with zeros.
pub fn zeros(rows: usize, cols: usize) -> Tensor {
    Tensor {
        data: vec![0.0; rows * cols],
        rows,
        cols,
    }
}

/// Creates a tensor of the given shape filled with `value`.
pub fn full(rows: usize, cols: usize, value: f64) -> Tensor {
    Tensor {
        data: vec![value; rows * cols],
        rows,
        cols,
    }
}

/// Creates a `1 x 1` tensor.
pub fn scalar(value: f64) -> Tensor {
    Tensor {
        data: vec![value],
        rows: 1,
        cols: 1,
    }
}

/// Creates a `1 x n` row vector.
pub fn row_vector(values: Vec<f64>) -> Tensor {
    let cols = values.len();
    Tensor {
        data: values,
        rows: 1,
        cols,
    }
}

/// Builds a tensor from a slice of equally long rows.
///
/// # Errors
/// Returns `GradnetError::ShapeMismatch` if the rows have different lengths.
pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Tensor, GradnetError> {
    let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    let mut data = Vec::with_capacity(rows.len() * cols);
    for row in rows {
        let row = row.as_ref();
        if row.len() != cols {
            return Err(GradnetError::ShapeMismatch {
                expected: vec![cols],
                actual: vec![row.len()],
                operation: "from_rows (row length)".to_string(),
            });
        }
        data.extend_from_slice(row);
    }
    Tensor::new(data, rows.len(), cols)
}

/// Creates a `rows x cols` tensor whose row `i` is the one-hot encoding of `classes[i]`.
///
/// # Errors
/// Returns `GradnetError::IndexOutOfBounds` if a class index is `>= num_classes`.
pub fn one_hot(classes: &[usize], num_classes: usize) -> Result<Tensor, GradnetError> {
    let mut out = zeros(classes.len(), num_classes);
    for (row, &class) in classes.iter().enumerate() {
        if class >= num_classes {
            return Err(GradnetError::IndexOutOfBounds {
                index: vec![row, class],
                shape: vec![classes.len(), num_classes],
            });
        }
        out.data[row * num_classes + class] = 1.0;
    }
    Ok(out)
}

/// Samples a tensor uniformly from `[-limit, limit]`.
pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, limit: f64, rng: &mut R) -> Tensor {
    if limit <= 0.0 {
        return zeros(rows, cols);
    }
    let dist = Uniform::new_inclusive(-limit, limit);
    let data = (0..rows * cols).map(|_| dist.sample(rng)).collect();
    Tensor { data, rows, cols }
}

impl Tensor {
    /// See [`zeros`].
    pub fn zeros(rows: usize, cols: usize) -> Self {
        zeros(rows, cols)
    }

    /// See [`scalar`].
    pub fn scalar(value: f64) -> Self {
        scalar(value)
    }

    /// See [`row_vector`].
    pub fn row_vector(values: Vec<f64>) -> Self {
        row_vector(values)
    }

    /// See [`from_rows`].
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, GradnetError> {
        from_rows(rows)
    }
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
