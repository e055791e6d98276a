// Linear algebra operations: matrix multiply and row-broadcast bias add.

use crate::error::GradnetError;
use crate::tensor::Tensor;

/// Performs matrix multiplication C = A @ B.
/// A: [M, K], B: [K, N] -> C: [M, N]
pub fn matmul_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradnetError> {
    if a.cols() != b.rows() {
        return Err(GradnetError::ShapeMismatch {
            expected: vec![a.cols(), b.cols()],
            actual: b.shape_vec(),
            operation: "matmul (inner dim)".to_string(),
        });
    }
    a.matmul(b)
}

/// Gradients of C = A @ B given dL/dC:
/// dA = dC @ B^T, dB = A^T @ dC.
pub fn matmul_backward(
    a: &Tensor,
    b: &Tensor,
    grad_output: &Tensor,
) -> Result<(Tensor, Tensor), GradnetError> {
    let grad_a = grad_output.matmul(&b.transpose())?;
    let grad_b = a.transpose().matmul(grad_output)?;
    Ok((grad_a, grad_b))
}

/// Adds the bias row vector `bias` [1, N] to every row of `x` [M, N].
pub fn matrix_vector_add_op(x: &Tensor, bias: &Tensor) -> Result<Tensor, GradnetError> {
    if bias.rows() != 1 || bias.cols() != x.cols() {
        return Err(GradnetError::ShapeMismatch {
            expected: vec![1, x.cols()],
            actual: bias.shape_vec(),
            operation: "matrix_vector_add (bias)".to_string(),
        });
    }
    x.add_row_vector(bias)
}

/// Gradients of Y = X + 1·b: dX = dY, db = column sums of dY.
pub fn matrix_vector_add_backward(grad_output: &Tensor) -> (Tensor, Tensor) {
    (grad_output.clone(), grad_output.sum_rows())
}

#[cfg(test)]
#[path = "linalg_test.rs"]
mod tests;
