use crate::error::GradnetError;
use crate::tensor::Tensor;

/// Element-wise sum of two tensors of identical shape.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, GradnetError> {
    if a.shape() != b.shape() {
        return Err(GradnetError::ShapeMismatch {
            expected: a.shape_vec(),
            actual: b.shape_vec(),
            operation: "add".to_string(),
        });
    }
    a.add(b)
}

/// dA = dC, dB = dC.
pub fn add_backward(grad_output: &Tensor) -> (Tensor, Tensor) {
    (grad_output.clone(), grad_output.clone())
}

/// Element-wise negation.
pub fn neg_op(x: &Tensor) -> Tensor {
    x.scale(-1.0)
}

pub fn neg_backward(grad_output: &Tensor) -> Tensor {
    grad_output.scale(-1.0)
}

#[cfg(test)]
#[path = "arithmetic_test.rs"]
mod tests;
