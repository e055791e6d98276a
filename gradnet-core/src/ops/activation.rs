use crate::error::GradnetError;
use crate::tensor::Tensor;

/// Applies the Rectified Linear Unit (ReLU) activation function element-wise.
/// ReLU(x) = max(0, x)
pub fn relu_op(x: &Tensor) -> Tensor {
    x.map(|v| if v > 0.0 { v } else { 0.0 })
}

/// grad = upstream_grad * (output > 0)
///
/// The mask is read from the forward output; at exactly zero the gradient is zero.
pub fn relu_backward(output: &Tensor, grad_output: &Tensor) -> Result<Tensor, GradnetError> {
    grad_output.zip_map(output, |g, y| if y > 0.0 { g } else { 0.0 })
}

#[cfg(test)]
#[path = "activation_test.rs"]
mod tests;
