// gradnet-core/src/ops/loss.rs

use crate::error::GradnetError;
use crate::tensor::{scalar, Tensor};
use approx::abs_diff_eq;

/// Tolerance on the row sums of a SoftmaxLoss target.
const TARGET_ROW_SUM_EPSILON: f64 = 1e-6;

fn check_loss_shapes(input: &Tensor, target: &Tensor, operation: &str) -> Result<(), GradnetError> {
    if input.shape() != target.shape() {
        return Err(GradnetError::ShapeMismatch {
            expected: input.shape_vec(),
            actual: target.shape_vec(),
            operation: operation.to_string(),
        });
    }
    if input.is_empty() {
        return Err(GradnetError::ShapeMismatch {
            expected: vec![1, 1],
            actual: input.shape_vec(),
            operation: format!("{} (empty input)", operation),
        });
    }
    Ok(())
}

/// Computes the Mean Squared Error between `prediction` and `target`:
/// mean over all N entries of (P - Y)^2, as a `1 x 1` tensor.
pub fn square_loss_op(prediction: &Tensor, target: &Tensor) -> Result<Tensor, GradnetError> {
    check_loss_shapes(prediction, target, "square_loss")?;
    let diff = prediction.sub(target)?;
    let n = diff.numel() as f64;
    let sum_sq: f64 = diff.data().iter().map(|d| d * d).sum();
    Ok(scalar(sum_sq / n))
}

/// dP = G * (2/N) * (P - Y), dY = -dP.
pub fn square_loss_backward(
    prediction: &Tensor,
    target: &Tensor,
    grad_output: &Tensor,
) -> Result<(Tensor, Tensor), GradnetError> {
    let g = scalar_grad(grad_output, "square_loss backward")?;
    let n = prediction.numel() as f64;
    let grad_prediction = prediction.sub(target)?.scale(2.0 * g / n);
    let grad_target = grad_prediction.scale(-1.0);
    Ok((grad_prediction, grad_target))
}

/// Checks that every row of `labels` is a probability distribution
/// (non-negative entries summing to one). One-hot rows are the common case.
fn check_probability_rows(labels: &Tensor) -> Result<(), GradnetError> {
    for (i, row) in labels.iter_rows().enumerate() {
        if let Some(v) = row.iter().find(|v| v.is_nan() || **v < 0.0) {
            return Err(GradnetError::InvalidTarget {
                operation: "softmax_loss".to_string(),
                reason: format!("row {} contains invalid probability {}", i, v),
            });
        }
        let sum: f64 = row.iter().sum();
        if !abs_diff_eq!(sum, 1.0, epsilon = TARGET_ROW_SUM_EPSILON) {
            return Err(GradnetError::InvalidTarget {
                operation: "softmax_loss".to_string(),
                reason: format!("row {} sums to {} instead of 1", i, sum),
            });
        }
    }
    Ok(())
}

/// Mean over rows of the cross-entropy between row-softmax(`logits`) and `labels`.
///
/// Uses log-softmax with the row maximum subtracted, so logits of any magnitude
/// give a finite loss.
pub fn softmax_loss_op(logits: &Tensor, labels: &Tensor) -> Result<Tensor, GradnetError> {
    check_loss_shapes(logits, labels, "softmax_loss")?;
    check_probability_rows(labels)?;
    let log_probs = logits.log_softmax_rows();
    let m = logits.rows() as f64;
    let total: f64 = log_probs
        .data()
        .iter()
        .zip(labels.data())
        .map(|(lp, y)| if *y == 0.0 { 0.0 } else { -y * lp })
        .sum();
    Ok(scalar(total / m))
}

/// dL = G * (softmax(L) - Y) / m, dY = -G * log_softmax(L) / m.
pub fn softmax_loss_backward(
    logits: &Tensor,
    labels: &Tensor,
    grad_output: &Tensor,
) -> Result<(Tensor, Tensor), GradnetError> {
    let g = scalar_grad(grad_output, "softmax_loss backward")?;
    let m = logits.rows() as f64;
    let log_probs = logits.log_softmax_rows();
    let grad_logits = log_probs
        .zip_map(labels, |lp, y| lp.exp() - y)?
        .scale(g / m);
    let grad_labels = log_probs.scale(-g / m);
    Ok((grad_logits, grad_labels))
}

fn scalar_grad(grad_output: &Tensor, operation: &str) -> Result<f64, GradnetError> {
    grad_output.item().ok_or_else(|| GradnetError::ShapeMismatch {
        expected: vec![1, 1],
        actual: grad_output.shape_vec(),
        operation: operation.to_string(),
    })
}

#[cfg(test)]
#[path = "loss_test.rs"]
mod tests;
