use crate::autograd::{Graph, Node};
use crate::error::GradnetError;
use crate::tensor::Tensor;
use approx::relative_eq;
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error(
        "Gradient mismatch at input {input_index}, element {element_index}: \
         analytical {analytical_grad:?} != numerical {numerical_grad:?} (diff {difference:?})"
    )]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(GradnetError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(GradnetError),
    #[error("Input tensor {input_index} has no gradient after the backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error(
        "Numerical gradient is NaN or infinite for input {input_index}, element {element_index} \
         (loss+ {loss_plus:?}, loss- {loss_minus:?})"
    )]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error(
        "Analytical gradient is NaN or infinite for input {input_index}, \
         element {element_index}: {value:?}"
    )]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(GradnetError),
}

impl From<GradnetError> for GradCheckError {
    fn from(err: GradnetError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Builds a fresh graph with one `Input` node per entry of `inputs`, lets `func`
/// record the operation under test and returns the graph, the input nodes and
/// the output node.
fn build<F>(func: &F, inputs: &[Tensor]) -> Result<(Graph, Vec<Node>, Node), GradCheckError>
where
    F: Fn(&mut Graph, &[Node]) -> Result<Node, GradnetError>,
{
    let mut graph = Graph::new(&[]);
    let nodes: Vec<Node> = inputs.iter().map(|t| graph.input(t.clone())).collect();
    let output = func(&mut graph, &nodes).map_err(GradCheckError::ForwardPassError)?;
    Ok((graph, nodes, output))
}

/// Scalar objective used for the finite differences: sum(output * output_grad).
/// Its gradient with respect to the output is exactly `output_grad`.
fn calculate_loss(output: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    Ok(output.zip_map(output_grad, |o, g| o * g)?.sum_all())
}

/// Checks analytical gradients against numerical gradients using central
/// finite differences.
///
/// `func` receives a graph holding one `Input` node per tensor in `inputs` and
/// must return the node whose output is checked. The analytical gradients are
/// obtained by seeding that node with `output_grad` and backpropagating.
///
/// Every element passes if it is within `tolerance` of the numerical value in
/// absolute terms or relative to the larger of the two magnitudes.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&mut Graph, &[Node]) -> Result<Node, GradnetError>,
{
    // --- Initial forward and backward pass ---
    let (mut graph, input_nodes, output) = build(&func, inputs)?;
    graph
        .backprop_from(output, output_grad.clone())
        .map_err(GradCheckError::BackwardPassError)?;

    for (i, original_input) in inputs.iter().enumerate() {
        let analytical = graph
            .gradient(input_nodes[i])?
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?
            .clone();

        for elem_idx in 0..original_input.numel() {
            let perturbed_loss = |delta: f64| -> Result<f64, GradCheckError> {
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[i].data[elem_idx] += delta;
                let (g, _, out) = build(&func, &perturbed_inputs)?;
                let loss = calculate_loss(g.get_output(out)?, output_grad)?;
                Ok(loss)
            };
            let loss_plus = perturbed_loss(epsilon)?;
            let loss_minus = perturbed_loss(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);
            let analytical_grad = analytical.data()[elem_idx];

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }
            if !relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            ) {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference: (analytical_grad - numerical_grad).abs(),
                });
            }
        }
    }

    Ok(())
}
