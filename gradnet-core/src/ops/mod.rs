//! The closed set of differentiable operations a [`Graph`](crate::Graph) can record.
//!
//! Each operation knows how to compute its output from its parents' outputs
//! (`forward`) and how to turn the gradient of its output into one gradient per
//! parent (`backward`). Dispatch is a plain `match` over [`Op`], so adding a
//! variant forces every rule to be written.

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod loss;

use crate::autograd::Node;
use crate::error::GradnetError;
use crate::tensor::Tensor;

use activation::{relu_backward, relu_op};
use arithmetic::{add_backward, add_op, neg_backward, neg_op};
use linalg::{matmul_backward, matmul_op, matrix_vector_add_backward, matrix_vector_add_op};
use loss::{softmax_loss_backward, softmax_loss_op, square_loss_backward, square_loss_op};

/// Kinds of non-leaf operations, used to add a node from a parent list
/// (see [`Graph::apply`](crate::Graph::apply)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    MatrixMultiply,
    MatrixVectorAdd,
    Add,
    ReLU,
    Negate,
    SquareLoss,
    SoftmaxLoss,
}

impl OpKind {
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::MatrixMultiply => "MatrixMultiply",
            OpKind::MatrixVectorAdd => "MatrixVectorAdd",
            OpKind::Add => "Add",
            OpKind::ReLU => "ReLU",
            OpKind::Negate => "Negate",
            OpKind::SquareLoss => "SquareLoss",
            OpKind::SoftmaxLoss => "SoftmaxLoss",
        }
    }

    /// Number of parents the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            OpKind::ReLU | OpKind::Negate => 1,
            _ => 2,
        }
    }

    /// Loss operations produce a `1 x 1` output.
    pub fn is_loss(&self) -> bool {
        matches!(self, OpKind::SquareLoss | OpKind::SoftmaxLoss)
    }
}

/// One recorded operation together with its parent handles.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Externally supplied data. No parents, never trainable.
    Input,
    /// Leaf wrapping the graph's `index`-th registered Variable.
    Variable { index: usize },
    MatrixMultiply { a: Node, b: Node },
    MatrixVectorAdd { x: Node, bias: Node },
    Add { a: Node, b: Node },
    ReLU { x: Node },
    Negate { x: Node },
    SquareLoss { prediction: Node, target: Node },
    SoftmaxLoss { logits: Node, labels: Node },
}

impl Op {
    /// Builds an operation from its kind and an ordered parent list.
    ///
    /// # Errors
    /// Returns `GradnetError::ArityMismatch` if `parents.len()` differs from `kind.arity()`.
    pub fn from_kind(kind: OpKind, parents: &[Node]) -> Result<Op, GradnetError> {
        if parents.len() != kind.arity() {
            return Err(GradnetError::ArityMismatch {
                operation: kind.name().to_string(),
                expected: kind.arity(),
                actual: parents.len(),
            });
        }
        let p = parents;
        Ok(match kind {
            OpKind::MatrixMultiply => Op::MatrixMultiply { a: p[0], b: p[1] },
            OpKind::MatrixVectorAdd => Op::MatrixVectorAdd { x: p[0], bias: p[1] },
            OpKind::Add => Op::Add { a: p[0], b: p[1] },
            OpKind::ReLU => Op::ReLU { x: p[0] },
            OpKind::Negate => Op::Negate { x: p[0] },
            OpKind::SquareLoss => Op::SquareLoss { prediction: p[0], target: p[1] },
            OpKind::SoftmaxLoss => Op::SoftmaxLoss { logits: p[0], labels: p[1] },
        })
    }

    /// The kind of a non-leaf operation; `None` for `Input` and `Variable`.
    pub fn kind(&self) -> Option<OpKind> {
        match self {
            Op::Input | Op::Variable { .. } => None,
            Op::MatrixMultiply { .. } => Some(OpKind::MatrixMultiply),
            Op::MatrixVectorAdd { .. } => Some(OpKind::MatrixVectorAdd),
            Op::Add { .. } => Some(OpKind::Add),
            Op::ReLU { .. } => Some(OpKind::ReLU),
            Op::Negate { .. } => Some(OpKind::Negate),
            Op::SquareLoss { .. } => Some(OpKind::SquareLoss),
            Op::SoftmaxLoss { .. } => Some(OpKind::SoftmaxLoss),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Op::Input => "Input",
            Op::Variable { .. } => "Variable",
            op => op.kind().map(|k| k.name()).unwrap_or("Unknown"),
        }
    }

    /// Parent handles, in the order `forward` and `backward` expect them.
    pub fn parents(&self) -> Vec<Node> {
        match *self {
            Op::Input | Op::Variable { .. } => Vec::new(),
            Op::ReLU { x } | Op::Negate { x } => vec![x],
            Op::MatrixMultiply { a, b } | Op::Add { a, b } => vec![a, b],
            Op::MatrixVectorAdd { x, bias } => vec![x, bias],
            Op::SquareLoss { prediction, target } => vec![prediction, target],
            Op::SoftmaxLoss { logits, labels } => vec![logits, labels],
        }
    }

    /// Computes the output of a non-leaf operation from its parents' outputs,
    /// validating shapes on the way.
    pub(crate) fn forward(&self, inputs: &[&Tensor]) -> Result<Tensor, GradnetError> {
        self.check_input_count(inputs.len())?;
        match self {
            Op::Input | Op::Variable { .. } => Err(GradnetError::InternalError(format!(
                "{} is a leaf and has no forward rule",
                self.name()
            ))),
            Op::MatrixMultiply { .. } => matmul_op(inputs[0], inputs[1]),
            Op::MatrixVectorAdd { .. } => matrix_vector_add_op(inputs[0], inputs[1]),
            Op::Add { .. } => add_op(inputs[0], inputs[1]),
            Op::ReLU { .. } => Ok(relu_op(inputs[0])),
            Op::Negate { .. } => Ok(neg_op(inputs[0])),
            Op::SquareLoss { .. } => square_loss_op(inputs[0], inputs[1]),
            Op::SoftmaxLoss { .. } => softmax_loss_op(inputs[0], inputs[1]),
        }
    }

    /// Computes one gradient per parent, in `parents()` order, from the gradient
    /// flowing into this node's output. Leaves return no gradients.
    pub(crate) fn backward(
        &self,
        inputs: &[&Tensor],
        output: &Tensor,
        grad_output: &Tensor,
    ) -> Result<Vec<Tensor>, GradnetError> {
        self.check_input_count(inputs.len())?;
        let grads = match self {
            Op::Input | Op::Variable { .. } => Vec::new(),
            Op::MatrixMultiply { .. } => {
                let (ga, gb) = matmul_backward(inputs[0], inputs[1], grad_output)?;
                vec![ga, gb]
            }
            Op::MatrixVectorAdd { .. } => {
                let (gx, gb) = matrix_vector_add_backward(grad_output);
                vec![gx, gb]
            }
            Op::Add { .. } => {
                let (ga, gb) = add_backward(grad_output);
                vec![ga, gb]
            }
            Op::ReLU { .. } => vec![relu_backward(output, grad_output)?],
            Op::Negate { .. } => vec![neg_backward(grad_output)],
            Op::SquareLoss { .. } => {
                let (gp, gy) = square_loss_backward(inputs[0], inputs[1], grad_output)?;
                vec![gp, gy]
            }
            Op::SoftmaxLoss { .. } => {
                let (gl, gy) = softmax_loss_backward(inputs[0], inputs[1], grad_output)?;
                vec![gl, gy]
            }
        };
        Ok(grads)
    }

    fn check_input_count(&self, actual: usize) -> Result<(), GradnetError> {
        let expected = self.kind().map(|k| k.arity()).unwrap_or(0);
        if actual != expected {
            return Err(GradnetError::ArityMismatch {
                operation: self.name().to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}
