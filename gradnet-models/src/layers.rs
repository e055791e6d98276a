//! Building blocks shared by the task models.

use gradnet_core::{GradnetError, Graph, Node, Variable};
use rand::Rng;

/// Affine layer `x·W + b` with `W: in x out` and `b: 1 x out`.
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Variable,
    bias: Variable,
}

impl Linear {
    /// Creates a layer with randomly initialized weight and bias.
    pub fn with_rng<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        Linear {
            weight: Variable::random_with_rng(in_features, out_features, rng),
            bias: Variable::random_vector_with_rng(out_features, rng),
        }
    }

    pub fn in_features(&self) -> usize {
        self.weight.shape().0
    }

    pub fn out_features(&self) -> usize {
        self.weight.shape().1
    }

    pub fn weight(&self) -> &Variable {
        &self.weight
    }

    pub fn bias(&self) -> &Variable {
        &self.bias
    }

    /// Adds `x·W + b` to `graph`. Both Variables must be registered with it.
    pub fn forward(&self, graph: &mut Graph, x: Node) -> Result<Node, GradnetError> {
        let weight = graph.variable(&self.weight)?;
        let bias = graph.variable(&self.bias)?;
        let xw = graph.matrix_multiply(x, weight)?;
        graph.matrix_vector_add(xw, bias)
    }

    pub fn variables(&self) -> Vec<Variable> {
        vec![self.weight.clone(), self.bias.clone()]
    }
}

/// `ReLU(x·W1 + b1)·W2 + b2`.
#[derive(Debug, Clone)]
pub struct TwoLayerNet {
    hidden: Linear,
    output: Linear,
}

impl TwoLayerNet {
    pub fn with_rng<R: Rng + ?Sized>(
        in_features: usize,
        hidden_size: usize,
        out_features: usize,
        rng: &mut R,
    ) -> Self {
        TwoLayerNet {
            hidden: Linear::with_rng(in_features, hidden_size, rng),
            output: Linear::with_rng(hidden_size, out_features, rng),
        }
    }

    pub fn hidden(&self) -> &Linear {
        &self.hidden
    }

    pub fn output(&self) -> &Linear {
        &self.output
    }

    /// The four Variables in the order `W1, b1, W2, b2`.
    pub fn variables(&self) -> Vec<Variable> {
        let mut variables = self.hidden.variables();
        variables.extend(self.output.variables());
        variables
    }

    pub fn forward(&self, graph: &mut Graph, x: Node) -> Result<Node, GradnetError> {
        let h = self.hidden.forward(graph, x)?;
        let h = graph.relu(h)?;
        self.output.forward(graph, h)
    }
}

#[cfg(test)]
#[path = "layers_test.rs"]
mod tests;
