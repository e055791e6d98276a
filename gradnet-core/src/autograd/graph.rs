// gradnet-core/src/autograd/graph.rs

use crate::error::GradnetError;
use crate::ops::{Op, OpKind};
use crate::tensor::{scalar, Tensor};
use crate::variable::Variable;
use log::{debug, warn};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_GRAPH_ID: AtomicUsize = AtomicUsize::new(0);

/// Opaque handle to a node of one particular [`Graph`].
///
/// A handle is only valid for the graph that returned it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    graph: usize,
    index: usize,
}

impl Node {
    /// Position of the node in its graph's insertion order.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
struct NodeRecord {
    op: Op,
    output: Tensor,
}

/// A define-by-run computation graph for one batch.
///
/// Nodes are appended in construction order and every parent must already be
/// present, so the node list is always in topological order and iterating it
/// backwards is a valid reverse-topological walk. No separate sort is needed.
///
/// Forward values are computed eagerly when a node is added. `backprop` fills in
/// one gradient per reached node, and `step` applies those gradients to the
/// registered [`Variable`]s. A graph is meant to be built, backpropagated,
/// stepped once and dropped; the Variables outlive it.
#[derive(Debug)]
pub struct Graph {
    id: usize,
    variables: Vec<Variable>,
    /// Leaf node of each registered Variable, created on first use.
    variable_nodes: Vec<Option<Node>>,
    nodes: Vec<NodeRecord>,
    /// Gradient of each node's output after the latest `backprop`; empty before.
    grads: Vec<Option<Tensor>>,
}

impl Graph {
    /// Creates an empty graph that may update `variables`.
    pub fn new(variables: &[Variable]) -> Self {
        let id = NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed);
        debug!("Graph {}: created with {} variable(s)", id, variables.len());
        Graph {
            id,
            variables: variables.to_vec(),
            variable_nodes: vec![None; variables.len()],
            nodes: Vec::new(),
            grads: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The Variables this graph is allowed to update.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Handle of the most recently added node.
    pub fn last_node(&self) -> Option<Node> {
        self.nodes.len().checked_sub(1).map(|index| Node {
            graph: self.id,
            index,
        })
    }

    fn resolve(&self, node: Node) -> Result<usize, GradnetError> {
        if node.graph != self.id {
            return Err(GradnetError::ForeignNode {
                node_graph: node.graph,
                graph: self.id,
            });
        }
        if node.index >= self.nodes.len() {
            return Err(GradnetError::UnknownNode {
                index: node.index,
                len: self.nodes.len(),
            });
        }
        Ok(node.index)
    }

    fn push(&mut self, op: Op, output: Tensor) -> Node {
        let node = Node {
            graph: self.id,
            index: self.nodes.len(),
        };
        self.nodes.push(NodeRecord { op, output });
        // Gradients from an earlier backprop no longer describe this graph.
        self.grads.clear();
        node
    }

    /// Adds an `Input` leaf holding externally supplied data.
    pub fn input(&mut self, data: Tensor) -> Node {
        self.push(Op::Input, data)
    }

    /// Returns the leaf node of a registered Variable, adding it on first use.
    ///
    /// The leaf caches the Variable's value at that moment. Every later call
    /// returns the same node, so all consumers share one parent and their
    /// gradients accumulate there.
    ///
    /// # Errors
    /// `GradnetError::UnregisteredVariable` if `variable` was not passed to [`Graph::new`].
    pub fn variable(&mut self, variable: &Variable) -> Result<Node, GradnetError> {
        let index = self
            .variables
            .iter()
            .position(|v| v.ptr_eq(variable))
            .ok_or_else(|| GradnetError::UnregisteredVariable {
                shape: variable.value().shape_vec(),
            })?;
        self.variable_at(index)
    }

    fn variable_at(&mut self, index: usize) -> Result<Node, GradnetError> {
        let existing = *self.variable_nodes.get(index).ok_or_else(|| {
            GradnetError::InternalError(format!("no registered variable at index {}", index))
        })?;
        if let Some(node) = existing {
            return Ok(node);
        }
        let value = self.variables[index].snapshot();
        let node = self.push(Op::Variable { index }, value);
        self.variable_nodes[index] = Some(node);
        Ok(node)
    }

    /// Adds a node for `op`, computing its output right away.
    ///
    /// All parents must be nodes of this graph that were added earlier. `Op::Input`
    /// carries no data and must be added with [`Graph::input`] instead.
    pub fn add_node(&mut self, op: Op) -> Result<Node, GradnetError> {
        match op {
            Op::Input => Err(GradnetError::ArityMismatch {
                operation: "Input (use Graph::input to supply data)".to_string(),
                expected: 1,
                actual: 0,
            }),
            Op::Variable { index } => self.variable_at(index),
            op => {
                let parents = op.parents();
                let mut inputs = Vec::with_capacity(parents.len());
                for parent in &parents {
                    let idx = self.resolve(*parent)?;
                    inputs.push(&self.nodes[idx].output);
                }
                let output = op.forward(&inputs)?;
                Ok(self.push(op, output))
            }
        }
    }

    /// Adds a node of the given kind with an ordered parent list.
    pub fn apply(&mut self, kind: OpKind, parents: &[Node]) -> Result<Node, GradnetError> {
        self.add_node(Op::from_kind(kind, parents)?)
    }

    /// `a (m x k) · b (k x n)`.
    pub fn matrix_multiply(&mut self, a: Node, b: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::MatrixMultiply { a, b })
    }

    /// Adds the `1 x n` vector `bias` to every row of `x (m x n)`.
    pub fn matrix_vector_add(&mut self, x: Node, bias: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::MatrixVectorAdd { x, bias })
    }

    /// Element-wise sum of two equally shaped nodes.
    pub fn add(&mut self, a: Node, b: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::Add { a, b })
    }

    pub fn relu(&mut self, x: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::ReLU { x })
    }

    pub fn negate(&mut self, x: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::Negate { x })
    }

    /// Mean squared error between `prediction` and `target`.
    pub fn square_loss(&mut self, prediction: Node, target: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::SquareLoss { prediction, target })
    }

    /// Mean softmax cross-entropy of `logits` against probability rows `labels`.
    pub fn softmax_loss(&mut self, logits: Node, labels: Node) -> Result<Node, GradnetError> {
        self.add_node(Op::SoftmaxLoss { logits, labels })
    }

    /// The cached forward output of `node`. Nothing is recomputed.
    pub fn get_output(&self, node: Node) -> Result<&Tensor, GradnetError> {
        let idx = self.resolve(node)?;
        Ok(&self.nodes[idx].output)
    }

    /// The operation recorded for `node`.
    pub fn op(&self, node: Node) -> Result<&Op, GradnetError> {
        let idx = self.resolve(node)?;
        Ok(&self.nodes[idx].op)
    }

    /// Value of the last node if it is a loss.
    pub fn loss_value(&self) -> Option<f64> {
        let last = self.nodes.last()?;
        match last.op.kind() {
            Some(kind) if kind.is_loss() => last.output.item(),
            _ => None,
        }
    }

    /// Reverse-mode differentiation from the last node, which must be `1 x 1`.
    ///
    /// Gradients are recomputed from scratch on every call.
    pub fn backprop(&mut self) -> Result<(), GradnetError> {
        let root = self.last_node().ok_or(GradnetError::EmptyGraph)?;
        let output = &self.nodes[root.index].output;
        if !output.is_scalar() {
            return Err(GradnetError::BackwardNonScalar {
                shape: output.shape_vec(),
            });
        }
        self.backprop_from(root, scalar(1.0))
    }

    /// Propagates `seed` (the gradient of some scalar with respect to `root`'s
    /// output) back through every node `root` depends on.
    pub(crate) fn backprop_from(&mut self, root: Node, seed: Tensor) -> Result<(), GradnetError> {
        let root_idx = self.resolve(root)?;
        if seed.shape() != self.nodes[root_idx].output.shape() {
            return Err(GradnetError::ShapeMismatch {
                expected: self.nodes[root_idx].output.shape_vec(),
                actual: seed.shape_vec(),
                operation: "backprop seed".to_string(),
            });
        }
        debug!("Graph {}: backprop from node {} over {} node(s)", self.id, root_idx, root_idx + 1);

        let mut grads: Vec<Option<Tensor>> = vec![None; self.nodes.len()];
        grads[root_idx] = Some(seed);

        for idx in (0..=root_idx).rev() {
            let grad_output = match grads[idx].take() {
                Some(g) => g,
                None => continue, // did not influence the root
            };
            let record = &self.nodes[idx];
            let parents = record.op.parents();
            if !parents.is_empty() {
                let inputs: Vec<&Tensor> =
                    parents.iter().map(|p| &self.nodes[p.index].output).collect();
                let parent_grads = record.op.backward(&inputs, &record.output, &grad_output)?;
                for (parent, grad) in parents.iter().zip(parent_grads) {
                    let parent_output = &self.nodes[parent.index].output;
                    accumulate_gradient(&mut grads[parent.index], grad, parent_output)?;
                }
            }
            grads[idx] = Some(grad_output);
        }

        let reached = self
            .variable_nodes
            .iter()
            .flatten()
            .filter(|n| grads[n.index].is_some())
            .count();
        debug!(
            "Graph {}: backprop reached {} of {} variable(s)",
            self.id,
            reached,
            self.variables.len()
        );
        self.grads = grads;
        Ok(())
    }

    /// Gradient of the output of `node` from the latest `backprop`, if it was reached.
    pub fn gradient(&self, node: Node) -> Result<Option<&Tensor>, GradnetError> {
        let idx = self.resolve(node)?;
        Ok(self.grads.get(idx).and_then(|g| g.as_ref()))
    }

    /// Gradient accumulated at a registered Variable's leaf, if it was reached.
    pub fn variable_gradient(&self, variable: &Variable) -> Result<Option<&Tensor>, GradnetError> {
        let index = self
            .variables
            .iter()
            .position(|v| v.ptr_eq(variable))
            .ok_or_else(|| GradnetError::UnregisteredVariable {
                shape: variable.value().shape_vec(),
            })?;
        match self.variable_nodes[index] {
            Some(node) => self.gradient(node),
            None => Ok(None),
        }
    }

    /// Gradient descent on every registered Variable reached by the latest
    /// `backprop`: `v <- v - learning_rate * grad`. Other Variables are untouched.
    ///
    /// Each call applies the update again; call it once per `backprop`. If any
    /// Variable to update is still borrowed through [`Variable::value`], nothing
    /// is updated and `GradnetError::VariableBorrowed` is returned.
    pub fn step(&self, learning_rate: f64) -> Result<(), GradnetError> {
        if self.grads.is_empty() {
            warn!("Graph {}: step() called without gradients, nothing to update", self.id);
            return Ok(());
        }
        let updates: Vec<(usize, &Variable, Option<&Tensor>)> = self
            .variables
            .iter()
            .enumerate()
            .map(|(index, variable)| (index, variable, self.reached_gradient(index)))
            .collect();
        for (_, variable, grad) in &updates {
            if grad.is_some() {
                variable.check_writable()?;
            }
        }
        for (index, variable, grad) in updates {
            match grad {
                Some(grad) => {
                    variable.apply_gradient(grad, learning_rate)?;
                    debug!(
                        "Graph {}: updated variable {} (lr = {})",
                        self.id, index, learning_rate
                    );
                }
                None => debug!(
                    "Graph {}: no gradient for variable {}, skipping update",
                    self.id, index
                ),
            }
        }
        Ok(())
    }

    fn reached_gradient(&self, variable_index: usize) -> Option<&Tensor> {
        self.variable_nodes[variable_index].and_then(|node| self.grads[node.index].as_ref())
    }
}

fn accumulate_gradient(
    slot: &mut Option<Tensor>,
    grad: Tensor,
    output: &Tensor,
) -> Result<(), GradnetError> {
    if grad.shape() != output.shape() {
        return Err(GradnetError::ShapeMismatch {
            expected: output.shape_vec(),
            actual: grad.shape_vec(),
            operation: "gradient accumulation".to_string(),
        });
    }
    match slot {
        Some(existing) => existing.add_assign(&grad),
        None => {
            *slot = Some(grad);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
