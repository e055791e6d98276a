//! The common interface of every task model.

use crate::error::ModelError;
use gradnet_core::{GradnetError, Graph, Node, OpKind, Tensor, Variable};
use log::info;

/// Number of batches between two progress lines logged by [`Model::train`].
pub const LOG_EVERY: usize = 100;

/// What [`Model::run`] produced.
#[derive(Debug)]
pub enum RunOutput {
    /// Training mode: a graph whose last node is the loss.
    Graph(Graph),
    /// Inference mode: the model's output for the batch.
    Prediction(Tensor),
}

impl RunOutput {
    fn variant_name(&self) -> &'static str {
        match self {
            RunOutput::Graph(_) => "graph",
            RunOutput::Prediction(_) => "prediction",
        }
    }

    pub fn into_graph(self) -> Result<Graph, ModelError> {
        match self {
            RunOutput::Graph(graph) => Ok(graph),
            other => Err(ModelError::UnexpectedRunOutput {
                expected: "graph",
                found: other.variant_name(),
            }),
        }
    }

    pub fn into_prediction(self) -> Result<Tensor, ModelError> {
        match self {
            RunOutput::Prediction(tensor) => Ok(tensor),
            other => Err(ModelError::UnexpectedRunOutput {
                expected: "prediction",
                found: other.variant_name(),
            }),
        }
    }
}

/// Outcome of a [`Model::train`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingSummary {
    /// Number of batches trained on.
    pub batches: usize,
    /// Loss of the last batch, before its update was applied.
    pub last_loss: Option<f64>,
}

/// A network with its own Variables that builds a fresh graph per batch.
pub trait Model {
    /// What one batch of inputs looks like.
    type Input;

    fn learning_rate(&self) -> f64;

    /// Every Variable of the model; these are the Variables its graphs update.
    fn variables(&self) -> Vec<Variable>;

    /// Builds the graph for one batch.
    ///
    /// With a target `y`, returns [`RunOutput::Graph`] whose last node is the
    /// loss. Without one, returns [`RunOutput::Prediction`]. Never calls
    /// `backprop` or `step`, so Variables are left unchanged.
    fn run(&self, x: &Self::Input, y: Option<&Tensor>) -> Result<RunOutput, ModelError>;

    /// Inference shortcut for `run(x, None)`.
    fn predict(&self, x: &Self::Input) -> Result<Tensor, ModelError> {
        self.run(x, None)?.into_prediction()
    }

    /// The loss of one batch, without updating anything.
    fn loss(&self, x: &Self::Input, y: &Tensor) -> Result<f64, ModelError> {
        let graph = self.run(x, Some(y))?.into_graph()?;
        graph.loss_value().ok_or_else(|| {
            ModelError::Core(GradnetError::InternalError(
                "training graph does not end in a loss".to_string(),
            ))
        })
    }

    /// Gradient descent over `batches`: for each one `run`, `backprop`, then
    /// `step` with [`Model::learning_rate`].
    fn train<I>(&self, batches: I) -> Result<TrainingSummary, ModelError>
    where
        I: IntoIterator<Item = (Self::Input, Tensor)>,
    {
        let learning_rate = self.learning_rate();
        let mut summary = TrainingSummary {
            batches: 0,
            last_loss: None,
        };
        for (x, y) in batches {
            let mut graph = self.run(&x, Some(&y))?.into_graph()?;
            graph.backprop()?;
            graph.step(learning_rate)?;
            summary.batches += 1;
            summary.last_loss = graph.loss_value();
            if summary.batches % LOG_EVERY == 0 {
                info!(
                    "batch {}: loss = {:.6}",
                    summary.batches,
                    summary.last_loss.unwrap_or(f64::NAN)
                );
            }
        }
        info!(
            "training done after {} batch(es), last loss = {:?}",
            summary.batches, summary.last_loss
        );
        Ok(summary)
    }
}

/// Ends a model graph: adds the loss of `output` against `target` when given,
/// otherwise returns the value of `output`.
pub(crate) fn finish_run(
    mut graph: Graph,
    output: Node,
    target: Option<&Tensor>,
    loss: OpKind,
) -> Result<RunOutput, ModelError> {
    match target {
        Some(y) => {
            let y = graph.input(y.clone());
            graph.apply(loss, &[output, y])?;
            Ok(RunOutput::Graph(graph))
        }
        None => Ok(RunOutput::Prediction(graph.get_output(output)?.clone())),
    }
}
