//! Function approximation for `1 x 1` inputs and targets.

use crate::config::{OddRegressionConfig, RegressionConfig};
use crate::error::ModelError;
use crate::layers::TwoLayerNet;
use crate::model::{finish_run, Model, RunOutput};
use gradnet_core::{Graph, OpKind, Tensor, Variable};
use rand::Rng;

/// Fits `y = f(x)` with a two-layer ReLU network trained on SquareLoss.
///
/// Batches are `batch x 1` inputs with `batch x 1` targets.
#[derive(Debug, Clone)]
pub struct RegressionModel {
    net: TwoLayerNet,
    config: RegressionConfig,
}

impl RegressionModel {
    pub fn new(config: RegressionConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: RegressionConfig, rng: &mut R) -> Self {
        RegressionModel {
            net: TwoLayerNet::with_rng(1, config.hidden_size, 1, rng),
            config,
        }
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }
}

impl Default for RegressionModel {
    fn default() -> Self {
        Self::new(RegressionConfig::default())
    }
}

impl Model for RegressionModel {
    type Input = Tensor;

    fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    fn variables(&self) -> Vec<Variable> {
        self.net.variables()
    }

    fn run(&self, x: &Tensor, y: Option<&Tensor>) -> Result<RunOutput, ModelError> {
        let mut graph = Graph::new(&self.variables());
        let x = graph.input(x.clone());
        let prediction = self.net.forward(&mut graph, x)?;
        finish_run(graph, prediction, y, OpKind::SquareLoss)
    }
}

/// Like [`RegressionModel`], but its output `g(x) = f(x) - f(-x)` is an odd
/// function of `x` for any weights.
///
/// Both branches share the network's Variables and both carry gradients.
#[derive(Debug, Clone)]
pub struct OddRegressionModel {
    net: TwoLayerNet,
    config: OddRegressionConfig,
}

impl OddRegressionModel {
    pub fn new(config: OddRegressionConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: OddRegressionConfig, rng: &mut R) -> Self {
        OddRegressionModel {
            net: TwoLayerNet::with_rng(1, config.hidden_size, 1, rng),
            config,
        }
    }

    pub fn config(&self) -> &OddRegressionConfig {
        &self.config
    }
}

impl Default for OddRegressionModel {
    fn default() -> Self {
        Self::new(OddRegressionConfig::default())
    }
}

impl Model for OddRegressionModel {
    type Input = Tensor;

    fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    fn variables(&self) -> Vec<Variable> {
        self.net.variables()
    }

    fn run(&self, x: &Tensor, y: Option<&Tensor>) -> Result<RunOutput, ModelError> {
        let mut graph = Graph::new(&self.variables());
        let x = graph.input(x.clone());
        let positive = self.net.forward(&mut graph, x)?;

        let neg_x = graph.negate(x)?;
        let mirrored = self.net.forward(&mut graph, neg_x)?;
        let mirrored = graph.negate(mirrored)?;

        let output = graph.add(positive, mirrored)?;
        finish_run(graph, output, y, OpKind::SquareLoss)
    }
}

#[cfg(test)]
#[path = "regression_test.rs"]
mod tests;
