//! Handwritten digit classification on flattened 28x28 images.

use crate::config::DigitClassificationConfig;
use crate::error::ModelError;
use crate::layers::TwoLayerNet;
use crate::model::{finish_run, Model, RunOutput};
use gradnet_core::{Graph, OpKind, Tensor, Variable};
use rand::Rng;

/// Pixels per image.
pub const IMAGE_SIZE: usize = 784;
/// Digits 0 through 9.
pub const NUM_CLASSES: usize = 10;

/// Scores each `1 x 784` image row against the ten digit classes.
///
/// Training targets are `batch x 10` one-hot rows; the loss is SoftmaxLoss.
/// Predictions are raw logits, one column per class.
#[derive(Debug, Clone)]
pub struct DigitClassificationModel {
    net: TwoLayerNet,
    config: DigitClassificationConfig,
}

impl DigitClassificationModel {
    pub fn new(config: DigitClassificationConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: DigitClassificationConfig, rng: &mut R) -> Self {
        DigitClassificationModel {
            net: TwoLayerNet::with_rng(IMAGE_SIZE, config.hidden_size, NUM_CLASSES, rng),
            config,
        }
    }

    pub fn config(&self) -> &DigitClassificationConfig {
        &self.config
    }

    /// Most likely digit for every image row.
    pub fn predict_digits(&self, images: &Tensor) -> Result<Vec<usize>, ModelError> {
        Ok(self.predict(images)?.argmax_rows())
    }
}

impl Default for DigitClassificationModel {
    fn default() -> Self {
        Self::new(DigitClassificationConfig::default())
    }
}

impl Model for DigitClassificationModel {
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
        let logits = self.net.forward(&mut graph, x)?;
        finish_run(graph, logits, y, OpKind::SoftmaxLoss)
    }
}
