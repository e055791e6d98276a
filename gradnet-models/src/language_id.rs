//! Language identification of words read one character at a time.

use crate::config::LanguageIdConfig;
use crate::error::ModelError;
use crate::layers::Linear;
use crate::model::{finish_run, Model, RunOutput};
use gradnet_core::tensor::zeros;
use gradnet_core::{Graph, OpKind, Tensor, Variable};
use rand::Rng;

/// Size of the combined alphabet; characters arrive one-hot encoded.
pub const NUM_CHARS: usize = 47;

/// Output classes, in column order.
pub const LANGUAGES: [&str; 5] = ["English", "Spanish", "Finnish", "Dutch", "Polish"];

/// Reads a batch of words as a sequence of `batch x 47` character tensors.
///
/// Starting from a zero hidden state, every character updates it with
/// `h = ReLU(c·W1 + b1 + h)`; the final state is scored by `h·W2 + b2`
/// with one column per language. Trained with SoftmaxLoss against
/// `batch x 5` one-hot rows.
#[derive(Debug, Clone)]
pub struct LanguageIdModel {
    char_layer: Linear,
    output_layer: Linear,
    config: LanguageIdConfig,
}

impl LanguageIdModel {
    pub fn new(config: LanguageIdConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: LanguageIdConfig, rng: &mut R) -> Self {
        LanguageIdModel {
            char_layer: Linear::with_rng(NUM_CHARS, config.hidden_size, rng),
            output_layer: Linear::with_rng(config.hidden_size, LANGUAGES.len(), rng),
            config,
        }
    }

    pub fn config(&self) -> &LanguageIdConfig {
        &self.config
    }

    pub fn languages(&self) -> &'static [&'static str] {
        &LANGUAGES
    }

    /// Most likely language for every word in the batch.
    pub fn predict_language(&self, xs: &[Tensor]) -> Result<Vec<&'static str>, ModelError> {
        let scores = self.predict(&xs.to_vec())?;
        Ok(scores.argmax_rows().into_iter().map(|i| LANGUAGES[i]).collect())
    }
}

impl Default for LanguageIdModel {
    fn default() -> Self {
        Self::new(LanguageIdConfig::default())
    }
}

impl Model for LanguageIdModel {
    type Input = Vec<Tensor>;

    fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    fn variables(&self) -> Vec<Variable> {
        let mut variables = self.char_layer.variables();
        variables.extend(self.output_layer.variables());
        variables
    }

    fn run(&self, xs: &Vec<Tensor>, y: Option<&Tensor>) -> Result<RunOutput, ModelError> {
        let first = xs.first().ok_or(ModelError::EmptySequence)?;
        let mut graph = Graph::new(&self.variables());

        let mut h = graph.input(zeros(first.rows(), self.config.hidden_size));
        for c in xs {
            let c = graph.input(c.clone());
            let z = self.char_layer.forward(&mut graph, c)?;
            let z = graph.add(z, h)?;
            h = graph.relu(z)?;
        }

        let scores = self.output_layer.forward(&mut graph, h)?;
        finish_run(graph, scores, y, OpKind::SoftmaxLoss)
    }
}
