//! Q-value approximation for a two-action control task with a 4-value state.

use crate::config::DeepQConfig;
use crate::error::ModelError;
use crate::layers::TwoLayerNet;
use crate::model::{finish_run, Model, RunOutput};
use gradnet_core::{Graph, OpKind, Tensor, Variable};
use log::debug;
use rand::Rng;

/// Values describing one state.
pub const STATE_SIZE: usize = 4;
/// Available actions.
pub const NUM_ACTIONS: usize = 2;

/// Predicts one Q-value per action for every `1 x 4` state row.
///
/// Trained with SquareLoss against `batch x 2` Q-targets.
#[derive(Debug, Clone)]
pub struct DeepQModel {
    net: TwoLayerNet,
    config: DeepQConfig,
}

impl DeepQModel {
    pub fn new(config: DeepQConfig) -> Self {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: DeepQConfig, rng: &mut R) -> Self {
        DeepQModel {
            net: TwoLayerNet::with_rng(STATE_SIZE, config.hidden_size, NUM_ACTIONS, rng),
            config,
        }
    }

    pub fn config(&self) -> &DeepQConfig {
        &self.config
    }

    pub fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    /// Epsilon-greedy action for a single `1 x 4` state, using the thread RNG.
    pub fn get_action(&self, state: &Tensor, epsilon: f64) -> Result<usize, ModelError> {
        self.get_action_with_rng(state, epsilon, &mut rand::thread_rng())
    }

    /// With probability `epsilon` a uniformly random action, otherwise the
    /// action with the highest predicted Q-value.
    ///
    /// # Errors
    /// `ModelError::InvalidEpsilon` if `epsilon` is not in `[0, 1]`.
    pub fn get_action_with_rng<R: Rng + ?Sized>(
        &self,
        state: &Tensor,
        epsilon: f64,
        rng: &mut R,
    ) -> Result<usize, ModelError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(ModelError::InvalidEpsilon(epsilon));
        }
        if rng.gen::<f64>() < epsilon {
            let action = rng.gen_range(0..NUM_ACTIONS);
            debug!("exploring: random action {}", action);
            return Ok(action);
        }
        let scores = self.predict(state)?;
        Ok(scores.argmax_row(0)?)
    }
}

impl Default for DeepQModel {
    fn default() -> Self {
        Self::new(DeepQConfig::default())
    }
}

impl Model for DeepQModel {
    type Input = Tensor;

    fn learning_rate(&self) -> f64 {
        self.config.learning_rate
    }

    fn variables(&self) -> Vec<Variable> {
        self.net.variables()
    }

    fn run(&self, states: &Tensor, q_target: Option<&Tensor>) -> Result<RunOutput, ModelError> {
        let mut graph = Graph::new(&self.variables());
        let states = graph.input(states.clone());
        let q_values = self.net.forward(&mut graph, states)?;
        finish_run(graph, q_values, q_target, OpKind::SquareLoss)
    }
}
