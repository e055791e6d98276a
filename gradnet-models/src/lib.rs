//! # gradnet-models
//!
//! Task models built on [`gradnet_core`]: each owns its Variables, builds a new
//! [`Graph`](gradnet_core::Graph) for every batch and trains with plain
//! gradient descent through [`Model::train`].
//!
//! ```
//! use gradnet_core::Tensor;
//! use gradnet_models::{Model, RegressionConfig, RegressionModel};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), gradnet_models::ModelError> {
//! let mut rng = StdRng::seed_from_u64(0);
//! let model = RegressionModel::with_rng(RegressionConfig::default(), &mut rng);
//! let x = Tensor::from_rows(&[[0.0], [0.5], [1.0]])?;
//! let y = x.map(f64::sin);
//!
//! let summary = model.train(std::iter::repeat((x.clone(), y)).take(10))?;
//! assert_eq!(summary.batches, 10);
//! assert_eq!(model.predict(&x)?.shape(), (3, 1));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod deep_q;
pub mod digit_classification;
pub mod error;
pub mod language_id;
pub mod layers;
pub mod model;
pub mod regression;

pub use config::{
    DeepQConfig, DigitClassificationConfig, LanguageIdConfig, OddRegressionConfig, RegressionConfig,
};
pub use deep_q::DeepQModel;
pub use digit_classification::DigitClassificationModel;
pub use error::ModelError;
pub use language_id::LanguageIdModel;
pub use model::{Model, RunOutput, TrainingSummary};
pub use regression::{OddRegressionModel, RegressionModel};
