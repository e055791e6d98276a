//! # gradnet-core
//!
//! A small define-by-run computation graph with reverse-mode differentiation.
//!
//! A [`Graph`] is built for one batch: inputs and [`Variable`]s go in as leaves,
//! operations are added one by one (their outputs are computed immediately), a
//! scalar loss node goes last, then [`Graph::backprop`] computes gradients and
//! [`Graph::step`] applies gradient descent to the Variables.
//!
//! ```
//! use gradnet_core::{Graph, Tensor, Variable};
//!
//! # fn main() -> Result<(), gradnet_core::GradnetError> {
//! let w = Variable::new(Tensor::from_rows(&[[2.0]])?);
//! let mut graph = Graph::new(&[w.clone()]);
//! let x = graph.input(Tensor::from_rows(&[[1.0], [2.0]])?);
//! let y = graph.input(Tensor::from_rows(&[[3.0], [5.0]])?);
//! let w_node = graph.variable(&w)?;
//! let prediction = graph.matrix_multiply(x, w_node)?;
//! let loss = graph.square_loss(prediction, y)?;
//! assert_eq!(graph.get_output(loss)?.item(), Some(1.0));
//!
//! graph.backprop()?;
//! graph.step(0.1)?;
//! assert!((w.value().item().unwrap() - 2.3).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod autograd;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod utils;
pub mod variable;

pub use autograd::{Graph, Node};
pub use error::GradnetError;
pub use ops::{Op, OpKind};
pub use tensor::Tensor;
pub use variable::Variable;
