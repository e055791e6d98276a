use crate::error::GradnetError;
use crate::tensor::{create, Tensor};
use rand::Rng;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A trainable tensor shared between a model and the graphs it builds.
///
/// Cloning a `Variable` clones the handle, not the data: every clone observes the
/// same values. Graphs only read Variables while building; the single write path
/// is [`Graph::step`](crate::Graph::step).
///
/// `Rc<RefCell<_>>` keeps the type `!Send`, so the whole engine stays on one thread.
pub struct Variable(Rc<RefCell<Tensor>>);

impl Variable {
    /// Wraps an existing tensor.
    pub fn new(tensor: Tensor) -> Self {
        Variable(Rc::new(RefCell::new(tensor)))
    }

    /// Creates a `rows x cols` Variable initialized uniformly in `[-l, l]`
    /// with `l = sqrt(3 / mean(rows, cols))`, using the thread RNG.
    pub fn random(rows: usize, cols: usize) -> Self {
        Self::random_with_rng(rows, cols, &mut rand::thread_rng())
    }

    /// Same as [`Variable::random`] with an explicit RNG.
    pub fn random_with_rng<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mean_dim = (rows + cols) as f64 / 2.0;
        let limit = if mean_dim > 0.0 { (3.0 / mean_dim).sqrt() } else { 0.0 };
        Variable::new(create::uniform(rows, cols, limit, rng))
    }

    /// Creates a `1 x n` bias Variable initialized uniformly in `[-l, l]`
    /// with `l = sqrt(3 / n)`.
    pub fn random_vector_with_rng<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let limit = if len > 0 { (3.0 / len as f64).sqrt() } else { 0.0 };
        Variable::new(create::uniform(1, len, limit, rng))
    }

    /// Borrows the current value.
    pub fn value(&self) -> Ref<'_, Tensor> {
        self.0.borrow()
    }

    /// Returns a copy of the current value.
    pub fn snapshot(&self) -> Tensor {
        self.0.borrow().clone()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.0.borrow().shape()
    }

    /// True if both handles refer to the same Variable.
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// `self <- self - learning_rate * grad`. Only called by `Graph::step`.
    ///
    /// # Errors
    /// `GradnetError::VariableBorrowed` if a guard returned by [`Variable::value`]
    /// is still alive.
    pub(crate) fn apply_gradient(
        &self,
        grad: &Tensor,
        learning_rate: f64,
    ) -> Result<(), GradnetError> {
        let mut value = self.0.try_borrow_mut().map_err(|_| self.borrowed_error())?;
        if value.shape() != grad.shape() {
            return Err(GradnetError::ShapeMismatch {
                expected: value.shape_vec(),
                actual: grad.shape_vec(),
                operation: "variable update".to_string(),
            });
        }
        for (v, g) in value.data.iter_mut().zip(grad.data()) {
            *v -= learning_rate * g;
        }
        Ok(())
    }
}

impl Variable {
    /// Fails if the value cannot be borrowed mutably right now.
    pub(crate) fn check_writable(&self) -> Result<(), GradnetError> {
        self.0.try_borrow_mut().map(|_| ()).map_err(|_| self.borrowed_error())
    }

    fn borrowed_error(&self) -> GradnetError {
        GradnetError::VariableBorrowed {
            shape: self
                .0
                .try_borrow()
                .map(|v| v.shape_vec())
                .unwrap_or_default(),
        }
    }
}

impl Clone for Variable {
    /// Cloning a Variable clones the handle (shallow clone via Rc).
    fn clone(&self) -> Self {
        Variable(Rc::clone(&self.0))
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({:?})", self.0.borrow())
    }
}

#[cfg(test)]
#[path = "variable_test.rs"]
mod tests;
