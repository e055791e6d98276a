//! Typed hyperparameters for each task model.
//!
//! Every config carries the hidden layer width and the learning rate used by
//! [`Model::train`](crate::model::Model::train). `Default` gives the values each
//! model was tuned with; the `with_*` setters override them.

macro_rules! model_config {
    (
        $(#[$meta:meta])*
        $name:ident { hidden_size: $hidden:expr, learning_rate: $lr:expr $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            /// Width of the hidden layer.
            pub hidden_size: usize,
            /// Step size handed to `Graph::step`.
            pub learning_rate: f64,
        }

        impl Default for $name {
            fn default() -> Self {
                $name {
                    hidden_size: $hidden,
                    learning_rate: $lr,
                }
            }
        }

        impl $name {
            pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
                self.hidden_size = hidden_size;
                self
            }

            pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
                self.learning_rate = learning_rate;
                self
            }
        }
    };
}

model_config!(
    /// Configuration of [`RegressionModel`](crate::RegressionModel).
    RegressionConfig { hidden_size: 100, learning_rate: 0.05 }
);

model_config!(
    /// Configuration of [`OddRegressionModel`](crate::OddRegressionModel).
    OddRegressionConfig { hidden_size: 100, learning_rate: 0.0875 }
);

model_config!(
    /// Configuration of [`DigitClassificationModel`](crate::DigitClassificationModel).
    DigitClassificationConfig { hidden_size: 300, learning_rate: 0.25 }
);

model_config!(
    /// Configuration of [`DeepQModel`](crate::DeepQModel).
    DeepQConfig { hidden_size: 50, learning_rate: 0.04166 }
);

model_config!(
    /// Configuration of [`LanguageIdModel`](crate::LanguageIdModel).
    LanguageIdConfig { hidden_size: 300, learning_rate: 0.06 }
);
