//! Fits `sin(x)` on `[-2π, 2π]` with the regression models.
//!
//! Run with `RUST_LOG=info` to see training progress.

use gradnet_core::Tensor;
use gradnet_models::{
    Model, ModelError, OddRegressionConfig, OddRegressionModel, RegressionConfig, RegressionModel,
};
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::f64::consts::PI;

const SAMPLES: usize = 200;
const BATCH_SIZE: usize = 20;
const EPOCHS: usize = 150;

fn sine_batches(rng: &mut StdRng) -> Result<Vec<(Tensor, Tensor)>, ModelError> {
    let mut xs: Vec<f64> = (0..SAMPLES)
        .map(|i| -2.0 * PI + 4.0 * PI * i as f64 / (SAMPLES - 1) as f64)
        .collect();
    let mut batches = Vec::with_capacity(EPOCHS * SAMPLES / BATCH_SIZE);
    for _ in 0..EPOCHS {
        xs.shuffle(rng);
        for chunk in xs.chunks(BATCH_SIZE) {
            let x = Tensor::new(chunk.to_vec(), chunk.len(), 1)?;
            let y = x.map(f64::sin);
            batches.push((x, y));
        }
    }
    Ok(batches)
}

fn evaluate<M: Model<Input = Tensor>>(name: &str, model: &M) -> Result<(), ModelError> {
    let x = Tensor::new((0..9).map(|i| -PI + PI * i as f64 / 4.0).collect(), 9, 1)?;
    let y = x.map(f64::sin);
    info!("{}: held-out loss = {:.5}", name, model.loss(&x, &y)?);
    let prediction = model.predict(&x)?;
    for (input, output) in x.data().iter().zip(prediction.data()) {
        println!("{:>10} sin({:+.3}) = {:+.4}, predicted {:+.4}", name, input, input.sin(), output);
    }
    Ok(())
}

fn main() -> Result<(), ModelError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let mut rng = StdRng::seed_from_u64(42);

    let regression = RegressionModel::with_rng(RegressionConfig::default(), &mut rng);
    let summary = regression.train(sine_batches(&mut rng)?)?;
    info!("regression: {} batches, last loss {:?}", summary.batches, summary.last_loss);
    evaluate("regression", &regression)?;

    let odd = OddRegressionModel::with_rng(OddRegressionConfig::default(), &mut rng);
    let summary = odd.train(sine_batches(&mut rng)?)?;
    info!("odd regression: {} batches, last loss {:?}", summary.batches, summary.last_loss);
    evaluate("odd", &odd)?;
    Ok(())
}
