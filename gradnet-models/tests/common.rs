use gradnet_core::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[allow(dead_code)]
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[allow(dead_code)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `rows x cols` tensor of uniform values in `[-1, 1)`.
#[allow(dead_code)]
pub(crate) fn random_tensor(rows: usize, cols: usize, rng: &mut StdRng) -> Tensor {
    let data = (0..rows * cols).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Tensor::new(data, rows, cols).expect("Test tensor creation failed")
}

/// One-hot rows for the given class indices.
#[allow(dead_code)]
pub(crate) fn one_hot(classes: &[usize], num_classes: usize) -> Tensor {
    gradnet_core::tensor::create::one_hot(classes, num_classes).expect("Invalid class index")
}
