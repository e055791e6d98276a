use gradnet_core::Tensor;

// Shared by several test crates; not every crate uses every helper.
#[allow(dead_code)]
pub(crate) fn create_test_tensor(data: Vec<f64>, rows: usize, cols: usize) -> Tensor {
    Tensor::new(data, rows, cols).expect("Test tensor creation failed")
}

/// `n x 1` column of evenly spaced points in `[start, end]`.
#[allow(dead_code)]
pub(crate) fn linspace_column(start: f64, end: f64, n: usize) -> Tensor {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    let data = (0..n).map(|i| start + step * i as f64).collect();
    create_test_tensor(data, n, 1)
}

#[allow(dead_code)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
