use super::*;
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn column(values: &[f64]) -> Tensor {
    Tensor::new(values.to_vec(), values.len(), 1).unwrap()
}

#[test]
fn test_regression_prediction_shape() {
    let mut rng = StdRng::seed_from_u64(11);
    let config = RegressionConfig::default().with_hidden_size(8);
    let model = RegressionModel::with_rng(config, &mut rng);
    let prediction = model.predict(&column(&[0.1, 0.2, 0.3])).unwrap();
    assert_eq!(prediction.shape(), (3, 1));
}

#[test]
fn test_regression_run_with_target_returns_loss_graph() {
    let mut rng = StdRng::seed_from_u64(12);
    let config = RegressionConfig::default().with_hidden_size(8);
    let model = RegressionModel::with_rng(config, &mut rng);
    let x = column(&[0.5, -0.5]);
    let y = column(&[1.0, 2.0]);
    let graph = model.run(&x, Some(&y)).unwrap().into_graph().unwrap();
    let loss = graph.loss_value().unwrap();
    assert!(loss >= 0.0);
    assert_eq!(graph.variables().len(), 4);
}

#[test]
fn test_inference_does_not_return_graph() {
    let mut rng = StdRng::seed_from_u64(13);
    let config = RegressionConfig::default().with_hidden_size(4);
    let model = RegressionModel::with_rng(config, &mut rng);
    let output = model.run(&column(&[1.0]), None).unwrap();
    assert!(matches!(
        output.into_graph(),
        Err(ModelError::UnexpectedRunOutput { expected: "graph", found: "prediction" })
    ));
}

#[test]
fn test_odd_regression_is_odd() {
    let mut rng = StdRng::seed_from_u64(14);
    let model = OddRegressionModel::with_rng(OddRegressionConfig::default(), &mut rng);
    let xs = [0.0, 0.3, -1.7, 2.5, 10.0];
    let neg_xs: Vec<f64> = xs.iter().map(|x| -x).collect();
    let g = model.predict(&column(&xs)).unwrap();
    let g_neg = model.predict(&column(&neg_xs)).unwrap();
    for (a, b) in g.data().iter().zip(g_neg.data()) {
        assert_relative_eq!(*a, -*b, epsilon = 1e-12);
    }
    assert_eq!(g.data()[0], 0.0);
}

#[test]
fn test_odd_regression_stays_odd_after_training() {
    let mut rng = StdRng::seed_from_u64(15);
    let config = OddRegressionConfig::default().with_hidden_size(16);
    let model = OddRegressionModel::with_rng(config, &mut rng);
    let x = column(&[-1.0, -0.5, 0.5, 1.0]);
    let y = x.map(|v| v * v * v);
    model.train(std::iter::repeat((x.clone(), y)).take(20)).unwrap();

    let g = model.predict(&column(&[0.7])).unwrap().item().unwrap();
    let g_neg = model.predict(&column(&[-0.7])).unwrap().item().unwrap();
    assert_relative_eq!(g, -g_neg, epsilon = 1e-12);
}

#[test]
fn test_odd_regression_mirrored_branch_carries_gradient() {
    let mut rng = StdRng::seed_from_u64(16);
    let config = OddRegressionConfig::default().with_hidden_size(6);
    let model = OddRegressionModel::with_rng(config, &mut rng);
    let x = column(&[0.4, -0.9]);
    let y = column(&[0.2, -0.3]);
    let mut graph = model.run(&x, Some(&y)).unwrap().into_graph().unwrap();
    graph.backprop().unwrap();

    assert!(graph.loss_value().unwrap().is_finite());
    for variable in model.variables() {
        assert!(graph.variable_gradient(&variable).unwrap().is_some());
    }
    // b2 enters both branches with opposite signs, so its gradient cancels.
    let b2 = &model.variables()[3];
    let grad_b2 = graph.variable_gradient(b2).unwrap().unwrap();
    assert_relative_eq!(grad_b2.item().unwrap(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_regression_training_reduces_loss() {
    let mut rng = StdRng::seed_from_u64(17);
    let config = RegressionConfig::default().with_hidden_size(20);
    let model = RegressionModel::with_rng(config, &mut rng);
    let x = Tensor::new((0..16).map(|i| -1.0 + i as f64 / 7.5).collect(), 16, 1).unwrap();
    let y = x.map(|v| 0.5 * v + 0.25);

    let before = model.loss(&x, &y).unwrap();
    let summary = model.train(std::iter::repeat((x.clone(), y.clone())).take(200)).unwrap();
    let after = model.loss(&x, &y).unwrap();

    assert_eq!(summary.batches, 200);
    assert!(summary.last_loss.is_some());
    assert!(after < before, "loss went from {} to {}", before, after);
}
