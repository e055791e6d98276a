use gradnet_core::{Graph, Tensor, Variable};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod common;
use common::{init_logger, linspace_column};

/// Builds the loss graph of a linear model `x·w + b` for one batch.
fn linear_loss(w: &Variable, b: &Variable, x: &Tensor, y: &Tensor) -> Graph {
    let mut graph = Graph::new(&[w.clone(), b.clone()]);
    let x = graph.input(x.clone());
    let y = graph.input(y.clone());
    let w = graph.variable(w).unwrap();
    let b = graph.variable(b).unwrap();
    let xw = graph.matrix_multiply(x, w).unwrap();
    let prediction = graph.matrix_vector_add(xw, b).unwrap();
    graph.square_loss(prediction, y).unwrap();
    graph
}

#[test]
fn test_linear_fit_converges() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    let w = Variable::random_with_rng(1, 1, &mut rng);
    let b = Variable::random_vector_with_rng(1, &mut rng);

    let x = linspace_column(-1.0, 1.0, 20);
    let y = x.map(|v| 3.0 * v - 0.5);

    let initial = linear_loss(&w, &b, &x, &y).loss_value().unwrap();
    for _ in 0..500 {
        let mut graph = linear_loss(&w, &b, &x, &y);
        graph.backprop().unwrap();
        graph.step(0.1).unwrap();
    }
    let last = linear_loss(&w, &b, &x, &y).loss_value().unwrap();

    assert!(last < initial);
    assert!(last < 1e-6, "loss after training: {}", last);
    assert!((w.value().item().unwrap() - 3.0).abs() < 1e-3);
    assert!((b.value().item().unwrap() + 0.5).abs() < 1e-3);
}

#[test]
fn test_variables_persist_across_graphs() {
    let w = Variable::new(Tensor::from_rows(&[[0.0]]).unwrap());
    let b = Variable::new(Tensor::from_rows(&[[0.0]]).unwrap());
    let x = linspace_column(0.0, 1.0, 3);
    let y = x.map(|v| v + 1.0);

    let mut first = linear_loss(&w, &b, &x, &y);
    first.backprop().unwrap();
    first.step(0.5).unwrap();
    let after_first = w.snapshot();
    drop(first);

    // A new graph sees the updated values.
    let mut second = Graph::new(&[w.clone()]);
    let w_node = second.variable(&w).unwrap();
    assert_eq!(second.get_output(w_node).unwrap(), &after_first);
    assert_ne!(after_first.item(), Some(0.0));
}
