use gradnet_core::autograd::grad_check::{check_grad, GradCheckError};
use gradnet_core::tensor::scalar;
use gradnet_core::{GradnetError, Graph, Node};

mod common;
use common::create_test_tensor;

const EPSILON: f64 = 1e-6;
const TOLERANCE: f64 = 1e-4;

/// relu(x·w1 + b1)·w2 + b2 against a fixed target.
fn two_layer_square_loss(graph: &mut Graph, n: &[Node]) -> Result<Node, GradnetError> {
    let target = graph.input(create_test_tensor(vec![0.5, -1.0, 2.0], 3, 1));
    let xw1 = graph.matrix_multiply(n[0], n[1])?;
    let z1 = graph.matrix_vector_add(xw1, n[2])?;
    let h = graph.relu(z1)?;
    let hw2 = graph.matrix_multiply(h, n[3])?;
    let prediction = graph.matrix_vector_add(hw2, n[4])?;
    graph.square_loss(prediction, target)
}

#[test]
fn test_two_layer_network_gradients() {
    let inputs = [
        create_test_tensor(vec![0.5, -1.0, 1.5, 2.0, -0.3, 0.8], 3, 2),
        create_test_tensor(vec![0.9, -0.4, 0.3, 0.7, 0.2, -0.6], 2, 3),
        create_test_tensor(vec![0.11, 0.13, -0.17], 1, 3),
        create_test_tensor(vec![0.5, -0.8, 1.2], 3, 1),
        create_test_tensor(vec![0.05], 1, 1),
    ];
    check_grad(two_layer_square_loss, &inputs, &scalar(1.0), EPSILON, TOLERANCE)
        .unwrap_or_else(|e| panic!("Two-layer network grad check failed: {:?}", e));
}

#[test]
fn test_classifier_gradients() {
    let labels = create_test_tensor(vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0], 2, 3);
    let inputs = [
        create_test_tensor(vec![0.2, -0.7, 1.1, 0.4], 2, 2),
        create_test_tensor(vec![0.3, -0.2, 0.8, 0.5, 0.9, -1.0], 2, 3),
        create_test_tensor(vec![0.1, 0.0, -0.1], 1, 3),
    ];
    check_grad(
        |g, n| {
            let labels = g.input(labels.clone());
            let xw = g.matrix_multiply(n[0], n[1])?;
            let logits = g.matrix_vector_add(xw, n[2])?;
            g.softmax_loss(logits, labels)
        },
        &inputs,
        &scalar(2.0),
        EPSILON,
        TOLERANCE,
    )
    .unwrap_or_else(|e| panic!("Classifier grad check failed: {:?}", e));
}

#[test]
fn test_odd_combination_gradients() {
    // f(x) - f(-x) with f(x) = relu(x·w)·v
    let inputs = [
        create_test_tensor(vec![0.4, -1.3], 2, 1),
        create_test_tensor(vec![0.7, -0.9, 1.6], 1, 3),
        create_test_tensor(vec![1.0, 0.5, -2.0], 3, 1),
    ];
    check_grad(
        |g, n| {
            let xw = g.matrix_multiply(n[0], n[1])?;
            let h = g.relu(xw)?;
            let pos = g.matrix_multiply(h, n[2])?;
            let neg_x = g.negate(n[0])?;
            let neg_xw = g.matrix_multiply(neg_x, n[1])?;
            let neg_h = g.relu(neg_xw)?;
            let neg = g.matrix_multiply(neg_h, n[2])?;
            let neg = g.negate(neg)?;
            g.add(pos, neg)
        },
        &inputs,
        &create_test_tensor(vec![1.0, -0.5], 2, 1),
        EPSILON,
        TOLERANCE,
    )
    .unwrap_or_else(|e| panic!("Odd combination grad check failed: {:?}", e));
}

#[test]
fn test_shared_input_gradients_accumulate() {
    // x used three times: x + x, then x·x
    let inputs = [create_test_tensor(vec![0.3, -0.6, 1.2, 0.9], 2, 2)];
    check_grad(
        |g, n| {
            let doubled = g.add(n[0], n[0])?;
            g.matrix_multiply(doubled, n[0])
        },
        &inputs,
        &create_test_tensor(vec![1.0, 2.0, -1.0, 0.5], 2, 2),
        EPSILON,
        TOLERANCE,
    )
    .unwrap_or_else(|e| panic!("Shared input grad check failed: {:?}", e));
}

#[test]
fn test_forward_errors_are_reported() {
    let inputs = [
        create_test_tensor(vec![1.0, 2.0], 1, 2),
        create_test_tensor(vec![1.0, 2.0], 1, 2),
    ];
    let result = check_grad(
        |g, n| g.matrix_multiply(n[0], n[1]),
        &inputs,
        &scalar(1.0),
        EPSILON,
        TOLERANCE,
    );
    assert!(matches!(
        result,
        Err(GradCheckError::ForwardPassError(GradnetError::ShapeMismatch { .. }))
    ));
}
