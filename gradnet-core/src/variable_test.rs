use super::*;
use crate::autograd::Graph;
use crate::tensor::scalar;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_variable_clone_shares_data() {
    let v = Variable::new(scalar(1.0));
    let alias = v.clone();
    assert!(v.ptr_eq(&alias));

    alias.apply_gradient(&scalar(2.0), 0.5).unwrap();
    assert_eq!(v.value().item(), Some(0.0));
}

#[test]
fn test_distinct_variables_are_not_ptr_eq() {
    let a = Variable::new(scalar(1.0));
    let b = Variable::new(scalar(1.0));
    assert!(!a.ptr_eq(&b));
}

#[test]
fn test_random_initialization_is_small_and_seeded() {
    let mut rng = StdRng::seed_from_u64(42);
    let v = Variable::random_with_rng(4, 6, &mut rng);
    assert_eq!(v.shape(), (4, 6));
    let limit = (3.0f64 / 5.0).sqrt();
    assert!(v.value().data().iter().all(|x| x.abs() <= limit));

    let again = Variable::random_with_rng(4, 6, &mut StdRng::seed_from_u64(42));
    assert_eq!(v.snapshot(), again.snapshot());
}

#[test]
fn test_random_vector_shape() {
    let v = Variable::random_vector_with_rng(5, &mut StdRng::seed_from_u64(1));
    assert_eq!(v.shape(), (1, 5));
}

#[test]
fn test_random_vector_limit_uses_length() {
    // sqrt(3 / 12) = 0.5; sqrt(3 / mean(1, 12)) would allow about 0.68.
    let v = Variable::random_vector_with_rng(12, &mut StdRng::seed_from_u64(3));
    assert_eq!(v.shape(), (1, 12));
    assert!(v.value().data().iter().all(|x| x.abs() <= 0.5));
    let max = v.value().data().iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    assert!(max > 0.0);
}

#[test]
fn test_apply_gradient_rejects_wrong_shape() {
    let v = Variable::new(Tensor::zeros(2, 2));
    let result = v.apply_gradient(&Tensor::zeros(1, 2), 0.1);
    assert!(matches!(result, Err(GradnetError::ShapeMismatch { .. })));
}

#[test]
fn test_apply_gradient_while_borrowed_returns_error() {
    let v = Variable::new(scalar(1.0));
    let held = v.value();
    match v.apply_gradient(&scalar(1.0), 0.1) {
        Err(GradnetError::VariableBorrowed { shape }) => assert_eq!(shape, vec![1, 1]),
        other => panic!("Expected VariableBorrowed, got {:?}", other),
    }
    assert_eq!(held.item(), Some(1.0));
}

fn trained_graph(variables: &[Variable]) -> Graph {
    let mut graph = Graph::new(variables);
    let x = graph.input(scalar(2.0));
    let mut out = x;
    for variable in variables {
        let w = graph.variable(variable).unwrap();
        let y = graph.matrix_multiply(out, w).unwrap();
        out = graph.add(y, x).unwrap();
    }
    let target = graph.input(scalar(0.0));
    graph.square_loss(out, target).unwrap();
    graph.backprop().unwrap();
    graph
}

#[test]
fn test_step_while_value_is_borrowed_returns_error() {
    let w = Variable::new(scalar(1.5));
    let graph = trained_graph(&[w.clone()]);
    {
        let held = w.value();
        match graph.step(0.1) {
            Err(GradnetError::VariableBorrowed { shape }) => assert_eq!(shape, vec![1, 1]),
            other => panic!("Expected VariableBorrowed, got {:?}", other),
        }
        assert_eq!(held.item(), Some(1.5));
    }
    assert_eq!(w.value().item(), Some(1.5));

    graph.step(0.1).unwrap();
    assert_ne!(w.value().item(), Some(1.5));
}

#[test]
fn test_step_with_one_borrowed_variable_updates_nothing() {
    let first = Variable::new(scalar(0.5));
    let second = Variable::new(scalar(-0.5));
    let graph = trained_graph(&[first.clone(), second.clone()]);
    assert!(graph.variable_gradient(&first).unwrap().is_some());

    let held = second.value();
    assert!(matches!(graph.step(0.1), Err(GradnetError::VariableBorrowed { .. })));
    drop(held);

    assert_eq!(first.value().item(), Some(0.5));
    assert_eq!(second.value().item(), Some(-0.5));
}
