use super::*;
use gradnet_core::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_linear_shapes() {
    let mut rng = StdRng::seed_from_u64(0);
    let layer = Linear::with_rng(3, 4, &mut rng);
    assert_eq!(layer.in_features(), 3);
    assert_eq!(layer.out_features(), 4);
    assert_eq!(layer.weight().shape(), (3, 4));
    assert_eq!(layer.bias().shape(), (1, 4));
}

#[test]
fn test_linear_forward_matches_tensor_math() {
    let mut rng = StdRng::seed_from_u64(1);
    let layer = Linear::with_rng(2, 3, &mut rng);
    let x = Tensor::from_rows(&[[1.0, -1.0], [0.5, 2.0]]).unwrap();

    let mut graph = Graph::new(&layer.variables());
    let x_node = graph.input(x.clone());
    let out = layer.forward(&mut graph, x_node).unwrap();

    let expected = x
        .matmul(&layer.weight().value())
        .unwrap()
        .add_row_vector(&layer.bias().value())
        .unwrap();
    assert_eq!(graph.get_output(out).unwrap(), &expected);
}

#[test]
fn test_linear_requires_registered_variables() {
    let mut rng = StdRng::seed_from_u64(2);
    let layer = Linear::with_rng(1, 1, &mut rng);
    let mut graph = Graph::new(&[]);
    let x = graph.input(Tensor::zeros(1, 1));
    assert!(matches!(
        layer.forward(&mut graph, x),
        Err(GradnetError::UnregisteredVariable { .. })
    ));
}

#[test]
fn test_two_layer_net_variable_order_and_output_shape() {
    let mut rng = StdRng::seed_from_u64(3);
    let net = TwoLayerNet::with_rng(4, 5, 2, &mut rng);
    let variables = net.variables();
    let shapes: Vec<_> = variables.iter().map(|v| v.shape()).collect();
    assert_eq!(shapes, vec![(4, 5), (1, 5), (5, 2), (1, 2)]);
    assert!(variables[0].ptr_eq(net.hidden().weight()));

    let mut graph = Graph::new(&variables);
    let x = graph.input(Tensor::zeros(3, 4));
    let out = net.forward(&mut graph, x).unwrap();
    assert_eq!(graph.get_output(out).unwrap().shape(), (3, 2));
}
