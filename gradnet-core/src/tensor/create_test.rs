use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zeros_and_full() {
    let t = zeros(2, 3);
    assert_eq!(t.shape(), (2, 3));
    assert!(t.data().iter().all(|&x| x == 0.0));

    let f = full(1, 2, 7.5);
    assert_eq!(f.data(), &[7.5, 7.5]);
}

#[test]
fn test_scalar_and_row_vector() {
    let s = scalar(3.0);
    assert!(s.is_scalar());
    assert_eq!(s.item(), Some(3.0));

    let v = row_vector(vec![1.0, 2.0, 3.0]);
    assert_eq!(v.shape(), (1, 3));
}

#[test]
fn test_from_rows() {
    let t = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(t.shape(), (2, 2));
    assert_eq!(t.data(), &[1.0, 2.0, 3.0, 4.0]);

    let ragged = from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    assert!(matches!(ragged, Err(GradnetError::ShapeMismatch { .. })));
}

#[test]
fn test_one_hot() {
    let t = one_hot(&[2, 0], 3).unwrap();
    assert_eq!(t.data(), &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    assert!(one_hot(&[3], 3).is_err());
}

#[test]
fn test_uniform_respects_limit() {
    let mut rng = StdRng::seed_from_u64(7);
    let t = uniform(10, 20, 0.25, &mut rng);
    assert_eq!(t.shape(), (10, 20));
    assert!(t.data().iter().all(|x| x.abs() <= 0.25));
    assert!(t.data().iter().any(|&x| x != 0.0));

    let same = uniform(10, 20, 0.25, &mut StdRng::seed_from_u64(7));
    assert_eq!(t, same);
}
