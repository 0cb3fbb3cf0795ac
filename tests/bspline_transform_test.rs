use rdeform::{
    BSplineTransform, Direction, Point, Transform, TransformDomain, TransformError, Vector,
};

/// Domain of the boundary scenario: unit square, one patch per axis,
/// cubic order, derived grid 4x4.
fn unit_domain() -> TransformDomain<2> {
    TransformDomain::new(
        Point::new([0.0, 0.0]),
        Vector::new([1.0, 1.0]),
        Direction::identity(),
        [1, 1],
    )
    .unwrap()
}

/// Finer domain over the unit square: mesh 4x4, derived grid 8x8.
fn fine_domain() -> TransformDomain<2> {
    TransformDomain::new(
        Point::new([0.0, 0.0]),
        Vector::new([1.0, 1.0]),
        Direction::identity(),
        [4, 4],
    )
    .unwrap()
}

#[test]
fn test_parameter_counts() {
    let domain = TransformDomain::new(
        Point::new([0.0, 0.0]),
        Vector::new([10.0, 12.0]),
        Direction::identity(),
        [2, 3],
    )
    .unwrap();
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(domain);

    // grid size = mesh + order: (5, 6)
    assert_eq!(transform.grid_geometry().unwrap().size(), [5, 6]);
    assert_eq!(transform.number_of_parameters_per_dimension().unwrap(), 30);
    assert_eq!(transform.number_of_parameters().unwrap(), 60);
    assert_eq!(transform.number_of_weights(), 16);
}

#[test]
fn test_boundary_scenario() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(unit_domain());
    assert_eq!(transform.grid_geometry().unwrap().size(), [4, 4]);
    let n = transform.number_of_parameters().unwrap();
    transform.set_parameters_by_value(&vec![0.0; n]).unwrap();

    // Grid spacing is 1; the grid origin sits one spacing outside the
    // domain corner. A point at that outer margin has no full support
    // window; one grid unit further in, it does.
    let margin = transform
        .transform_point_detailed(&Point::new([-1.0, -1.0]))
        .unwrap();
    assert!(!margin.inside);
    assert_eq!(margin.point, Point::new([-1.0, -1.0]));
    assert!(margin.weights.is_empty() && margin.indices.is_empty());

    let corner = transform
        .transform_point_detailed(&Point::new([0.0, 0.0]))
        .unwrap();
    assert!(corner.inside);
}

#[test]
fn test_uniform_displacement_field() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(unit_domain());
    let n = transform.number_of_parameters().unwrap();
    transform.set_parameters_by_value(&vec![0.2; n]).unwrap();

    // A uniform coefficient field reproduces exactly by partition of unity.
    let center = Point::new([0.5, 0.5]);
    let moved = transform.transform_point(&center).unwrap();
    assert!((moved[0] - 0.7).abs() < 1e-12, "got {}", moved[0]);
    assert!((moved[1] - 0.7).abs() < 1e-12, "got {}", moved[1]);
}

#[test]
fn test_set_identity_restores_identity_map() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(fine_domain());
    let n = transform.number_of_parameters().unwrap();
    transform.set_parameters_by_value(&vec![0.4; n]).unwrap();
    transform.set_identity().unwrap();

    for &p in &[[0.1, 0.9], [0.5, 0.5], [0.33, 0.66]] {
        let point = Point::new(p);
        assert_eq!(transform.transform_point(&point).unwrap(), point);
    }
}

#[test]
fn test_partition_of_unity_via_detailed_query() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(fine_domain());
    let n = transform.number_of_parameters().unwrap();
    transform.set_parameters_by_value(&vec![0.0; n]).unwrap();

    for &p in &[[0.05, 0.05], [0.5, 0.5], [0.73, 0.21], [0.99, 0.99]] {
        let detailed = transform.transform_point_detailed(&Point::new(p)).unwrap();
        assert!(detailed.inside, "point {:?} expected inside", p);
        let sum: f64 = detailed.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12, "weights sum to {} at {:?}", sum, p);
    }
}

#[test]
fn test_locality_of_coefficient_influence() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(fine_domain());
    let n = transform.number_of_parameters().unwrap();
    let per_dim = transform.number_of_parameters_per_dimension().unwrap();
    transform.set_parameters_by_value(&vec![0.0; n]).unwrap();

    let p = Point::new([0.5, 0.5]);
    let support = transform.transform_point_detailed(&p).unwrap().indices;
    let before = transform.transform_point(&p).unwrap();

    // Perturbing a control point outside the support region of p must not
    // change the transform at p.
    let far_node = per_dim - 1; // corner (7, 7) of the 8x8 grid
    assert!(!support.contains(&far_node));
    transform.parameters_mut().unwrap()[far_node] = 5.0;
    transform.parameters_mut().unwrap()[per_dim + far_node] = 5.0;
    assert_eq!(transform.transform_point(&p).unwrap(), before);

    // Perturbing a node inside the support region does change it.
    let near_node = support[support.len() / 2];
    transform.parameters_mut().unwrap()[near_node] = 5.0;
    assert_ne!(transform.transform_point(&p).unwrap(), before);
}

#[test]
fn test_reference_vs_owned_binding() {
    let values = vec![0.1; 32];
    let p = Point::new([0.5, 0.5]);

    let mut owned = BSplineTransform::<2>::new();
    owned.set_domain(unit_domain());
    owned.set_parameters_by_value(&values).unwrap();

    let mut buffer = values.clone();
    let mut referenced = BSplineTransform::<2>::new();
    referenced.set_domain(unit_domain());
    referenced.set_parameters(&mut buffer).unwrap();

    // Identical values, identical outputs right after binding.
    let from_owned = owned.transform_point(&p).unwrap();
    let from_reference = referenced.transform_point(&p).unwrap();
    assert_eq!(from_owned, from_reference);

    // Mutating the aliased buffer changes outputs in reference mode only.
    referenced.parameters_mut().unwrap().fill(0.3);
    assert_ne!(referenced.transform_point(&p).unwrap(), from_reference);
    assert_eq!(owned.transform_point(&p).unwrap(), from_owned);

    // set_identity writes through to the caller's buffer.
    referenced.set_identity().unwrap();
    assert_eq!(referenced.transform_point(&p).unwrap(), p);
    drop(referenced);
    assert!(buffer.iter().all(|&v| v == 0.0));
}

#[test]
fn test_jacobian_sparsity() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(fine_domain());
    let n = transform.number_of_parameters().unwrap();
    let per_dim = transform.number_of_parameters_per_dimension().unwrap();
    transform.set_parameters_by_value(&vec![0.0; n]).unwrap();

    let p = Point::new([0.37, 0.61]);
    let detailed = transform.transform_point_detailed(&p).unwrap();
    let jacobian = transform.jacobian_with_respect_to_parameters(&p).unwrap();

    assert!(!jacobian.is_empty());
    assert_eq!(jacobian.support_indices(), &detailed.indices[..]);
    assert_eq!(jacobian.number_of_parameters(), n);

    // Nonzero entries occur only at the support offsets of the matching
    // per-dimension block; everything else is exactly zero.
    for row in 0..2 {
        for column in 0..n {
            let value = jacobian.value(row, column);
            let block = column / per_dim;
            let local = column % per_dim;
            match detailed.indices.iter().position(|&i| i == local) {
                Some(j) if block == row => assert_eq!(value, detailed.weights[j]),
                _ => assert_eq!(value, 0.0, "row {} column {}", row, column),
            }
        }
    }

    // Each row sums to one inside the valid interior.
    for row in 0..2 {
        let sum: f64 = jacobian
            .nonzeros()
            .filter(|&(r, _, _)| r == row)
            .map(|(_, _, w)| w)
            .sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_jacobian_outside_is_empty() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(unit_domain());

    let jacobian = transform
        .jacobian_with_respect_to_parameters(&Point::new([-3.0, -3.0]))
        .unwrap();
    assert!(jacobian.is_empty());
    assert_eq!(jacobian.value(0, 0), 0.0);
    assert_eq!(jacobian.nonzeros().count(), 0);
}

#[test]
fn test_configuration_errors_fail_fast() {
    let mut transform = BSplineTransform::<2>::new();

    assert!(matches!(
        transform.transform_point(&Point::new([0.0, 0.0])).unwrap_err(),
        TransformError::InvalidConfiguration(_)
    ));
    assert!(matches!(
        transform.set_parameters_by_value(&[0.0; 32]).unwrap_err(),
        TransformError::InvalidConfiguration(_)
    ));

    transform.set_domain(unit_domain());
    assert!(matches!(
        transform.set_identity().unwrap_err(),
        TransformError::InvalidConfiguration(_)
    ));
    assert!(matches!(
        transform.transform_point(&Point::new([0.0, 0.0])).unwrap_err(),
        TransformError::InvalidConfiguration(_)
    ));
    assert!(matches!(
        transform.set_parameters_by_value(&[0.0; 7]).unwrap_err(),
        TransformError::DimensionMismatch(_)
    ));
}

#[test]
fn test_fixed_parameter_path_is_interchangeable() {
    let mut via_domain = BSplineTransform::<2>::new();
    via_domain.set_domain(fine_domain());
    let fixed = via_domain.fixed_parameters().unwrap();
    let n = via_domain.number_of_parameters().unwrap();

    let coefficients: Vec<f64> = (0..n).map(|i| (i % 7) as f64 * 0.05).collect();
    via_domain.set_parameters_by_value(&coefficients).unwrap();

    let mut via_fixed = BSplineTransform::<2>::new();
    via_fixed.set_fixed_parameters(&fixed).unwrap();
    via_fixed.set_parameters_by_value(&coefficients).unwrap();

    for &p in &[[0.2, 0.8], [0.5, 0.5], [0.9, 0.1]] {
        let point = Point::new(p);
        assert_eq!(
            via_domain.transform_point(&point).unwrap(),
            via_fixed.transform_point(&point).unwrap()
        );
    }
}

#[test]
fn test_rotated_domain() {
    // Domain axes rotated 90 degrees; a uniform field still reproduces
    // exactly, and the domain membership follows the rotated frame.
    let rotation = Direction::from_row_major(&[0.0, -1.0, 1.0, 0.0]);
    let domain = TransformDomain::new(
        Point::new([0.0, 0.0]),
        Vector::new([1.0, 1.0]),
        rotation,
        [2, 2],
    )
    .unwrap();
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(domain);
    let n = transform.number_of_parameters().unwrap();
    transform.set_parameters_by_value(&vec![0.1; n]).unwrap();

    // Physical center of the rotated unit square spanned by columns
    // (0, 1) and (-1, 0) from the origin.
    let center = Point::new([-0.5, 0.5]);
    let detailed = transform.transform_point_detailed(&center).unwrap();
    assert!(detailed.inside);
    assert!((detailed.point[0] - (-0.4)).abs() < 1e-12);
    assert!((detailed.point[1] - 0.6).abs() < 1e-12);
}

#[test]
fn test_trait_object_usage() {
    let mut transform = BSplineTransform::<2>::new();
    transform.set_domain(unit_domain());
    let n = transform.number_of_parameters().unwrap();
    transform.set_parameters_by_value(&vec![0.0; n]).unwrap();

    let dynamic: &dyn Transform<2> = &transform;
    assert!(!dynamic.is_linear());
    let p = Point::new([0.5, 0.5]);
    assert_eq!(dynamic.transform_point(&p).unwrap(), p);
    assert!(matches!(
        dynamic.transform_vector(&Vector::new([1.0, 0.0])).unwrap_err(),
        TransformError::UnsupportedOperation(_)
    ));
}
