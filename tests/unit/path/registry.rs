use super::*;

fn diagonal() -> SplineGeometry {
    SplineGeometry::new(
        vec![SplinePoint::new(0.0, 0.0, 0.0), SplinePoint::new(30.0, 40.0, 1.0)],
        false,
    )
}

#[test]
fn sample_interpolates_position_and_depth() {
    let s = diagonal().sample(0.5).unwrap();
    assert!((s.point.x - 15.0).abs() < 1e-9);
    assert!((s.point.y - 20.0).abs() < 1e-9);
    assert!((s.point.z - 0.5).abs() < 1e-9);
    // Unit tangent along the 3-4-5 diagonal.
    assert!((s.tangent.x - 0.6).abs() < 1e-9);
    assert!((s.tangent.y - 0.8).abs() < 1e-9);
}

#[test]
fn sample_clamps_parameter() {
    let geo = diagonal();
    assert_eq!(geo.sample(-1.0).unwrap().point.x, 0.0);
    assert_eq!(geo.sample(2.0).unwrap().point.x, 30.0);
}

#[test]
fn arc_length_parameterization_is_uniform() {
    // Two segments of unequal length; s = 0.5 sits inside the longer one.
    let geo = SplineGeometry::new(
        vec![
            SplinePoint::new(0.0, 0.0, 0.0),
            SplinePoint::new(10.0, 0.0, 0.0),
            SplinePoint::new(40.0, 0.0, 0.0),
        ],
        false,
    );
    let s = geo.sample(0.5).unwrap();
    assert!((s.point.x - 20.0).abs() < 1e-9);
}

#[test]
fn closed_spline_walks_the_return_segment() {
    let geo = SplineGeometry::new(
        vec![
            SplinePoint::new(0.0, 0.0, 0.0),
            SplinePoint::new(10.0, 0.0, 0.0),
            SplinePoint::new(10.0, 10.0, 0.0),
            SplinePoint::new(0.0, 10.0, 0.0),
        ],
        true,
    );
    // Perimeter 40; s = 0.875 is halfway down the closing edge.
    let s = geo.sample(0.875).unwrap();
    assert!((s.point.x - 0.0).abs() < 1e-9);
    assert!((s.point.y - 5.0).abs() < 1e-9);
}

#[test]
fn degenerate_splines_never_sample() {
    assert!(SplineGeometry::default().sample(0.5).is_none());
    let single = SplineGeometry::new(vec![SplinePoint::new(1.0, 1.0, 0.0)], false);
    assert!(single.sample(0.5).is_none());
    assert!(single.is_degenerate());
    let zero_len = SplineGeometry::new(
        vec![SplinePoint::new(1.0, 1.0, 0.0), SplinePoint::new(1.0, 1.0, 0.0)],
        false,
    );
    assert!(zero_len.sample(0.5).is_none());
}

#[test]
fn from_bez_path_flattens_segments() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((10.0, 0.0));
    path.curve_to((15.0, 0.0), (20.0, 5.0), (20.0, 10.0));
    let geo = SplineGeometry::from_bez_path(&path, 8, false);
    assert!(geo.points().len() > 8);
    assert!(!geo.is_degenerate());

    let start = geo.sample(0.0).unwrap();
    assert!((start.point.x - 0.0).abs() < 1e-9);
    let end = geo.sample(1.0).unwrap();
    assert!((end.point.x - 20.0).abs() < 1e-6);
    assert!((end.point.y - 10.0).abs() < 1e-6);
}

#[test]
fn registry_lookup_is_weak() {
    let mut reg = LayerRegistry::new();
    reg.insert("a", diagonal());
    assert!(reg.curve_at("a", 0.5).is_some());
    assert!(reg.curve_at("missing", 0.5).is_none());

    reg.remove("a");
    assert!(reg.curve_at("a", 0.5).is_none());
    assert!(reg.is_empty());
}
