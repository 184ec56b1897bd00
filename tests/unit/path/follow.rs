use super::*;
use crate::path::registry::{LayerRegistry, SplineGeometry, SplinePoint};

fn line_registry() -> LayerRegistry {
    let mut reg = LayerRegistry::new();
    reg.insert(
        "spline-1",
        SplineGeometry::new(
            vec![SplinePoint::new(0.0, 0.0, 0.0), SplinePoint::new(100.0, 0.0, 0.0)],
            false,
        ),
    );
    reg
}

fn follow_config() -> PathFollowConfig {
    let mut parameter =
        AnimatableProperty::new("path_parameter", "Path Position", ScalarKind::Scalar, 0.0);
    parameter.insert_keyframe(crate::foundation::core::FrameIndex(0), 0.0, crate::Ease::Linear);
    parameter.insert_keyframe(crate::foundation::core::FrameIndex(10), 1.0, crate::Ease::Linear);
    PathFollowConfig {
        enabled: true,
        path_layer_id: "spline-1".to_owned(),
        parameter,
        ..PathFollowConfig::default()
    }
}

#[test]
fn straight_line_midpoint_has_level_heading() {
    let reg = line_registry();
    let cfg = follow_config();
    // Parameter ramps 0→1 over 10 frames, so frame 5 sits at s = 0.5.
    let sample = cfg.sample(5.0, &reg).unwrap();
    assert!((sample.position.x - 50.0).abs() < 1e-9);
    assert!(sample.position.y.abs() < 1e-9);
    assert!(sample.rotation_z.abs() < 1e-9);
}

#[test]
fn disabled_config_is_path_unavailable() {
    let reg = line_registry();
    let cfg = PathFollowConfig { enabled: false, ..follow_config() };
    assert!(matches!(
        cfg.sample(0.0, &reg),
        Err(LatticeError::PathUnavailable(_))
    ));
}

#[test]
fn dangling_layer_reference_fails_soft() {
    let mut reg = line_registry();
    let cfg = follow_config();
    assert!(cfg.sample(5.0, &reg).is_ok());

    // Deleting the referenced layer turns sampling into a lookup miss.
    reg.remove("spline-1");
    assert!(matches!(
        cfg.sample(5.0, &reg),
        Err(LatticeError::PathUnavailable(_))
    ));
}

#[test]
fn degenerate_single_point_curve_is_missing() {
    let mut reg = LayerRegistry::new();
    reg.insert(
        "spline-1",
        SplineGeometry::new(vec![SplinePoint::new(5.0, 5.0, 0.0)], false),
    );
    let cfg = follow_config();
    assert!(matches!(
        cfg.sample(5.0, &reg),
        Err(LatticeError::PathUnavailable(_))
    ));
}

#[test]
fn heading_follows_the_tangent() {
    let mut reg = LayerRegistry::new();
    reg.insert(
        "spline-1",
        SplineGeometry::new(
            vec![SplinePoint::new(0.0, 0.0, 0.0), SplinePoint::new(0.0, 100.0, 0.0)],
            false,
        ),
    );
    let cfg = follow_config();
    let sample = cfg.sample(5.0, &reg).unwrap();
    assert!((sample.rotation_z - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}

#[test]
fn banking_adds_roll_on_a_corner() {
    // Right-angle corner; the look-ahead tangent differs from the local one.
    let mut reg = LayerRegistry::new();
    reg.insert(
        "corner",
        SplineGeometry::new(
            vec![
                SplinePoint::new(0.0, 0.0, 0.0),
                SplinePoint::new(100.0, 0.0, 0.0),
                SplinePoint::new(100.0, 100.0, 0.0),
            ],
            false,
        ),
    );
    let mut cfg = follow_config();
    cfg.path_layer_id = "corner".to_owned();
    cfg.align_to_path = false;
    cfg.banking_strength = 0.5;
    cfg.look_ahead = 0.3;

    // s = 0.4: on the first leg, looking ahead onto the second.
    let banked = cfg.sample(4.0, &reg).unwrap();
    assert!((banked.rotation_z - 0.5 * std::f64::consts::FRAC_PI_2).abs() < 1e-9);

    // Zero look-ahead degenerates banking to zero.
    cfg.look_ahead = 0.0;
    let flat = cfg.sample(4.0, &reg).unwrap();
    assert!(flat.rotation_z.abs() < 1e-12);
}

#[test]
fn offset_displaces_along_the_normal() {
    let reg = line_registry();
    let mut cfg = follow_config();
    cfg.offset_y = 10.0;
    // Horizontal tangent (1, 0) has normal (0, 1).
    let sample = cfg.sample(5.0, &reg).unwrap();
    assert!((sample.position.x - 50.0).abs() < 1e-9);
    assert!((sample.position.y - 10.0).abs() < 1e-9);
}

#[test]
fn auto_advance_wraps_past_the_end() {
    let reg = line_registry();
    let mut cfg = follow_config();
    cfg.parameter = AnimatableProperty::new("path_parameter", "Path Position", ScalarKind::Scalar, 0.0);
    cfg.auto_advance = true;
    cfg.auto_advance_speed = 0.25;

    let quarter = cfg.sample(1.0, &reg).unwrap();
    assert!((quarter.position.x - 25.0).abs() < 1e-9);

    // Five steps of 0.25 wrap back to s = 0.25.
    let wrapped = cfg.sample(5.0, &reg).unwrap();
    assert!((wrapped.position.x - 25.0).abs() < 1e-9);
}

#[test]
fn sample_range_matches_sequential_samples() {
    let reg = line_registry();
    let cfg = follow_config();
    let bulk = cfg.sample_range(0..11, &reg);
    assert_eq!(bulk.len(), 11);
    for (f, got) in bulk.into_iter().enumerate() {
        let expected = cfg.sample(f as f64, &reg).unwrap();
        assert_eq!(got.unwrap(), expected);
    }
}

#[test]
fn wrap01_keeps_terminal_one() {
    assert_eq!(wrap01(0.25), 0.25);
    assert_eq!(wrap01(1.0), 1.0);
    assert_eq!(wrap01(1.25), 0.25);
    assert!((wrap01(-0.25) - 0.75).abs() < 1e-12);
}
