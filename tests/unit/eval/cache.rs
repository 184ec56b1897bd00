use super::*;
use crate::animation::ease::Ease;
use crate::animation::property::ScalarKind;
use crate::foundation::core::{FrameIndex, Vec3};

fn scalar_prop(id: &str, v: f64) -> AnimatableProperty<PropertyValue> {
    AnimatableProperty::new(id, id, ScalarKind::Scalar, PropertyValue::Scalar(v))
}

#[test]
fn get_or_insert_samples_once() {
    let mut cache = EvalCache::new();
    let mut calls = 0;
    for _ in 0..3 {
        let v = cache.get_or_insert_with("opacity", 5.0, |_| {
            calls += 1;
            PropertyValue::Scalar(0.5)
        });
        assert_eq!(v, PropertyValue::Scalar(0.5));
    }
    assert_eq!(calls, 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn entries_are_keyed_by_property_and_frame() {
    let mut cache = EvalCache::new();
    cache.insert("fov", 1.0, PropertyValue::Scalar(35.0));
    cache.insert("fov", 2.0, PropertyValue::Scalar(40.0));
    cache.insert("aperture", 1.0, PropertyValue::Scalar(2.8));

    assert_eq!(cache.get("fov", 1.0), Some(PropertyValue::Scalar(35.0)));
    assert_eq!(cache.get("fov", 2.0), Some(PropertyValue::Scalar(40.0)));
    assert_eq!(cache.get("aperture", 1.0), Some(PropertyValue::Scalar(2.8)));
    assert_eq!(cache.get("aperture", 2.0), None);
    assert_eq!(cache.len(), 3);
}

#[test]
fn invalidate_drops_everything() {
    let mut cache = EvalCache::new();
    cache.insert("fov", 1.0, PropertyValue::Scalar(35.0));
    assert!(!cache.is_empty());
    cache.invalidate();
    assert!(cache.is_empty());
    assert_eq!(cache.get("fov", 1.0), None);
}

#[test]
fn property_set_evaluates_all_entries() {
    let mut set = PropertySet::new();
    set.insert(scalar_prop("fov", 35.0));

    let mut level = scalar_prop("audio_level", 0.0);
    level.insert_keyframe(FrameIndex(0), PropertyValue::Scalar(0.0), Ease::Linear);
    level.insert_keyframe(FrameIndex(10), PropertyValue::Scalar(1.0), Ease::Linear);
    set.insert(level);

    set.insert(AnimatableProperty::new(
        "position",
        "Position",
        ScalarKind::Vec3,
        PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)),
    ));

    let cache = set.evaluate_pass(5.0);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("fov", 5.0), Some(PropertyValue::Scalar(35.0)));
    assert_eq!(cache.get("audio_level", 5.0), Some(PropertyValue::Scalar(0.5)));
    assert_eq!(
        cache.get("position", 5.0),
        Some(PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)))
    );
}

#[test]
fn set_mutation_goes_through_get_mut() {
    let mut set = PropertySet::new();
    set.insert(scalar_prop("fov", 35.0));
    set.get_mut("fov")
        .unwrap()
        .toggle_keyframe_at(FrameIndex(8));
    assert!(set.get("fov").unwrap().is_animated());

    // A pass after the edit sees the keyframed value.
    let cache = set.evaluate_pass(8.0);
    assert_eq!(cache.get("fov", 8.0), Some(PropertyValue::Scalar(35.0)));
}
