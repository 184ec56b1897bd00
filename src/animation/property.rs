use crate::{
    animation::ease::Ease,
    animation::track::{Keyframe, KeyframeTrack, Lerp},
    foundation::core::{FrameIndex, Rgba8, Vec3},
    foundation::error::{LatticeError, LatticeResult},
};

/// Discriminant for the closed set of animatable value types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScalarKind {
    /// Single `f64` (opacity, FOV, speed percent, audio level, ...).
    Scalar,
    /// 3-vector (position with depth).
    Vec3,
    /// RGBA color.
    Color,
}

/// Closed tagged value for heterogeneous property collections.
///
/// Interpolation is implemented once per variant and dispatched via the tag.
/// Tracks are homogeneous by construction; interpolating across mismatched
/// tags holds the left operand.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PropertyValue {
    /// Scalar value.
    Scalar(f64),
    /// 3-vector value.
    Vec3(Vec3),
    /// Color value.
    Color(Rgba8),
}

impl PropertyValue {
    /// Tag of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Scalar(_) => ScalarKind::Scalar,
            Self::Vec3(_) => ScalarKind::Vec3,
            Self::Color(_) => ScalarKind::Color,
        }
    }

    /// Scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }
}

impl Lerp for PropertyValue {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(f64::lerp(a, b, t)),
            (Self::Vec3(a), Self::Vec3(b)) => Self::Vec3(Vec3::lerp(a, b, t)),
            (Self::Color(a), Self::Color(b)) => Self::Color(Rgba8::lerp(a, b, t)),
            _ => *a,
        }
    }
}

/// A value that is either constant or driven by a keyframe track.
///
/// This is the unit every layer module consumes: camera FOV, DOF aperture,
/// path parameter, timewarp speed, audio level all live behind this type.
/// A property with no keyframes behaves as a constant; the first keyframe
/// edit flips it to animated.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimatableProperty<T> {
    /// Stable property identifier, unique within the owning layer.
    pub id: String,
    /// Human-readable name shown by property panels.
    pub name: String,
    /// Value-type tag of this property.
    pub kind: ScalarKind,
    /// Panel grouping key. UI only; never read by evaluation.
    pub group: String,
    value: T,
    animated: bool,
    track: KeyframeTrack<T>,
}

impl<T> AnimatableProperty<T> {
    /// Create a constant (non-animated) property.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ScalarKind,
        value: T,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            group: String::new(),
            value,
            animated: false,
            track: KeyframeTrack::new(),
        }
    }

    /// Set the panel grouping key.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Whether a keyframe track drives this property.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// The static fallback value.
    pub fn static_value(&self) -> &T {
        &self.value
    }

    /// Authored keyframes, in frame order.
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        self.track.keys()
    }

    /// Edit counter of the underlying track.
    pub fn version(&self) -> u64 {
        self.track.version()
    }

    /// Cheap read-only track snapshot for evaluation threads. The snapshot
    /// shares storage with the live track until the next edit.
    pub fn snapshot(&self) -> KeyframeTrack<T>
    where
        T: Clone,
    {
        self.track.clone()
    }

    /// Check entity invariants, for data deserialized from external records.
    pub fn validate(&self) -> LatticeResult<()> {
        self.track.validate()?;
        if self.animated != !self.track.is_empty() {
            return Err(LatticeError::validation(format!(
                "property '{}': animated flag disagrees with keyframe count",
                self.id
            )));
        }
        Ok(())
    }
}

impl<T> AnimatableProperty<T>
where
    T: Lerp + Clone,
{
    /// Evaluate the property at a (possibly fractional) frame.
    ///
    /// Animated properties evaluate their track; constants return the static
    /// value. An animated property whose track somehow has no keys falls
    /// back to the static value rather than failing.
    pub fn current_value(&self, frame: f64) -> T {
        if self.animated {
            self.track
                .evaluate(frame)
                .unwrap_or_else(|_| self.value.clone())
        } else {
            self.value.clone()
        }
    }

    /// Replace the static fallback value.
    ///
    /// Rejected while the property is animated: static writes never mutate
    /// an animated property. Remove the keyframes first.
    pub fn set_static(&mut self, value: T) -> LatticeResult<()> {
        if self.animated {
            return Err(LatticeError::validation(format!(
                "property '{}' is animated; static writes are rejected",
                self.id
            )));
        }
        self.value = value;
        Ok(())
    }

    /// Insert a keyframe, replacing any existing key at `frame`, and mark
    /// the property animated.
    ///
    /// The cached `value` is refreshed by evaluating at `frame`, so it
    /// always reflects the most recent edit position.
    pub fn insert_keyframe(&mut self, frame: FrameIndex, value: T, easing: Ease) {
        self.track.insert_or_replace(frame, value, easing);
        self.animated = true;
        self.refresh_value(frame);
    }

    /// Remove the keyframe at exactly `frame`. No-op if absent.
    pub fn remove_keyframe(&mut self, frame: FrameIndex) -> bool {
        let removed = self.track.remove(frame);
        if removed {
            self.animated = !self.track.is_empty();
            self.refresh_value(frame);
        }
        removed
    }

    /// Toggle a keyframe at `frame`.
    ///
    /// If a key exists at exactly `frame` it is removed; otherwise one is
    /// inserted holding the property's current evaluated value there, with
    /// [`Ease::Linear`]. Toggling twice restores an equivalent track state.
    pub fn toggle_keyframe_at(&mut self, frame: FrameIndex) {
        if self.track.has_key_at(frame) {
            self.remove_keyframe(frame);
        } else {
            let value = self.current_value(frame.as_f64());
            self.insert_keyframe(frame, value, Ease::Linear);
        }
    }

    fn refresh_value(&mut self, frame: FrameIndex) {
        if self.animated
            && let Ok(v) = self.track.evaluate(frame.as_f64())
        {
            self.value = v;
        }
    }
}

impl<T> AnimatableProperty<T>
where
    T: serde::Serialize,
{
    /// Serialize to the JSON record form exchanged with panels and projects.
    pub fn to_json(&self) -> LatticeResult<String> {
        serde_json::to_string(self).map_err(|e| LatticeError::serde(e.to_string()))
    }
}

impl<T> AnimatableProperty<T>
where
    T: serde::de::DeserializeOwned,
{
    /// Reconstruct from the JSON record form, checking entity invariants.
    pub fn from_json(json: &str) -> LatticeResult<Self> {
        let prop: Self = serde_json::from_str(json).map_err(|e| LatticeError::serde(e.to_string()))?;
        prop.validate()?;
        Ok(prop)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/property.rs"]
mod tests;
