use std::sync::Arc;

use crate::{
    animation::ease::Ease,
    foundation::core::{FrameIndex, Rgba8, Vec3},
    foundation::error::{LatticeError, LatticeResult},
};

/// Component-wise linear interpolation between two values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` by eased phase `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec3::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// An authored anchor point on a property's timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Opaque identifier; derived from the frame so identical edits produce
    /// identical state.
    pub id: String,
    /// Authored position on the timeline.
    pub frame: FrameIndex,
    /// Value anchored at `frame`.
    pub value: T,
    /// Easing shaping how values approach this key from the previous one.
    pub easing: Ease,
}

/// Ordered keyframe sequence for one animatable property.
///
/// Keys are always sorted by frame with no duplicates; inserting at an
/// occupied frame replaces. The backing storage is shared copy-on-write:
/// snapshots taken before an edit keep evaluating the version they started
/// with, which is what lets a render pass fan out over read-only tracks
/// while the edit thread keeps working.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct KeyframeTrack<T> {
    keys: Arc<Vec<Keyframe<T>>>,
    #[serde(skip)]
    version: u64,
}

impl<T> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyframeTrack<T> {
    /// Create an empty track.
    pub fn new() -> Self {
        Self {
            keys: Arc::new(Vec::new()),
            version: 0,
        }
    }

    /// Keys in frame order.
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the track has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Edit counter; bumps on every successful mutation and keys cache
    /// invalidation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a key exists at exactly `frame`.
    pub fn has_key_at(&self, frame: FrameIndex) -> bool {
        self.keys.binary_search_by_key(&frame, |k| k.frame).is_ok()
    }

    /// Check the sort/uniqueness invariant, for data deserialized from
    /// external records.
    pub fn validate(&self) -> LatticeResult<()> {
        if !self.keys.windows(2).all(|w| w[0].frame < w[1].frame) {
            return Err(LatticeError::validation(
                "track keys must be strictly sorted by frame",
            ));
        }
        Ok(())
    }
}

impl<T> KeyframeTrack<T>
where
    T: Lerp + Clone,
{
    /// Evaluate the track at a (possibly fractional) frame.
    ///
    /// Outside the authored range the track clamp-holds the first/last key's
    /// value; between keys it interpolates the bracketing pair. The
    /// **incoming** key's easing governs each segment: a keyframe's easing
    /// describes how values approach it. (The opposite convention, easing by
    /// the outgoing key, exists in other authoring tools; this engine fixes
    /// the incoming one.)
    pub fn evaluate(&self, frame: f64) -> LatticeResult<T> {
        if self.keys.is_empty() {
            return Err(LatticeError::NoKeyframes);
        }

        let idx = self.keys.partition_point(|k| k.frame.as_f64() <= frame);
        if idx == 0 {
            return Ok(self.keys[0].value.clone());
        }
        if idx >= self.keys.len() {
            return Ok(self.keys[self.keys.len() - 1].value.clone());
        }

        let k0 = &self.keys[idx - 1];
        let k1 = &self.keys[idx];
        let denom = k1.frame.as_f64() - k0.frame.as_f64();
        if denom <= 0.0 {
            return Ok(k0.value.clone());
        }

        let u = (frame - k0.frame.as_f64()) / denom;
        let eased = k1.easing.apply(u);
        Ok(T::lerp(&k0.value, &k1.value, eased))
    }

    /// Insert a key at `frame`, replacing any existing key there.
    pub fn insert_or_replace(&mut self, frame: FrameIndex, value: T, easing: Ease) {
        let key = Keyframe {
            id: keyframe_id(frame),
            frame,
            value,
            easing,
        };
        let keys = Arc::make_mut(&mut self.keys);
        match keys.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => keys[i] = key,
            Err(i) => keys.insert(i, key),
        }
        self.version += 1;
    }

    /// Remove the key at exactly `frame`. No-op if absent.
    pub fn remove(&mut self, frame: FrameIndex) -> bool {
        let Ok(i) = self.keys.binary_search_by_key(&frame, |k| k.frame) else {
            return false;
        };
        Arc::make_mut(&mut self.keys).remove(i);
        self.version += 1;
        true
    }
}

fn keyframe_id(frame: FrameIndex) -> String {
    format!("k{}", frame.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
