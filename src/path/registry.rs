use std::collections::BTreeMap;

use kurbo::{BezPath, ParamCurve, Point, Vec2};

use crate::{
    foundation::core::Vec3,
    path::follow::{CurveProvider, CurveSample},
};

/// Spline control point: planar position plus a normalized scene depth.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SplinePoint {
    /// Position in canvas space.
    pub pos: Point,
    /// Normalized scene depth carried into sampled positions.
    pub depth: f64,
}

impl SplinePoint {
    /// Build a control point.
    pub fn new(x: f64, y: f64, depth: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            depth,
        }
    }
}

/// Polyline spline geometry with arc-length parameterization.
///
/// Sampling at `s ∈ [0, 1]` walks the cumulative segment lengths, linearly
/// interpolating position and depth and taking the segment direction as the
/// tangent. A spline with fewer than two control points (or zero total
/// length) is degenerate: it cannot produce a tangent and never yields a
/// sample.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct SplineGeometry {
    points: Vec<SplinePoint>,
    closed: bool,
}

impl SplineGeometry {
    /// Build a spline from control points.
    pub fn new(points: Vec<SplinePoint>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Flatten a vector path into spline control points.
    ///
    /// Each curve segment is sampled `samples_per_segment` times (minimum 1).
    /// Depth is not representable in a [`BezPath`] and defaults to 0.
    pub fn from_bez_path(path: &BezPath, samples_per_segment: usize, closed: bool) -> Self {
        let n = samples_per_segment.max(1);
        let mut points = Vec::new();
        for seg in path.segments() {
            if points.is_empty() {
                let p = seg.eval(0.0);
                points.push(SplinePoint::new(p.x, p.y, 0.0));
            }
            for i in 1..=n {
                let p = seg.eval(i as f64 / n as f64);
                points.push(SplinePoint::new(p.x, p.y, 0.0));
            }
        }
        Self { points, closed }
    }

    /// Control points in order.
    pub fn points(&self) -> &[SplinePoint] {
        &self.points
    }

    /// Whether the spline loops back onto its first point.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the spline cannot produce a tangent.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2 || self.total_length() <= 0.0
    }

    fn segment_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len().saturating_sub(1)
        }
    }

    fn segment(&self, i: usize) -> (SplinePoint, SplinePoint) {
        let a = self.points[i];
        let b = self.points[(i + 1) % self.points.len()];
        (a, b)
    }

    fn total_length(&self) -> f64 {
        (0..self.segment_count())
            .map(|i| {
                let (a, b) = self.segment(i);
                a.pos.distance(b.pos)
            })
            .sum()
    }

    /// Sample position, depth, and tangent at normalized arc position `s`.
    ///
    /// `None` for degenerate splines. `s` is clamped to `[0, 1]`; wrapping
    /// for looped travel is the follower's job.
    pub fn sample(&self, s: f64) -> Option<CurveSample> {
        if self.points.len() < 2 {
            return None;
        }
        let total = self.total_length();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = s.clamp(0.0, 1.0) * total;
        let count = self.segment_count();
        for i in 0..count {
            let (a, b) = self.segment(i);
            let len = a.pos.distance(b.pos);
            if remaining <= len || i == count - 1 {
                let t = if len > 0.0 { (remaining / len).clamp(0.0, 1.0) } else { 0.0 };
                let pos = a.pos.lerp(b.pos, t);
                let depth = a.depth + (b.depth - a.depth) * t;
                let dir = b.pos - a.pos;
                let tangent = if dir.hypot() > 0.0 {
                    dir / dir.hypot()
                } else {
                    Vec2::ZERO
                };
                return Some(CurveSample {
                    point: Vec3::new(pos.x, pos.y, depth),
                    tangent,
                });
            }
            remaining -= len;
        }
        None
    }
}

/// Id-keyed lookup of curve-bearing layers.
///
/// Passed explicitly to path followers; there is no ambient global registry.
/// Entries are owned here and referenced elsewhere only by id, so deleting a
/// layer turns subsequent lookups into misses, never dangling pointers.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct LayerRegistry {
    layers: BTreeMap<String, SplineGeometry>,
}

impl LayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a layer's curve geometry.
    pub fn insert(&mut self, layer_id: impl Into<String>, geometry: SplineGeometry) {
        self.layers.insert(layer_id.into(), geometry);
    }

    /// Delete a layer's geometry. Followers referencing it start missing.
    pub fn remove(&mut self, layer_id: &str) -> Option<SplineGeometry> {
        self.layers.remove(layer_id)
    }

    /// Look up a layer's geometry.
    pub fn get(&self, layer_id: &str) -> Option<&SplineGeometry> {
        self.layers.get(layer_id)
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl CurveProvider for LayerRegistry {
    fn curve_at(&self, layer_id: &str, s: f64) -> Option<CurveSample> {
        self.layers.get(layer_id)?.sample(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/registry.rs"]
mod tests;
