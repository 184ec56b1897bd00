use kurbo::Vec2;
use rayon::prelude::*;

use crate::{
    animation::property::{AnimatableProperty, ScalarKind},
    foundation::core::Vec3,
    foundation::error::{LatticeError, LatticeResult},
};

/// One sample of a reference curve at a normalized arc position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    /// Point on the curve; `z` carries the curve's scene depth.
    pub point: Vec3,
    /// Planar tangent direction at the sample (not necessarily unit length).
    pub tangent: Vec2,
}

/// Curve geometry accessor supplied by the spline/shape layer subsystem.
///
/// Lookups are weak: `layer_id` is a key, never an owning reference, so a
/// deleted layer produces `None` rather than a dangling pointer.
pub trait CurveProvider {
    /// Sample the curve owned by `layer_id` at normalized position `s`.
    ///
    /// Returns `None` when the layer is unknown or its curve cannot produce
    /// a tangent (fewer than two control points).
    fn curve_at(&self, layer_id: &str, s: f64) -> Option<CurveSample>;
}

/// Pose produced by sampling a path at one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    /// Position on (or offset from) the curve.
    pub position: Vec3,
    /// Roll/heading rotation in radians.
    pub rotation_z: f64,
}

/// Drives a layer's position and orientation along a reference curve.
///
/// The referenced path layer may be deleted at any time; sampling then fails
/// soft with [`LatticeError::PathUnavailable`] and the caller leaves the
/// layer transform unmodified.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PathFollowConfig {
    /// Whether path following contributes to the layer transform.
    pub enabled: bool,
    /// Lookup key of the curve-bearing layer.
    pub path_layer_id: String,
    /// Normalized position along the curve in `[0, 1]`.
    pub parameter: AnimatableProperty<f64>,
    /// Parameter distance used for the banking finite difference, in `[0, 0.5]`.
    pub look_ahead: f64,
    /// Curvature-proportional roll contribution, in `[0, 1]`.
    pub banking_strength: f64,
    /// Displacement along the curve normal, in canvas units.
    pub offset_y: f64,
    /// Whether the layer heading follows the curve tangent.
    pub align_to_path: bool,
    /// Advance the parameter continuously instead of evaluating its track.
    pub auto_advance: bool,
    /// Parameter increment per frame while auto-advancing.
    pub auto_advance_speed: f64,
}

impl Default for PathFollowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path_layer_id: String::new(),
            parameter: AnimatableProperty::new("path_parameter", "Path Position", ScalarKind::Scalar, 0.0)
                .with_group("Path"),
            look_ahead: 0.1,
            banking_strength: 0.0,
            offset_y: 0.0,
            align_to_path: true,
            auto_advance: false,
            auto_advance_speed: 0.0,
        }
    }
}

impl PathFollowConfig {
    /// Sample the followed curve at a (possibly fractional) frame.
    ///
    /// The parameter wraps past 1 back to 0 rather than clamping, so
    /// continuous travel loops around a closed path. When auto-advancing,
    /// the recurrence `s(f) = wrap01(s(f-1) + speed)` is evaluated in closed
    /// form from the parameter's value at frame 0, keeping sampling pure.
    #[tracing::instrument(skip(self, curves), fields(layer = %self.path_layer_id))]
    pub fn sample<P>(&self, frame: f64, curves: &P) -> LatticeResult<PathSample>
    where
        P: CurveProvider + ?Sized,
    {
        if !self.enabled {
            return Err(LatticeError::path_unavailable("path following is disabled"));
        }

        let s0 = if self.auto_advance {
            wrap01(self.parameter.current_value(0.0) + self.auto_advance_speed * frame)
        } else {
            wrap01(self.parameter.current_value(frame))
        };

        let c0 = curves.curve_at(&self.path_layer_id, s0).ok_or_else(|| {
            LatticeError::path_unavailable(format!(
                "no usable curve on layer '{}'",
                self.path_layer_id
            ))
        })?;

        let mut tangent = c0.tangent;
        let mut rotation_z = 0.0;
        if self.align_to_path || self.banking_strength > 0.0 {
            let s1 = wrap01(s0 + self.look_ahead);
            let c1 = curves.curve_at(&self.path_layer_id, s1);

            if tangent.hypot() < 1e-12
                && let Some(c1) = &c1
            {
                // Degenerate stored tangent; fall back to the chord.
                tangent = Vec2::new(c1.point.x - c0.point.x, c1.point.y - c0.point.y);
            }

            if self.align_to_path {
                rotation_z = tangent.atan2();
            }
            if self.banking_strength > 0.0
                && let Some(c1) = &c1
            {
                rotation_z += angle_between(tangent, c1.tangent) * self.banking_strength;
            }
        }

        let mut position = c0.point;
        if self.offset_y != 0.0 {
            let n = unit_normal(tangent);
            position.x += n.x * self.offset_y;
            position.y += n.y * self.offset_y;
        }

        Ok(PathSample { position, rotation_z })
    }

    /// Pre-sample a whole frame range, fanning out across worker threads.
    ///
    /// Per-frame samples are independent and the config/track snapshots are
    /// read-only, so a render pass can warm a camera path in parallel.
    pub fn sample_range<P>(
        &self,
        frames: std::ops::Range<u64>,
        curves: &P,
    ) -> Vec<LatticeResult<PathSample>>
    where
        P: CurveProvider + Sync,
    {
        frames
            .into_par_iter()
            .map(|f| self.sample(f as f64, curves))
            .collect()
    }
}

/// Wrap into `[0, 1]`, keeping an exact 1.0 at the end of the curve.
fn wrap01(s: f64) -> f64 {
    if s == 1.0 {
        return 1.0;
    }
    s - s.floor()
}

/// Signed angle from `a` to `b` in radians.
fn angle_between(a: Vec2, b: Vec2) -> f64 {
    a.cross(b).atan2(a.dot(b))
}

/// Unit perpendicular of `t` (zero vector when `t` is degenerate).
fn unit_normal(t: Vec2) -> Vec2 {
    let len = t.hypot();
    if len < 1e-12 {
        return Vec2::ZERO;
    }
    Vec2::new(-t.y / len, t.x / len)
}

#[cfg(test)]
#[path = "../../tests/unit/path/follow.rs"]
mod tests;
