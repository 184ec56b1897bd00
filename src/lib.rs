//! Lattice's timeline animation evaluation engine.
//!
//! This crate is the layer behind the compositor's property panels: it turns
//! authored keyframe data into numerically correct, deterministic values for
//! arbitrary output frames, cheaply enough to run per frame during playback
//! and render.
//!
//! # Engine overview
//!
//! 1. **Author**: panels edit [`AnimatableProperty`] keyframe tracks
//!    (insert/remove/toggle keyframes, apply timewarp presets)
//! 2. **Evaluate**: a frame number produces property values
//!    ([`AnimatableProperty::current_value`]), path poses
//!    ([`PathFollowConfig::sample`]), and remapped source times
//!    ([`TimewarpEngine::source_time`])
//! 3. **Consume**: evaluated values feed layer transform/parameter data for
//!    the compositor (out of scope here)
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: evaluation is pure and stable for a given
//!   input; the same frame always yields the same value.
//! - **Edit/evaluate separation**: keyframe tracks are copy-on-write, so a
//!   render pass fans out over immutable snapshots while the edit thread
//!   keeps mutating ([`AnimatableProperty::snapshot`]).
//! - **Fail-soft**: a deleted path layer or an empty track degrades to a
//!   fallback, never a crash ([`LatticeError`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod eval;
mod foundation;
mod path;
mod timewarp;

pub use animation::ease::Ease;
pub use animation::property::{AnimatableProperty, PropertyValue, ScalarKind};
pub use animation::track::{Keyframe, KeyframeTrack, Lerp};
pub use eval::cache::{EvalCache, PropertySet};
pub use foundation::core::{BezPath, Fps, FrameIndex, FrameRange, Point, Rgba8, Vec2, Vec3};
pub use foundation::error::{LatticeError, LatticeResult};
pub use path::follow::{CurveProvider, CurveSample, PathFollowConfig, PathSample};
pub use path::registry::{LayerRegistry, SplineGeometry, SplinePoint};
pub use timewarp::engine::{
    TimewarpConfig, TimewarpEngine, TimewarpMethod, TimewarpPreset, build_preset,
};
