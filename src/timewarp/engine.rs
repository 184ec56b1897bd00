use crate::{
    animation::ease::Ease,
    animation::property::{AnimatableProperty, ScalarKind},
    foundation::core::{Fps, FrameIndex},
    foundation::error::{LatticeError, LatticeResult},
};

/// How the caller samples source frames at a remapped time.
///
/// Carried and serialized with the layer but never interpreted by the
/// engine, which only supplies the time value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimewarpMethod {
    /// Nearest whole source frame.
    #[default]
    WholeFrames,
    /// Blend the two adjacent source frames.
    FrameMix,
    /// Optical-flow interpolation of source frames.
    PixelMotion,
}

/// Speed-ramp configuration for one layer.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimewarpConfig {
    /// Whether the speed ramp replaces the identity time mapping.
    pub enabled: bool,
    /// Playback rate in percent of normal speed (100 = normal).
    pub speed: AnimatableProperty<f64>,
    /// Source-frame sampling method, for the caller.
    pub method: TimewarpMethod,
    /// Permit speeds below zero (reverse playback).
    ///
    /// Off by default: the panel clamps speed input to a minimum of 1%, and
    /// presets degrade their negative segments to that floor.
    pub allow_negative_speed: bool,
}

impl Default for TimewarpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: AnimatableProperty::new("speed", "Speed", ScalarKind::Scalar, 100.0)
                .with_group("Time"),
            method: TimewarpMethod::default(),
            allow_negative_speed: false,
        }
    }
}

/// Preset speed-curve shapes over a layer's frame range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimewarpPreset {
    /// Ramp from 25% up to 400%.
    SlowFast,
    /// Ramp from 400% down to 25%.
    FastSlow,
    /// Normal speed with a near-freeze dip around the midpoint.
    Impact,
    /// Normal speed with a reverse segment around the midpoint.
    Rewind,
}

/// Converts a keyframed speed property into an output-frame → source-time
/// mapping by numeric integration.
///
/// Source time is the running integral of `speed/100 · (1/fps)` from the
/// layer's first frame, accumulated per frame with trapezoidal averaging of
/// adjacent speed samples. The cumulative table is built lazily on first
/// query after an edit and extended incrementally as later frames are
/// queried; a stale table is rebuilt silently.
#[derive(Clone, Debug)]
pub struct TimewarpEngine {
    layer_start: FrameIndex,
    config: TimewarpConfig,
    table: Option<TimeTable>,
}

#[derive(Clone, Debug)]
struct TimeTable {
    /// Speed-track version this table was integrated from.
    version: u64,
    /// `times[i]` = source seconds at output frame `layer_start + i`.
    times: Vec<f64>,
}

impl TimewarpEngine {
    /// Create an engine for a layer starting at `layer_start`.
    pub fn new(layer_start: FrameIndex, config: TimewarpConfig) -> Self {
        Self {
            layer_start,
            config,
            table: None,
        }
    }

    /// First frame of the owning layer.
    pub fn layer_start(&self) -> FrameIndex {
        self.layer_start
    }

    /// Current configuration.
    pub fn config(&self) -> &TimewarpConfig {
        &self.config
    }

    /// Single mutation entry point for the speed property.
    ///
    /// All edits funnel through here so the lookup table can never drift
    /// from the track it was integrated from.
    pub fn edit_speed<R>(&mut self, edit: impl FnOnce(&mut AnimatableProperty<f64>) -> R) -> R {
        let out = edit(&mut self.config.speed);
        self.invalidate();
        out
    }

    /// Drop the cached lookup table. The next query rebuilds it.
    pub fn invalidate(&mut self) {
        self.table = None;
    }

    /// Replace the entire speed track with a preset shape.
    ///
    /// All-or-nothing: an invalid `duration` rejects the operation and
    /// leaves the current track untouched.
    pub fn apply_preset(
        &mut self,
        preset: TimewarpPreset,
        duration: u64,
        fps: Fps,
    ) -> LatticeResult<()> {
        let speed = build_preset(
            preset,
            self.layer_start,
            duration,
            fps,
            self.config.allow_negative_speed,
        )?;
        self.config.speed = speed;
        self.invalidate();
        Ok(())
    }

    /// Source time in seconds at an output frame.
    ///
    /// Frames at or before `layer_start` map to 0.0: the source asset starts
    /// when the layer starts. With the ramp disabled this is the identity
    /// mapping `(n - layer_start) / fps`. The result is clamped at ≥ 0
    /// because the asset cannot be sampled before its start (reachable only
    /// with negative speeds).
    #[tracing::instrument(skip(self))]
    pub fn source_time(&mut self, output_frame: FrameIndex, fps: Fps) -> LatticeResult<f64> {
        let local = output_frame.0.saturating_sub(self.layer_start.0);
        if !self.config.enabled {
            return Ok(fps.frames_to_secs(local));
        }

        let table = self.ensure_table(local, fps);
        Ok(table.times[local as usize].max(0.0))
    }

    /// Rate multiplier (1.0 = normal) at an output frame, after the
    /// negative-speed policy is applied.
    pub fn rate_at(&self, output_frame: FrameIndex) -> f64 {
        rate(&self.config, output_frame)
    }

    fn ensure_table(&mut self, local: u64, fps: Fps) -> &TimeTable {
        let version = self.config.speed.version();
        if self.table.as_ref().is_none_or(|t| t.version != version) {
            tracing::debug!(version, "rebuilding timewarp lookup table");
            self.table = None;
        }
        let table = self.table.get_or_insert_with(|| TimeTable {
            version,
            times: vec![0.0],
        });

        let dt = fps.frame_duration_secs();
        while (table.times.len() as u64) <= local {
            let i = table.times.len();
            let f0 = FrameIndex(self.layer_start.0 + i as u64 - 1);
            let f1 = FrameIndex(self.layer_start.0 + i as u64);
            let r0 = rate(&self.config, f0);
            let r1 = rate(&self.config, f1);
            let step = 0.5 * (r0 + r1) * dt;
            let last = table.times[i - 1];
            table.times.push(last + step);
        }
        table
    }
}

fn rate(config: &TimewarpConfig, frame: FrameIndex) -> f64 {
    let raw = config.speed.current_value(frame.as_f64());
    let clamped = if config.allow_negative_speed {
        raw
    } else {
        raw.max(1.0)
    };
    clamped / 100.0
}

/// Build a preset speed property over `[layer_start, layer_start + duration]`.
///
/// The shape replaces any previous speed track when applied. `duration == 0`
/// is rejected with [`LatticeError::InvalidRange`] and no property is
/// generated. `fps` scales the width of the `Impact` dip so it reads as the
/// same fraction of a second at any frame rate.
pub fn build_preset(
    preset: TimewarpPreset,
    layer_start: FrameIndex,
    duration: u64,
    fps: Fps,
    allow_negative_speed: bool,
) -> LatticeResult<AnimatableProperty<f64>> {
    if duration == 0 {
        return Err(LatticeError::invalid_range(
            "timewarp preset duration must be > 0",
        ));
    }

    let start = layer_start.0;
    let end = start + duration;
    let mid = start + duration / 2;
    let reverse_floor = if allow_negative_speed { -100.0 } else { 1.0 };

    let mut speed =
        AnimatableProperty::new("speed", "Speed", ScalarKind::Scalar, 100.0).with_group("Time");

    match preset {
        TimewarpPreset::SlowFast => {
            speed.insert_keyframe(FrameIndex(start), 25.0, Ease::InOutCubic);
            speed.insert_keyframe(FrameIndex(end), 400.0, Ease::InOutCubic);
        }
        TimewarpPreset::FastSlow => {
            speed.insert_keyframe(FrameIndex(start), 400.0, Ease::InOutCubic);
            speed.insert_keyframe(FrameIndex(end), 25.0, Ease::InOutCubic);
        }
        TimewarpPreset::Impact => {
            // Dip width ≈ a quarter second on each side of the midpoint.
            let w = ((fps.as_f64() * 0.25).round() as u64).clamp(1, (duration / 4).max(1));
            speed.insert_keyframe(FrameIndex(start), 100.0, Ease::InOutCubic);
            if mid > start + w {
                speed.insert_keyframe(FrameIndex(mid - w), 100.0, Ease::InOutCubic);
            }
            speed.insert_keyframe(FrameIndex(mid), 5.0, Ease::InOutCubic);
            if mid + w < end {
                speed.insert_keyframe(FrameIndex(mid + w), 100.0, Ease::InOutCubic);
            }
            speed.insert_keyframe(FrameIndex(end), 100.0, Ease::InOutCubic);
        }
        TimewarpPreset::Rewind => {
            speed.insert_keyframe(FrameIndex(start), 100.0, Ease::InOutCubic);
            speed.insert_keyframe(FrameIndex(mid), reverse_floor, Ease::InOutCubic);
            speed.insert_keyframe(FrameIndex(end), 100.0, Ease::InOutCubic);
        }
    }

    Ok(speed)
}

#[cfg(test)]
#[path = "../../tests/unit/timewarp/engine.rs"]
mod tests;
