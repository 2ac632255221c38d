//! Spin tuning constants.
//!
//! All speeds are degrees per reference frame. The defaults reproduce the
//! feel of a 60 Hz display driving one tick per refresh; with
//! `frame_rate_compensation` off the animation speed scales with the host's
//! refresh rate.

use serde::{Deserialize, Serialize};

use super::engine::SpinError;

/// Engine constants, persisted as part of the app settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinParams {
    /// Velocity set by `start()`
    pub launch_velocity: f64,
    /// Added to velocity on each spinning tick
    pub acceleration_step: f64,
    /// Spinning velocity cap
    pub max_velocity: f64,
    /// Multiplier applied on each slowing tick, strictly in (0, 1)
    pub decay_factor: f64,
    /// Slowing run settles once velocity drops below this
    pub stop_epsilon: f64,
    /// Tick cue intensity while spinning
    pub spinning_tick_intensity: f32,
    /// Tick cue intensity while slowing
    pub slowing_tick_intensity: f32,
    /// Scale per-tick constants by elapsed wall time
    pub frame_rate_compensation: bool,
    /// Display rate the per-tick constants were tuned for
    pub reference_fps: f64,
}

impl Default for SpinParams {
    fn default() -> Self {
        Self {
            launch_velocity: 3.0,
            acceleration_step: 0.5,
            max_velocity: 18.0,
            decay_factor: 0.988,
            stop_epsilon: 0.1,
            spinning_tick_intensity: 0.15,
            slowing_tick_intensity: 0.05,
            frame_rate_compensation: false,
            reference_fps: 60.0,
        }
    }
}

impl SpinParams {
    /// Reject constants that would stall, run away or never settle.
    pub fn validate(&self) -> Result<(), SpinError> {
        let bad = |why: &str| Err(SpinError::InvalidParams(why.to_string()));

        if !(self.launch_velocity > 0.0) {
            return bad("launch_velocity must be positive");
        }
        if !(self.acceleration_step >= 0.0) {
            return bad("acceleration_step must not be negative");
        }
        if !(self.max_velocity >= self.launch_velocity) {
            return bad("max_velocity must be at least launch_velocity");
        }
        if !(self.decay_factor > 0.0 && self.decay_factor < 1.0) {
            return bad("decay_factor must be in (0, 1)");
        }
        if !(self.stop_epsilon > 0.0) {
            return bad("stop_epsilon must be positive");
        }
        for intensity in [self.spinning_tick_intensity, self.slowing_tick_intensity] {
            if !(intensity > 0.0 && intensity <= 1.0) {
                return bad("tick intensities must be in (0, 1]");
            }
        }
        if !(self.reference_fps > 0.0) {
            return bad("reference_fps must be positive");
        }
        Ok(())
    }

    /// Convert elapsed seconds since the previous frame into reference frames.
    ///
    /// Returns exactly 1.0 when compensation is off, so every frame counts as
    /// one tick no matter how long it took.
    pub fn delta_frames(&self, elapsed_secs: f64) -> f64 {
        if !self.frame_rate_compensation || !(elapsed_secs > 0.0) {
            return 1.0;
        }
        // Long stalls (window dragged, app backgrounded) count as a few frames, not a jump
        (elapsed_secs * self.reference_fps).min(4.0)
    }
}
