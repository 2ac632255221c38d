//! Audio cue contract between the spin engine and whatever makes noise.
//!
//! The engine only says *when* to click and *when* to celebrate. Sinks are
//! fire-and-forget: they must return immediately and swallow their own
//! failures, the tick loop never waits on audio.

use std::sync::{Arc, Mutex};

use log::trace;

/// One cue requested by the engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCue {
    /// Short click as the wheel passes a slice, intensity in (0, 1]
    Tick(f32),
    /// One-shot completion fanfare
    Fanfare,
}

/// Receiver of engine audio cues.
pub trait AudioCueSink: Send + Sync {
    fn emit_tick(&self, intensity: f32);
    fn emit_completion_fanfare(&self);
}

/// Sink that drops every cue (muted or headless without sound)
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioCueSink for NullAudio {
    fn emit_tick(&self, intensity: f32) {
        trace!("tick cue muted ({:.2})", intensity);
    }

    fn emit_completion_fanfare(&self) {
        trace!("fanfare cue muted");
    }
}

/// Sink that remembers every cue in order.
///
/// Clones share the same log, so a caller can keep one handle and give the
/// other to the engine.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    cues: Arc<Mutex<Vec<AudioCue>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn tick_count(&self) -> usize {
        self.cues()
            .iter()
            .filter(|c| matches!(c, AudioCue::Tick(_)))
            .count()
    }

    pub fn fanfare_count(&self) -> usize {
        self.cues()
            .iter()
            .filter(|c| matches!(c, AudioCue::Fanfare))
            .count()
    }

    pub fn clear(&self) {
        self.cues.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn push(&self, cue: AudioCue) {
        self.cues.lock().unwrap_or_else(|e| e.into_inner()).push(cue);
    }
}

impl AudioCueSink for RecordingAudio {
    fn emit_tick(&self, intensity: f32) {
        self.push(AudioCue::Tick(intensity));
    }

    fn emit_completion_fanfare(&self) {
        self.push(AudioCue::Fanfare);
    }
}
