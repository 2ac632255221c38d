//! Roulette spin engine: state machine, angular integration, winner pick.
//!
//! **Architecture**: the engine owns all spin state and is advanced from the
//! outside. It never loops or sleeps. While a run is active it keeps exactly
//! one frame request outstanding with its [`FrameScheduler`]; the host passes
//! each handle back to [`SpinEngine::on_frame`] on display refresh.
//!
//! # States
//!
//! ```text
//! Idle ──start──▶ Spinning ──request_stop──▶ Slowing ──(v < ε)──▶ Finished
//!                    ▲                                               │
//!                    └──────────────────start────────────────────────┘
//! ```
//!
//! `reset()` returns any state to Idle with rotation and velocity at zero.
//!
//! # Tick model
//!
//! One tick per display frame. Spinning ramps velocity up by a fixed step to
//! a cap, slowing multiplies it by a decay factor below 1, and rotation
//! accumulates velocity unbounded (never wrapped mid-run). With
//! `SpinParams::frame_rate_compensation` off, every frame is one tick, so
//! the wheel turns faster on faster displays.
//!
//! # Tick cues
//!
//! Coarse model: when rotation has moved at least one slice width since the
//! last cue, one tick cue fires and the boundary moves to the current
//! rotation. A fast frame crossing several slices still fires once.

use std::sync::Arc;

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::entities::Item;

use super::audio::AudioCueSink;
use super::event_bus::SpinEventEmitter;
use super::layout::WheelLayout;
use super::params::SpinParams;
use super::scheduler::{FrameHandle, FrameScheduler};
use super::spin_events::{SpinRejectedEvent, SpinUpdatedEvent, WinnerSelectedEvent};

/// Fewest items a wheel can spin with
pub const MIN_ITEMS: usize = 2;

/// Roulette lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinState {
    #[default]
    Idle,
    Spinning,
    Slowing,
    Finished,
}

impl SpinState {
    /// Spinning or slowing: frames are being consumed
    pub fn is_active(self) -> bool {
        matches!(self, SpinState::Spinning | SpinState::Slowing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpinState::Idle => "idle",
            SpinState::Spinning => "spinning",
            SpinState::Slowing => "slowing",
            SpinState::Finished => "finished",
        }
    }
}

impl std::fmt::Display for SpinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinError {
    #[error("need at least 2 items to spin, have {count}")]
    InsufficientItems { count: usize },

    #[error("cannot {op} while {from}")]
    InvalidTransition { op: &'static str, from: SpinState },

    #[error("item list cannot change while the wheel is turning")]
    SpinInProgress,

    #[error("invalid spin parameters: {0}")]
    InvalidParams(String),
}

/// What the host renders: state, current angle, and the winner once settled.
#[derive(Clone, Debug, PartialEq)]
pub struct SpinSnapshot {
    pub state: SpinState,
    pub rotation: f64,
    pub winner: Option<Item>,
}

/// Per-run data, rebuilt by every `start()`
#[derive(Clone, Debug, Default)]
struct SpinRun {
    velocity: f64,
    last_tick_boundary: f64,
    ticks: u64,
}

pub struct SpinEngine {
    items: Vec<Item>,
    layout: WheelLayout,
    params: SpinParams,
    state: SpinState,
    /// Cumulative face rotation in degrees
    rotation: f64,
    run: SpinRun,
    winner: Option<Item>,
    pending_frame: Option<FrameHandle>,
    scheduler: Box<dyn FrameScheduler>,
    audio: Arc<dyn AudioCueSink>,
    events: SpinEventEmitter,
}

impl std::fmt::Debug for SpinEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinEngine")
            .field("items", &self.items.len())
            .field("state", &self.state)
            .field("rotation", &self.rotation)
            .field("velocity", &self.run.velocity)
            .field("winner", &self.winner.as_ref().map(|w| &w.label))
            .field("pending_frame", &self.pending_frame)
            .finish()
    }
}

impl SpinEngine {
    pub fn new(scheduler: Box<dyn FrameScheduler>, audio: Arc<dyn AudioCueSink>) -> Self {
        Self {
            items: Vec::new(),
            layout: WheelLayout::new(0),
            params: SpinParams::default(),
            state: SpinState::Idle,
            rotation: 0.0,
            run: SpinRun::default(),
            winner: None,
            pending_frame: None,
            scheduler,
            audio,
            events: SpinEventEmitter::detached(),
        }
    }

    pub fn with_params(mut self, params: SpinParams) -> Result<Self, SpinError> {
        self.set_params(params)?;
        Ok(self)
    }

    pub fn set_event_emitter(&mut self, emitter: SpinEventEmitter) {
        self.events = emitter;
    }

    /// Swap the audio sink (e.g. mute toggle). Takes effect on the next cue.
    pub fn set_audio(&mut self, audio: Arc<dyn AudioCueSink>) {
        self.audio = audio;
    }

    /// Replace tuning constants. Applies from the next tick on.
    pub fn set_params(&mut self, params: SpinParams) -> Result<(), SpinError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    // === Accessors ===

    pub fn params(&self) -> &SpinParams {
        &self.params
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn layout(&self) -> WheelLayout {
        self.layout
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> f64 {
        self.run.velocity
    }

    /// Ticks integrated in the current (or last) run
    pub fn run_ticks(&self) -> u64 {
        self.run.ticks
    }

    pub fn winner(&self) -> Option<&Item> {
        self.winner.as_ref()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn snapshot(&self) -> SpinSnapshot {
        SpinSnapshot {
            state: self.state,
            rotation: self.rotation,
            winner: self.winner.clone(),
        }
    }

    // === Operations ===

    /// Replace the wheel contents and reset. Refused mid-run.
    pub fn set_items(&mut self, items: Vec<Item>) -> Result<(), SpinError> {
        if self.state.is_active() {
            warn!("Ignoring item list change while {}", self.state);
            return Err(SpinError::SpinInProgress);
        }
        debug!("Wheel items replaced: {} -> {}", self.items.len(), items.len());
        self.items = items;
        self.layout = WheelLayout::new(self.items.len());
        self.reset();
        Ok(())
    }

    /// Launch a run from Idle or Finished.
    ///
    /// Calling it while already spinning or slowing does nothing and returns
    /// `Ok`. With fewer than [`MIN_ITEMS`] items nothing changes and
    /// `InsufficientItems` is returned.
    pub fn start(&mut self) -> Result<(), SpinError> {
        if self.state.is_active() {
            debug!("start() ignored while {}", self.state);
            self.publish();
            return Ok(());
        }
        if self.items.len() < MIN_ITEMS {
            let err = SpinError::InsufficientItems { count: self.items.len() };
            info!("Spin refused: {}", err);
            self.events.emit(SpinRejectedEvent(err.clone()));
            self.publish();
            return Err(err);
        }

        self.winner = None;
        self.run = SpinRun {
            velocity: self.params.launch_velocity,
            last_tick_boundary: self.rotation,
            ticks: 0,
        };
        self.state = SpinState::Spinning;
        self.cancel_pending_frame();
        self.pending_frame = Some(self.scheduler.schedule_next_frame());

        info!("Spin started: {} items, rotation {:.1}°", self.items.len(), self.rotation);
        self.publish();
        Ok(())
    }

    /// Begin decelerating. Ignored unless spinning.
    pub fn request_stop(&mut self) {
        if let Err(e) = self.try_request_stop() {
            debug!("request_stop() ignored: {}", e);
            self.publish();
        }
    }

    /// Like [`request_stop`](Self::request_stop) but reports a refused transition.
    pub fn try_request_stop(&mut self) -> Result<(), SpinError> {
        if self.state != SpinState::Spinning {
            return Err(SpinError::InvalidTransition {
                op: "stop",
                from: self.state,
            });
        }
        self.state = SpinState::Slowing;
        info!(
            "Stop requested at {:.1}° ({:.2}°/tick after {} ticks)",
            self.rotation, self.run.velocity, self.run.ticks
        );
        self.publish();
        Ok(())
    }

    /// Back to Idle at rotation zero. Cancels the outstanding frame request.
    pub fn reset(&mut self) {
        self.cancel_pending_frame();
        self.state = SpinState::Idle;
        self.rotation = 0.0;
        self.run = SpinRun::default();
        self.winner = None;
        debug!("Spin engine reset");
        self.publish();
    }

    /// Frame callback from the host.
    ///
    /// Only the currently outstanding handle is honoured; anything else is a
    /// leftover from a cancelled run and is dropped. Returns whether a tick
    /// ran.
    pub fn on_frame(&mut self, handle: FrameHandle, elapsed_secs: f64) -> bool {
        if self.pending_frame != Some(handle) {
            trace!("Dropping stale frame {:?} (pending {:?})", handle, self.pending_frame);
            return false;
        }
        self.pending_frame = None;

        let delta = self.params.delta_frames(elapsed_secs);
        self.tick(delta);

        if self.state.is_active() {
            self.pending_frame = Some(self.scheduler.schedule_next_frame());
        }
        true
    }

    /// Integrate one step of `delta_frames` reference frames.
    ///
    /// No-op unless spinning or slowing. Hosts normally go through
    /// [`on_frame`](Self::on_frame); calling this directly drives the
    /// simulation without a display clock.
    pub fn tick(&mut self, delta_frames: f64) {
        let p = self.params;
        match self.state {
            SpinState::Spinning => {
                self.run.velocity = (self.run.velocity + p.acceleration_step * delta_frames)
                    .min(p.max_velocity);
            }
            SpinState::Slowing => {
                self.run.velocity *= if delta_frames == 1.0 {
                    p.decay_factor
                } else {
                    p.decay_factor.powf(delta_frames)
                };
            }
            SpinState::Idle | SpinState::Finished => return,
        }

        self.rotation += self.run.velocity * delta_frames;
        self.run.ticks += 1;

        if self.state == SpinState::Slowing && self.run.velocity < p.stop_epsilon {
            self.finalize();
        }

        self.check_tick_boundary();
        self.publish();
    }

    // === Internals ===

    fn check_tick_boundary(&mut self) {
        let width = self.layout.slice_width();
        if (self.rotation - self.run.last_tick_boundary).abs() < width {
            return;
        }
        let intensity = match self.state {
            SpinState::Spinning => Some(self.params.spinning_tick_intensity),
            SpinState::Slowing => Some(self.params.slowing_tick_intensity),
            SpinState::Idle | SpinState::Finished => None,
        };
        if let Some(intensity) = intensity {
            self.audio.emit_tick(intensity);
        }
        self.run.last_tick_boundary = self.rotation;
    }

    fn finalize(&mut self) {
        self.state = SpinState::Finished;
        self.run.velocity = 0.0;
        self.cancel_pending_frame();

        let index = self.layout.resolve_winner(self.rotation);
        self.winner = index.and_then(|i| self.items.get(i)).cloned();
        self.audio.emit_completion_fanfare();

        match (index, self.winner.as_ref()) {
            (Some(index), Some(item)) => {
                info!(
                    "Wheel settled at {:.2}° after {} ticks: #{} '{}'",
                    self.rotation, self.run.ticks, index, item.label
                );
                self.events.emit(WinnerSelectedEvent {
                    item: item.clone(),
                    index,
                    rotation: self.rotation,
                });
            }
            _ => warn!("Wheel settled with no items to pick from"),
        }
    }

    fn cancel_pending_frame(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_scheduled_frame(handle);
        }
    }

    fn publish(&self) {
        self.events.emit(SpinUpdatedEvent(self.snapshot()));
    }
}

impl Drop for SpinEngine {
    fn drop(&mut self) {
        self.cancel_pending_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::{AudioCue, RecordingAudio};
    use crate::core::event_bus::{EventBus, downcast_event};
    use crate::core::scheduler::{FrameQueue, QueuedScheduler};

    fn items(labels: &[&str]) -> Vec<Item> {
        labels.iter().map(|l| Item::new(*l)).collect()
    }

    fn engine_with(labels: &[&str]) -> (SpinEngine, FrameQueue, RecordingAudio) {
        let queue = FrameQueue::new();
        let audio = RecordingAudio::new();
        let mut engine = SpinEngine::new(
            Box::new(QueuedScheduler::new(queue.clone())),
            Arc::new(audio.clone()),
        );
        engine.set_items(items(labels)).unwrap();
        (engine, queue, audio)
    }

    /// Deliver every due frame once, like one host refresh
    fn pump(engine: &mut SpinEngine, queue: &FrameQueue) -> usize {
        let mut ran = 0;
        for handle in queue.take_due() {
            if engine.on_frame(handle, 1.0 / 60.0) {
                ran += 1;
            }
        }
        ran
    }

    #[test]
    fn test_start_requires_two_items() {
        let (mut engine, queue, _) = engine_with(&["only"]);
        assert_eq!(engine.start(), Err(SpinError::InsufficientItems { count: 1 }));
        assert_eq!(engine.state(), SpinState::Idle);
        assert!(queue.is_empty());
        assert_eq!(engine.pending_frame(), None);

        let (mut empty, _, _) = engine_with(&[]);
        assert!(matches!(empty.start(), Err(SpinError::InsufficientItems { count: 0 })));
    }

    #[test]
    fn test_start_sets_launch_velocity_and_schedules() {
        let (mut engine, queue, _) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        assert_eq!(engine.state(), SpinState::Spinning);
        assert_eq!(engine.velocity(), 3.0);
        assert_eq!(queue.len(), 1);
        assert!(engine.winner().is_none());
    }

    #[test]
    fn test_start_while_active_is_noop() {
        let (mut engine, queue, _) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        pump(&mut engine, &queue);
        let rotation = engine.rotation();
        let velocity = engine.velocity();

        assert_eq!(engine.start(), Ok(()));
        assert_eq!(engine.state(), SpinState::Spinning);
        assert_eq!(engine.rotation(), rotation);
        assert_eq!(engine.velocity(), velocity);
        assert_eq!(queue.len(), 1);

        engine.request_stop();
        assert_eq!(engine.start(), Ok(()));
        assert_eq!(engine.state(), SpinState::Slowing);
    }

    #[test]
    fn test_spinning_velocity_never_exceeds_cap() {
        let (mut engine, queue, _) = engine_with(&["A", "B", "C"]);
        engine.start().unwrap();
        let mut last_rotation = engine.rotation();
        for _ in 0..500 {
            pump(&mut engine, &queue);
            assert!(engine.velocity() <= engine.params().max_velocity);
            assert!(engine.rotation() >= last_rotation);
            last_rotation = engine.rotation();
        }
        assert_eq!(engine.velocity(), 18.0);
        assert_eq!(engine.state(), SpinState::Spinning);
    }

    #[test]
    fn test_acceleration_ramp_exact() {
        let (mut engine, _, _) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        engine.tick(1.0);
        assert_eq!(engine.velocity(), 3.5);
        assert_eq!(engine.rotation(), 3.5);
        engine.tick(1.0);
        assert_eq!(engine.velocity(), 4.0);
        assert_eq!(engine.rotation(), 7.5);
    }

    #[test]
    fn test_request_stop_only_from_spinning() {
        let (mut engine, _, _) = engine_with(&["A", "B"]);
        engine.request_stop();
        assert_eq!(engine.state(), SpinState::Idle);
        assert_eq!(
            engine.try_request_stop(),
            Err(SpinError::InvalidTransition { op: "stop", from: SpinState::Idle })
        );

        engine.start().unwrap();
        engine.tick(1.0);
        let v = engine.velocity();
        let r = engine.rotation();
        engine.request_stop();
        assert_eq!(engine.state(), SpinState::Slowing);
        assert_eq!(engine.velocity(), v);
        assert_eq!(engine.rotation(), r);

        assert!(engine.try_request_stop().is_err());
        assert_eq!(engine.state(), SpinState::Slowing);
    }

    #[test]
    fn test_decay_converges_to_finished() {
        let (mut engine, queue, audio) = engine_with(&["A", "B", "C", "D"]);
        engine.start().unwrap();
        for _ in 0..40 {
            pump(&mut engine, &queue);
        }
        engine.request_stop();

        let mut frames = 0;
        while engine.state() != SpinState::Finished {
            assert!(pump(&mut engine, &queue) > 0, "frame loop stalled while slowing");
            frames += 1;
            assert!(frames < 10_000, "slowing never settled");
        }
        assert!(engine.velocity() < engine.params().stop_epsilon);
        assert!(queue.is_empty());
        assert_eq!(engine.pending_frame(), None);
        assert_eq!(audio.fanfare_count(), 1);

        let expected = resolve_expected(engine.items(), engine.rotation());
        assert_eq!(engine.winner(), Some(&expected));
    }

    fn resolve_expected(items: &[Item], rotation: f64) -> Item {
        let idx = crate::core::layout::resolve_winner_index(items.len(), rotation).unwrap();
        items[idx].clone()
    }

    #[test]
    fn test_finished_state_is_frozen() {
        let (mut engine, _, audio) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        engine.tick(1.0);
        engine.request_stop();
        while engine.state() != SpinState::Finished {
            engine.tick(1.0);
        }
        let rotation = engine.rotation();
        engine.tick(1.0);
        engine.request_stop();
        assert_eq!(engine.rotation(), rotation);
        assert_eq!(engine.state(), SpinState::Finished);
        assert!(engine.winner().is_some());
        assert_eq!(audio.fanfare_count(), 1);
    }

    #[test]
    fn test_two_item_scenario() {
        let (mut engine, queue, _) = engine_with(&["A", "B"]);
        assert_eq!(engine.layout().slice_width(), 180.0);
        engine.start().unwrap();
        assert_eq!(engine.state(), SpinState::Spinning);

        while engine.rotation() < 1000.0 {
            pump(&mut engine, &queue);
        }
        engine.request_stop();
        assert_eq!(engine.state(), SpinState::Slowing);

        while engine.state() != SpinState::Finished {
            pump(&mut engine, &queue);
        }
        let winner = engine.winner().cloned().unwrap();
        let idx = crate::core::layout::resolve_winner_index(2, engine.rotation()).unwrap();
        assert_eq!(winner, engine.items()[idx]);
    }

    #[test]
    fn test_winner_only_when_finished_and_cleared_on_restart() {
        let (mut engine, _, _) = engine_with(&["A", "B", "C"]);
        engine.start().unwrap();
        engine.request_stop();
        while engine.state() != SpinState::Finished {
            assert!(engine.winner().is_none());
            engine.tick(1.0);
        }
        assert!(engine.winner().is_some());

        engine.start().unwrap();
        assert!(engine.winner().is_none());
        assert_eq!(engine.state(), SpinState::Spinning);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut engine, queue, _) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        engine.request_stop();
        while engine.state() != SpinState::Finished {
            engine.tick(1.0);
        }
        assert!(engine.winner().is_some());

        engine.reset();
        assert_eq!(engine.winner(), None);
        assert_eq!(engine.rotation(), 0.0);
        assert_eq!(engine.velocity(), 0.0);
        assert_eq!(engine.state(), SpinState::Idle);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_stale_frame_after_reset_is_ignored() {
        let (mut engine, queue, _) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        let stale = engine.pending_frame().unwrap();

        engine.reset();
        assert!(queue.is_empty());
        assert!(!engine.on_frame(stale, 1.0 / 60.0));
        assert_eq!(engine.rotation(), 0.0);
        assert_eq!(engine.state(), SpinState::Idle);

        // a new run ignores the old handle too
        engine.start().unwrap();
        assert!(!engine.on_frame(stale, 1.0 / 60.0));
        assert_eq!(engine.rotation(), 0.0);
        assert_eq!(pump(&mut engine, &queue), 1);
        assert!(engine.rotation() > 0.0);
    }

    #[test]
    fn test_set_items_refused_mid_spin() {
        let (mut engine, _, _) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        assert_eq!(engine.set_items(items(&["X", "Y", "Z"])), Err(SpinError::SpinInProgress));
        assert_eq!(engine.items().len(), 2);

        engine.request_stop();
        while engine.state() != SpinState::Finished {
            engine.tick(1.0);
        }
        engine.set_items(items(&["X", "Y", "Z"])).unwrap();
        assert_eq!(engine.items().len(), 3);
        assert_eq!(engine.state(), SpinState::Idle);
        assert_eq!(engine.rotation(), 0.0);
        assert!(engine.winner().is_none());
    }

    #[test]
    fn test_one_tick_cue_per_engine_tick() {
        // 36 slices of 10°: at the capped 18°/tick the wheel crosses more than
        // one boundary per tick, yet only one cue fires per tick
        let labels: Vec<String> = (0..36).map(|i| format!("item{}", i)).collect();
        let refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let (mut engine, _, audio) = engine_with(&refs);
        engine.start().unwrap();
        for _ in 0..100 {
            engine.tick(1.0);
        }
        assert_eq!(engine.run_ticks(), 100);
        assert!(audio.tick_count() <= 100);
        assert!(audio.tick_count() >= 90);
        assert!(audio.cues().iter().all(|c| *c == AudioCue::Tick(0.15)));
    }

    #[test]
    fn test_tick_cue_intensity_follows_state() {
        let (mut engine, _, audio) = engine_with(&["A", "B", "C", "D", "E", "F"]);
        engine.start().unwrap();
        for _ in 0..60 {
            engine.tick(1.0);
        }
        engine.request_stop();
        audio.clear();
        for _ in 0..40 {
            engine.tick(1.0);
        }
        let cues = audio.cues();
        assert!(!cues.is_empty());
        assert!(cues.iter().all(|c| *c == AudioCue::Tick(0.05)));
    }

    #[test]
    fn test_first_tick_cue_waits_for_full_slice() {
        let (mut engine, _, audio) = engine_with(&["A", "B"]);
        engine.start().unwrap();
        // 3.5 + 4 + 4.5 + ... stays under 180° for the first several ticks
        for _ in 0..10 {
            engine.tick(1.0);
        }
        assert!(engine.rotation() < 180.0);
        assert_eq!(audio.tick_count(), 0);
    }

    #[test]
    fn test_compensation_with_unit_delta_matches_fixed() {
        let (mut fixed, _, _) = engine_with(&["A", "B", "C"]);
        let (mut scaled, _, _) = engine_with(&["A", "B", "C"]);
        scaled
            .set_params(SpinParams { frame_rate_compensation: true, ..Default::default() })
            .unwrap();

        for engine in [&mut fixed, &mut scaled] {
            engine.start().unwrap();
            for _ in 0..30 {
                engine.tick(1.0);
            }
            engine.request_stop();
            for _ in 0..50 {
                engine.tick(1.0);
            }
        }
        assert_eq!(fixed.rotation(), scaled.rotation());
        assert_eq!(fixed.velocity(), scaled.velocity());
    }

    #[test]
    fn test_half_frames_cover_same_ground_roughly() {
        let (mut full, _, _) = engine_with(&["A", "B", "C"]);
        let (mut half, _, _) = engine_with(&["A", "B", "C"]);
        full.start().unwrap();
        half.start().unwrap();
        for _ in 0..60 {
            full.tick(1.0);
        }
        for _ in 0..120 {
            half.tick(0.5);
        }
        assert_eq!(half.velocity(), 18.0);
        assert!((full.rotation() - half.rotation()).abs() / full.rotation() < 0.05);
    }

    #[test]
    fn test_events_published() {
        let bus = EventBus::new();
        let (mut engine, _, _) = engine_with(&["A", "B"]);
        engine.set_event_emitter(SpinEventEmitter::from_emitter(bus.emitter()));

        engine.start().unwrap();
        engine.tick(1.0);
        engine.request_stop();
        while engine.state() != SpinState::Finished {
            engine.tick(1.0);
        }

        let events = bus.poll();
        let winners: Vec<_> = events
            .iter()
            .filter_map(|e| downcast_event::<WinnerSelectedEvent>(e))
            .collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(Some(&winners[0].item), engine.winner());

        let last = events
            .iter()
            .rev()
            .find_map(|e| downcast_event::<SpinUpdatedEvent>(e))
            .unwrap();
        assert_eq!(last.0, engine.snapshot());
    }

    #[test]
    fn test_rejected_start_emits_event() {
        let bus = EventBus::new();
        let (mut engine, _, _) = engine_with(&["solo"]);
        engine.set_event_emitter(SpinEventEmitter::from_emitter(bus.emitter()));
        assert!(engine.start().is_err());
        let rejected = bus
            .poll()
            .iter()
            .filter(|e| downcast_event::<SpinRejectedEvent>(e).is_some())
            .count();
        assert_eq!(rejected, 1);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let (engine, _, _) = engine_with(&["A", "B"]);
        let result = engine.with_params(SpinParams { decay_factor: 1.5, ..Default::default() });
        assert!(matches!(result, Err(SpinError::InvalidParams(_))));
    }
}
