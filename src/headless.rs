//! Windowless spin: drive the engine with a simulated 60 Hz clock.
//!
//! The frame loop is the same one the GUI uses (a [`QueuedScheduler`] whose
//! queue the caller drains), only the "display" is a plain loop. The stop
//! point stands in for the user's click: a fixed frame count, or one drawn
//! from a seeded RNG so a run can be replayed.

use std::sync::Arc;

use anyhow::{Result, bail};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{AudioCueSink, FrameQueue, QueuedScheduler, SpinEngine, SpinParams};
use crate::entities::Item;

/// Range of frames the wheel spins before the simulated stop request
pub const STOP_FRAMES_RANGE: std::ops::RangeInclusive<u32> = 60..=300;

/// Hard ceiling on simulated frames; a valid decay settles far sooner
const MAX_FRAMES: u32 = 100_000;

const FRAME_SECS: f64 = 1.0 / 60.0;

/// How the simulated user decides when to press stop
#[derive(Clone, Copy, Debug)]
pub enum StopPoint {
    AfterFrames(u32),
    Seeded(u64),
    Random,
}

impl StopPoint {
    pub fn from_cli(stop_after: Option<u32>, seed: Option<u64>) -> Self {
        match (stop_after, seed) {
            (Some(frames), _) => StopPoint::AfterFrames(frames),
            (None, Some(seed)) => StopPoint::Seeded(seed),
            (None, None) => StopPoint::Random,
        }
    }

    pub fn frames(self) -> u32 {
        match self {
            StopPoint::AfterFrames(frames) => frames,
            StopPoint::Seeded(seed) => StdRng::seed_from_u64(seed).random_range(STOP_FRAMES_RANGE),
            StopPoint::Random => rand::rng().random_range(STOP_FRAMES_RANGE),
        }
    }
}

/// Outcome of one headless run
#[derive(Clone, Debug)]
pub struct HeadlessOutcome {
    pub winner: Item,
    pub index: usize,
    pub rotation: f64,
    pub frames: u32,
}

/// Spin `items` once and return the winner.
pub fn run_spin(
    items: Vec<Item>,
    params: SpinParams,
    audio: Arc<dyn AudioCueSink>,
    stop: StopPoint,
) -> Result<HeadlessOutcome> {
    let stop_at = stop.frames();
    if stop_at >= MAX_FRAMES {
        bail!("Stop point of {} frames is too late, use fewer than {}", stop_at, MAX_FRAMES);
    }

    let queue = FrameQueue::new();
    let mut engine = SpinEngine::new(Box::new(QueuedScheduler::new(queue.clone())), audio)
        .with_params(params)?;
    engine.set_items(items)?;
    engine.start()?;
    info!("Headless spin: stop requested after {} frames", stop_at);

    let mut frames = 0u32;
    while engine.state().is_active() {
        if frames >= MAX_FRAMES {
            bail!("Wheel did not settle within {} frames", MAX_FRAMES);
        }
        if frames == stop_at {
            engine.request_stop();
        }
        for handle in queue.take_due() {
            engine.on_frame(handle, FRAME_SECS);
        }
        frames += 1;
    }
    debug!("Settled after {} frames", frames);

    let rotation = engine.rotation();
    let index = engine.layout().resolve_winner(rotation);
    match (index, engine.winner()) {
        (Some(index), Some(winner)) => Ok(HeadlessOutcome {
            winner: winner.clone(),
            index,
            rotation,
            frames,
        }),
        _ => bail!("Spin ended without a winner"),
    }
}
