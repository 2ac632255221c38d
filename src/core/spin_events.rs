//! Spin engine notifications and host commands.

use crate::entities::Item;

use super::engine::{SpinError, SpinSnapshot};

// === Engine -> host ===

/// Observable state after a tick or an explicit operation
#[derive(Clone, Debug)]
pub struct SpinUpdatedEvent(pub SpinSnapshot);

/// Wheel settled on `item`
#[derive(Clone, Debug)]
pub struct WinnerSelectedEvent {
    pub item: Item,
    pub index: usize,
    pub rotation: f64,
}

/// `start()` was refused
#[derive(Clone, Debug)]
pub struct SpinRejectedEvent(pub SpinError);

// === Host -> engine ===

#[derive(Clone, Debug)]
pub struct StartSpinEvent;

#[derive(Clone, Debug)]
pub struct StopSpinEvent;

#[derive(Clone, Debug)]
pub struct ResetSpinEvent;
