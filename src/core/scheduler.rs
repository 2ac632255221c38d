//! Frame scheduling: "call me on the next display refresh".
//!
//! The engine never loops on its own. While a run is active it asks its
//! [`FrameScheduler`] for exactly one future frame, and the host hands that
//! [`FrameHandle`] back through `SpinEngine::on_frame` when the display
//! refreshes. A handle that was cancelled (or belongs to a discarded run) is
//! ignored by the engine, so a late callback can never touch fresh state.
//!
//! [`QueuedScheduler`] is the stock implementation: scheduled handles land in
//! a shared [`FrameQueue`] that the host drains once per rendered frame. An
//! optional waker lets egui repaint only while a frame is pending.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Token identifying one scheduled frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Display-refresh scheduling primitive consumed by the engine.
pub trait FrameScheduler: Send {
    /// Request one callback on the next refresh
    fn schedule_next_frame(&mut self) -> FrameHandle;
    /// Withdraw a request made earlier; unknown handles are ignored
    fn cancel_scheduled_frame(&mut self, handle: FrameHandle);
}

/// Shared queue of due frame handles.
#[derive(Clone, Debug, Default)]
pub struct FrameQueue {
    due: Arc<Mutex<VecDeque<FrameHandle>>>,
    next_id: Arc<AtomicU64>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self) -> FrameHandle {
        let handle = FrameHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.due.lock().unwrap_or_else(|e| e.into_inner()).push_back(handle);
        handle
    }

    fn remove(&self, handle: FrameHandle) {
        self.due
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|h| *h != handle);
    }

    /// Take every handle due now. Frames scheduled while the caller
    /// processes these land in the next batch.
    pub fn take_due(&self) -> Vec<FrameHandle> {
        self.due
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.due.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    pub fn len(&self) -> usize {
        self.due.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Scheduler that enqueues handles into a [`FrameQueue`].
pub struct QueuedScheduler {
    queue: FrameQueue,
    waker: Option<Waker>,
}

impl QueuedScheduler {
    pub fn new(queue: FrameQueue) -> Self {
        Self { queue, waker: None }
    }

    /// Call `waker` every time a frame is requested (egui: `request_repaint`)
    pub fn with_waker(queue: FrameQueue, waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            queue,
            waker: Some(Arc::new(waker)),
        }
    }

    pub fn queue(&self) -> &FrameQueue {
        &self.queue
    }
}

impl FrameScheduler for QueuedScheduler {
    fn schedule_next_frame(&mut self) -> FrameHandle {
        let handle = self.queue.push();
        if let Some(ref wake) = self.waker {
            wake();
        }
        handle
    }

    fn cancel_scheduled_frame(&mut self, handle: FrameHandle) {
        self.queue.remove(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_schedule_and_take() {
        let queue = FrameQueue::new();
        let mut sched = QueuedScheduler::new(queue.clone());
        let a = sched.schedule_next_frame();
        let b = sched.schedule_next_frame();
        assert_ne!(a, b);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.take_due(), vec![a, b]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_removes_only_that_handle() {
        let queue = FrameQueue::new();
        let mut sched = QueuedScheduler::new(queue.clone());
        let a = sched.schedule_next_frame();
        let b = sched.schedule_next_frame();
        sched.cancel_scheduled_frame(a);
        sched.cancel_scheduled_frame(FrameHandle(999));
        assert_eq!(queue.take_due(), vec![b]);
    }

    #[test]
    fn test_waker_called_per_schedule() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = Arc::clone(&wakes);
        let mut sched = QueuedScheduler::with_waker(FrameQueue::new(), move || {
            w.fetch_add(1, Ordering::SeqCst);
        });
        sched.schedule_next_frame();
        sched.schedule_next_frame();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
        assert_eq!(sched.queue().len(), 2);
    }
}
