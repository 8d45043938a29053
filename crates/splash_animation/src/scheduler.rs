//! Frame scheduler
//!
//! The host's animation-frame source. Components register a frame callback
//! and receive a `FrameRequest` guard; the callback runs once per `tick()`
//! until the guard is dropped or cancelled.
//!
//! The scheduler is single-threaded. Callbacks run with the scheduler's
//! state unborrowed, so a callback may cancel itself or register new
//! callbacks; those take effect from the next tick.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::clock::{Clock, SystemClock};

new_key_type! {
    /// Handle to a registered frame callback
    pub struct FrameCallbackId;
}

/// Timing information passed to every frame callback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInfo {
    /// 1-based index of this tick
    pub frame: u64,
    /// Time of this tick in milliseconds
    pub timestamp_ms: f64,
    /// Milliseconds since the previous tick (0 for the first)
    pub delta_ms: f64,
}

/// Callback invoked once per frame
pub type FrameCallback = Box<dyn FnMut(&FrameInfo)>;

/// Internal state of the frame scheduler
struct SchedulerInner {
    /// `None` while the callback is executing
    callbacks: SlotMap<FrameCallbackId, Option<FrameCallback>>,
    frame: u64,
    last_timestamp: Option<f64>,
}

/// Drives registered frame callbacks once per display refresh
///
/// Typically owned by the host event loop and shared with components via
/// `SchedulerHandle`.
pub struct FrameScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
    clock: Rc<dyn Clock>,
}

impl FrameScheduler {
    /// Create a scheduler timed by the given clock
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                callbacks: SlotMap::with_key(),
                frame: 0,
                last_timestamp: None,
            })),
            clock,
        }
    }

    /// Create a scheduler timed by the wall clock
    pub fn with_system_clock() -> Self {
        Self::new(Rc::new(SystemClock))
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run one frame at the clock's current time
    ///
    /// Returns the number of callbacks that ran.
    pub fn tick(&self) -> usize {
        self.tick_at(self.clock.now_ms())
    }

    /// Run one frame at an explicit timestamp
    pub fn tick_at(&self, timestamp_ms: f64) -> usize {
        let (info, ids) = {
            let mut inner = self.inner.borrow_mut();
            inner.frame += 1;
            let delta_ms = inner
                .last_timestamp
                .map(|last| (timestamp_ms - last).max(0.0))
                .unwrap_or(0.0);
            inner.last_timestamp = Some(timestamp_ms);

            let info = FrameInfo {
                frame: inner.frame,
                timestamp_ms,
                delta_ms,
            };
            let ids: Vec<FrameCallbackId> = inner.callbacks.keys().collect();
            (info, ids)
        };

        let mut ran = 0;
        for id in ids {
            // Take the callback out so it can touch the scheduler re-entrantly
            let callback = self
                .inner
                .borrow_mut()
                .callbacks
                .get_mut(id)
                .and_then(Option::take);

            if let Some(mut callback) = callback {
                callback(&info);
                ran += 1;

                // Put it back unless it was cancelled while running
                if let Some(slot) = self.inner.borrow_mut().callbacks.get_mut(id) {
                    *slot = Some(callback);
                }
            }
        }

        if info.frame % 600 == 0 {
            tracing::trace!("frame {}: {} callbacks", info.frame, ran);
        }

        ran
    }

    /// Number of registered callbacks
    pub fn callback_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    /// Whether any callback wants frames
    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().callbacks.is_empty()
    }

    /// Number of ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

/// A weak handle to the frame scheduler
///
/// It won't keep the scheduler alive; every operation no-ops once the
/// scheduler is dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a callback to run on every frame
    ///
    /// Returns `None` if the scheduler has been dropped.
    pub fn request_frames<F>(&self, callback: F) -> Option<FrameRequest>
    where
        F: FnMut(&FrameInfo) + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner
                .borrow_mut()
                .callbacks
                .insert(Some(Box::new(callback)));
            tracing::debug!("frame callback {:?} registered", id);
            FrameRequest {
                handle: self.clone(),
                id: Some(id),
            }
        })
    }

    /// Remove a callback
    pub fn cancel(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.borrow_mut().callbacks.remove(id).is_some() {
                tracing::debug!("frame callback {:?} cancelled", id);
            }
        }
    }

    /// Whether a callback is still registered
    pub fn is_registered(&self, id: FrameCallbackId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().callbacks.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Owned registration of a frame callback
///
/// Dropping the request cancels the callback.
pub struct FrameRequest {
    handle: SchedulerHandle,
    id: Option<FrameCallbackId>,
}

impl FrameRequest {
    /// The callback's id (None after `cancel`)
    pub fn id(&self) -> Option<FrameCallbackId> {
        self.id
    }

    /// Whether the callback is still scheduled
    pub fn is_active(&self) -> bool {
        self.id
            .map(|id| self.handle.is_registered(id))
            .unwrap_or(false)
    }

    /// Cancel the callback now
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.cancel(id);
        }
    }
}

impl Drop for FrameRequest {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for FrameRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRequest").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::cell::Cell;

    fn scheduler() -> (FrameScheduler, ManualClock) {
        let clock = ManualClock::new(0.0);
        (FrameScheduler::new(Rc::new(clock.clone())), clock)
    }

    #[test]
    fn test_callback_runs_each_tick() {
        let (scheduler, _) = scheduler();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();

        let _request = scheduler
            .handle()
            .request_frames(move |_| c.set(c.get() + 1))
            .unwrap();

        scheduler.tick();
        scheduler.tick();
        scheduler.tick();
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.frame_count(), 3);
    }

    #[test]
    fn test_drop_request_cancels() {
        let (scheduler, _) = scheduler();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();

        let request = scheduler
            .handle()
            .request_frames(move |_| c.set(c.get() + 1))
            .unwrap();
        assert!(request.is_active());
        scheduler.tick();

        drop(request);
        assert_eq!(scheduler.callback_count(), 0);
        assert!(!scheduler.has_pending());
        scheduler.tick();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_frame_info_deltas() {
        let (scheduler, clock) = scheduler();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _request = scheduler
            .handle()
            .request_frames(move |info| s.borrow_mut().push(*info))
            .unwrap();

        scheduler.tick();
        clock.advance(16.0);
        scheduler.tick();
        clock.advance(8.0);
        scheduler.tick();

        let seen = seen.borrow();
        assert_eq!(seen[0].delta_ms, 0.0);
        assert_eq!(seen[1].delta_ms, 16.0);
        assert_eq!(seen[2].delta_ms, 8.0);
        assert_eq!(seen[2].frame, 3);
        assert_eq!(seen[2].timestamp_ms, 24.0);
    }

    #[test]
    fn test_callback_can_cancel_itself() {
        let (scheduler, _) = scheduler();
        let handle = scheduler.handle();
        let slot: Rc<RefCell<Option<FrameRequest>>> = Rc::new(RefCell::new(None));
        let runs = Rc::new(Cell::new(0));

        let s = slot.clone();
        let r = runs.clone();
        let request = handle
            .request_frames(move |_| {
                r.set(r.get() + 1);
                // Dropping our own request mid-callback
                s.borrow_mut().take();
            })
            .unwrap();
        *slot.borrow_mut() = Some(request);

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(scheduler.tick(), 0);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_registration_during_tick_starts_next_frame() {
        let (scheduler, _) = scheduler();
        let handle = scheduler.handle();
        let late = Rc::new(Cell::new(0));
        let keep: Rc<RefCell<Vec<FrameRequest>>> = Rc::new(RefCell::new(Vec::new()));

        let h = handle.clone();
        let l = late.clone();
        let k = keep.clone();
        let _outer = handle
            .request_frames(move |_| {
                if k.borrow().is_empty() {
                    let l = l.clone();
                    if let Some(req) = h.request_frames(move |_| l.set(l.get() + 1)) {
                        k.borrow_mut().push(req);
                    }
                }
            })
            .unwrap();

        scheduler.tick();
        assert_eq!(late.get(), 0);
        scheduler.tick();
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let (scheduler, _) = scheduler();
            scheduler.handle()
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());

        // Operations should safely no-op
        assert!(handle.request_frames(|_| {}).is_none());
    }

    #[test]
    fn test_request_outlives_scheduler() {
        let (scheduler, _) = scheduler();
        let mut request = scheduler.handle().request_frames(|_| {}).unwrap();
        drop(scheduler);
        assert!(!request.is_active());
        request.cancel();
        assert!(request.id().is_none());
    }
}
