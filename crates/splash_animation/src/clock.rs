//! Time sources
//!
//! Effects read time through the `Clock` trait so tests can drive them with
//! a `ManualClock` and get identical output on every run.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of wall-clock time in milliseconds
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> f64;
}

/// Wall clock: milliseconds since the Unix epoch
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can hold one clone and advance it
/// while the effect reads another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move time forward
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
