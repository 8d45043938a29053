//! Splash Animation System
//!
//! Frame scheduling, time sources, spring physics and easing.
//!
//! # Features
//!
//! - **Frame Scheduler**: an animation-frame loop with owned, releasable
//!   callback registrations
//! - **Clocks**: wall-clock and manually driven time for deterministic tests
//! - **Spring Physics**: RK4-integrated springs with configurable rest thresholds
//! - **Easing**: CSS-style cubic-bézier curves

pub mod clock;
pub mod easing;
pub mod scheduler;
pub mod spring;

pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::Easing;
pub use scheduler::{
    FrameCallback, FrameCallbackId, FrameInfo, FrameRequest, FrameScheduler, SchedulerHandle,
};
pub use spring::{Spring, SpringConfig};
