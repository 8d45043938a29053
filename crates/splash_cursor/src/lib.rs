//! Splash Cursor
//!
//! A pointer-trail particle effect. Pointer and touch movement splat short
//! lived, softly glowing particles onto a canvas that fades rather than
//! clears, leaving colored trails behind the cursor.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use splash_animation::{FrameScheduler, ManualClock};
//! use splash_cursor::{seeded_rng, SplashConfig, SplashCursor};
//! use splash_paint::{HeadlessSurface, Rect};
//! use splash_platform::{Event, EventBus};
//!
//! let clock = ManualClock::new(0.0);
//! let scheduler = FrameScheduler::new(Rc::new(clock.clone()));
//! let bus = EventBus::new();
//! let surface = HeadlessSurface::new(Rect::new(0.0, 0.0, 800.0, 600.0), 2.0);
//!
//! let cursor = SplashCursor::mount(
//!     surface,
//!     &scheduler.handle(),
//!     &bus.handle(),
//!     &SplashConfig::default(),
//!     seeded_rng(Some(42)),
//!     Rc::new(clock.clone()),
//! );
//!
//! bus.dispatch(&Event::mouse_moved(400.0, 300.0));
//! scheduler.tick();
//! assert_eq!(cursor.live_count(), 3);
//! ```

pub mod config;
pub mod cursor;
pub mod emitter;
pub mod error;
pub mod particle;
pub mod render;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use config::{EmitterParams, ParticleConfig, SplashConfig, Timestep};
pub use cursor::{SplashCursor, ENTER_FORCE, MOVE_FORCE, TOUCH_FORCE};
pub use emitter::{EmitterStats, ParticleEmitter};
pub use error::{Result, SplashError};
pub use particle::Particle;

/// Random source for the emitter
///
/// A fixed seed gives identical trails on every run; `None` seeds from the
/// operating system.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
