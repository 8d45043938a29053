//! Splash Widgets
//!
//! Decorative page widgets driven by the same clock and paint stack as the
//! cursor effect.
//!
//! - [`ScrollProgress`]: spring-smoothed, scroll-linked progress bar
//! - [`Preloader`]: timed loading counter with hold and exit phases

pub mod preloader;
pub mod scroll_progress;

pub use preloader::{Preloader, PreloaderConfig, PreloaderPhase, MIN_TICK_MS};
pub use scroll_progress::{ScrollProgress, ScrollProgressConfig};
