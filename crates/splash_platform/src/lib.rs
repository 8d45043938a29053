//! Splash Platform Layer
//!
//! Platform-agnostic event types, a listener registry, and a headless event
//! loop for driving effects without a display.
//!
//! # Architecture
//!
//! - [`EventLoop`] - drives the application and reports [`Event`]s
//! - [`Window`] - window size and pixel ratio
//! - [`EventBus`] - routes events to component listeners, which hold
//!   [`ListenerGuard`]s that unsubscribe on drop
//!
//! # Example
//!
//! ```
//! use splash_platform::*;
//!
//! let bus = EventBus::new();
//! let _guard = bus.handle().subscribe(EventKind::Mouse, |event| {
//!     println!("{:?}", event);
//! });
//!
//! let mut event_loop =
//!     HeadlessEventLoop::new(&WindowConfig::default(), 2, 60.0).unwrap();
//! event_loop.push(1, Event::mouse_moved(10.0, 10.0)).unwrap();
//! event_loop
//!     .run(|event, _window| {
//!         bus.dispatch(&event);
//!         ControlFlow::Continue
//!     })
//!     .unwrap();
//! ```

mod dispatch;
mod error;
mod event;
mod headless;
mod input;
mod window;

// Re-export all public types
pub use dispatch::{EventBus, EventBusHandle, Listener, ListenerGuard, ListenerId};
pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event, EventKind, EventLoop, LifecycleEvent, WindowEvent};
pub use headless::{HeadlessEventLoop, HeadlessWindow, ScriptedEvent};
pub use input::{InputEvent, MouseButton, MouseEvent, TouchEvent, TouchList, TouchPoint};
pub use window::{Window, WindowConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dispatch::{EventBus, EventBusHandle, ListenerGuard};
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, Event, EventKind, EventLoop, WindowEvent};
    pub use crate::input::{InputEvent, MouseEvent, TouchEvent, TouchPoint};
    pub use crate::window::Window;
}
