//! Host events and the loop that delivers them

use crate::error::PlatformError;
use crate::input::{InputEvent, MouseEvent};
use crate::window::Window;

/// Something that pumps host events into a handler
///
/// A browser, a native window or the headless script all look the same to
/// the effects behind this trait.
pub trait EventLoop {
    type Window: Window;

    /// Deliver events until the source runs dry or the handler returns
    /// [`ControlFlow::Exit`]
    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow;
}

/// Handler verdict after each event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    #[default]
    Continue,
    Exit,
}

/// Everything a host can tell an effect
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Window(WindowEvent),
    /// Pointer, touch and scroll input
    Input(InputEvent),
    Lifecycle(LifecycleEvent),
    /// Display refresh: animation callbacks run now
    Frame,
}

impl Event {
    /// Coarse category used for listener routing
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Window(_) => EventKind::Window,
            Event::Input(InputEvent::Mouse(_)) => EventKind::Mouse,
            Event::Input(InputEvent::Touch(_)) => EventKind::Touch,
            Event::Input(InputEvent::Scroll { .. }) => EventKind::Scroll,
            Event::Lifecycle(_) => EventKind::Lifecycle,
            Event::Frame => EventKind::Frame,
        }
    }

    /// Shorthand for a mouse-move input event
    pub fn mouse_moved(x: f32, y: f32) -> Self {
        Event::Input(InputEvent::Mouse(MouseEvent::Moved { x, y }))
    }
}

/// Event categories a listener can subscribe to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Window,
    Mouse,
    Touch,
    Scroll,
    Lifecycle,
    Frame,
}

/// Window events
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// Viewport changed size, in logical pixels
    Resized { width: f32, height: f32 },
    /// Device pixel ratio changed, e.g. the window moved between monitors
    ScaleFactorChanged { scale_factor: f64 },
    Focused(bool),
    CloseRequested,
}

/// Page visibility changes
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    /// Page visible again
    Resumed,
    /// Page hidden
    Suspended,
}
