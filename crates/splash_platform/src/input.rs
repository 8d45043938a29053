//! Input event types for mouse, touch, and scroll

use smallvec::SmallVec;

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Touch event (mobile/touchscreen)
    Touch(TouchEvent),
    /// Page scrolled
    Scroll {
        /// Vertical scroll offset of the page
        scroll_y: f32,
        /// Total height of the scrollable content
        content_height: f32,
    },
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events
#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    /// Mouse moved to position
    Moved {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
    },
    /// Mouse entered the window at position
    Entered {
        /// X position in window coordinates
        x: f32,
        /// Y position in window coordinates
        y: f32,
    },
    /// Mouse left the window
    Left,
    /// Mouse button pressed
    ButtonPressed {
        button: MouseButton,
        x: f32,
        y: f32,
    },
    /// Mouse button released
    ButtonReleased {
        button: MouseButton,
        x: f32,
        y: f32,
    },
}

impl MouseEvent {
    /// Position carried by the event, if any
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            MouseEvent::Moved { x, y }
            | MouseEvent::Entered { x, y }
            | MouseEvent::ButtonPressed { x, y, .. }
            | MouseEvent::ButtonReleased { x, y, .. } => Some((*x, *y)),
            MouseEvent::Left => None,
        }
    }
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

// ============================================================================
// Touch Events
// ============================================================================

/// One active contact on a touchscreen
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    /// Unique identifier for this touch
    pub id: u64,
    /// X position in window coordinates
    pub x: f32,
    /// Y position in window coordinates
    pub y: f32,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

/// Active touch points; most gestures use four or fewer
pub type TouchList = SmallVec<[TouchPoint; 4]>;

/// Touch events for touchscreens
///
/// Every variant carries the full list of touches still on the surface,
/// the way browsers report `TouchEvent.touches`.
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// A touch started
    Started { touches: TouchList },
    /// One or more touches moved
    Moved { touches: TouchList },
    /// A touch ended
    Ended { touches: TouchList },
    /// Touches were cancelled (e.g., by system gesture)
    Cancelled,
}

impl TouchEvent {
    /// Build a move event from points
    pub fn moved(points: impl IntoIterator<Item = TouchPoint>) -> Self {
        TouchEvent::Moved {
            touches: points.into_iter().collect(),
        }
    }

    /// All active touches
    pub fn touches(&self) -> &[TouchPoint] {
        match self {
            TouchEvent::Started { touches }
            | TouchEvent::Moved { touches }
            | TouchEvent::Ended { touches } => touches.as_slice(),
            TouchEvent::Cancelled => &[],
        }
    }

    /// The first active touch
    pub fn primary(&self) -> Option<&TouchPoint> {
        self.touches().first()
    }
}
