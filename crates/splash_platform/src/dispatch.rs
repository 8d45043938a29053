//! Event listener registry
//!
//! `EventBus` is the host side of `addEventListener`. Components subscribe
//! through a weak `EventBusHandle` and keep the returned `ListenerGuard`;
//! dropping the guard removes the listener, so teardown can't leak one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::event::{Event, EventKind};

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Callback invoked for matching events
pub type Listener = Box<dyn FnMut(&Event)>;

struct Registration {
    kind: EventKind,
    /// `None` while the listener is executing
    callback: Option<Listener>,
}

#[derive(Default)]
struct BusInner {
    listeners: SlotMap<ListenerId, Registration>,
}

/// Routes platform events to subscribed listeners
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner::default())),
        }
    }

    /// Get a handle to this bus for passing to components
    pub fn handle(&self) -> EventBusHandle {
        EventBusHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every listener of its kind
    ///
    /// Returns the number of listeners that ran. Listeners added during
    /// dispatch first see the next event.
    pub fn dispatch(&self, event: &Event) -> usize {
        let kind = event.kind();
        let ids: Vec<ListenerId> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, reg)| reg.kind == kind)
            .map(|(id, _)| id)
            .collect();

        let mut delivered = 0;
        for id in ids {
            let callback = self
                .inner
                .borrow_mut()
                .listeners
                .get_mut(id)
                .and_then(|reg| reg.callback.take());

            if let Some(mut callback) = callback {
                callback(event);
                delivered += 1;

                if let Some(reg) = self.inner.borrow_mut().listeners.get_mut(id) {
                    reg.callback = Some(callback);
                }
            }
        }

        tracing::trace!("{:?} event delivered to {} listeners", kind, delivered);
        delivered
    }

    /// Total registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Registered listeners of one kind
    pub fn listeners_of(&self, kind: EventKind) -> usize {
        self.inner
            .borrow()
            .listeners
            .values()
            .filter(|reg| reg.kind == kind)
            .count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the event bus
#[derive(Clone)]
pub struct EventBusHandle {
    inner: Weak<RefCell<BusInner>>,
}

impl EventBusHandle {
    /// Listen for events of one kind
    ///
    /// Returns `None` if the bus has been dropped.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> Option<ListenerGuard>
    where
        F: FnMut(&Event) + 'static,
    {
        self.inner.upgrade().map(|inner| {
            let id = inner.borrow_mut().listeners.insert(Registration {
                kind,
                callback: Some(Box::new(listener)),
            });
            tracing::debug!("{:?} listener {:?} added", kind, id);
            ListenerGuard {
                handle: self.clone(),
                id: Some(id),
            }
        })
    }

    /// Remove a listener
    pub fn unsubscribe(&self, id: ListenerId) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.borrow_mut().listeners.remove(id).is_some() {
                tracing::debug!("listener {:?} removed", id);
            }
        }
    }

    /// Whether a listener is still registered
    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().listeners.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the bus is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Owned listener registration, removed on drop
pub struct ListenerGuard {
    handle: EventBusHandle,
    id: Option<ListenerId>,
}

impl ListenerGuard {
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.id
            .map(|id| self.handle.is_subscribed(id))
            .unwrap_or(false)
    }

    /// Remove the listener now
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.unsubscribe(id);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}
