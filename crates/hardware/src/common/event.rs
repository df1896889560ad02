//! Per-Instance Event Listener Registry.
//!
//! Each engine owns an `EventBus` whose listener set lives and dies with the engine
//! instance; there is no global dispatcher. It provides:
//! 1. **Subscription:** Register a callback and receive a `ListenerId` handle.
//! 2. **Removal:** Unsubscribe a single listener or drop them all.
//! 3. **Delivery:** Synchronous, in-order delivery of shared references, so a
//!    listener can observe an event but never mutate the engine that emitted it.

use std::fmt;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Ordered set of event listeners for one engine instance.
pub struct EventBus<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_id: u64,
}

impl<E> EventBus<E> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a listener.
    ///
    /// # Arguments
    ///
    /// * `listener` - Callback invoked with every subsequently emitted event.
    ///
    /// # Returns
    ///
    /// A handle that can be passed to [`EventBus::unsubscribe`].
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener.
    ///
    /// # Returns
    ///
    /// `true` if the listener was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Returns `true` if at least one listener is registered.
    ///
    /// Engines check this before building snapshots for an event.
    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Delivers an event to every listener in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
