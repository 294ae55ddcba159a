//! Subscriber registry shared by the cart and auth stores.

use core::fmt;

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Box<dyn Fn(&E) + Send + Sync>;

/// A list of callbacks notified, in subscription order, with every event.
pub struct Listeners<E> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Listeners<E> {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    /// Register a callback.
    pub fn subscribe(&mut self, callback: impl Fn(&E) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sid, _)| *sid != id);
        self.callbacks.len() != before
    }

    /// Deliver `event` to every subscriber.
    pub fn notify(&self, event: &E) {
        for (_, callback) in &self.callbacks {
            callback(event);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_notify_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::new();

        let first = Arc::clone(&seen);
        listeners.subscribe(move |n: &u32| {
            first
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(("first", *n));
        });
        let second = Arc::clone(&seen);
        listeners.subscribe(move |n: &u32| {
            second
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(("second", *n));
        });

        listeners.notify(&7);

        let seen = seen.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(*seen, vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut listeners: Listeners<()> = Listeners::new();
        let id = listeners.subscribe(|()| {});
        assert_eq!(listeners.len(), 1);
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        assert!(listeners.is_empty());
    }
}
