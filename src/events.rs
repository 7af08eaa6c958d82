//! Visibility event plumbing.

use std::sync::{Arc, Mutex, Weak};

/// Whether the surface hosting the toggle control is currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The surface is visible to the user.
    Visible,
    /// The surface is hidden (minimized, unfocused, covered).
    Hidden,
}

/// Observer notified when visibility changes.
pub trait VisibilityObserver: Send + Sync {
    /// Called with the new visibility state.
    fn visibility_changed(&self, visibility: Visibility);
}

/// Fans visibility changes out to subscribed observers.
///
/// Observers are held weakly, so a dropped observer stops receiving events
/// without unsubscribing. Dropping the [`VisibilitySubscription`] returned by
/// [`subscribe`](VisibilityBus::subscribe) unregisters immediately, so
/// multiple controllers and test teardown do not leak registrations.
///
/// Cloning the bus shares the underlying registration list.
#[derive(Clone, Default)]
pub struct VisibilityBus {
    inner: Arc<Mutex<BusInner>>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    observers: Vec<(u64, Weak<dyn VisibilityObserver>)>,
}

impl VisibilityBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer and hand back its registration guard.
    pub fn subscribe<O>(&self, observer: &Arc<O>) -> VisibilitySubscription
    where
        O: VisibilityObserver + 'static,
    {
        let observer: Arc<dyn VisibilityObserver> = observer.clone();
        let weak: Weak<dyn VisibilityObserver> = Arc::downgrade(&observer);
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.observers.push((id, weak));
        VisibilitySubscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Notify every live observer.
    pub fn publish(&self, visibility: Visibility) {
        // Observers are called outside the lock so they may subscribe or
        // drop subscriptions from inside the callback.
        let observers: Vec<Arc<dyn VisibilityObserver>> = {
            let mut inner = self.inner.lock().unwrap();
            inner.observers.retain(|(_, weak)| weak.strong_count() > 0);
            inner
                .observers
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect()
        };
        for observer in observers {
            observer.visibility_changed(visibility);
        }
    }

    /// Number of currently registered, live observers.
    pub fn observer_count(&self) -> usize {
        let mut inner = self.inner.lock().unwrap();
        inner.observers.retain(|(_, weak)| weak.strong_count() > 0);
        inner.observers.len()
    }
}

/// Keeps a bus registration alive; dropping it unregisters the observer.
#[must_use = "dropping the subscription unregisters the observer"]
pub struct VisibilitySubscription {
    id: u64,
    bus: Weak<Mutex<BusInner>>,
}

impl Drop for VisibilitySubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            if let Ok(mut inner) = inner.lock() {
                inner.observers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
