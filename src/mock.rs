//! Mock backends for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::controller::ToggleIndicator;
use crate::error::ControllerError;
use crate::platform::{ReleaseHook, WakeLockHandle, WakeLockProvider};
use crate::store::PreferenceStore;

// =============================================================================
// MockProvider
// =============================================================================

/// A scriptable wake lock provider for testing.
///
/// This allows testing code that depends on [`WakeLockProvider`] without a
/// real platform grant. Clones share state, so a test can keep one clone to
/// inspect and script while the controller owns the other.
///
/// # Example
///
/// ```
/// use staywake_core::{MockProvider, WakeLockHandle, WakeLockProvider};
///
/// let provider = MockProvider::new();
/// let handle = provider.acquire().unwrap();
/// assert!(!handle.is_released());
///
/// provider.revoke_all();
/// assert!(handle.is_released());
/// ```
pub struct MockProvider {
    shared: Arc<ProviderShared>,
}

struct ProviderShared {
    supported: bool,
    deny: AtomicBool,
    fail_release: AtomicBool,
    acquires: AtomicUsize,
    releases: AtomicUsize,
    handles: Mutex<Vec<Arc<HandleShared>>>,
}

struct HandleShared {
    released: AtomicBool,
    hook: Mutex<Option<ReleaseHook>>,
}

impl HandleShared {
    fn mark_released(&self) {
        self.released.store(true, Ordering::SeqCst);
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook();
        }
    }
}

impl MockProvider {
    /// Create a provider that grants every request.
    pub fn new() -> Self {
        Self::with_support(true)
    }

    /// Create a provider whose capability check fails.
    pub fn unsupported() -> Self {
        Self::with_support(false)
    }

    fn with_support(supported: bool) -> Self {
        Self {
            shared: Arc::new(ProviderShared {
                supported,
                deny: AtomicBool::new(false),
                fail_release: AtomicBool::new(false),
                acquires: AtomicUsize::new(0),
                releases: AtomicUsize::new(0),
                handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Make subsequent acquire calls fail with a denial.
    pub fn set_deny(&self, deny: bool) {
        self.shared.deny.store(deny, Ordering::SeqCst);
    }

    /// Make subsequent release calls return an error.
    ///
    /// The handle still transitions to released; only the platform call
    /// "fails".
    pub fn set_fail_release(&self, fail: bool) {
        self.shared.fail_release.store(fail, Ordering::SeqCst);
    }

    /// Number of successful acquire calls so far.
    pub fn acquires(&self) -> usize {
        self.shared.acquires.load(Ordering::SeqCst)
    }

    /// Number of release calls so far.
    pub fn releases(&self) -> usize {
        self.shared.releases.load(Ordering::SeqCst)
    }

    /// Number of handles the platform still considers live.
    pub fn live_handles(&self) -> usize {
        self.shared
            .handles
            .lock()
            .unwrap()
            .iter()
            .filter(|handle| !handle.released.load(Ordering::SeqCst))
            .count()
    }

    /// Revoke every live grant out-of-band, as the platform may do on its
    /// own. Release hooks fire; nothing else is notified.
    pub fn revoke_all(&self) {
        let handles = self.shared.handles.lock().unwrap();
        for handle in handles.iter() {
            if !handle.released.load(Ordering::SeqCst) {
                handle.mark_released();
            }
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl WakeLockProvider for MockProvider {
    fn supported(&self) -> bool {
        self.shared.supported
    }

    fn acquire(&self) -> Result<Box<dyn WakeLockHandle>, ControllerError> {
        if !self.shared.supported {
            return Err(ControllerError::Unsupported);
        }
        if self.shared.deny.load(Ordering::SeqCst) {
            return Err(ControllerError::AcquireDenied("denied by mock".into()));
        }

        self.shared.acquires.fetch_add(1, Ordering::SeqCst);
        let state = Arc::new(HandleShared {
            released: AtomicBool::new(false),
            hook: Mutex::new(None),
        });
        self.shared.handles.lock().unwrap().push(Arc::clone(&state));

        Ok(Box::new(MockHandle {
            state,
            provider: Arc::clone(&self.shared),
        }))
    }
}

struct MockHandle {
    state: Arc<HandleShared>,
    provider: Arc<ProviderShared>,
}

impl WakeLockHandle for MockHandle {
    fn is_released(&self) -> bool {
        self.state.released.load(Ordering::SeqCst)
    }

    fn on_release(&mut self, hook: ReleaseHook) {
        *self.state.hook.lock().unwrap() = Some(hook);
    }

    fn release(self: Box<Self>) -> Result<(), ControllerError> {
        self.provider.releases.fetch_add(1, Ordering::SeqCst);
        if !self.state.released.load(Ordering::SeqCst) {
            self.state.mark_released();
        }
        if self.provider.fail_release.load(Ordering::SeqCst) {
            return Err(ControllerError::ReleaseFailed("mock release failure".into()));
        }
        Ok(())
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// An in-memory preference store.
///
/// Clones share the stored value, so a test can hand one clone to the
/// controller and inspect the other.
pub struct MemoryStore {
    shared: Arc<StoreShared>,
}

struct StoreShared {
    value: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store (no value persisted yet).
    pub fn new() -> Self {
        Self::from_raw(None)
    }

    /// Create a store seeded with a raw persisted string.
    pub fn with_value(value: &str) -> Self {
        Self::from_raw(Some(value.to_string()))
    }

    fn from_raw(value: Option<String>) -> Self {
        Self {
            shared: Arc::new(StoreShared {
                value: Mutex::new(value),
                writes: AtomicUsize::new(0),
            }),
        }
    }

    /// The raw persisted string, if any.
    pub fn stored(&self) -> Option<String> {
        self.shared.value.lock().unwrap().clone()
    }

    /// Number of writes performed so far.
    pub fn writes(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> bool {
        matches!(self.shared.value.lock().unwrap().as_deref(), Some("true"))
    }

    fn save(&mut self, enabled: bool) -> Result<(), ControllerError> {
        let value = if enabled { "true" } else { "false" };
        *self.shared.value.lock().unwrap() = Some(value.to_string());
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// RecordingIndicator
// =============================================================================

/// A toggle indicator that records the visual state it was given.
///
/// Clones share state, so a test can inspect what the controller set.
pub struct RecordingIndicator {
    shared: Arc<IndicatorShared>,
}

struct IndicatorShared {
    active: AtomicBool,
    sets: AtomicUsize,
}

impl RecordingIndicator {
    /// Create an indicator showing inactive.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(IndicatorShared {
                active: AtomicBool::new(false),
                sets: AtomicUsize::new(0),
            }),
        }
    }

    /// The last visual state the controller set.
    pub fn active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Number of times the visual state was set.
    pub fn sets(&self) -> usize {
        self.shared.sets.load(Ordering::SeqCst)
    }
}

impl Default for RecordingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingIndicator {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl ToggleIndicator for RecordingIndicator {
    fn set_active(&mut self, active: bool) {
        self.shared.active.store(active, Ordering::SeqCst);
        self.shared.sets.fetch_add(1, Ordering::SeqCst);
    }
}
