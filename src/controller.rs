//! Wake lock controller implementation.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::error::ControllerError;
use crate::events::{Visibility, VisibilityBus, VisibilityObserver, VisibilitySubscription};
use crate::platform::{WakeLockHandle, WakeLockProvider};
use crate::state::ControllerState;
use crate::store::PreferenceStore;

// =============================================================================
// Toggle Indicator
// =============================================================================

/// Trait for the visual control the controller drives.
///
/// The host UI constructs the control and injects it here; the controller
/// owns its active/inactive state but not its existence.
pub trait ToggleIndicator: Send {
    /// Reflect the enabled/disabled preference on the control.
    fn set_active(&mut self, active: bool);
}

// =============================================================================
// WakeController
// =============================================================================

/// Keeps the display awake while the persisted user preference says so.
///
/// The controller is entirely event-driven: the host forwards clicks on the
/// bound control to [`toggle`](Self::toggle) and publishes window visibility
/// through a [`VisibilityBus`] the controller subscribes to. The preference
/// records intent, independent of whether a lock is currently held; after
/// the platform revokes a grant or the window is hidden, the next
/// visibility event re-acquires.
///
/// # Example
///
/// ```
/// use staywake_core::{MemoryStore, MockProvider, RecordingIndicator, WakeController};
///
/// let indicator = RecordingIndicator::new();
/// let controller = WakeController::new(
///     Some(Box::new(indicator.clone())),
///     Box::new(MemoryStore::new()),
///     Box::new(MockProvider::new()),
/// );
///
/// controller.toggle();
/// assert!(controller.state().holding);
/// assert!(indicator.active());
/// ```
pub struct WakeController {
    provider: Box<dyn WakeLockProvider>,
    inner: Mutex<Inner>,
    inert: bool,
}

struct Inner {
    enabled: bool,
    lock: Option<Box<dyn WakeLockHandle>>,
    store: Box<dyn PreferenceStore>,
    indicator: Option<Box<dyn ToggleIndicator>>,
}

impl WakeController {
    /// Create a controller bound to `indicator`.
    ///
    /// Passing `None` (the control was not found in the host UI) yields an
    /// inert controller: every entry point is a no-op and neither the store
    /// nor any UI state is touched.
    ///
    /// When the persisted preference is on, acquisition is attempted
    /// immediately. A capability-unsupported platform keeps the preference
    /// on (the controller stays pending); a denial reverts and persists the
    /// preference off.
    pub fn new(
        indicator: Option<Box<dyn ToggleIndicator>>,
        store: Box<dyn PreferenceStore>,
        provider: Box<dyn WakeLockProvider>,
    ) -> Arc<Self> {
        let inert = indicator.is_none();
        let enabled = if inert { false } else { store.load() };
        let controller = Arc::new(Self {
            provider,
            inert,
            inner: Mutex::new(Inner {
                enabled,
                lock: None,
                store,
                indicator,
            }),
        });

        if !inert {
            let mut inner = controller.inner.lock().unwrap();
            let enabled = inner.enabled;
            if let Some(indicator) = inner.indicator.as_mut() {
                indicator.set_active(enabled);
            }
            if enabled {
                controller.restore(&mut inner);
            }
        }

        controller
    }

    /// Subscribe this controller to visibility events on `bus`.
    ///
    /// Dropping the returned subscription (or the controller itself)
    /// unregisters.
    pub fn watch_visibility(self: &Arc<Self>, bus: &VisibilityBus) -> VisibilitySubscription {
        bus.subscribe(self)
    }

    /// Handle a click on the bound control.
    ///
    /// Off → on attempts acquisition; a failure of any kind reverts and
    /// persists the preference off rather than leaving it "wanting but
    /// failing". On → off releases the held lock, ignoring release errors.
    pub fn toggle(&self) {
        if self.inert {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        if inner.enabled {
            self.disable(&mut inner);
        } else {
            match self.try_acquire(&mut inner) {
                Ok(()) => {
                    debug!("wake lock acquired");
                    self.set_enabled(&mut inner, true);
                }
                Err(err) => {
                    warn!("failed to acquire wake lock: {}", err);
                    self.set_enabled(&mut inner, false);
                }
            }
        }
    }

    /// Get a snapshot of the current controller state.
    pub fn state(&self) -> ControllerState {
        if self.inert {
            return ControllerState::default();
        }
        let inner = self.inner.lock().unwrap();
        ControllerState {
            enabled: inner.enabled,
            holding: Self::holding(&inner),
        }
    }

    /// Startup acquisition for a preference restored as on.
    ///
    /// An unsupported capability keeps the preference on so a capable
    /// session can pick it up later; a denial reverts it like a failed user
    /// toggle would.
    fn restore(&self, inner: &mut Inner) {
        match self.try_acquire(inner) {
            Ok(()) => debug!("wake lock restored from saved preference"),
            Err(ControllerError::Unsupported) => {
                warn!("wake locks are not supported here; keeping the saved preference");
            }
            Err(err) => {
                warn!("failed to restore wake lock: {}", err);
                self.set_enabled(inner, false);
            }
        }
    }

    /// Acquire a lock if none is live. No-op when one is already held.
    fn try_acquire(&self, inner: &mut Inner) -> Result<(), ControllerError> {
        if Self::holding(inner) {
            return Ok(());
        }
        if !self.provider.supported() {
            return Err(ControllerError::Unsupported);
        }
        let mut handle = self.provider.acquire()?;
        handle.on_release(Box::new(|| info!("wake lock released by the platform")));
        inner.lock = Some(handle);
        Ok(())
    }

    /// Release any held lock and turn the preference off.
    ///
    /// The grant is treated as gone even if the platform call errors;
    /// releasing with no handle held is a no-op.
    fn disable(&self, inner: &mut Inner) {
        if let Some(handle) = inner.lock.take() {
            match handle.release() {
                Ok(()) => debug!("wake lock released"),
                Err(err) => warn!("failed to release wake lock: {}", err),
            }
        }
        self.set_enabled(inner, false);
    }

    /// Record the preference, persisting only on change, and refresh the
    /// indicator.
    fn set_enabled(&self, inner: &mut Inner, enabled: bool) {
        if inner.enabled != enabled {
            inner.enabled = enabled;
            if let Err(err) = inner.store.save(enabled) {
                warn!("failed to persist wake preference: {}", err);
            }
        }
        if let Some(indicator) = inner.indicator.as_mut() {
            indicator.set_active(enabled);
        }
    }

    fn holding(inner: &Inner) -> bool {
        inner.lock.as_ref().is_some_and(|handle| !handle.is_released())
    }
}

impl VisibilityObserver for WakeController {
    /// Re-acquire on becoming visible when the preference is on and no live
    /// lock is held. Unlike a user toggle, a failure here leaves the
    /// preference untouched so the next visibility event retries.
    fn visibility_changed(&self, visibility: Visibility) {
        if self.inert || visibility != Visibility::Visible {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        if !inner.enabled || Self::holding(&inner) {
            return;
        }
        match self.try_acquire(&mut inner) {
            Ok(()) => {
                debug!("wake lock re-acquired after visibility change");
                self.set_enabled(&mut inner, true);
            }
            Err(err) => warn!("failed to re-acquire wake lock: {}", err),
        }
    }
}
