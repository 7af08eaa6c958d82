//! Keep-the-display-awake toggle controller.
//!
//! This crate implements the stateful half of a "keep my screen on" toggle:
//! a controller that tracks one persisted boolean preference, holds at most
//! one platform wake lock grant, and recovers after the platform revokes
//! the grant or the hosting window regains visibility.
//!
//! The platform grant, the persistence layer, and the visual control are
//! all injected, so the controller runs unchanged against the session
//! screen saver service on Linux, the execution state API on Windows, or
//! in-memory mocks in tests.
//!
//! # Example
//!
//! ```no_run
//! use staywake_core::{system_provider, FileStore, Visibility, VisibilityBus, WakeController};
//! use staywake_core::ToggleIndicator;
//!
//! struct Light;
//! impl ToggleIndicator for Light {
//!     fn set_active(&mut self, active: bool) {
//!         println!("keep-awake indicator: {}", active);
//!     }
//! }
//!
//! fn main() -> Result<(), staywake_core::ControllerError> {
//!     // Create the controller; a saved "on" preference re-acquires now.
//!     let controller = WakeController::new(
//!         Some(Box::new(Light)),
//!         Box::new(FileStore::new()?),
//!         system_provider(),
//!     );
//!
//!     // Wire it to the host's visibility events.
//!     let bus = VisibilityBus::new();
//!     let _subscription = controller.watch_visibility(&bus);
//!
//!     // Forward clicks on the control.
//!     controller.toggle();
//!
//!     // The host publishes visibility changes as they happen.
//!     bus.publish(Visibility::Visible);
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use the mock backends to test without a real platform:
//!
//! ```
//! use staywake_core::{MemoryStore, MockProvider, RecordingIndicator, WakeController};
//!
//! let provider = MockProvider::new();
//! let controller = WakeController::new(
//!     Some(Box::new(RecordingIndicator::new())),
//!     Box::new(MemoryStore::new()),
//!     Box::new(provider.clone()),
//! );
//! controller.toggle();
//! assert_eq!(provider.acquires(), 1);
//! ```

#![warn(missing_docs)]

mod controller;
#[cfg(target_os = "linux")]
mod dbus;
mod error;
mod events;
mod mock;
mod platform;
mod state;
mod store;
#[cfg(windows)]
mod win;

// Re-export public API
pub use controller::{ToggleIndicator, WakeController};
pub use error::ControllerError;
pub use events::{Visibility, VisibilityBus, VisibilityObserver, VisibilitySubscription};
pub use mock::{MemoryStore, MockProvider, RecordingIndicator};
pub use platform::{
    ReleaseHook, UnsupportedProvider, WakeLockHandle, WakeLockProvider, system_provider,
};
pub use state::{ControllerState, LockState};
pub use store::{FileStore, PreferenceStore, PREFERENCE_KEY};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct Harness {
        controller: Arc<WakeController>,
        provider: MockProvider,
        store: MemoryStore,
        indicator: RecordingIndicator,
    }

    fn harness(provider: MockProvider, store: MemoryStore) -> Harness {
        let indicator = RecordingIndicator::new();
        let controller = WakeController::new(
            Some(Box::new(indicator.clone())),
            Box::new(store.clone()),
            Box::new(provider.clone()),
        );
        Harness {
            controller,
            provider,
            store,
            indicator,
        }
    }

    #[test]
    fn clicks_alternate_and_persist_intent() {
        let h = harness(MockProvider::new(), MemoryStore::new());
        assert_eq!(h.controller.state().lock_state(), LockState::Disabled);

        h.controller.toggle();
        assert_eq!(h.controller.state().lock_state(), LockState::Active);
        assert_eq!(h.store.stored().as_deref(), Some("true"));
        assert!(h.indicator.active());

        h.controller.toggle();
        assert_eq!(h.controller.state().lock_state(), LockState::Disabled);
        assert_eq!(h.store.stored().as_deref(), Some("false"));
        assert!(!h.indicator.active());
        assert_eq!(h.provider.releases(), 1);

        h.controller.toggle();
        assert_eq!(h.controller.state().lock_state(), LockState::Active);
        assert_eq!(h.store.stored().as_deref(), Some("true"));
    }

    #[test]
    fn denied_enable_reverts_preference() {
        let provider = MockProvider::new();
        provider.set_deny(true);
        let h = harness(provider, MemoryStore::new());

        h.controller.toggle();
        let state = h.controller.state();
        assert!(!state.enabled);
        assert!(!state.holding);
        assert!(!h.indicator.active());
    }

    #[test]
    fn unsupported_enable_reverts_preference() {
        let h = harness(MockProvider::unsupported(), MemoryStore::new());

        h.controller.toggle();
        let state = h.controller.state();
        assert!(!state.enabled);
        assert!(!state.holding);
        assert_eq!(h.provider.acquires(), 0);
    }

    #[test]
    fn visibility_reacquire_failure_keeps_preference() {
        let h = harness(MockProvider::new(), MemoryStore::new());
        let bus = VisibilityBus::new();
        let _subscription = h.controller.watch_visibility(&bus);

        h.controller.toggle();
        h.provider.revoke_all();
        assert_eq!(h.controller.state().lock_state(), LockState::Pending);

        h.provider.set_deny(true);
        bus.publish(Visibility::Visible);
        let state = h.controller.state();
        assert!(state.enabled);
        assert!(!state.holding);
        assert_eq!(h.store.stored().as_deref(), Some("true"));

        // A later visibility event still retries, and can succeed.
        h.provider.set_deny(false);
        bus.publish(Visibility::Visible);
        assert_eq!(h.controller.state().lock_state(), LockState::Active);
    }

    #[test]
    fn revocation_waits_for_visibility() {
        let h = harness(MockProvider::new(), MemoryStore::new());
        let bus = VisibilityBus::new();
        let _subscription = h.controller.watch_visibility(&bus);

        h.controller.toggle();
        let writes_before = h.store.writes();

        h.provider.revoke_all();
        assert_eq!(h.controller.state().lock_state(), LockState::Pending);
        // Revocation itself changes neither persistence nor the control.
        assert_eq!(h.store.writes(), writes_before);
        assert!(h.indicator.active());

        bus.publish(Visibility::Visible);
        assert_eq!(h.controller.state().lock_state(), LockState::Active);
        assert_eq!(h.provider.acquires(), 2);
    }

    #[test]
    fn hidden_events_do_not_acquire() {
        let h = harness(MockProvider::new(), MemoryStore::with_value("true"));
        let bus = VisibilityBus::new();
        let _subscription = h.controller.watch_visibility(&bus);

        h.provider.revoke_all();
        bus.publish(Visibility::Hidden);
        assert_eq!(h.controller.state().lock_state(), LockState::Pending);
        assert_eq!(h.provider.acquires(), 1);
    }

    #[test]
    fn disabling_without_a_handle_is_harmless() {
        // An unsupported platform leaves a restored preference pending with
        // no handle; toggling off from there must not panic or release.
        let h = harness(MockProvider::unsupported(), MemoryStore::with_value("true"));
        assert_eq!(h.controller.state().lock_state(), LockState::Pending);

        h.controller.toggle();
        assert_eq!(h.controller.state().lock_state(), LockState::Disabled);
        assert_eq!(h.store.stored().as_deref(), Some("false"));
        assert_eq!(h.provider.releases(), 0);
    }

    #[test]
    fn missing_control_is_inert() {
        let provider = MockProvider::new();
        let store = MemoryStore::with_value("true");
        let controller =
            WakeController::new(None, Box::new(store.clone()), Box::new(provider.clone()));

        controller.toggle();
        let bus = VisibilityBus::new();
        let _subscription = controller.watch_visibility(&bus);
        bus.publish(Visibility::Visible);

        assert_eq!(controller.state(), ControllerState::default());
        assert_eq!(store.writes(), 0);
        assert_eq!(provider.acquires(), 0);
    }

    #[test]
    fn restore_success_needs_no_write() {
        let h = harness(MockProvider::new(), MemoryStore::with_value("true"));

        let state = h.controller.state();
        assert!(state.enabled);
        assert!(state.holding);
        assert!(h.indicator.active());
        assert_eq!(h.store.writes(), 0);
        assert_eq!(h.store.stored().as_deref(), Some("true"));
    }

    #[test]
    fn restore_denial_persists_false() {
        let provider = MockProvider::new();
        provider.set_deny(true);
        let h = harness(provider, MemoryStore::with_value("true"));

        assert_eq!(h.controller.state().lock_state(), LockState::Disabled);
        assert_eq!(h.store.stored().as_deref(), Some("false"));
        assert!(!h.indicator.active());
    }

    #[test]
    fn restore_on_unsupported_platform_stays_pending() {
        let h = harness(MockProvider::unsupported(), MemoryStore::with_value("true"));

        assert_eq!(h.controller.state().lock_state(), LockState::Pending);
        assert_eq!(h.store.stored().as_deref(), Some("true"));
        assert_eq!(h.store.writes(), 0);
    }

    #[test]
    fn release_failure_still_disables() {
        let h = harness(MockProvider::new(), MemoryStore::new());
        h.controller.toggle();
        h.provider.set_fail_release(true);

        h.controller.toggle();
        assert_eq!(h.controller.state().lock_state(), LockState::Disabled);
        assert_eq!(h.store.stored().as_deref(), Some("false"));
        assert!(!h.indicator.active());
        assert_eq!(h.provider.live_handles(), 0);
    }

    #[test]
    fn unrecognized_stored_value_reads_disabled() {
        let h = harness(MockProvider::new(), MemoryStore::with_value("yes"));

        assert_eq!(h.controller.state().lock_state(), LockState::Disabled);
        assert_eq!(h.provider.acquires(), 0);
    }

    #[test]
    fn visible_while_holding_is_idempotent() {
        let h = harness(MockProvider::new(), MemoryStore::with_value("true"));
        let bus = VisibilityBus::new();
        let _subscription = h.controller.watch_visibility(&bus);

        bus.publish(Visibility::Visible);
        bus.publish(Visibility::Visible);
        assert_eq!(h.provider.acquires(), 1);
        assert_eq!(h.controller.state().lock_state(), LockState::Active);
    }
}
