//! Controller state snapshot.

/// The controller's position in its enable/acquire lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Preference off, no lock held.
    Disabled,
    /// Preference on and a live wake lock is held.
    Active,
    /// Preference on but no live lock is held. The window is hidden, the
    /// platform revoked the grant, or an acquire attempt failed; the next
    /// visibility event retries.
    Pending,
}

/// A snapshot of the controller's current state.
///
/// Use [`WakeController::state`](crate::WakeController::state) to obtain a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// The user's persisted intent: keep the display awake or not.
    pub enabled: bool,
    /// Whether a live (non-revoked) wake lock is currently held.
    pub holding: bool,
}

impl ControllerState {
    /// Derive the lifecycle state from the snapshot.
    pub fn lock_state(&self) -> LockState {
        match (self.enabled, self.holding) {
            (false, _) => LockState::Disabled,
            (true, true) => LockState::Active,
            (true, false) => LockState::Pending,
        }
    }
}
