//! Platform wake lock backends.

use crate::error::ControllerError;

/// Callback invoked when the platform reports a grant released.
pub type ReleaseHook = Box<dyn Fn() + Send + Sync>;

/// Trait for platform wake lock implementations.
///
/// This allows for mock implementations in tests.
pub trait WakeLockProvider: Send + Sync {
    /// Whether this platform can keep the display awake at all.
    fn supported(&self) -> bool;

    /// Request a new display wake lock grant.
    fn acquire(&self) -> Result<Box<dyn WakeLockHandle>, ControllerError>;
}

/// A live, revocable display wake lock grant.
pub trait WakeLockHandle: Send {
    /// Whether the platform has stopped honoring this grant.
    ///
    /// The platform may revoke a grant out-of-band; this flips without any
    /// call made through the handle.
    fn is_released(&self) -> bool;

    /// Register a hook fired when the grant is released.
    ///
    /// The hook is observed for diagnostics only and must not drive state
    /// transitions.
    fn on_release(&mut self, hook: ReleaseHook);

    /// Give the grant back to the platform.
    fn release(self: Box<Self>) -> Result<(), ControllerError>;
}

/// Provider for platforms with no wake lock capability.
pub struct UnsupportedProvider;

impl WakeLockProvider for UnsupportedProvider {
    fn supported(&self) -> bool {
        false
    }

    fn acquire(&self) -> Result<Box<dyn WakeLockHandle>, ControllerError> {
        Err(ControllerError::Unsupported)
    }
}

/// The wake lock provider for the current platform.
///
/// Linux talks to the session screen saver service over D-Bus; Windows uses
/// the thread execution state API. Everything else gets
/// [`UnsupportedProvider`].
pub fn system_provider() -> Box<dyn WakeLockProvider> {
    #[cfg(target_os = "linux")]
    {
        Box::new(crate::dbus::ScreenSaverInhibitor::new())
    }
    #[cfg(windows)]
    {
        Box::new(crate::win::ExecutionStateProvider)
    }
    #[cfg(not(any(target_os = "linux", windows)))]
    {
        Box::new(UnsupportedProvider)
    }
}
