//! Linux wake lock backend over the `org.freedesktop.ScreenSaver` D-Bus
//! interface on the session bus.

use log::debug;
use zbus::blocking::Connection;
use zbus::dbus_proxy;

use crate::error::ControllerError;
use crate::platform::{ReleaseHook, WakeLockHandle, WakeLockProvider};

const APP_NAME: &str = "staywake";
const REASON: &str = "user asked to keep the display awake";

#[dbus_proxy(
    interface = "org.freedesktop.ScreenSaver",
    default_service = "org.freedesktop.ScreenSaver",
    default_path = "/org/freedesktop/ScreenSaver",
    gen_async = false
)]
trait ScreenSaver {
    fn inhibit(&self, application_name: &str, reason_for_inhibit: &str) -> zbus::Result<u32>;

    fn un_inhibit(&self, cookie: u32) -> zbus::Result<()>;
}

/// Wake lock provider backed by the session screen saver service.
pub struct ScreenSaverInhibitor;

impl ScreenSaverInhibitor {
    /// Create the provider.
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScreenSaverInhibitor {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeLockProvider for ScreenSaverInhibitor {
    fn supported(&self) -> bool {
        Connection::session().is_ok()
    }

    fn acquire(&self) -> Result<Box<dyn WakeLockHandle>, ControllerError> {
        let connection = Connection::session()
            .map_err(|err| ControllerError::AcquireDenied(err.to_string()))?;
        let proxy = ScreenSaverProxy::new(&connection)
            .map_err(|err| ControllerError::AcquireDenied(err.to_string()))?;
        let cookie = proxy
            .inhibit(APP_NAME, REASON)
            .map_err(|err| ControllerError::AcquireDenied(err.to_string()))?;
        debug!("screen saver inhibited, cookie {}", cookie);

        Ok(Box::new(InhibitHandle {
            proxy,
            cookie,
            released: false,
            hook: None,
        }))
    }
}

struct InhibitHandle {
    proxy: ScreenSaverProxy<'static>,
    cookie: u32,
    released: bool,
    hook: Option<ReleaseHook>,
}

impl WakeLockHandle for InhibitHandle {
    fn is_released(&self) -> bool {
        // The screen saver service keeps the inhibition until UnInhibit or
        // until this connection dies; it never revokes out-of-band.
        self.released
    }

    fn on_release(&mut self, hook: ReleaseHook) {
        self.hook = Some(hook);
    }

    fn release(mut self: Box<Self>) -> Result<(), ControllerError> {
        self.released = true;
        let result = self.proxy.un_inhibit(self.cookie);
        if let Some(hook) = self.hook.take() {
            hook();
        }
        match result {
            Ok(()) => {
                debug!("screen saver inhibition {} lifted", self.cookie);
                Ok(())
            }
            Err(err) => Err(ControllerError::ReleaseFailed(err.to_string())),
        }
    }
}

impl Drop for InhibitHandle {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.proxy.un_inhibit(self.cookie);
        }
    }
}
