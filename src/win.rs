//! Windows wake lock backend via the thread execution state API.

use log::debug;
use windows_sys::Win32::System::Power::{
    ES_CONTINUOUS, ES_DISPLAY_REQUIRED, SetThreadExecutionState,
};

use crate::error::ControllerError;
use crate::platform::{ReleaseHook, WakeLockHandle, WakeLockProvider};

/// Wake lock provider backed by `SetThreadExecutionState`.
pub struct ExecutionStateProvider;

impl WakeLockProvider for ExecutionStateProvider {
    fn supported(&self) -> bool {
        true
    }

    fn acquire(&self) -> Result<Box<dyn WakeLockHandle>, ControllerError> {
        let previous = unsafe { SetThreadExecutionState(ES_CONTINUOUS | ES_DISPLAY_REQUIRED) };
        if previous == 0 {
            return Err(ControllerError::AcquireDenied(
                "SetThreadExecutionState returned 0".into(),
            ));
        }
        debug!("display-required execution state set");

        Ok(Box::new(ExecutionStateHandle {
            released: false,
            hook: None,
        }))
    }
}

struct ExecutionStateHandle {
    released: bool,
    hook: Option<ReleaseHook>,
}

impl ExecutionStateHandle {
    fn clear(&mut self) -> Result<(), ControllerError> {
        self.released = true;
        let previous = unsafe { SetThreadExecutionState(ES_CONTINUOUS) };
        if previous == 0 {
            return Err(ControllerError::ReleaseFailed(
                "SetThreadExecutionState returned 0".into(),
            ));
        }
        debug!("display-required execution state cleared");
        Ok(())
    }
}

impl WakeLockHandle for ExecutionStateHandle {
    fn is_released(&self) -> bool {
        // Execution state holds until this process clears it; Windows never
        // revokes it out-of-band.
        self.released
    }

    fn on_release(&mut self, hook: ReleaseHook) {
        self.hook = Some(hook);
    }

    fn release(mut self: Box<Self>) -> Result<(), ControllerError> {
        let result = self.clear();
        if let Some(hook) = self.hook.take() {
            hook();
        }
        result
    }
}

impl Drop for ExecutionStateHandle {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.clear();
        }
    }
}
