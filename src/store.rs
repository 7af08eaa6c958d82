//! Preference persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::warn;

use crate::error::ControllerError;

/// File name (and logical key) the preference is stored under.
pub const PREFERENCE_KEY: &str = "keep-awake";

/// Trait for preference storage implementations.
///
/// This allows substituting an in-memory store in tests.
pub trait PreferenceStore: Send {
    /// Read the persisted preference.
    ///
    /// An absent or unrecognized value reads as `false`.
    fn load(&self) -> bool;

    /// Overwrite the persisted preference.
    fn save(&mut self, enabled: bool) -> Result<(), ControllerError>;
}

/// Stores the preference as the literal string `true` or `false` in a single
/// file under the user configuration directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at the default location,
    /// `<config dir>/staywake/keep-awake`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform reports no user configuration
    /// directory.
    pub fn new() -> Result<Self, ControllerError> {
        let base = dirs::config_dir().ok_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, "no user configuration directory")
        })?;
        Ok(Self::at(base.join("staywake").join(PREFERENCE_KEY)))
    }

    /// Create a store over an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> bool {
        match fs::read_to_string(&self.path) {
            Ok(value) => value == "true",
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => {
                warn!("failed to read wake preference: {}", err);
                false
            }
        }
    }

    fn save(&mut self, enabled: bool) -> Result<(), ControllerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, if enabled { "true" } else { "false" })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn temp_path() -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        std::env::temp_dir()
            .join(format!(
                "staywake-store-test-{}-{}",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::SeqCst)
            ))
            .join(PREFERENCE_KEY)
    }

    #[test]
    fn absent_file_reads_false() {
        let store = FileStore::at(temp_path());
        assert!(!store.load());
    }

    #[test]
    fn round_trips_both_literals() {
        let path = temp_path();
        let mut store = FileStore::at(&path);

        store.save(true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "true");
        assert!(store.load());

        store.save(false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "false");
        assert!(!store.load());
    }

    #[test]
    fn unrecognized_content_reads_false() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "yes").unwrap();

        let store = FileStore::at(&path);
        assert!(!store.load());
    }
}
