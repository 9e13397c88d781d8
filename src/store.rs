//! Persistence layer for session state.
//!
//! A missing or malformed payload is "no saved state", never an error; only
//! I/O failures surface as [`PersistenceError`].

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::DEFAULT_STATE_PATH;
use crate::error::PersistenceError;
use crate::state::SolarState;

/// Storage collaborator for [`SolarState`].
pub trait StateStore {
    /// Loads the saved state, or `None` when nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the storage cannot be read.
    fn load(&self) -> Result<Option<SolarState>, PersistenceError>;

    /// Replaces the saved state.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the state cannot be written.
    fn save(&self, state: &SolarState) -> Result<(), PersistenceError>;
}

/// Parses a serialized payload, treating malformed content as absent.
fn decode(payload: &str, origin: &Path) -> Option<SolarState> {
    match serde_json::from_str::<SolarState>(payload) {
        Ok(state) => Some(state),
        Err(e) => {
            warn!(
                "Ignoring malformed saved state at {}: {e}",
                origin.display()
            );
            None
        }
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path to the state file.
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path being used for persistence.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written before the rename, `<file name>.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_PATH)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<SolarState>, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "State file not found at {}, using defaults",
                    self.path.display()
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(PersistenceError::new(
                    &self.path,
                    format!("failed to read state: {e}"),
                ));
            }
        };

        let state = decode(&contents, &self.path);
        if let Some(state) = &state {
            info!(
                "Loaded state from {}: {} devices, result={}",
                self.path.display(),
                state.devices.len(),
                state.results.is_some()
            );
        }
        Ok(state)
    }

    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn save(&self, state: &SolarState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                PersistenceError::new(parent, format!("failed to create directory: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(state).map_err(|e| {
            PersistenceError::new(&self.path, format!("failed to serialize state: {e}"))
        })?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, &json).map_err(|e| {
            PersistenceError::new(&temp_path, format!("failed to write temp file: {e}"))
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            PersistenceError::new(&self.path, format!("failed to replace state file: {e}"))
        })?;

        debug!(
            "Saved state to {} ({} devices)",
            self.path.display(),
            state.devices.len()
        );
        Ok(())
    }
}

/// In-process store holding the serialized payload.
///
/// Goes through the same JSON encoding as [`JsonFileStore`]. Saves can be made
/// to fail to exercise the non-fatal persistence path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payload: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw payload (which may be malformed).
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: RefCell::new(Some(payload.into())),
            fail_saves: Cell::new(false),
        }
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Raw payload currently stored.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<SolarState>, PersistenceError> {
        Ok(self
            .payload
            .borrow()
            .as_deref()
            .and_then(|p| decode(p, Path::new("memory"))))
    }

    fn save(&self, state: &SolarState) -> Result<(), PersistenceError> {
        if self.fail_saves.get() {
            return Err(PersistenceError::new("memory", "store rejected the write"));
        }
        let json = serde_json::to_string(state)
            .map_err(|e| PersistenceError::new("memory", format!("failed to serialize state: {e}")))?;
        *self.payload.borrow_mut() = Some(json);
        Ok(())
    }
}
