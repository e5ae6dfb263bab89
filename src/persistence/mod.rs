//! High score persistence
//!
//! A single scalar survives across sessions. Stores report failures as
//! [`StoreError`]; callers fall back to zero and keep playing.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("stored high score is corrupt: {0:?}")]
    Corrupt(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Get/set access to the persisted high score
pub trait HighScoreStore {
    /// Stored value, or 0 if nothing has been saved yet
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<u64, StoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        (**self).save(score)
    }
}

/// Read the high score, falling back to 0 on any failure
pub fn load_or_zero(store: &dyn HighScoreStore) -> u64 {
    match store.load() {
        Ok(score) => score,
        Err(e) => {
            log::warn!("Could not read high score, starting from 0: {}", e);
            0
        }
    }
}

/// In-memory store
///
/// Clones share the same slot so a test can observe what the simulation
/// saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(score))),
        }
    }

    /// Last saved value, if any
    pub fn get(&self) -> Option<u64> {
        self.value.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.value.get().unwrap_or(0))
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.value.set(Some(score));
        Ok(())
    }
}
