//! Browser LocalStorage store
//!
//! The value is a bare decimal string under `highScore`, so scores saved by
//! earlier builds of the page are picked up as-is.

use super::{HighScoreStore, StoreError};

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "highScore";

    pub fn new() -> Self {
        Self::with_key(Self::DEFAULT_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, StoreError> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        match raw {
            None => Ok(0),
            Some(text) => text.trim().parse::<u64>().map_err(|_| StoreError::Corrupt(text)),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.key, &score.to_string())
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
