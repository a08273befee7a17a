//! # Persistence Adapter
//!
//! Typed JSON access to a [`KeyValueStore`]. Reads never fail: an absent,
//! unreadable or malformed value falls back to the caller's default.
//! Writes serialize the whole value and replace the stored entry.

use std::sync::Arc;

use domains::{AppError, KeyValueStore, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn KeyValueStore>,
}

fn storage_error(key: &str, err: anyhow::Error) -> AppError {
    AppError::Storage(format!("{key}: {err:#}"))
}

impl Persistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get_item<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_item_or_else(key, || default).await
    }

    /// Like [`Persistence::get_item`], building the default only when needed.
    pub async fn get_item_or_else<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "no stored value, using default");
                return default();
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value, using default");
                return default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "malformed stored value, using default");
                default()
            }
        }
    }

    pub async fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| AppError::Storage(format!("{key}: {e}")))?;
        self.store
            .set(key, &raw)
            .await
            .map_err(|e| storage_error(key, e))?;
        debug!(key, bytes = raw.len(), "stored value");
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> Result<()> {
        self.store
            .remove(key)
            .await
            .map_err(|e| storage_error(key, e))
    }

    /// Whether anything is stored under `key`, valid or not.
    pub async fn has_item(&self, key: &str) -> Result<bool> {
        self.store
            .get(key)
            .await
            .map(|raw| raw.is_some())
            .map_err(|e| storage_error(key, e))
    }
}
