//! # Scoped Store
//!
//! Wraps a [`KeyValueStore`] so every key is prefixed with the owning user's
//! scope, and adds typed JSON helpers on top of the raw string documents.
//!
//! Reads through [`ScopedStore::read_json_or_default`] never fail: a missing
//! key or an unparsable document yields the caller's default and the fault is
//! logged.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::traits::KeyValueStore;

#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    scope: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("{}.{}", self.scope, key)
    }

    pub fn read_raw(&self, key: &str) -> Result<Option<String>> {
        self.inner.read(&self.scoped_key(key))
    }

    /// Read and parse a document; parse failures are errors
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_raw(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .with_context(|| format!("Malformed JSON stored under '{}'", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Read and parse a document, falling back to `default` on any failure
    pub fn read_json_or_default<T, F>(&self, key: &str, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.read_json(key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("No document under '{}' for scope '{}', using default", key, self.scope);
                default()
            }
            Err(e) => {
                warn!("Failed to load '{}' for scope '{}', using default: {:#}", key, self.scope, e);
                default()
            }
        }
    }

    /// Serialize and replace the whole document
    pub fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.inner.write(&self.scoped_key(key), &raw)
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        self.inner.remove(&self.scoped_key(key))
    }
}
