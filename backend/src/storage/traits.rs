//! # Storage Traits
//!
//! This module defines the storage abstraction that lets the domain layer work
//! against local files in production and an in-memory map in tests.

use anyhow::Result;

/// A flat key-value store holding one JSON document per key
///
/// Keys are fixed store names (optionally scope-prefixed); values are the full
/// serialized document. Writers always replace the whole value.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw document stored under `key`, `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; returns true if something was removed
    fn remove(&self, key: &str) -> Result<bool>;
}
