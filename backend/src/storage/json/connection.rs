use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::storage::traits::KeyValueStore;

/// JsonConnection maps store keys to `<key>.json` files under a base directory
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: Arc<PathBuf>,
}

impl JsonConnection {
    /// Create a new JSON connection, creating the base directory if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File backing a key; anything outside `[A-Za-z0-9._-]` becomes `_`
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_directory.join(format!("{}.json", file_stem))
    }
}

impl KeyValueStore for JsonConnection {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Read {} bytes from {:?}", content.len(), path);
                Ok(Some(content))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key);

        if !self.base_directory.exists() {
            fs::create_dir_all(self.base_directory.as_path())?;
        }

        // Write to a temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for_key(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
