use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::ClientError;

/// Persistence keys, one per state container. Each container owns its
/// slice exclusively; the elevation deadline deliberately lives under
/// its own key as a plain numeric string rather than inside the
/// session blob.
pub const SESSION_KEY: &str = "session";
pub const ELEVATION_KEY: &str = "admin_elevation";
pub const COMPANY_KEY: &str = "company";
pub const PREFERENCES_KEY: &str = "preferences";

/// Durable key-value substrate for state container snapshots.
///
/// The in-memory container is the source of truth between writes;
/// the store only exists so a restart rehydrates the last known state.
pub trait StateStore {
    fn load(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&mut self, key: &str) -> Result<(), ClientError>;
}

/// File-backed store: one file per key under the client config directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: PathBuf) -> Result<Self, ClientError> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    /// Opens the default config directory: `$IMA_CONFIG_DIR` if set,
    /// otherwise `$HOME/.config/ima/client`.
    pub fn open_default() -> Result<Self, ClientError> {
        let dir = if let Ok(custom_dir) = std::env::var("IMA_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            let home = std::env::var("HOME")
                .map_err(|_| ClientError::ConfigDir("HOME environment variable not set".to_string()))?;
            PathBuf::from(home).join(".config").join("ima").join("client")
        };
        Self::open(dir)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, ClientError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(content))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral (session-scoped) state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), ClientError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        self.entries.remove(key);
        Ok(())
    }
}
