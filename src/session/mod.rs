use std::collections::BTreeMap;
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Mutex };

use log::info;
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_ID_KEY: &str = "user_id";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key-value store for the logged-in session. Values are opaque strings with
/// no expiry; only an explicit [`SessionStore::clear`] removes them. Injected
/// so tests can swap the file-backed store for an in-memory one.
pub trait SessionStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Store persisted as a flat JSON object on disk, created lazily on the
/// first write.
pub struct FileSessionStore {
    path: PathBuf,
    cells: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    pub fn new(path: &Path) -> Result<Self, SessionError> {
        let cells = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };
        Ok(FileSessionStore {
            path: path.to_path_buf(),
            cells: Mutex::new(cells),
        })
    }

    fn persist(&self, cells: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(cells)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut cells = self.cells.lock().unwrap();
        cells.insert(key.to_string(), value.to_string());
        self.persist(&cells)
    }

    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.cells.lock().unwrap().get(key).cloned())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut cells = self.cells.lock().unwrap();
        cells.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Non-persistent store for tests and one-shot runs.
#[derive(Default)]
pub struct MemorySessionStore {
    cells: Mutex<BTreeMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.cells.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.cells.lock().unwrap().get(key).cloned())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.cells.lock().unwrap().clear();
        Ok(())
    }
}

pub fn create_session_store(
    path: Option<&Path>
) -> Result<Arc<dyn SessionStore>, SessionError> {
    match path {
        Some(path) => {
            info!("Session will be stored in: {}", path.display());
            Ok(Arc::new(FileSessionStore::new(path)?))
        }
        None => Ok(Arc::new(MemorySessionStore::default())),
    }
}
