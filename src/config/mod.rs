use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Namespace for the config file under the user's documents directory.
pub const APP_NAME: &str = "National Rail Data Downloader";

/// Persisted user settings.
///
/// Loaded fresh from storage at the start of every operation rather than
/// cached across them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub username: String,
    pub password: String,
    pub save_location: PathBuf,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            save_location: dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_default(),
        }
    }
}

impl ConfigRecord {
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Password rendered as asterisks, for settings display.
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

// The password never leaves the record unmasked through Debug.
impl fmt::Debug for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigRecord")
            .field("username", &self.username)
            .field("password", &self.masked_password())
            .field("save_location", &self.save_location)
            .finish()
    }
}

/// A single settable field of the configuration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Username,
    Password,
    SaveLocation,
}

/// Where the serialized record lives. Swappable so tests can run against
/// an in-memory backend.
pub trait ConfigStorage: Send + Sync {
    /// Returns the stored contents, or `None` if no record has been
    /// persisted yet.
    fn read(&self) -> Result<Option<String>, AppError>;

    fn write(&self, contents: &str) -> Result<(), AppError>;
}

/// JSON file in the user's documents directory.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<documents dir>/National Rail Data Downloader/config.json`
    pub fn default_path() -> PathBuf {
        dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_default()
            .join(APP_NAME)
            .join("config.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write(&self, contents: &str) -> Result<(), AppError> {
        let storage_err =
            |e: io::Error| AppError::Storage(format!("cannot write {}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage_err)?;
        }

        // Write to a sibling temp file and rename over the target, so a
        // crash mid-write leaves the previous record intact.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents).map_err(storage_err)?;
        fs::rename(&tmp, &self.path).map_err(storage_err)?;
        Ok(())
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
}

impl ConfigStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, AppError> {
        // A panic elsewhere poisons the lock; the stored string is still
        // valid, so keep serving it.
        let contents = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(contents.clone())
    }

    fn write(&self, contents: &str) -> Result<(), AppError> {
        let mut slot = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(contents.to_string());
        Ok(())
    }
}

/// Load/save service over a [`ConfigStorage`] backend.
#[derive(Clone)]
pub struct ConfigStore {
    storage: Arc<dyn ConfigStorage>,
}

impl ConfigStore {
    pub fn new(storage: impl ConfigStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// Store backed by the file at [`FileStorage::default_path`].
    pub fn open_default() -> Self {
        Self::new(FileStorage::new(FileStorage::default_path()))
    }

    /// Returns the persisted record, persisting and returning the default
    /// record if none exists yet. A record that does not parse (e.g. a torn
    /// write) surfaces as [`AppError::Storage`].
    pub fn load(&self) -> Result<ConfigRecord, AppError> {
        match self.storage.read()? {
            Some(contents) => serde_json::from_str(&contents)
                .map_err(|e| AppError::Storage(format!("config record is not valid: {}", e))),
            None => {
                let record = ConfigRecord::default();
                self.save(&record)?;
                Ok(record)
            }
        }
    }

    /// Persists the full record, replacing any previous content.
    pub fn save(&self, record: &ConfigRecord) -> Result<(), AppError> {
        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| AppError::Storage(format!("cannot serialize config record: {}", e)))?;
        self.storage.write(&contents)
    }

    /// Sets one field, persists immediately, and returns the updated record
    /// so the shell can refresh its display.
    pub fn update_field(
        &self,
        mut record: ConfigRecord,
        field: ConfigField,
        value: String,
    ) -> Result<ConfigRecord, AppError> {
        match field {
            ConfigField::Username => record.username = value,
            ConfigField::Password => record.password = value,
            ConfigField::SaveLocation => record.save_location = PathBuf::from(value),
        }
        self.save(&record)?;
        Ok(record)
    }
}
