//! Whole-document persistence of the data set
//!
//! The session treats load and save as atomic, blocking calls. Weekly
//! summaries are derived data and are never written.

use crate::model::DataSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not a valid data file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

/// Load/save collaborator used by the session
pub trait Storage {
    fn load(&self) -> Result<DataSet, StorageError>;
    fn save(&mut self, data: &DataSet) -> Result<(), StorageError>;
}

/// Pretty-printed JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Write to a temp file next to the target, then rename over it
    fn atomic_write(&self, content: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path)
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<DataSet, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No data file at {}, starting empty", self.path.display());
                return Ok(DataSet::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            return Ok(DataSet::default());
        }

        let data: DataSet =
            serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })?;
        tracing::info!(
            "Loaded {} trips, {} expenses, {} recurring trips, {} templates from {}",
            data.trips.len(),
            data.expenses.len(),
            data.recurring_trips.len(),
            data.templates.len(),
            self.path.display()
        );
        Ok(data)
    }

    fn save(&mut self, data: &DataSet) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(data)?;
        self.atomic_write(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tracing::debug!("Saved data set to {}", self.path.display());
        Ok(())
    }
}

/// In-memory storage, mainly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub data: DataSet,
    /// When set, every save fails with this message
    pub fail_saves: Option<String>,
    pub save_count: usize,
}

impl MemoryStorage {
    pub fn new(data: DataSet) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<DataSet, StorageError> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &DataSet) -> Result<(), StorageError> {
        if let Some(reason) = &self.fail_saves {
            return Err(StorageError::Unavailable(reason.clone()));
        }
        self.data = data.clone();
        self.data.weekly_summaries.clear();
        self.save_count += 1;
        Ok(())
    }
}
