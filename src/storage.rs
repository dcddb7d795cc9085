use crate::guide_registry::Guide;

use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Malformed guide data in {path:?}: {source}")]
    Format { path: PathBuf, source: serde_json::Error },
    #[error("Invalid guide data: {0}")]
    InvalidData(String)
}

/// Load/save hooks for the guide registry.
pub trait GuideStore {
    fn load(&self) -> Result<Vec<Guide>, StorageError>;
    fn save(&self, guides: &[Guide]) -> Result<(), StorageError>;
}

/// Guides kept as a JSON array in a single file.
pub struct JsonFileStore {
    file: PathBuf
}

impl JsonFileStore {
    pub fn new(file: PathBuf) -> Self {
        JsonFileStore { file: file }
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.file.clone(), source: source }
    }
}

impl GuideStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Guide>, StorageError> {
        let f = match std::fs::File::open(&self.file) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => { return Ok(Vec::new()); }
            Err(e) => { return Err(self.io_error(e)); }
        };
        serde_json::from_reader(BufReader::new(f)).map_err(|e| StorageError::Format { path: self.file.clone(), source: e })
    }

    fn save(&self, guides: &[Guide]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(guides).map_err(|e| StorageError::Format { path: self.file.clone(), source: e })?;

        // written next to the target first, so a failed save never truncates the old file
        let mut temporary = self.file.clone().into_os_string();
        temporary.push(".tmp");
        let temporary = PathBuf::from(temporary);
        {
            let mut f = std::fs::File::create(&temporary).map_err(|e| self.io_error(e))?;
            f.write_all(serialized.as_bytes()).map_err(|e| self.io_error(e))?;
            f.sync_all().map_err(|e| self.io_error(e))?;
        }
        std::fs::rename(&temporary, &self.file).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
fn sample_guides() -> Vec<Guide> {
    let mut registry = crate::guide_registry::GuideRegistry::new();
    assert!(registry.register("alice", "pw", "AliceSmith", "bob").is_ok());
    assert!(registry.register("carol", "secret", "CarolWhite", "dan").is_ok());
    registry.list().into_iter().cloned().collect()
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("guides.json"));
    assert_eq!(store.load().unwrap(), Vec::<Guide>::new());
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("guides.json"));
    let guides = sample_guides();

    assert!(store.save(&guides).is_ok());
    assert!(store.path().exists());
    assert_eq!(store.load().unwrap(), guides);

    assert!(store.save(&guides[..1]).is_ok());
    assert_eq!(store.load().unwrap(), guides[..1].to_vec());
    assert!(!dir.path().join("guides.json.tmp").exists());
}

#[test]
fn test_unreadable_path_is_not_treated_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    // a directory at the path is not a missing file and must not load as empty
    let store = JsonFileStore::new(dir.path().to_path_buf());
    assert!(store.load().is_err());
}

#[test]
fn test_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guides.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonFileStore::new(path);
    assert!(matches!(store.load(), Err(StorageError::Format { .. })));
}

#[test]
fn test_save_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("no_such_dir").join("guides.json"));
    assert!(matches!(store.save(&sample_guides()), Err(StorageError::Io { .. })));
}
