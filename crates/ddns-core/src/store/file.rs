// # File Config Store
//
// File-based implementation of ConfigStore over the host's JSON configuration.
//
// ## Ownership
//
// Only the `plugins` object belongs to plugins. Every other top-level key is
// the host's and is written back untouched.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Automatic backup: Keeps .backup of the previous file
// - Recovery: Falls back to backup if the main file fails to parse
//
// ## File Format
//
// ```json
// {
//   "records": [ ... host data ... ],
//   "plugins": {
//     "route53": { "default": { "example.com.": "Z1" } }
//   }
// }
// ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

use crate::Error;
use crate::traits::ConfigStore;

/// File-based host config store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::store::FileConfigStore;
/// use ddns_core::traits::ConfigStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileConfigStore::new("/etc/ddns/config.json").await?;
///
///     store.set_plugin("route53", serde_json::json!({})).await?;
///     store.save().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    state: Arc<RwLock<FileState>>,
    /// Held by one save from serialization through rename
    write_gate: Mutex<()>,
}

#[derive(Debug)]
struct FileState {
    document: HostConfigFile,
    dirty: bool,
    /// Bumped on every change; a save only clears `dirty` for the generation it wrote
    generation: u64,
}

/// Serializable host configuration file
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct HostConfigFile {
    #[serde(default)]
    plugins: Map<String, Value>,

    #[serde(flatten)]
    host: Map<String, Value>,
}

/// Why a load attempt failed
enum LoadFailure {
    /// File could not be read
    Unreadable(Error),
    /// File was read but is not a valid config document
    Corrupt(Error),
}

impl FileConfigStore {
    /// Create or load a file config store
    ///
    /// This will:
    /// 1. Try to load the existing file
    /// 2. If it fails to parse, try to load from backup
    /// 3. If both fail, start with an empty document
    /// 4. Create parent directories if needed
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let document = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(FileState {
                document,
                dirty: false,
                generation: 0,
            })),
            write_gate: Mutex::new(()),
        })
    }

    /// Path of the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_with_recovery(path: &Path) -> Result<HostConfigFile, Error> {
        match Self::load(path).await {
            Ok(document) => {
                tracing::debug!(
                    "Loaded host config: {} plugin namespace(s)",
                    document.plugins.len()
                );
                Ok(document)
            }
            Err(LoadFailure::Unreadable(e)) => Err(e),
            Err(LoadFailure::Corrupt(e)) => {
                tracing::warn!(
                    "Config file appears corrupted: {}. Attempting recovery from backup.",
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with empty config.");
                    return Ok(HostConfigFile::default());
                }

                match Self::load(&backup_path).await {
                    Ok(document) => {
                        tracing::info!("Recovered config from backup");
                        if let Err(restore_err) = fs::copy(&backup_path, path).await {
                            tracing::error!(
                                "Failed to restore config file from backup: {}",
                                restore_err
                            );
                        }
                        Ok(document)
                    }
                    Err(LoadFailure::Unreadable(e) | LoadFailure::Corrupt(e)) => {
                        tracing::error!(
                            "Backup also unusable: {}. Starting with empty config.",
                            e
                        );
                        Ok(HostConfigFile::default())
                    }
                }
            }
        }
    }

    async fn load(path: &Path) -> Result<HostConfigFile, LoadFailure> {
        if !path.exists() {
            tracing::debug!("Config file does not exist: {}", path.display());
            return Ok(HostConfigFile::default());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            LoadFailure::Unreadable(Error::config_store(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            LoadFailure::Corrupt(Error::config_store(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            )))
        })
    }

    /// Write the document to disk atomically
    ///
    /// Callers must hold `write_gate`.
    async fn write(&self) -> Result<(), Error> {
        let (json, generation) = {
            let state_guard = self.state.read().await;
            let json = serde_json::to_string_pretty(&state_guard.document)
                .map_err(|e| Error::config_store(format!("Failed to serialize config: {}", e)))?;
            (json, state_guard.generation)
        };

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::config_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::config_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::config_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::config_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        let mut state_guard = self.state.write().await;
        if state_guard.generation == generation {
            state_guard.dirty = false;
        }

        tracing::trace!("Config written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn plugin(&self, namespace: &str) -> Result<Option<Value>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.document.plugins.get(namespace).cloned())
    }

    async fn set_plugin(&self, namespace: &str, data: Value) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;
        state_guard
            .document
            .plugins
            .insert(namespace.to_string(), data);
        state_guard.dirty = true;
        state_guard.generation += 1;
        Ok(())
    }

    async fn save(&self) -> Result<(), Error> {
        let _gate = self.write_gate.lock().await;
        let dirty = self.state.read().await.dirty;
        if dirty || !self.path.exists() {
            self.write().await
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = FileConfigStore::new(&path).await.unwrap();
        assert_eq!(store.plugin("route53").await.unwrap(), None);

        let data = json!({ "default": { "example.com.": "Z1" } });
        store.set_plugin("route53", data.clone()).await.unwrap();

        // Not persisted until save
        assert!(!path.exists());
        store.save().await.unwrap();
        assert!(path.exists());

        let store2 = FileConfigStore::new(&path).await.unwrap();
        assert_eq!(store2.plugin("route53").await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn test_file_store_preserves_host_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            json!({
                "records": [{ "record": "a.example.com." }],
                "plugins": { "other": { "keep": true } }
            })
            .to_string(),
        )
        .await
        .unwrap();

        let store = FileConfigStore::new(&path).await.unwrap();
        store.set_plugin("route53", json!({})).await.unwrap();
        store.save().await.unwrap();

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["records"][0]["record"], "a.example.com.");
        assert_eq!(written["plugins"]["other"]["keep"], true);
        assert_eq!(written["plugins"]["route53"], json!({}));
    }

    #[tokio::test]
    async fn test_file_store_corruption_recovery() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = FileConfigStore::new(&path).await.unwrap();
        store.set_plugin("route53", json!({ "v": 1 })).await.unwrap();
        store.save().await.unwrap();

        // Second write creates the backup of the first
        store.set_plugin("route53", json!({ "v": 2 })).await.unwrap();
        store.save().await.unwrap();

        let backup_path = FileConfigStore::backup_path(&path);
        assert!(backup_path.exists(), "Backup file should exist after write");

        fs::write(&path, b"corrupted json data").await.unwrap();

        let recovered = FileConfigStore::new(&path).await.unwrap();
        assert_eq!(
            recovered.plugin("route53").await.unwrap(),
            Some(json!({ "v": 1 })),
            "Backup should contain previous config, not latest"
        );
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let store = FileConfigStore::new(&path).await.unwrap();
        store.save().await.unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_concurrent_saves_keep_latest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = Arc::new(FileConfigStore::new(&path).await.unwrap());

        for round in 0..50 {
            let tasks: Vec<_> = (0..8)
                .map(|i| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        store
                            .set_plugin("route53", json!({ "round": round, "task": i }))
                            .await
                            .unwrap();
                        store.save().await.unwrap();
                    })
                })
                .collect();

            for task in tasks {
                task.await.unwrap();
            }

            let on_disk: Value =
                serde_json::from_str(&fs::read_to_string(&path).await.unwrap()).unwrap();
            let in_memory = store.plugin("route53").await.unwrap().unwrap();
            assert_eq!(
                on_disk["plugins"]["route53"], in_memory,
                "round {round}: disk lags memory after every save returned"
            );
        }

        // Nothing left to write
        assert!(!store.state.read().await.dirty);
    }
}
