use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

pub const STORAGE_FILE_NAME: &str = "local_storage.json";

/// Browsers give each origin about this much.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Storage quota exceeded: {required} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { required: usize, quota: usize },
}

/// String key/value slots that survive between sessions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed [`KeyValueStore`]: one JSON object of string values.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    file_path: PathBuf,
    quota_bytes: usize,
}

impl LocalStorage {
    pub async fn open(dir: impl AsRef<Path>, quota_bytes: usize) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        if !fs::try_exists(dir).await? {
            fs::create_dir_all(dir).await?;
            info!("Created storage directory {}", dir.display());
        }

        let file_path = dir.join(STORAGE_FILE_NAME);
        debug!("Using local storage at {}", file_path.display());

        Ok(Self {
            file_path,
            quota_bytes,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    async fn read_slots(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !fs::try_exists(&self.file_path).await? {
            return Ok(BTreeMap::new());
        }

        let json_data = fs::read_to_string(&self.file_path).await?;
        if json_data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&json_data)?)
    }

    /// Slots to rewrite on the next write. A file that no longer parses is
    /// replaced instead of blocking every later write.
    async fn read_slots_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_slots().await {
            Err(StorageError::JsonError(e)) => {
                warn!(
                    "Local storage at {} is damaged and will be rewritten: {}",
                    self.file_path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
            result => result,
        }
    }

    async fn write_slots(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let required: usize = slots.iter().map(|(k, v)| k.len() + v.len()).sum();
        if required > self.quota_bytes {
            warn!(
                "Refusing write of {} bytes, quota is {} bytes",
                required, self.quota_bytes
            );
            return Err(StorageError::QuotaExceeded {
                required,
                quota: self.quota_bytes,
            });
        }

        let json_data = serde_json::to_string_pretty(slots)?;
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json_data.as_bytes()).await?;

        // Owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        fs::rename(&tmp_path, &self.file_path).await?;
        debug!("Local storage written ({} bytes of slots)", required);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut slots = self.read_slots().await?;
        Ok(slots.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.read_slots_for_write().await?;
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.read_slots_for_write().await?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots).await?;
        }
        Ok(())
    }
}
