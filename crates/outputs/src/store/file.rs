//! JSON file output store.
//!
//! Responsibilities:
//! - Persist output records to a single JSON document.
//! - Encrypt the `ssl` blob at rest when an encryption key is configured.
//!
//! Does NOT handle:
//! - Cross-process locking; one process owns the file at a time.
//!
//! Invariants:
//! - Writes are atomic (temp file + rename) and only committed in memory once
//!   the file is on disk.
//! - Sealed values are never written when no key is configured, and a store
//!   holding sealed values cannot be opened without one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fleet_config::{Encryptor, SecretCipher};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::RecordSet;
use crate::error::StoreError;
use crate::models::{ListResult, OutputAttributes, SavedOutput};
use crate::ports::{CreateRecordOptions, OutputQuery, OutputStore, StoreResult, SystemAccess};

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OutputsDocument {
    /// Hex salt for key derivation; present once a key has been used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<String>,
    #[serde(default)]
    outputs: RecordSet,
}

/// Output store persisted as a JSON file.
pub struct FileOutputStore {
    path: PathBuf,
    salt: Option<String>,
    cipher: Option<SecretCipher>,
    records: Mutex<RecordSet>,
}

impl std::fmt::Debug for FileOutputStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileOutputStore")
            .field("path", &self.path)
            .field("can_encrypt", &self.cipher.is_some())
            .finish()
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        kind: e.kind(),
    }
}

impl FileOutputStore {
    /// Open (or start) the store at `path`.
    ///
    /// With an `encryption_key`, `ssl` values are sealed before they are written.
    pub fn open(
        path: impl Into<PathBuf>,
        encryption_key: Option<&SecretString>,
        _access: &SystemAccess,
    ) -> StoreResult<Self> {
        let path = path.into();
        let document = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => OutputsDocument::default(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                StoreError::Serialization(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => OutputsDocument::default(),
            Err(e) => return Err(io_error(&path, e)),
        };

        let (salt, cipher) = match encryption_key {
            Some(key) => {
                let salt = match &document.salt {
                    Some(salt) => salt.clone(),
                    None => hex::encode(Encryptor::generate_salt()),
                };
                let salt_bytes = hex::decode(&salt)
                    .map_err(|e| StoreError::Encryption(format!("invalid store salt: {e}")))?;
                let cipher = SecretCipher::from_passphrase(key, &salt_bytes)
                    .map_err(|e| StoreError::Encryption(e.to_string()))?;
                (Some(salt), Some(cipher))
            }
            None => (document.salt.clone(), None),
        };

        let mut records = document.outputs;
        for (id, record) in records.iter_mut() {
            if let Some(ssl) = record.attributes.ssl.as_mut()
                && SecretCipher::is_sealed(ssl)
            {
                let cipher = cipher.as_ref().ok_or_else(|| {
                    StoreError::Encryption(format!(
                        "output {id} has encrypted secrets but no encryption key is configured"
                    ))
                })?;
                *ssl = cipher
                    .open(ssl)
                    .map_err(|e| StoreError::Encryption(format!("output {id}: {e}")))?;
            }
        }

        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            encryption = cipher.is_some(),
            "Opened output store"
        );

        Ok(Self {
            path,
            salt,
            cipher,
            records: Mutex::new(records),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seal secrets and write `records` atomically.
    fn persist(&self, records: &RecordSet) -> StoreResult<()> {
        let mut sealed = records.clone();
        if let Some(cipher) = &self.cipher {
            for (id, record) in sealed.iter_mut() {
                if let Some(ssl) = record.attributes.ssl.as_mut() {
                    *ssl = cipher
                        .seal(ssl)
                        .map_err(|e| StoreError::Encryption(format!("output {id}: {e}")))?;
                }
            }
        }

        let document = OutputsDocument {
            salt: self.salt.clone(),
            outputs: sealed,
        };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(|e| io_error(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| io_error(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            encryption = self.cipher.is_some(),
            "Output store saved atomically"
        );
        Ok(())
    }

    /// Apply `change` to a copy of the records, persist it, then commit.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut RecordSet) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        let result = change(&mut next)?;
        self.persist(&next)?;
        *records = next;
        Ok(result)
    }
}

#[async_trait]
impl OutputStore for FileOutputStore {
    async fn find(&self, query: &OutputQuery) -> StoreResult<ListResult<SavedOutput>> {
        Ok(self.records.lock().await.find(query))
    }

    async fn get(&self, id: &str) -> StoreResult<SavedOutput> {
        self.records.lock().await.get(id)
    }

    async fn create(
        &self,
        attributes: OutputAttributes,
        options: CreateRecordOptions,
    ) -> StoreResult<SavedOutput> {
        self.mutate(|records| records.create(attributes, options))
            .await
    }

    async fn update(
        &self,
        id: &str,
        attributes: OutputAttributes,
        expected_version: u64,
    ) -> StoreResult<SavedOutput> {
        self.mutate(|records| records.update(id, attributes, expected_version))
            .await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.mutate(|records| records.delete(id)).await
    }

    async fn bulk_get(&self, ids: &[String]) -> StoreResult<Vec<StoreResult<SavedOutput>>> {
        Ok(self.records.lock().await.bulk_get(ids))
    }

    fn can_encrypt(&self) -> bool {
        self.cipher.is_some()
    }
}
