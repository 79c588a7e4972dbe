//! In-memory output store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordSet;
use crate::models::{ListResult, OutputAttributes, SavedOutput};
use crate::ports::{CreateRecordOptions, OutputQuery, OutputStore, StoreResult, SystemAccess};

/// Output store backed by a map in process memory.
#[derive(Debug)]
pub struct MemoryOutputStore {
    records: RwLock<RecordSet>,
    can_encrypt: bool,
}

impl MemoryOutputStore {
    /// Empty store that reports encryption as available.
    pub fn new(_access: &SystemAccess) -> Self {
        Self {
            records: RwLock::new(RecordSet::default()),
            can_encrypt: true,
        }
    }

    /// Set whether the store reports encryption as available.
    pub fn with_encryption(mut self, can_encrypt: bool) -> Self {
        self.can_encrypt = can_encrypt;
        self
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl OutputStore for MemoryOutputStore {
    async fn find(&self, query: &OutputQuery) -> StoreResult<ListResult<SavedOutput>> {
        Ok(self.records.read().await.find(query))
    }

    async fn get(&self, id: &str) -> StoreResult<SavedOutput> {
        self.records.read().await.get(id)
    }

    async fn create(
        &self,
        attributes: OutputAttributes,
        options: CreateRecordOptions,
    ) -> StoreResult<SavedOutput> {
        self.records.write().await.create(attributes, options)
    }

    async fn update(
        &self,
        id: &str,
        attributes: OutputAttributes,
        expected_version: u64,
    ) -> StoreResult<SavedOutput> {
        self.records
            .write()
            .await
            .update(id, attributes, expected_version)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.records.write().await.delete(id)
    }

    async fn bulk_get(&self, ids: &[String]) -> StoreResult<Vec<StoreResult<SavedOutput>>> {
        Ok(self.records.read().await.bulk_get(ids))
    }

    fn can_encrypt(&self) -> bool {
        self.can_encrypt
    }
}
