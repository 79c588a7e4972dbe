//! Output store adapters.
//!
//! Both adapters share [`RecordSet`], which implements the versioning rules:
//! a record starts at version 1, every write bumps it, and an update carrying
//! a stale version is rejected without changing anything.

mod file;
mod memory;

pub use file::FileOutputStore;
pub use memory::MemoryOutputStore;

use std::collections::BTreeMap;

use fleet_config::constants::OUTPUT_SAVED_OBJECT_TYPE;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{ListResult, OutputAttributes, SavedOutput};
use crate::ports::{CreateRecordOptions, OutputQuery, StoreResult};

/// A record as held by an adapter, keyed by id in [`RecordSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredRecord {
    pub version: u64,
    pub attributes: OutputAttributes,
}

/// Versioned output records keyed by canonical id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct RecordSet {
    records: BTreeMap<String, StoredRecord>,
}

fn not_found(id: &str) -> StoreError {
    StoreError::NotFound {
        object_type: OUTPUT_SAVED_OBJECT_TYPE.to_string(),
        id: id.to_string(),
    }
}

impl RecordSet {
    fn saved(id: &str, record: &StoredRecord) -> SavedOutput {
        SavedOutput {
            id: id.to_string(),
            version: record.version,
            attributes: record.attributes.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn find(&self, query: &OutputQuery) -> ListResult<SavedOutput> {
        query.apply(
            self.records
                .iter()
                .map(|(id, record)| Self::saved(id, record)),
        )
    }

    pub fn get(&self, id: &str) -> StoreResult<SavedOutput> {
        self.records
            .get(id)
            .map(|record| Self::saved(id, record))
            .ok_or_else(|| not_found(id))
    }

    pub fn bulk_get(&self, ids: &[String]) -> Vec<StoreResult<SavedOutput>> {
        ids.iter().map(|id| self.get(id)).collect()
    }

    pub fn create(
        &mut self,
        attributes: OutputAttributes,
        options: CreateRecordOptions,
    ) -> StoreResult<SavedOutput> {
        let version = match self.records.get(&options.id) {
            Some(_) if !options.overwrite => {
                return Err(StoreError::AlreadyExists {
                    object_type: OUTPUT_SAVED_OBJECT_TYPE.to_string(),
                    id: options.id,
                });
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };

        let record = StoredRecord {
            version,
            attributes,
        };
        let saved = Self::saved(&options.id, &record);
        self.records.insert(options.id, record);
        Ok(saved)
    }

    pub fn update(
        &mut self,
        id: &str,
        attributes: OutputAttributes,
        expected_version: u64,
    ) -> StoreResult<SavedOutput> {
        let record = self.records.get_mut(id).ok_or_else(|| not_found(id))?;
        if record.version != expected_version {
            return Err(StoreError::VersionConflict {
                object_type: OUTPUT_SAVED_OBJECT_TYPE.to_string(),
                id: id.to_string(),
                expected: expected_version,
                actual: record.version,
            });
        }

        record.version += 1;
        record.attributes = attributes;
        Ok(Self::saved(id, record))
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut StoredRecord)> {
        self.records.iter_mut()
    }
}
