//! In-memory reference store
//!
//! `MemoryStore` implements the `DocumentStore` boundary over plain hash
//! maps: equality-match filters, partial-record updates, and unique index
//! enforcement with the same duplicate-key reporting a real store adapter
//! would produce. It backs the test suites and serves as the documented
//! example collaborator.

use std::collections::HashMap;

use bson::oid::ObjectId;
use meerkat_common::{MeerkatError, Result};

use crate::store::{unique_index_name, DocumentStore, Filter, RawRecord, WriteOutcome};
use crate::value::{map_get, Value};

#[derive(Debug, Default)]
struct MemoryCollection {
    records: Vec<RawRecord>,
    unique_fields: Vec<String>,
}

impl MemoryCollection {
    /// Check `candidate` against the unique indexes, ignoring the record at
    /// `skip` (the record being updated)
    fn check_unique(&self, candidate: &RawRecord, skip: Option<usize>) -> Result<()> {
        for field in &self.unique_fields {
            let new_value = map_get(candidate, field).unwrap_or(&Value::Null);
            let conflict = self.records.iter().enumerate().any(|(i, record)| {
                Some(i) != skip && map_get(record, field).unwrap_or(&Value::Null) == new_value
            });
            if conflict {
                return Err(MeerkatError::DuplicateKey {
                    index: unique_index_name(field),
                });
            }
        }
        Ok(())
    }
}

/// A `DocumentStore` held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: HashMap<String, MemoryCollection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&mut self, name: &str) -> &mut MemoryCollection {
        self.collections.entry(name.to_string()).or_default()
    }
}

fn matches(record: &RawRecord, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(key, value)| map_get(record, key) == Some(value))
}

/// Apply `update` to `record` with set semantics: existing keys are
/// replaced, new keys appended
fn apply_update(record: &mut RawRecord, update: &RawRecord) {
    for (key, value) in update {
        match record.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.clone(),
            None => record.push((key.clone(), value.clone())),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn insert(&mut self, collection: &str, record: RawRecord) -> Result<ObjectId> {
        let state = self.collection(collection);
        state.check_unique(&record, None)?;

        let id = ObjectId::new();
        let mut stored = vec![("_id".to_string(), Value::ObjectId(id))];
        stored.extend(record);
        state.records.push(stored);
        Ok(id)
    }

    fn update(
        &mut self,
        collection: &str,
        filter: Filter,
        record: RawRecord,
        upsert: bool,
    ) -> Result<WriteOutcome> {
        let state = self.collection(collection);

        let indices: Vec<usize> = state
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches(r, &filter))
            .map(|(i, _)| i)
            .collect();

        if indices.is_empty() {
            if !upsert {
                return Ok(WriteOutcome::default());
            }
            // Upsert: the created record keeps the filter's identity.
            let id = match map_get(&filter, "_id") {
                Some(Value::ObjectId(id)) => *id,
                _ => ObjectId::new(),
            };
            let mut stored = vec![("_id".to_string(), Value::ObjectId(id))];
            apply_update(&mut stored, &record);
            state.check_unique(&stored, None)?;
            state.records.push(stored);
            return Ok(WriteOutcome {
                matched: 0,
                modified: 1,
                removed: 0,
            });
        }

        for &index in &indices {
            let mut updated = state.records[index].clone();
            apply_update(&mut updated, &record);
            state.check_unique(&updated, Some(index))?;
            state.records[index] = updated;
        }

        Ok(WriteOutcome {
            matched: indices.len() as u64,
            modified: indices.len() as u64,
            removed: 0,
        })
    }

    fn remove(&mut self, collection: &str, filter: Filter) -> Result<WriteOutcome> {
        let state = self.collection(collection);
        let before = state.records.len();
        state.records.retain(|record| !matches(record, &filter));
        let removed = (before - state.records.len()) as u64;
        Ok(WriteOutcome {
            matched: removed,
            modified: 0,
            removed,
        })
    }

    fn find(&self, collection: &str, filter: Filter) -> Result<Vec<RawRecord>> {
        Ok(self
            .collections
            .get(collection)
            .map(|state| {
                state
                    .records
                    .iter()
                    .filter(|record| matches(record, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<RawRecord>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|state| {
                state
                    .records
                    .iter()
                    .find(|record| matches(record, &filter))
                    .cloned()
            }))
    }

    fn count(&self, collection: &str) -> Result<u64> {
        Ok(self
            .collections
            .get(collection)
            .map(|state| state.records.len() as u64)
            .unwrap_or(0))
    }

    fn create_unique_index(&mut self, collection: &str, field: &str) -> Result<()> {
        let state = self.collection(collection);
        if !state.unique_fields.iter().any(|f| f == field) {
            state.unique_fields.push(field.to_string());
        }
        Ok(())
    }
}
