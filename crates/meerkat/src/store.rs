//! The persistence boundary
//!
//! The mapping core never performs I/O. It exchanges flat records with a
//! `DocumentStore`, an explicitly constructed and explicitly injected
//! collaborator owned by the host application. Filters are pass-through
//! key/value pairs; there is no query language here.

use bson::oid::ObjectId;
use meerkat_common::Result;
use serde::{Deserialize, Serialize};

use crate::value::ValueMap;

/// A flat record as exchanged with the store (persisted field names)
pub type RawRecord = ValueMap;

/// A pass-through filter: every pair must match for a record to qualify
pub type Filter = ValueMap;

/// Result of a write operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub matched: u64,
    pub modified: u64,
    pub removed: u64,
}

/// Narrow, synchronous interface to a MongoDB-like document store
pub trait DocumentStore {
    /// Insert a record, returning its new identifier
    fn insert(&mut self, collection: &str, record: RawRecord) -> Result<ObjectId>;

    /// Apply `record` as a partial update to every record matching `filter`;
    /// with `upsert`, a missing record is created instead
    fn update(
        &mut self,
        collection: &str,
        filter: Filter,
        record: RawRecord,
        upsert: bool,
    ) -> Result<WriteOutcome>;

    /// Remove every record matching `filter`
    fn remove(&mut self, collection: &str, filter: Filter) -> Result<WriteOutcome>;

    /// All records matching `filter`
    fn find(&self, collection: &str, filter: Filter) -> Result<Vec<RawRecord>>;

    /// The first record matching `filter`, if any
    fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<RawRecord>>;

    /// Total number of records in the collection
    fn count(&self, collection: &str) -> Result<u64>;

    /// Declare a uniqueness intent on a persisted field
    fn create_unique_index(&mut self, collection: &str, field: &str) -> Result<()>;
}

/// Index name for a unique field, as reported in duplicate-key errors
pub fn unique_index_name(field: &str) -> String {
    format!("{field}_unique_index")
}

/// Recover the field name from a unique index name
pub fn unique_index_field(index: &str) -> Option<&str> {
    index.strip_suffix("_unique_index")
}
