//! Save, find, and delete protocol over the store boundary
//!
//! The document stays the single source of truth: nothing is written unless
//! `valid()` holds, timestamps are stamped through the normal set path (and
//! rolled back if the store refuses the write), and a duplicate-key report
//! from the store comes back as a field validation error rather than an
//! `Err`.

use bson::oid::ObjectId;
use chrono::NaiveDateTime;
use meerkat_common::{MeerkatError, Result};

use crate::document::Document;
use crate::field::FieldKind;
use crate::schema::Schema;
use crate::store::{unique_index_field, DocumentStore, Filter};
use crate::util::Timer;
use crate::value::Value;

const CREATED_AT: &str = "created_at";
const LAST_MODIFIED_AT: &str = "last_modified_at";

/// Where a stamped timestamp lives, relative to the saved document
#[derive(Debug)]
enum StampPath {
    Root(String),
    Embedded { field: String, name: String },
    ListElement { field: String, index: usize, name: String },
}

/// Prior timestamp values, retained so a failed write can be rolled back
#[derive(Debug, Default)]
struct StampSnapshot {
    entries: Vec<(StampPath, Value)>,
}

/// True if `schema` declares a date-time field with this name
fn declares_stamp(schema: &Schema, name: &str) -> bool {
    schema
        .descriptor(name)
        .is_some_and(|d| matches!(d.kind(), FieldKind::DateTime))
}

fn snapshot_timestamps(doc: &Document, names: &[&str]) -> StampSnapshot {
    let schema = doc.schema();
    let mut snapshot = StampSnapshot::default();

    for name in names {
        if declares_stamp(schema, name) {
            snapshot.entries.push((
                StampPath::Root(name.to_string()),
                doc.get(name).clone(),
            ));
        }
    }

    for descriptor in schema.fields() {
        match descriptor.kind() {
            FieldKind::Embedded(nested) => {
                for name in names {
                    if declares_stamp(nested, name) {
                        snapshot.entries.push((
                            StampPath::Embedded {
                                field: descriptor.name().to_string(),
                                name: name.to_string(),
                            },
                            doc.embedded(descriptor.name()).get(name).clone(),
                        ));
                    }
                }
            }
            FieldKind::List(nested) => {
                for name in names {
                    if declares_stamp(nested, name) {
                        for (index, element) in doc.list(descriptor.name()).iter().enumerate() {
                            snapshot.entries.push((
                                StampPath::ListElement {
                                    field: descriptor.name().to_string(),
                                    index,
                                    name: name.to_string(),
                                },
                                element.get(name).clone(),
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    snapshot
}

/// Stamp `now` into every declared timestamp field, cascading one level into
/// embedded documents and embedded-list elements
fn stamp_timestamps(doc: &mut Document, names: &[&str], now: NaiveDateTime) {
    let schema = doc.schema();

    for name in names {
        if declares_stamp(schema, name) {
            doc.set(name, now);
        }
    }

    for descriptor in schema.fields() {
        match descriptor.kind() {
            FieldKind::Embedded(nested) => {
                for name in names {
                    if declares_stamp(nested, name) {
                        doc.embedded_mut(descriptor.name()).set(name, now);
                    }
                }
            }
            FieldKind::List(nested) => {
                for name in names {
                    if declares_stamp(nested, name) {
                        for element in doc.list_mut(descriptor.name()).iter_mut() {
                            element.set(name, now);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn restore_timestamps(doc: &mut Document, snapshot: StampSnapshot) {
    for (path, prior) in snapshot.entries {
        match path {
            StampPath::Root(name) => doc.set(&name, prior),
            StampPath::Embedded { field, name } => {
                doc.embedded_mut(&field).set(&name, prior);
            }
            StampPath::ListElement { field, index, name } => {
                if let Some(element) = doc.list_mut(&field).get_mut(index) {
                    element.set(&name, prior);
                }
            }
        }
    }
}

/// Backing collection for a document; embedded schemas cannot be persisted
fn collection_of(schema: &Schema) -> String {
    schema
        .collection()
        .unwrap_or_else(|| panic!("cannot persist embedded document type {}", schema.name()))
        .to_string()
}

fn id_filter(id: ObjectId) -> Filter {
    vec![("_id".to_string(), Value::ObjectId(id))]
}

/// Save the document: insert when it has no identity, update (with upsert)
/// when it does
///
/// Returns `Ok(false)` without touching the store if the document is not
/// valid, and `Ok(false)` after a duplicate-key violation (the offending
/// field gains a `"must be unique"` message and stamped timestamps roll
/// back). Any other store error rolls back and propagates.
pub fn save(doc: &mut Document, store: &mut dyn DocumentStore) -> Result<bool> {
    if !doc.valid() {
        return Ok(false);
    }

    let schema = doc.schema();
    let collection = collection_of(schema);
    let existing_id = doc.id();
    let (operation, stamp_names): (&str, &[&str]) = match existing_id {
        Some(_) => ("UPDATE", &[LAST_MODIFIED_AT]),
        None => ("INSERT", &[CREATED_AT, LAST_MODIFIED_AT]),
    };

    let snapshot = snapshot_timestamps(doc, stamp_names);
    stamp_timestamps(doc, stamp_names, chrono::Utc::now().naive_utc());

    let timer = Timer::start();
    let result: Result<()> = match existing_id {
        Some(id) => store
            .update(&collection, id_filter(id), doc.mongo_field_values(), true)
            .map(|_| ()),
        None => store
            .insert(&collection, doc.mongo_field_values())
            .map(|id| doc.set_id(Some(id))),
    };

    match result {
        Ok(()) => {
            doc.clear_changed();
            tracing::info!(
                "({}s) {} {} {:?}, {:?}",
                timer.duration_in_seconds(),
                schema.name(),
                operation,
                doc.mongo_field_values(),
                doc.id()
            );
            Ok(true)
        }
        Err(MeerkatError::DuplicateKey { index }) => {
            restore_timestamps(doc, snapshot);
            tracing::warn!(
                "{} {} failed due to unique index violation ({})",
                schema.name(),
                operation,
                index
            );
            let field = unique_index_field(&index).unwrap_or(&index).to_string();
            doc.errors_mut().add(&field, "must be unique");
            Ok(false)
        }
        Err(err) => {
            restore_timestamps(doc, snapshot);
            tracing::error!("{} {} failed: {}", schema.name(), operation, err);
            Err(err)
        }
    }
}

/// Remove the document from its collection and clear its identity
pub fn delete(doc: &mut Document, store: &mut dyn DocumentStore) -> Result<()> {
    let schema = doc.schema();
    let collection = collection_of(schema);

    let Some(id) = doc.id() else {
        tracing::debug!("{} DELETE skipped: document was never saved", schema.name());
        return Ok(());
    };

    let timer = Timer::start();
    let outcome = store.remove(&collection, id_filter(id))?;
    tracing::info!(
        "({}s) {} DELETE {} ({} record(s) removed)",
        timer.duration_in_seconds(),
        schema.name(),
        id,
        outcome.removed
    );
    doc.set_id(None);
    Ok(())
}

/// All documents matching `filter`
pub fn find(
    schema: &'static Schema,
    store: &dyn DocumentStore,
    filter: Filter,
) -> Result<Vec<Document>> {
    let collection = collection_of(schema);
    let timer = Timer::start();
    let records = store.find(&collection, filter.clone())?;
    tracing::info!(
        "({}s) {} FIND {:?} ({} record(s) found)",
        timer.duration_in_seconds(),
        schema.name(),
        filter,
        records.len()
    );
    Ok(records
        .into_iter()
        .map(|record| Document::from_map(schema, record))
        .collect())
}

/// All documents in the collection
pub fn find_all(schema: &'static Schema, store: &dyn DocumentStore) -> Result<Vec<Document>> {
    find(schema, store, Vec::new())
}

/// The first document matching `filter`, if any
pub fn find_one(
    schema: &'static Schema,
    store: &dyn DocumentStore,
    filter: Filter,
) -> Result<Option<Document>> {
    let collection = collection_of(schema);
    let timer = Timer::start();
    let record = store.find_one(&collection, filter.clone())?;
    let found = usize::from(record.is_some());
    tracing::info!(
        "({}s) {} FIND ONE {:?} ({} record(s) found)",
        timer.duration_in_seconds(),
        schema.name(),
        filter,
        found
    );
    Ok(record.map(|r| Document::from_map(schema, r)))
}

/// The document with this identity, if it exists
pub fn find_by_id(
    schema: &'static Schema,
    store: &dyn DocumentStore,
    id: ObjectId,
) -> Result<Option<Document>> {
    find_one(schema, store, id_filter(id))
}

/// Total number of documents in the collection
pub fn count(schema: &'static Schema, store: &dyn DocumentStore) -> Result<u64> {
    store.count(&collection_of(schema))
}

/// Declare a unique index for every field with a uniqueness intent
pub fn ensure_indexes(schema: &'static Schema, store: &mut dyn DocumentStore) -> Result<()> {
    let collection = collection_of(schema);
    for descriptor in schema.fields() {
        if descriptor.is_unique() {
            store.create_unique_index(&collection, descriptor.persisted_name())?;
        }
    }
    Ok(())
}
