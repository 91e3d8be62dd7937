//! Document instances: validated, change-tracked field storage
//!
//! A `Document` is one value slot per declared field plus an error collector,
//! a changed-field set, and (for collection-backed types) an identity. All
//! reads and writes dispatch through the schema's field descriptors, so
//! validation and dirty tracking cannot be bypassed.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use bson::oid::ObjectId;
use chrono::NaiveDateTime;

use crate::embedded::EmbeddedList;
use crate::errors::Errors;
use crate::field::FieldKind;
use crate::schema::Schema;
use crate::value::{map_get, Value, ValueMap};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique identity of a document instance
///
/// Embedded documents and lists keep their owner as a handle rather than a
/// reference: a non-owning association used only for error and timestamp
/// propagation, never for lifetime control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHandle(u64);

#[derive(Debug)]
enum Slot {
    Scalar(Value),
    Embedded(Box<Document>),
    List(EmbeddedList),
}

/// A runtime instance of a document type
#[derive(Debug)]
pub struct Document {
    schema: &'static Schema,
    handle: DocumentHandle,
    owner: Option<DocumentHandle>,
    id: Option<ObjectId>,
    slots: Vec<Slot>,
    errors: Errors,
    changed: BTreeSet<String>,
}

impl Document {
    /// Create an instance with every field initialized through its
    /// descriptor (defaults applied, required-missing errors recorded)
    pub fn new(schema: &'static Schema) -> Self {
        Self::from_map(schema, Vec::new())
    }

    /// Create an instance from a raw record (a decoded store record or a
    /// keyword-style map)
    ///
    /// Keys match the application-facing name first, the persisted name
    /// second. A `_id` key restores identity. Array values feed embedded-list
    /// fields one element at a time, object values feed embedded fields, null
    /// values fall back to the field default, and everything else goes
    /// through the normal set path. Unknown keys are logged at debug level
    /// and ignored.
    pub fn from_map(schema: &'static Schema, record: ValueMap) -> Self {
        let handle = DocumentHandle(NEXT_HANDLE.fetch_add(1, Ordering::SeqCst));
        let mut doc = Self {
            schema,
            handle,
            owner: None,
            id: None,
            slots: Vec::with_capacity(schema.fields().len()),
            errors: Errors::new(),
            changed: BTreeSet::new(),
        };

        for descriptor in schema.fields() {
            let slot = match descriptor.kind() {
                FieldKind::Embedded(nested) => {
                    let mut embedded = Self::new(nested);
                    embedded.owner = Some(handle);
                    Slot::Embedded(Box::new(embedded))
                }
                FieldKind::List(nested) => {
                    let mut list = EmbeddedList::new(descriptor.name(), nested);
                    list.set_owner(Some(handle));
                    Slot::List(list)
                }
                _ => Slot::Scalar(Value::Null),
            };
            doc.slots.push(slot);
        }

        if let Some(Value::ObjectId(id)) = map_get(&record, "_id") {
            doc.id = Some(*id);
        }

        for (index, descriptor) in schema.fields().iter().enumerate() {
            let raw = map_get(&record, descriptor.name())
                .or_else(|| map_get(&record, descriptor.persisted_name()))
                .cloned()
                .unwrap_or(Value::Null);

            match descriptor.kind() {
                FieldKind::List(nested) => {
                    if let Value::Array(items) = raw {
                        for item in items {
                            if let Value::Object(pairs) = item {
                                let element = Self::from_map(nested, pairs);
                                doc.push_at(index, element);
                            }
                        }
                    }
                }
                FieldKind::Embedded(nested) => {
                    if let Value::Object(pairs) = raw {
                        let mut embedded = Self::from_map(nested, pairs);
                        embedded.owner = Some(handle);
                        doc.slots[index] = Slot::Embedded(Box::new(embedded));
                    }
                }
                _ => {
                    let initial = if raw.is_null() {
                        descriptor.default().cloned().unwrap_or(Value::Null)
                    } else {
                        raw
                    };
                    doc.apply_set(index, initial);
                }
            }
        }

        for (key, value) in &record {
            if key != "_id" && key != "id" && schema.descriptor_for_key(key).is_none() {
                tracing::debug!(
                    "Ignoring unknown field for {}: '{}' = '{:?}'",
                    schema.name(),
                    key,
                    value
                );
            }
        }

        doc.changed.clear();
        doc
    }

    // ------------------------------------------------------------------
    // Identity & ownership
    // ------------------------------------------------------------------

    /// The instance's schema
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// This instance's process-unique handle
    pub fn handle(&self) -> DocumentHandle {
        self.handle
    }

    /// Handle of the owning document, for embedded instances
    pub fn owner(&self) -> Option<DocumentHandle> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<DocumentHandle>) {
        self.owner = owner;
    }

    /// The persisted identity, set once an insert succeeds
    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    /// Assign or clear the persisted identity
    pub fn set_id(&mut self, id: Option<ObjectId>) {
        self.id = id;
    }

    // ------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------

    /// Ordered persisted field names
    pub fn fields(&self) -> Vec<&str> {
        self.schema.field_names()
    }

    /// Read a scalar field (null when unset)
    ///
    /// # Panics
    ///
    /// Panics for unknown field names and for embedded/list fields; those
    /// are read with `embedded` and `list`.
    pub fn get(&self, name: &str) -> &Value {
        match &self.slots[self.slot_index(name)] {
            Slot::Scalar(value) => value,
            Slot::Embedded(_) => panic!("field {name} is an embedded document; use embedded()"),
            Slot::List(_) => panic!("field {name} is an embedded list; use list()"),
        }
    }

    /// String content of a field, if set
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).as_str()
    }

    /// Boolean content of a field, if set
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).as_bool()
    }

    /// Integer content of a field, if set
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).as_i64()
    }

    /// Float content of a field, if set
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).as_f64()
    }

    /// Date-time content of a field, if set
    pub fn get_datetime(&self, name: &str) -> Option<NaiveDateTime> {
        self.get(name).as_datetime()
    }

    /// Identifier content of a field, if set
    pub fn get_object_id(&self, name: &str) -> Option<ObjectId> {
        self.get(name).as_object_id()
    }

    /// Write a field through its descriptor: validate, store, mark dirty
    ///
    /// Embedded fields copy object values into the existing nested instance
    /// and silently ignore anything else; list fields ignore assignment
    /// entirely (the list instance and its owner wiring survive).
    ///
    /// # Panics
    ///
    /// Panics for unknown field names.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let index = self.slot_index(name);
        let schema = self.schema;
        match schema.fields()[index].kind() {
            FieldKind::Embedded(_) => self.copy_into_embedded(index, value.into()),
            FieldKind::List(_) => {}
            _ => self.apply_set(index, value.into()),
        }
    }

    /// Assign an embedded field from another document instance
    ///
    /// A same-schema instance has all its field values copied into the
    /// existing nested instance (identity and owner wiring preserved); an
    /// instance of any other schema is silently ignored.
    pub fn assign_embedded(&mut self, name: &str, other: &Document) {
        let index = self.slot_index(name);
        let schema = self.schema;
        match schema.fields()[index].kind() {
            FieldKind::Embedded(nested) => {
                if Schema::same(nested, other.schema) {
                    self.copy_into_embedded(index, Value::Object(other.field_values()));
                }
            }
            _ => panic!("field {name} is not an embedded document field"),
        }
    }

    /// Read an embedded document field
    pub fn embedded(&self, name: &str) -> &Document {
        match &self.slots[self.slot_index(name)] {
            Slot::Embedded(doc) => doc,
            _ => panic!("field {name} is not an embedded document field"),
        }
    }

    /// Mutable access to an embedded document field
    pub fn embedded_mut(&mut self, name: &str) -> &mut Document {
        let index = self.slot_index(name);
        match &mut self.slots[index] {
            Slot::Embedded(doc) => doc,
            _ => panic!("field {name} is not an embedded document field"),
        }
    }

    /// Read an embedded list field
    pub fn list(&self, name: &str) -> &EmbeddedList {
        match &self.slots[self.slot_index(name)] {
            Slot::List(list) => list,
            _ => panic!("field {name} is not an embedded list field"),
        }
    }

    /// Mutable access to an embedded list field
    pub fn list_mut(&mut self, name: &str) -> &mut EmbeddedList {
        let index = self.slot_index(name);
        match &mut self.slots[index] {
            Slot::List(list) => list,
            _ => panic!("field {name} is not an embedded list field"),
        }
    }

    /// Append `element` to an embedded list field
    ///
    /// A valid element joins the list and takes this document as owner. An
    /// invalid element is discarded and each of its full messages is added
    /// to this document's errors under the key `"{name} Error:"`.
    ///
    /// # Panics
    ///
    /// Panics if `element` is not an instance of the list's element schema.
    pub fn push(&mut self, name: &str, element: Document) {
        let index = self.slot_index(name);
        self.push_at(index, element);
    }

    fn push_at(&mut self, index: usize, element: Document) {
        let list_name = self.schema.fields()[index].name().to_string();
        let result = match &mut self.slots[index] {
            Slot::List(list) => {
                let end = list.len();
                list.insert(end, element)
            }
            _ => panic!("field {list_name} is not an embedded list field"),
        };
        if let Err(messages) = result {
            let key = format!("{list_name} Error:");
            for message in messages {
                self.errors.add(&key, message);
            }
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Ordered field name → resolved value pairs
    ///
    /// Nested documents and lists expand recursively to their own field
    /// values, never raw instances.
    pub fn field_values(&self) -> ValueMap {
        self.schema
            .fields()
            .iter()
            .zip(&self.slots)
            .map(|(descriptor, slot)| {
                let value = match slot {
                    Slot::Scalar(value) => value.clone(),
                    Slot::Embedded(doc) => Value::Object(doc.field_values()),
                    Slot::List(list) => Value::Array(
                        list.iter().map(|d| Value::Object(d.field_values())).collect(),
                    ),
                };
                (descriptor.name().to_string(), value)
            })
            .collect()
    }

    /// Same as `field_values`, keyed by persisted names (recursively)
    pub fn mongo_field_values(&self) -> ValueMap {
        self.schema
            .fields()
            .iter()
            .zip(&self.slots)
            .map(|(descriptor, slot)| {
                let value = match slot {
                    Slot::Scalar(value) => value.clone(),
                    Slot::Embedded(doc) => Value::Object(doc.mongo_field_values()),
                    Slot::List(list) => Value::Array(
                        list.iter()
                            .map(|d| Value::Object(d.mongo_field_values()))
                            .collect(),
                    ),
                };
                (descriptor.persisted_name().to_string(), value)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Validation & dirty tracking
    // ------------------------------------------------------------------

    /// Run the model-level validation hook, then report whether the error
    /// collector is empty
    ///
    /// Safe to call repeatedly.
    pub fn valid(&mut self) -> bool {
        let schema = self.schema;
        schema.run_validate_hook(self);
        self.errors.is_empty()
    }

    /// The accumulated validation errors
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Mutable access to the error collector, for model validation hooks
    pub fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    /// Names of fields mutated since construction or the last successful save
    pub fn changed_fields(&self) -> &BTreeSet<String> {
        &self.changed
    }

    pub(crate) fn clear_changed(&mut self) {
        self.changed.clear();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn slot_index(&self, name: &str) -> usize {
        self.schema
            .index_of(name)
            .unwrap_or_else(|| panic!("unknown field {} on {}", name, self.schema.name()))
    }

    fn apply_set(&mut self, index: usize, value: Value) {
        let schema = self.schema;
        let descriptor = &schema.fields()[index];
        let prepared = descriptor.prepare(value);
        descriptor.validate(&prepared, &mut self.errors);
        self.slots[index] = Slot::Scalar(prepared);
        self.changed.insert(descriptor.name().to_string());
    }

    fn copy_into_embedded(&mut self, index: usize, value: Value) {
        let Value::Object(pairs) = value else {
            return;
        };
        if let Slot::Embedded(embedded) = &mut self.slots[index] {
            let nested_schema = embedded.schema;
            for descriptor in nested_schema.fields() {
                let provided = map_get(&pairs, descriptor.name())
                    .or_else(|| map_get(&pairs, descriptor.persisted_name()));
                if let Some(value) = provided {
                    embedded.set(descriptor.name(), value.clone());
                }
            }
        }
    }
}

/// Value equality: same schema, same identity, equal field values
///
/// Distinct schemas never compare equal, even with identical values.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && self.id == other.id
            && self.field_values() == other.field_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use once_cell::sync::Lazy;

    static ADDRESS: Lazy<Schema> = Lazy::new(|| {
        Schema::embedded("Address")
            .field(FieldDescriptor::string("street"))
            .field(FieldDescriptor::string("city"))
            .build()
    });

    static SAMPLE: Lazy<Schema> = Lazy::new(|| {
        Schema::document("Sample")
            .collection("samples")
            .field(FieldDescriptor::string("name").required())
            .field(FieldDescriptor::string("password").transient())
            .field(FieldDescriptor::string("payment_type"))
            .field(FieldDescriptor::datetime("created_at"))
            .field(FieldDescriptor::string("status").stored_as("my_status"))
            .build()
    });

    static WITH_EMBEDDED: Lazy<Schema> = Lazy::new(|| {
        Schema::document("SampleWithEmbedded")
            .collection("sample_with_embeddeds")
            .field(FieldDescriptor::string("name").required())
            .field(FieldDescriptor::embedded("address", &ADDRESS))
            .build()
    });

    static WITH_LIST: Lazy<Schema> = Lazy::new(|| {
        Schema::document("SampleWithList")
            .collection("sample_with_lists")
            .field(FieldDescriptor::list("addresses", &ADDRESS))
            .build()
    });

    #[test]
    fn test_get_fields() {
        let sample = Document::new(&SAMPLE);
        assert_eq!(
            sample.fields(),
            ["name", "payment_type", "created_at", "status"]
        );
    }

    #[test]
    fn test_init_with_map() {
        let sample = Document::from_map(&SAMPLE, vec![("name".to_string(), "John".into())]);
        assert_eq!(sample.get_str("name"), Some("John"));
    }

    #[test]
    fn test_init_ignores_unknown_keys() {
        let sample = Document::from_map(
            &SAMPLE,
            vec![
                ("name".to_string(), "John".into()),
                ("not_a_field".to_string(), Value::Bool(true)),
            ],
        );
        assert_eq!(sample.get_str("name"), Some("John"));
    }

    #[test]
    fn test_get_field_values() {
        let sample = Document::from_map(&SAMPLE, vec![("name".to_string(), "John".into())]);
        assert_eq!(
            sample.field_values(),
            vec![
                ("name".to_string(), "John".into()),
                ("payment_type".to_string(), Value::Null),
                ("created_at".to_string(), Value::Null),
                ("status".to_string(), Value::Null),
            ]
        );
    }

    #[test]
    fn test_get_mongo_field_values() {
        let sample = Document::from_map(
            &SAMPLE,
            vec![
                ("name".to_string(), "John".into()),
                ("status".to_string(), "active".into()),
            ],
        );
        assert_eq!(
            sample.mongo_field_values(),
            vec![
                ("name".to_string(), "John".into()),
                ("payment_type".to_string(), Value::Null),
                ("created_at".to_string(), Value::Null),
                ("my_status".to_string(), "active".into()),
            ]
        );
    }

    #[test]
    fn test_get_errors() {
        let mut sample = Document::new(&SAMPLE);
        sample.set("name", Value::Null);
        assert_eq!(sample.errors().full_messages(), ["Name is required"]);
    }

    #[test]
    fn test_valid_when_no_errors() {
        let mut sample = Document::new(&SAMPLE);
        sample.set("name", "test");
        assert!(sample.valid());
    }

    #[test]
    fn test_invalid_when_errors() {
        let mut sample = Document::new(&SAMPLE);
        sample.set("name", Value::Null);
        assert!(!sample.valid());
    }

    #[test]
    fn test_fields_are_not_dirty_when_initialized() {
        let sample = Document::new(&SAMPLE);
        assert!(sample.changed_fields().is_empty());
    }

    #[test]
    fn test_field_is_added_to_changed_list_when_changed() {
        let mut sample = Document::new(&SAMPLE);
        sample.set("name", "my sample");
        let expected: BTreeSet<String> = ["name".to_string()].into_iter().collect();
        assert_eq!(sample.changed_fields(), &expected);
    }

    #[test]
    fn test_field_is_added_to_changed_list_only_once() {
        let mut sample = Document::new(&SAMPLE);
        sample.set("name", "my sample");
        sample.set("name", "changed name");
        let expected: BTreeSet<String> = ["name".to_string()].into_iter().collect();
        assert_eq!(sample.changed_fields(), &expected);
    }

    #[test]
    fn test_instances_do_not_share_values() {
        let a = Document::from_map(
            &SAMPLE,
            vec![
                ("name".to_string(), "John".into()),
                ("status".to_string(), "active".into()),
            ],
        );
        let b = Document::from_map(
            &SAMPLE,
            vec![
                ("name".to_string(), "Walter".into()),
                ("status".to_string(), "idle".into()),
            ],
        );
        assert_eq!(a.get_str("name"), Some("John"));
        assert_eq!(b.get_str("name"), Some("Walter"));
    }

    #[test]
    fn test_default_applied_through_validation() {
        static WITH_DEFAULT: Lazy<Schema> = Lazy::new(|| {
            Schema::embedded("WithDefault")
                .field(FieldDescriptor::integer("count").default_value(1))
                .build()
        });
        let doc = Document::new(&WITH_DEFAULT);
        assert_eq!(doc.get_i64("count"), Some(1));
    }

    #[test]
    fn test_invalid_default_is_reported() {
        static BAD_DEFAULT: Lazy<Schema> = Lazy::new(|| {
            Schema::embedded("BadDefault")
                .field(FieldDescriptor::integer("count").min_value(0).default_value(-1))
                .build()
        });
        let doc = Document::new(&BAD_DEFAULT);
        assert_eq!(doc.get_i64("count"), Some(-1));
        assert_eq!(doc.errors().count(), 1);
    }

    #[test]
    fn test_embedded_field_materialized_with_owner() {
        let sample = Document::new(&WITH_EMBEDDED);
        assert_eq!(sample.embedded("address").owner(), Some(sample.handle()));
    }

    #[test]
    fn test_embedded_field_values() {
        let mut sample =
            Document::from_map(&WITH_EMBEDDED, vec![("name".to_string(), "John".into())]);
        sample.embedded_mut("address").set("street", "123 Elm St.");
        sample.embedded_mut("address").set("city", "Anywhere");

        assert_eq!(
            sample.field_values(),
            vec![
                ("name".to_string(), "John".into()),
                (
                    "address".to_string(),
                    Value::Object(vec![
                        ("street".to_string(), "123 Elm St.".into()),
                        ("city".to_string(), "Anywhere".into()),
                    ])
                ),
            ]
        );
    }

    #[test]
    fn test_embedded_assignment_copies_into_existing_instance() {
        let mut sample = Document::new(&WITH_EMBEDDED);
        let before = sample.embedded("address").handle();

        sample.set(
            "address",
            Value::Object(vec![("street".to_string(), "1 Elm St".into())]),
        );

        let address = sample.embedded("address");
        assert_eq!(address.handle(), before);
        assert_eq!(address.owner(), Some(sample.handle()));
        assert_eq!(address.get_str("street"), Some("1 Elm St"));
    }

    #[test]
    fn test_embedded_assignment_of_other_type_is_ignored() {
        static OTHER: Lazy<Schema> = Lazy::new(|| {
            Schema::embedded("Other")
                .field(FieldDescriptor::string("street"))
                .build()
        });
        let mut sample = Document::new(&WITH_EMBEDDED);
        sample.embedded_mut("address").set("street", "123 Elm St.");

        let mut other = Document::new(&OTHER);
        other.set("street", "replacement");
        sample.assign_embedded("address", &other);

        assert_eq!(sample.embedded("address").get_str("street"), Some("123 Elm St."));
    }

    #[test]
    fn test_embedded_assignment_of_same_type_copies_values() {
        let mut sample = Document::new(&WITH_EMBEDDED);
        let other = Document::from_map(
            &ADDRESS,
            vec![
                ("street".to_string(), "123 Elm St.".into()),
                ("city".to_string(), "Anywhere".into()),
            ],
        );
        sample.assign_embedded("address", &other);
        assert_eq!(sample.embedded("address").get_str("city"), Some("Anywhere"));
    }

    #[test]
    fn test_list_field_defaults_to_empty_list() {
        let sample = Document::new(&WITH_LIST);
        assert!(sample.list("addresses").is_empty());
        assert_eq!(sample.list("addresses").owner(), Some(sample.handle()));
    }

    #[test]
    fn test_list_assignment_is_ignored() {
        let mut sample = Document::new(&WITH_LIST);
        sample.set("addresses", "not a list");
        assert!(sample.list("addresses").is_empty());
        assert_eq!(sample.list("addresses").owner(), Some(sample.handle()));
    }

    #[test]
    fn test_push_valid_element() {
        let mut sample = Document::new(&WITH_LIST);
        let address =
            Document::from_map(&ADDRESS, vec![("street".to_string(), "123 Elm Street".into())]);
        sample.push("addresses", address);

        assert_eq!(sample.list("addresses").len(), 1);
        assert_eq!(
            sample.list("addresses")[0].owner(),
            Some(sample.handle())
        );
    }

    #[test]
    fn test_push_invalid_element_merges_errors() {
        static STRICT_ADDRESS: Lazy<Schema> = Lazy::new(|| {
            Schema::embedded("StrictAddress")
                .field(FieldDescriptor::string("street").required())
                .build()
        });
        static STRICT_LIST: Lazy<Schema> = Lazy::new(|| {
            Schema::document("StrictOwner")
                .collection("strict_owners")
                .field(FieldDescriptor::list("addresses", &STRICT_ADDRESS))
                .build()
        });

        let mut sample = Document::new(&STRICT_LIST);
        sample.push("addresses", Document::new(&STRICT_ADDRESS));

        assert!(sample.list("addresses").is_empty());
        assert_eq!(
            sample.errors().full_messages(),
            ["Addresses Error: Street is required"]
        );
    }

    #[test]
    fn test_init_with_embedded_list_args() {
        static ORDER_LINE: Lazy<Schema> = Lazy::new(|| {
            Schema::embedded("OrderLine")
                .field(FieldDescriptor::float("price"))
                .build()
        });
        static ORDER: Lazy<Schema> = Lazy::new(|| {
            Schema::document("Order")
                .collection("orders")
                .field(FieldDescriptor::string("name"))
                .field(FieldDescriptor::float("total"))
                .field(FieldDescriptor::list("order_lines", &ORDER_LINE))
                .build()
        });

        let order = Document::from_map(
            &ORDER,
            vec![
                ("name".to_string(), "foo".into()),
                ("total".to_string(), Value::Float(1.1)),
                (
                    "order_lines".to_string(),
                    Value::Array(vec![Value::Object(vec![(
                        "price".to_string(),
                        Value::Float(2.1),
                    )])]),
                ),
            ],
        );

        assert_eq!(order.get_str("name"), Some("foo"));
        assert_eq!(order.list("order_lines")[0].get_f64("price"), Some(2.1));
    }

    #[test]
    fn test_equality_by_values() {
        let a = Document::from_map(
            &ADDRESS,
            vec![
                ("street".to_string(), "123 Elm St.".into()),
                ("city".to_string(), "Anywhere".into()),
            ],
        );
        let b = Document::from_map(
            &ADDRESS,
            vec![
                ("street".to_string(), "123 Elm St.".into()),
                ("city".to_string(), "Anywhere".into()),
            ],
        );
        assert_eq!(a, b);

        let c = Document::from_map(&ADDRESS, vec![("street".to_string(), "Other".into())]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unequal_if_not_exact_same_type() {
        static ADDRESS_TWIN: Lazy<Schema> = Lazy::new(|| {
            Schema::embedded("Address")
                .field(FieldDescriptor::string("street"))
                .field(FieldDescriptor::string("city"))
                .build()
        });
        let a = Document::from_map(&ADDRESS, vec![("street".to_string(), "X".into())]);
        let b = Document::from_map(&ADDRESS_TWIN, vec![("street".to_string(), "X".into())]);
        assert_ne!(a, b);
    }

    #[test]
    #[should_panic(expected = "unknown field")]
    fn test_unknown_field_set_panics() {
        let mut sample = Document::new(&SAMPLE);
        sample.set("nope", 1i64);
    }
}
