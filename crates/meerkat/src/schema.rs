//! Document schemas: ordered, immutable field registries
//!
//! A `Schema` is built once per document type with `SchemaBuilder` and never
//! mutated afterwards. It keeps the persisted field descriptors in
//! declaration order and carries the optional model-level validation hook.
//! Schema identity (pointer equality of the `&'static Schema`) stands in for
//! concrete-type identity wherever the mapping layer needs to compare types.

use crate::document::Document;
use crate::field::FieldDescriptor;

/// Model-level validation hook, run by `Document::valid`
///
/// The hook may clear and add errors on arbitrary field names (cross-field
/// rules); the default is a no-op.
pub type ValidateHook = fn(&mut Document);

/// Immutable schema for one document type
#[derive(Debug)]
pub struct Schema {
    name: String,
    collection: Option<String>,
    fields: Vec<FieldDescriptor>,
    validate_hook: Option<ValidateHook>,
}

impl Schema {
    /// Start a schema for a collection-backed document type
    pub fn document(name: &str) -> SchemaBuilder {
        SchemaBuilder::new(name, false)
    }

    /// Start a schema for an embedded document type (no collection identity)
    pub fn embedded(name: &str) -> SchemaBuilder {
        SchemaBuilder::new(name, true)
    }

    /// The document type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing collection, for document types
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// True if this schema has no collection identity
    pub fn is_embedded(&self) -> bool {
        self.collection.is_none()
    }

    /// Persisted field descriptors, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Ordered application-facing field names
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    /// Look up a descriptor by application-facing name
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Position of a field by application-facing name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Look up a descriptor by application name or persisted name
    pub fn descriptor_for_key(&self, key: &str) -> Option<&FieldDescriptor> {
        self.descriptor(key)
            .or_else(|| self.fields.iter().find(|f| f.persisted_name() == key))
    }

    /// True if a field with this application-facing name is declared
    pub fn declares(&self, name: &str) -> bool {
        self.descriptor(name).is_some()
    }

    pub(crate) fn run_validate_hook(&self, doc: &mut Document) {
        if let Some(hook) = self.validate_hook {
            hook(doc);
        }
    }

    /// Schema identity: same `&'static Schema`, not structural equality
    pub fn same(a: &'static Schema, b: &'static Schema) -> bool {
        std::ptr::eq(a, b)
    }
}

/// Builder for `Schema`
///
/// Fields may be pushed in any order; the built schema is ordered by each
/// descriptor's creation order, so the result is stable and reproducible.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    embedded: bool,
    collection: Option<String>,
    fields: Vec<FieldDescriptor>,
    validate_hook: Option<ValidateHook>,
}

impl SchemaBuilder {
    fn new(name: &str, embedded: bool) -> Self {
        Self {
            name: name.to_string(),
            embedded,
            collection: None,
            fields: Vec::new(),
            validate_hook: None,
        }
    }

    /// Name of the backing collection (document schemas only)
    pub fn collection(mut self, name: &str) -> Self {
        assert!(
            !self.embedded,
            "embedded schema {} cannot have a collection",
            self.name
        );
        self.collection = Some(name.to_string());
        self
    }

    /// Declare a field
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Install the model-level validation hook
    pub fn validate_with(mut self, hook: ValidateHook) -> Self {
        self.validate_hook = Some(hook);
        self
    }

    /// Freeze the schema
    ///
    /// Keeps only persisted fields, ordered by creation order.
    ///
    /// # Panics
    ///
    /// Panics on duplicate field names, or if a document schema has no
    /// collection name.
    pub fn build(self) -> Schema {
        if !self.embedded {
            assert!(
                self.collection.is_some(),
                "document schema {} must name a collection",
                self.name
            );
        }

        let mut fields: Vec<FieldDescriptor> = self
            .fields
            .into_iter()
            .filter(|f| f.is_persisted())
            .collect();
        fields.sort_by_key(FieldDescriptor::creation_order);

        for (i, field) in fields.iter().enumerate() {
            let duplicate = fields[i + 1..]
                .iter()
                .any(|other| other.name() == field.name());
            assert!(
                !duplicate,
                "duplicate field {} in schema {}",
                field.name(),
                self.name
            );
        }

        Schema {
            name: self.name,
            collection: self.collection,
            fields,
            validate_hook: self.validate_hook,
        }
    }
}
