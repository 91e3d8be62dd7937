//! Ordered, type-constrained lists of embedded documents

use std::ops::Index;

use crate::document::{Document, DocumentHandle};
use crate::schema::Schema;

/// A list of embedded documents, constrained to one element schema
///
/// Inserting an element of any other schema is a programmer error and
/// panics. Inserting an invalid element leaves the list unchanged and hands
/// the element's messages back so the owning document can record them.
/// Sorting is deliberately unsupported.
#[derive(Debug)]
pub struct EmbeddedList {
    name: String,
    schema: &'static Schema,
    owner: Option<DocumentHandle>,
    items: Vec<Document>,
}

impl EmbeddedList {
    /// Create an empty list for elements of `schema`
    ///
    /// # Panics
    ///
    /// Panics if `schema` has collection identity.
    pub fn new(name: &str, schema: &'static Schema) -> Self {
        assert!(
            schema.is_embedded(),
            "embedded lists only accept embedded document schemas, got {}",
            schema.name()
        );
        Self {
            name: name.to_string(),
            schema,
            owner: None,
            items: Vec::new(),
        }
    }

    /// The list's field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element schema
    pub fn element_schema(&self) -> &'static Schema {
        self.schema
    }

    /// Handle of the owning document, if any
    pub fn owner(&self) -> Option<DocumentHandle> {
        self.owner
    }

    /// Assign the owner and re-propagate it to every current element
    pub fn set_owner(&mut self, owner: Option<DocumentHandle>) {
        self.owner = owner;
        for item in &mut self.items {
            item.set_owner(owner);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Document> {
        self.items.iter_mut()
    }

    /// Insert `element` at `index`
    ///
    /// A valid element takes the list's owner and joins the list. An invalid
    /// element is not inserted; its full messages are returned for the owner
    /// to record.
    ///
    /// # Panics
    ///
    /// Panics if `element` is not an instance of the list's element schema.
    pub fn insert(&mut self, index: usize, mut element: Document) -> Result<(), Vec<String>> {
        assert!(
            Schema::same(self.schema, element.schema()),
            "this embedded list only accepts {} documents (tried to add {})",
            self.schema.name(),
            element.schema().name()
        );

        if element.valid() {
            element.set_owner(self.owner);
            self.items.insert(index, element);
            Ok(())
        } else {
            Err(element.errors().full_messages())
        }
    }

    /// Insert `element` at the end of the list
    pub fn append(&mut self, element: Document) -> Result<(), Vec<String>> {
        self.insert(self.items.len(), element)
    }

    /// Remove and return the element at `index`
    pub fn remove(&mut self, index: usize) -> Document {
        self.items.remove(index)
    }

    /// Linear scan for the first element equal to `item`
    pub fn find(&self, item: &Document) -> Option<&Document> {
        self.items.iter().find(|i| *i == item)
    }
}

impl Index<usize> for EmbeddedList {
    type Output = Document;

    fn index(&self, index: usize) -> &Document {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a EmbeddedList {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl PartialEq for EmbeddedList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl PartialEq<[Document]> for EmbeddedList {
    fn eq(&self, other: &[Document]) -> bool {
        self.items == other
    }
}

impl PartialEq<Vec<Document>> for EmbeddedList {
    fn eq(&self, other: &Vec<Document>) -> bool {
        &self.items == other
    }
}
