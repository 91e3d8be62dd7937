//! Meerkat
//!
//! A thin object-document mapper for MongoDB-like stores. Document types are
//! declared as schemas of typed, validated fields; instances translate
//! between typed values and the store's flat records, tracking changes and
//! accumulating validation errors along the way.
//!
//! # Features
//! - Declarative schemas with declaration-order field registries
//! - Typed field descriptors with chained, non-short-circuiting validation
//! - Embedded documents and type-constrained embedded lists
//! - Field renaming between application and persisted names
//! - Dirty tracking with rollback-capable save semantics
//! - JSON codec with extended-type wrappers for dates and identifiers
//! - A narrow, injectable store boundary (no driver, no I/O in the core)
//!
//! # Example
//!
//! ```
//! use meerkat::{Document, FieldDescriptor, Schema};
//! use once_cell::sync::Lazy;
//!
//! static SAMPLE: Lazy<Schema> = Lazy::new(|| {
//!     Schema::document("Sample")
//!         .collection("samples")
//!         .field(FieldDescriptor::string("name").required())
//!         .build()
//! });
//!
//! let mut sample = Document::new(&SAMPLE);
//! assert!(!sample.valid());
//! assert_eq!(sample.errors().full_messages(), ["Name is required"]);
//!
//! sample.set("name", "Paul");
//! assert!(sample.valid());
//! ```

pub mod document;
pub mod embedded;
pub mod errors;
pub mod field;
pub mod json;
pub mod memory;
pub mod persist;
pub mod schema;
pub mod store;
pub mod util;
pub mod value;

pub use document::{Document, DocumentHandle};
pub use embedded::EmbeddedList;
pub use errors::Errors;
pub use field::{FieldDescriptor, FieldKind, FloatRules, IntegerRules, StringRules};
pub use json::{json_to_value, value_to_json};
pub use meerkat_common::{MeerkatError, Result};
pub use memory::MemoryStore;
pub use persist::{
    count, delete, ensure_indexes, find, find_all, find_by_id, find_one, save,
};
pub use schema::{Schema, SchemaBuilder, ValidateHook};
pub use store::{DocumentStore, Filter, RawRecord, WriteOutcome};
pub use util::Timer;
pub use value::{map_get, Value, ValueMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
