//! Field descriptors: typed accessors and validators for document fields
//!
//! A `FieldDescriptor` is created exactly once, at schema-definition time,
//! and shared (immutable) by every instance of its document type. Validation
//! accumulates messages on the instance's error collector and never fails the
//! call; panics are reserved for declaration-time programmer errors.

use std::sync::atomic::{AtomicU64, Ordering};

use bson::oid::ObjectId;
use regex::Regex;

use crate::errors::Errors;
use crate::schema::Schema;
use crate::value::Value;

/// Process-wide monotonic counter; touched only at schema-declaration time.
static NEXT_CREATION_ORDER: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// Constraint rules
// ============================================================================

/// Constraints for string fields
#[derive(Debug, Default)]
pub struct StringRules {
    /// Exact length (in characters)
    pub length: Option<usize>,
    /// Minimum length (in characters)
    pub min_length: Option<usize>,
    /// Maximum length (in characters)
    pub max_length: Option<usize>,
    /// Full-match pattern against the stored value
    pub pattern: Option<Regex>,
}

/// Inclusive bounds for integer fields
#[derive(Debug, Default)]
pub struct IntegerRules {
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

/// Inclusive bounds for float fields
#[derive(Debug, Default)]
pub struct FloatRules {
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

// ============================================================================
// Field Kind
// ============================================================================

/// Typed variant of a field descriptor
#[derive(Debug)]
pub enum FieldKind {
    String(StringRules),
    Integer(IntegerRules),
    Float(FloatRules),
    Boolean,
    DateTime,
    ObjectId,
    /// Nested document of a fixed embedded schema
    Embedded(&'static Schema),
    /// Ordered list of nested documents of a fixed embedded schema
    List(&'static Schema),
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// A single declared field: name, constraints, and validation logic
///
/// Built with the consuming-constructor style:
///
/// ```ignore
/// FieldDescriptor::string("status")
///     .stored_as("my_status")
///     .choices(["Good".into(), "Bad".into()])
/// ```
#[derive(Debug)]
pub struct FieldDescriptor {
    name: String,
    stored_as: Option<String>,
    required: bool,
    default: Option<Value>,
    choices: Option<Vec<Value>>,
    persist: bool,
    unique: bool,
    creation_order: u64,
    kind: FieldKind,
}

impl FieldDescriptor {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            stored_as: None,
            required: false,
            default: None,
            choices: None,
            persist: true,
            unique: false,
            creation_order: NEXT_CREATION_ORDER.fetch_add(1, Ordering::SeqCst),
            kind,
        }
    }

    /// A string field; leading/trailing whitespace is stripped on assignment
    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String(StringRules::default()))
    }

    /// An integer field
    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldKind::Integer(IntegerRules::default()))
    }

    /// A float field; integer input is coerced before storing
    pub fn float(name: &str) -> Self {
        Self::new(name, FieldKind::Float(FloatRules::default()))
    }

    /// A boolean field; only `true` and `false` validate
    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// A naive date-time field
    pub fn datetime(name: &str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    /// A document-identifier field; hex strings convert on assignment
    pub fn object_id(name: &str) -> Self {
        Self::new(name, FieldKind::ObjectId)
    }

    /// A nested embedded document of `schema`
    ///
    /// # Panics
    ///
    /// Panics at declaration time if `schema` has collection identity.
    pub fn embedded(name: &str, schema: &'static Schema) -> Self {
        assert!(
            schema.is_embedded(),
            "expected {} to be an embedded schema",
            schema.name()
        );
        Self::new(name, FieldKind::Embedded(schema))
    }

    /// An ordered list of embedded documents of `schema`
    ///
    /// # Panics
    ///
    /// Panics at declaration time if `schema` has collection identity.
    pub fn list(name: &str, schema: &'static Schema) -> Self {
        assert!(
            schema.is_embedded(),
            "expected {} to be an embedded schema",
            schema.name()
        );
        Self::new(name, FieldKind::List(schema))
    }

    // ------------------------------------------------------------------
    // Common attributes
    // ------------------------------------------------------------------

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Default value, applied through the normal validation path
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Restrict the value to a fixed list of choices
    pub fn choices(mut self, choices: impl IntoIterator<Item = Value>) -> Self {
        self.choices = Some(choices.into_iter().collect());
        self
    }

    /// Exclude the field from the persisted representation
    pub fn transient(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Declare a uniqueness intent for the persisted field
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Persist under a different name than the application-facing one
    pub fn stored_as(mut self, name: &str) -> Self {
        self.stored_as = Some(name.to_string());
        self
    }

    // ------------------------------------------------------------------
    // Typed constraints
    // ------------------------------------------------------------------

    /// Exact character length (string fields only)
    pub fn length(mut self, length: usize) -> Self {
        match &mut self.kind {
            FieldKind::String(rules) => rules.length = Some(length),
            _ => panic!("length constraint only applies to string fields"),
        }
        self
    }

    /// Minimum character length (string fields only)
    pub fn min_length(mut self, min: usize) -> Self {
        match &mut self.kind {
            FieldKind::String(rules) => rules.min_length = Some(min),
            _ => panic!("min_length constraint only applies to string fields"),
        }
        self
    }

    /// Maximum character length (string fields only)
    pub fn max_length(mut self, max: usize) -> Self {
        match &mut self.kind {
            FieldKind::String(rules) => rules.max_length = Some(max),
            _ => panic!("max_length constraint only applies to string fields"),
        }
        self
    }

    /// Full-match regex pattern (string fields only)
    ///
    /// # Panics
    ///
    /// Panics at declaration time if `pattern` is not a valid expression.
    pub fn pattern(mut self, pattern: &str) -> Self {
        let anchored = format!(r"\A(?:{pattern})\z");
        let regex = Regex::new(&anchored)
            .unwrap_or_else(|e| panic!("invalid pattern {pattern:?}: {e}"));
        match &mut self.kind {
            FieldKind::String(rules) => rules.pattern = Some(regex),
            _ => panic!("pattern constraint only applies to string fields"),
        }
        self
    }

    /// Inclusive minimum (integer and float fields)
    pub fn min_value(mut self, min: impl Into<Value>) -> Self {
        let min = min.into();
        match (&mut self.kind, &min) {
            (FieldKind::Integer(rules), Value::Int(i)) => rules.min_value = Some(*i),
            (FieldKind::Float(rules), _) => {
                rules.min_value = Some(numeric_bound(&min));
            }
            _ => panic!("min_value constraint only applies to numeric fields"),
        }
        self
    }

    /// Inclusive maximum (integer and float fields)
    pub fn max_value(mut self, max: impl Into<Value>) -> Self {
        let max = max.into();
        match (&mut self.kind, &max) {
            (FieldKind::Integer(rules), Value::Int(i)) => rules.max_value = Some(*i),
            (FieldKind::Float(rules), _) => {
                rules.max_value = Some(numeric_bound(&max));
            }
            _ => panic!("max_value constraint only applies to numeric fields"),
        }
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Application-facing field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used in the persisted representation
    pub fn persisted_name(&self) -> &str {
        self.stored_as.as_deref().unwrap_or(&self.name)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_persisted(&self) -> bool {
        self.persist
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn creation_order(&self) -> u64 {
        self.creation_order
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Nested schema for embedded and list fields
    pub fn nested_schema(&self) -> Option<&'static Schema> {
        match &self.kind {
            FieldKind::Embedded(schema) | FieldKind::List(schema) => Some(*schema),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Assignment pipeline
    // ------------------------------------------------------------------

    /// Normalize an incoming value before validation and storage
    ///
    /// Strings are stripped of surrounding whitespace, integers coerce to
    /// float for float fields, and valid hex strings convert to ObjectId.
    pub fn prepare(&self, value: Value) -> Value {
        match (&self.kind, value) {
            (FieldKind::String(_), Value::String(s)) => Value::String(s.trim().to_string()),
            (FieldKind::Float(_), Value::Int(i)) => Value::Float(i as f64),
            (FieldKind::ObjectId, Value::String(s)) => match ObjectId::parse_str(&s) {
                Ok(id) => Value::ObjectId(id),
                Err(_) => Value::String(s),
            },
            (_, value) => value,
        }
    }

    /// Validate a (prepared) value, accumulating messages on `errors`
    ///
    /// Clears this field's prior messages first, then runs base checks
    /// followed by type checks. Checks do not short-circuit; a check that
    /// needs a value of the right type to proceed is skipped instead.
    pub fn validate(&self, value: &Value, errors: &mut Errors) {
        let key = self.persisted_name();
        errors.clear(key);

        if self.required && is_missing(value) {
            errors.add(key, "is required");
        }

        if let Some(choices) = &self.choices {
            if !choices.contains(value) {
                errors.add(key, "value must be in list");
            }
        }

        match &self.kind {
            FieldKind::String(rules) => validate_string(key, value, rules, errors),
            FieldKind::Integer(rules) => validate_integer(key, value, rules, errors),
            FieldKind::Float(rules) => validate_float(key, value, rules, errors),
            FieldKind::Boolean => {
                if !matches!(value, Value::Bool(_)) {
                    errors.add(key, "must be a valid boolean");
                }
            }
            FieldKind::DateTime => {
                if !value.is_null() && !matches!(value, Value::DateTime(_)) {
                    errors.add(key, "must be a valid date and time");
                }
            }
            FieldKind::ObjectId => {
                if !value.is_null() && !matches!(value, Value::ObjectId(_)) {
                    errors.add(key, "must be a valid Object Id");
                }
            }
            // Assignment semantics for nested fields live on the document.
            FieldKind::Embedded(_) | FieldKind::List(_) => {}
        }
    }
}

/// Null and empty strings count as missing for the required check
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn validate_string(key: &str, value: &Value, rules: &StringRules, errors: &mut Errors) {
    let len = match value {
        Value::Null => None,
        Value::String(s) => Some(s.chars().count()),
        _ => {
            errors.add(key, "must be a string");
            return;
        }
    };

    if let Some(expected) = rules.length {
        if len != Some(expected) {
            errors.add(
                key,
                format!("is the wrong length (should be {expected} characters)"),
            );
        }
    }

    // A missing value is shorter than any minimum but never over a maximum.
    if let Some(min) = rules.min_length {
        if len.map_or(true, |l| l < min) {
            errors.add(key, format!("is too short (minimum is {min} characters)"));
        }
    }

    if let Some(max) = rules.max_length {
        if len.is_some_and(|l| l > max) {
            errors.add(key, format!("is too long (maximum is {max} characters)"));
        }
    }

    if let (Some(regex), Value::String(s)) = (&rules.pattern, value) {
        if !regex.is_match(s) {
            errors.add(key, "is in the wrong format");
        }
    }
}

fn validate_integer(key: &str, value: &Value, rules: &IntegerRules, errors: &mut Errors) {
    if !matches!(value, Value::Int(_)) {
        errors.add(key, "must be a integer");
    }

    let numeric = match value {
        Value::Null => None,
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        // Range checks need a comparable value.
        _ => return,
    };

    if let Some(min) = rules.min_value {
        if numeric.map_or(true, |n| n < min as f64) {
            errors.add(key, format!("is too small (minimum is {min})"));
        }
    }

    if let Some(max) = rules.max_value {
        if numeric.is_some_and(|n| n > max as f64) {
            errors.add(key, format!("is too big (maximum is {max})"));
        }
    }
}

fn validate_float(key: &str, value: &Value, rules: &FloatRules, errors: &mut Errors) {
    if !matches!(value, Value::Float(_) | Value::Int(_)) {
        errors.add(key, "must be a float");
    }

    let numeric = match value {
        Value::Null => None,
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => return,
    };

    if let Some(min) = rules.min_value {
        if numeric.map_or(true, |n| n < min) {
            errors.add(key, format!("is too small (minimum is {min:?})"));
        }
    }

    if let Some(max) = rules.max_value {
        if numeric.is_some_and(|n| n > max) {
            errors.add(key, format!("is too big (maximum is {max:?})"));
        }
    }
}

fn numeric_bound(value: &Value) -> f64 {
    value
        .as_f64()
        .unwrap_or_else(|| panic!("numeric bound must be a number, got {}", value.type_name()))
}
