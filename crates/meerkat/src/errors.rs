//! Per-field validation error collector
//!
//! Validation never fails a call; messages accumulate here and are surfaced
//! through `Document::valid` and `full_messages`.

use std::fmt;

/// Collection of validation messages, keyed by field name
///
/// Field keys keep their first-insertion order, and each field's message list
/// keeps its own insertion order. Clearing one field does not disturb the
/// others, which lets field-level and model-level validation revalidate
/// independently.
#[derive(Debug, Clone, Default)]
pub struct Errors {
    entries: Vec<(String, Vec<String>)>,
}

impl Errors {
    /// Create a new empty collector
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add `message` to the messages on `field`
    ///
    /// More than one message can be added to the same field, including
    /// duplicates if the field is not cleared between validations.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self
                .entries
                .push((field.to_string(), vec![message.into()])),
        }
    }

    /// Empty the message list for `field` only
    pub fn clear(&mut self, field: &str) {
        if let Some((_, messages)) = self.entries.iter_mut().find(|(f, _)| f == field) {
            messages.clear();
        }
    }

    /// Total number of messages across all fields
    pub fn count(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.len()).sum()
    }

    /// Check if there are any messages
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Raw messages for `field`
    pub fn get(&self, field: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }

    /// Humanized `"Field message"` strings for `field`
    pub fn full_messages_for(&self, field: &str) -> Vec<String> {
        let humanized = titleize(field);
        self.get(field)
            .iter()
            .map(|msg| format!("{} {}", humanized, msg))
            .collect()
    }

    /// All humanized messages, in field-then-message insertion order
    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(field, _)| self.full_messages_for(field))
            .collect()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.count())
    }
}

/// Humanize a field key: `"my_status"` becomes `"My Status"`
fn titleize(field: &str) -> String {
    field
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_error() {
        let mut errors = Errors::new();
        errors.add("email", "is required");
        assert_eq!(errors.get("email"), ["is required"]);
    }

    #[test]
    fn test_add_errors_to_one_field() {
        let mut errors = Errors::new();
        errors.add("email", "is required");
        errors.add("email", "must be valid");
        assert_eq!(errors.get("email"), ["is required", "must be valid"]);
    }

    #[test]
    fn test_clear() {
        let mut errors = Errors::new();
        errors.add("email", "is required");
        errors.add("email", "must be valid");
        errors.add("first_name", "is required");

        errors.clear("email");
        assert_eq!(errors.get("email").len(), 0);
        assert_eq!(errors.get("first_name"), ["is required"]);
    }

    #[test]
    fn test_count() {
        let mut errors = Errors::new();
        errors.add("email", "is required");
        errors.add("email", "must be valid");
        errors.add("first_name", "is required");
        assert_eq!(errors.count(), 3);
    }

    #[test]
    fn test_full_messages_for() {
        let mut errors = Errors::new();
        errors.add("email", "is required");
        errors.add("email", "must be valid");
        errors.add("first_name", "is required");

        assert_eq!(
            errors.full_messages_for("email"),
            ["Email is required", "Email must be valid"]
        );
    }

    #[test]
    fn test_full_messages() {
        let mut errors = Errors::new();
        errors.add("email", "is required");
        errors.add("email", "must be valid");
        errors.add("first_name", "is required");

        assert_eq!(
            errors.full_messages(),
            [
                "Email is required",
                "Email must be valid",
                "First Name is required"
            ]
        );
    }

    #[test]
    fn test_clear_keeps_field_position() {
        let mut errors = Errors::new();
        errors.add("a", "first");
        errors.add("b", "second");
        errors.clear("a");
        errors.add("a", "again");
        assert_eq!(errors.full_messages(), ["A again", "B second"]);
    }

    #[test]
    fn test_titleize() {
        assert_eq!(titleize("name"), "Name");
        assert_eq!(titleize("my_status"), "My Status");
        assert_eq!(titleize("addresses Error:"), "Addresses Error:");
    }

    #[test]
    fn test_unknown_field_is_empty() {
        let errors = Errors::new();
        assert!(errors.get("missing").is_empty());
        assert!(errors.full_messages_for("missing").is_empty());
    }
}
