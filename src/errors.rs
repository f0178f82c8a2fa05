//! Per-field validation messages attached to a model instance.

use std::collections::BTreeMap;

/// Ordered validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors {
    entries: BTreeMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the messages for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field`, oldest first.
    pub fn on(&self, field: &str) -> &[String] {
        self.entries.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.on(field).iter().any(|m| m == message)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Fields that carry at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(field, _)| field.as_str())
    }

    /// Messages prefixed with a humanized field name, e.g.
    /// "Showered at string is invalid".
    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(field, messages)| {
                let label = humanize(field);
                messages.iter().map(move |message| format!("{label} {message}"))
            })
            .collect()
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut errors = Errors::new();
        errors.add("ate_at", "can't be blank");
        errors.add("ate_at", "is too early");
        assert_eq!(errors.on("ate_at"), ["can't be blank", "is too early"]);
        assert_eq!(errors.len(), 2);
        assert!(errors.on("slept_at").is_empty());
    }

    #[test]
    fn test_full_messages_humanize_field_names() {
        let mut errors = Errors::new();
        errors.add("showered_at_string", "is invalid");
        assert_eq!(errors.full_messages(), vec!["Showered at string is invalid".to_string()]);
    }

    #[test]
    fn test_clear_empties_collection() {
        let mut errors = Errors::new();
        errors.add("woke_at", "is invalid");
        assert!(!errors.is_empty());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["woke_at"]);
        errors.clear();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }
}
