//! The model-side contract the adapter works against.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;

use crate::constants::SPLIT_JOINER;
use crate::errors::Errors;

/// A model instance with nullable timestamp fields and validation errors.
///
/// Implementors map field names to their timestamp storage. Names the model
/// does not know should read as `None` and ignore writes.
pub trait TimestampModel {
    fn timestamp(&self, field: &str) -> Option<NaiveDateTime>;

    fn set_timestamp(&mut self, field: &str, value: Option<NaiveDateTime>);

    fn errors(&self) -> &Errors;

    fn errors_mut(&mut self) -> &mut Errors;

    /// Transient accessor state owned by this instance.
    fn accessor_state(&mut self) -> &mut AccessorState;
}

/// Raw halves written through the split accessors of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitInput {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl SplitInput {
    /// `"<time> on <date>"` once both halves are present.
    pub fn combined(&self) -> Option<String> {
        match (&self.date, &self.time) {
            (Some(date), Some(time)) => Some(format!("{time}{SPLIT_JOINER}{date}")),
            _ => None,
        }
    }
}

/// Per-instance state behind the string accessors. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct AccessorState {
    split: HashMap<String, SplitInput>,
    rejected: BTreeSet<String>,
}

impl AccessorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Halves buffered so far for `field`.
    pub fn split_input(&self, field: &str) -> Option<&SplitInput> {
        self.split.get(field)
    }

    pub(crate) fn split_input_mut(&mut self, field: &str) -> &mut SplitInput {
        self.split.entry(field.to_string()).or_default()
    }

    /// Whether the last write to `string_field` was rejected.
    pub fn is_rejected(&self, string_field: &str) -> bool {
        self.rejected.contains(string_field)
    }

    pub(crate) fn mark_rejected(&mut self, string_field: &str) {
        self.rejected.insert(string_field.to_string());
    }

    pub(crate) fn clear_rejected(&mut self, string_field: &str) {
        self.rejected.remove(string_field);
    }

    pub(crate) fn rejected(&self) -> impl Iterator<Item = &str> {
        self.rejected.iter().map(String::as_str)
    }
}
