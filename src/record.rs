// src/record.rs
use crate::utils::error::RecordError;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered set of canonical fields and their extracted values.
/// An empty value means "not found". Keys are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, String)>,
}

impl Record {
    /// Creates a record with every name present and every value empty.
    pub fn empty<I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        Self {
            fields: names.into_iter().map(|name| (name, String::new())).collect(),
        }
    }

    pub(crate) fn from_pairs(fields: Vec<(&'static str, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrites the value of an existing field. Fields are never added.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), RecordError> {
        let slot = self
            .fields
            .iter_mut()
            .find(|(name, _)| *name == field)
            .ok_or_else(|| RecordError::UnknownField(field.to_string()))?;
        slot.1 = value.into();
        Ok(())
    }

    /// Applies a `FIELD=VALUE` assignment (split at the first `=`).
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), RecordError> {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| RecordError::MalformedAssignment(assignment.to_string()))?;
        self.set(field.trim(), value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, value)| (*name, value.as_str()))
    }

    /// Number of fields with a non-empty value.
    pub fn found_count(&self) -> usize {
        self.fields.iter().filter(|(_, value)| !value.is_empty()).count()
    }

    /// One `(field, value)` row per field, in table order.
    pub fn to_display_rows(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// `"field: value\n"` for every non-empty field, in table order.
    pub fn to_summary_text(&self) -> String {
        let mut summary = String::new();
        for (name, value) in self.iter().filter(|(_, value)| !value.is_empty()) {
            summary.push_str(name);
            summary.push_str(": ");
            summary.push_str(value);
            summary.push('\n');
        }
        summary
    }
}

// Serialized as a JSON object whose key order follows the table.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
