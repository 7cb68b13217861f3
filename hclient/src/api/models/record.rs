//! Business data record

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::FieldValue;
use crate::api::constants::CODE_FIELD;

/// A business data record: field API name to value, in insertion order
///
/// Keys are not checked against the object schema; the platform validates
/// them when the record is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BizRecord {
    fields: IndexMap<String, FieldValue>,
}

impl BizRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set the record's platform identity
    pub fn with_code(self, code: impl Into<String>) -> Self {
        self.with(CODE_FIELD, code.into())
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Remove a field, keeping the order of the remaining ones
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.shift_remove(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Platform-assigned identity, if the record carries a non-empty one
    pub fn code(&self) -> Option<&str> {
        self.get(CODE_FIELD)
            .and_then(FieldValue::as_str)
            .filter(|code| !code.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Check every field of `other` is present here with an equal value
    pub fn contains_fields_of(&self, other: &BizRecord) -> bool {
        other.iter().all(|(k, v)| self.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for BizRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for BizRecord {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
