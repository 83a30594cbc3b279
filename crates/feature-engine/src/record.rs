//! Name-addressed feature records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    /// Numeric measurement or derived feature
    Number(f64),
    /// Categorical level
    Category(String),
}

impl ColumnValue {
    /// Numeric value, if this column is numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ColumnValue::Number(v) => Some(*v),
            ColumnValue::Category(_) => None,
        }
    }

    /// Category level, if this column is categorical
    pub fn as_category(&self) -> Option<&str> {
        match self {
            ColumnValue::Number(_) => None,
            ColumnValue::Category(s) => Some(s),
        }
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        ColumnValue::Number(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Category(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Category(value)
    }
}

/// Record of named columns, possibly covering only part of the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    columns: BTreeMap<String, ColumnValue>,
}

impl FeatureRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or overwrite a column
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ColumnValue>) {
        self.columns.insert(name.into(), value.into());
    }

    /// Remove a column, returning its value
    pub fn remove(&mut self, name: &str) -> Option<ColumnValue> {
        self.columns.remove(name)
    }

    /// Numeric column value; `None` if absent or categorical
    pub fn number(&self, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(ColumnValue::as_number)
    }

    /// Categorical column value; `None` if absent or numeric
    pub fn category(&self, name: &str) -> Option<&str> {
        self.columns.get(name).and_then(ColumnValue::as_category)
    }

    /// Whether the column exists
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
