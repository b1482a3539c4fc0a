use super::record::Record;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Keeps records whose categorical value for `field` equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.category(&self.field) == self.value.trim()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("filter '{0}' must look like FIELD=VALUE")]
    MissingSeparator(String),
    #[error("filter '{0}' has an empty field name")]
    EmptyField(String),
}

impl FromStr for FieldFilter {
    type Err = FilterParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| FilterParseError::MissingSeparator(raw.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(FilterParseError::EmptyField(raw.to_string()));
        }
        Ok(Self::new(field, value.trim()))
    }
}

/// Records matching every filter, as a fresh vector.
pub fn apply_filters(records: &[Record], filters: &[FieldFilter]) -> Vec<Record> {
    records
        .iter()
        .filter(|record| filters.iter().all(|filter| filter.matches(record)))
        .cloned()
        .collect()
}
