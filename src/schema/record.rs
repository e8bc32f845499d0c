// src/schema/record.rs

use serde::Serialize;
use std::collections::BTreeMap;

use super::fields::Field;

/// One parsed country. Only non-empty values are kept, so applying a record
/// to a stored country never blanks out data the feed left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CountryRecord {
    fields: BTreeMap<Field, String>,
}

impl CountryRecord {
    /// Builds a record from `(field, value)` pairs, dropping empty values.
    /// Returns `None` when `iso` ends up missing.
    pub fn from_pairs<I, S>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let fields: BTreeMap<Field, String> = pairs
            .into_iter()
            .map(|(f, v)| (f, v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        if fields.contains_key(&Field::Iso) {
            Some(Self { fields })
        } else {
            None
        }
    }

    pub fn iso(&self) -> &str {
        // presence checked in from_pairs
        self.fields.get(&Field::Iso).map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn fields(&self) -> &BTreeMap<Field, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
