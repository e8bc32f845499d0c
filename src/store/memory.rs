// src/store/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;

use super::{CountryStore, StoreError, StoredCountry, Upsert};
use crate::schema::Field;

/// In-process store. Nothing outlives the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    countries: BTreeMap<String, StoredCountry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Countries ordered by ISO code.
    pub fn iter(&self) -> impl Iterator<Item = &StoredCountry> {
        self.countries.values()
    }

    pub(crate) fn insert(&mut self, country: StoredCountry) {
        self.countries.insert(country.iso.clone(), country);
    }

    pub(crate) fn remove(&mut self, iso: &str) -> Option<StoredCountry> {
        self.countries.remove(iso)
    }
}

#[async_trait]
impl CountryStore for MemoryStore {
    async fn upsert(
        &mut self,
        iso: &str,
        fields: &BTreeMap<Field, String>,
    ) -> Result<Upsert, StoreError> {
        let now = Utc::now();
        let mut outcome = Upsert::Updated;
        let country = self
            .countries
            .entry(iso.to_string())
            .or_insert_with(|| {
                outcome = Upsert::Created;
                StoredCountry::new(iso, now)
            });
        country.apply(fields, now);
        Ok(outcome)
    }

    fn get(&self, iso: &str) -> Option<&StoredCountry> {
        self.countries.get(iso)
    }

    fn len(&self) -> usize {
        self.countries.len()
    }
}
