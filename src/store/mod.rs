// src/store/mod.rs

use arrow::error::ArrowError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parquet::errors::ParquetError;
use std::{collections::BTreeMap, io, path::PathBuf};
use thiserror::Error;
use tokio::task::JoinError;

use crate::schema::Field;

pub mod memory;
pub mod parquet_store;

pub use memory::MemoryStore;
pub use parquet_store::ParquetStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Arrow(#[from] ArrowError),
    #[error(transparent)]
    Parquet(#[from] ParquetError),
    #[error("corrupt store file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("store writer task failed")]
    Writer(#[from] JoinError),
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// A persisted country, keyed by `iso`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCountry {
    pub iso: String,
    /// Every attribute except `iso`.
    pub attributes: BTreeMap<Field, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredCountry {
    pub fn new(iso: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            iso: iso.into(),
            attributes: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Iso => Some(self.iso.as_str()),
            other => self.attributes.get(&other).map(String::as_str),
        }
    }

    /// Overwrite only the attributes present in `fields`; everything else
    /// keeps its stored value.
    pub fn apply(&mut self, fields: &BTreeMap<Field, String>, now: DateTime<Utc>) {
        for (field, value) in fields {
            if *field != Field::Iso {
                self.attributes.insert(*field, value.clone());
            }
        }
        self.updated_at = now;
    }
}

/// Persistence seam for the reconciler: one "find by iso, else create"
/// operation plus lookups.
#[async_trait]
pub trait CountryStore: Send {
    /// Apply `fields` to the country keyed by `iso`, creating it if unseen.
    /// The change is durable once this returns `Ok`.
    async fn upsert(
        &mut self,
        iso: &str,
        fields: &BTreeMap<Field, String>,
    ) -> Result<Upsert, StoreError>;

    fn get(&self, iso: &str) -> Option<&StoredCountry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
