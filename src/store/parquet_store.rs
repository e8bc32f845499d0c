// src/store/parquet_store.rs

use arrow::{
    array::{Array, ArrayRef, StringArray, TimestampMicrosecondArray},
    datatypes::{DataType as ArrowDataType, Field as ArrowField, Schema as ArrowSchema, TimeUnit},
    record_batch::RecordBatch,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::Compression,
    file::properties::WriterProperties,
};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info};

use super::{CountryStore, MemoryStore, StoreError, StoredCountry, Upsert};
use crate::schema::Field;

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// Country table kept in a single Parquet file.
///
/// The whole table is loaded on open. Every upsert rewrites the file through
/// `<file>.tmp` and a rename on the blocking pool, so a crash leaves either
/// the old or the new table on disk and every acknowledged upsert is durable.
pub struct ParquetStore {
    path: PathBuf,
    rows: MemoryStore,
}

impl ParquetStore {
    /// Open the table at `path`, creating the parent directory if needed.
    /// A missing file is an empty table.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut rows = MemoryStore::new();
        if path.exists() {
            for country in read_table(&path)? {
                rows.insert(country);
            }
        }
        info!(path = %path.display(), countries = rows.len(), "opened country store");

        Ok(Self { path, rows })
    }

    /// Snapshot the in-memory table as one batch.
    fn to_batch(&self) -> Result<RecordBatch, StoreError> {
        let schema = Arc::new(table_schema());
        let countries: Vec<&StoredCountry> = self.rows.iter().collect();

        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
        columns.push(Arc::new(StringArray::from_iter_values(
            countries.iter().map(|c| c.iso.as_str()),
        )));
        for field in &Field::ALL[1..] {
            columns.push(Arc::new(
                countries
                    .iter()
                    .map(|c| c.get(*field))
                    .collect::<StringArray>(),
            ));
        }
        columns.push(Arc::new(TimestampMicrosecondArray::from_iter_values(
            countries.iter().map(|c| c.created_at.timestamp_micros()),
        )));
        columns.push(Arc::new(TimestampMicrosecondArray::from_iter_values(
            countries.iter().map(|c| c.updated_at.timestamp_micros()),
        )));
        Ok(RecordBatch::try_new(schema, columns)?)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let batch = self.to_batch()?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_table(&path, &batch)).await?
    }
}

#[async_trait]
impl CountryStore for ParquetStore {
    async fn upsert(
        &mut self,
        iso: &str,
        fields: &BTreeMap<Field, String>,
    ) -> Result<Upsert, StoreError> {
        let previous = self.rows.get(iso).cloned();
        let outcome = self.rows.upsert(iso, fields).await?;

        if let Err(e) = self.flush().await {
            // keep memory in step with what is on disk
            match previous {
                Some(country) => self.rows.insert(country),
                None => {
                    self.rows.remove(iso);
                }
            }
            return Err(e);
        }
        Ok(outcome)
    }

    fn get(&self, iso: &str) -> Option<&StoredCountry> {
        self.rows.get(iso)
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// `iso` (required), one nullable UTF-8 column per other field, then the two
/// bookkeeping timestamps.
fn table_schema() -> ArrowSchema {
    let mut cols = vec![ArrowField::new(Field::Iso.as_str(), ArrowDataType::Utf8, false)];
    cols.extend(
        Field::ALL[1..]
            .iter()
            .map(|f| ArrowField::new(f.as_str(), ArrowDataType::Utf8, true)),
    );
    for name in [CREATED_AT, UPDATED_AT] {
        cols.push(ArrowField::new(
            name,
            ArrowDataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ));
    }
    ArrowSchema::new(cols)
}

/// Write `batch` to `<path>.tmp`, then rename it over `path`.
fn write_table(path: &Path, batch: &RecordBatch) -> Result<(), StoreError> {
    let tmp_path = path.with_extension("parquet.tmp");
    let file = File::create(&tmp_path).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = batch.num_rows(), "flushed country store");
    Ok(())
}

fn read_table(path: &Path) -> Result<Vec<StoredCountry>, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(1024)
        .build()?;

    let mut out = Vec::new();
    for batch in reader {
        let batch = batch?;
        let strings = |name: &str| {
            batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| corrupt(format!("missing utf8 column `{}`", name)))
        };
        let timestamps = |name: &str| {
            batch
                .column_by_name(name)
                .and_then(|c| c.as_any().downcast_ref::<TimestampMicrosecondArray>())
                .ok_or_else(|| corrupt(format!("missing timestamp column `{}`", name)))
        };

        let iso = strings(Field::Iso.as_str())?;
        let attrs = Field::ALL[1..]
            .iter()
            .map(|f| Ok((*f, strings(f.as_str())?)))
            .collect::<Result<Vec<_>, StoreError>>()?;
        let created = timestamps(CREATED_AT)?;
        let updated = timestamps(UPDATED_AT)?;

        for row in 0..batch.num_rows() {
            let created_at = micros_to_utc(created.value(row))
                .ok_or_else(|| corrupt(format!("bad {} at row {}", CREATED_AT, row)))?;
            let updated_at = micros_to_utc(updated.value(row))
                .ok_or_else(|| corrupt(format!("bad {} at row {}", UPDATED_AT, row)))?;

            let mut country = StoredCountry::new(iso.value(row), created_at);
            country.updated_at = updated_at;
            for (field, column) in &attrs {
                if !column.is_null(row) {
                    country
                        .attributes
                        .insert(*field, column.value(row).to_string());
                }
            }
            out.push(country);
        }
    }
    Ok(out)
}

fn micros_to_utc(micros: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
}
