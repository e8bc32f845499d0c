// src/sync.rs

use futures::{pin_mut, Stream, TryStreamExt};
use serde::Serialize;
use std::{io, time::Duration};
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::{
    config::SyncConfig,
    error::{CountriesError, Result},
    fetch,
    schema::{parse_lines, CountryRecord},
    store::{CountryStore, ParquetStore, Upsert},
};

/// Outcome counts of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub num_updated: usize,
    pub num_created: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SyncStats {
    pub fn total(&self) -> usize {
        self.num_updated + self.num_created
    }

    /// `(num_updated, num_created)`
    pub fn as_pair(&self) -> (usize, usize) {
        (self.num_updated, self.num_created)
    }

    pub fn log_summary(&self) {
        info!(
            updated = self.num_updated,
            created = self.num_created,
            total = self.total(),
            elapsed = format!("{:.2}s", self.elapsed.as_secs_f64()),
            "country sync complete"
        );
    }
}

/// Upsert every record into `store`, in stream order. Stops at the first
/// parse, transport or store error; earlier upserts stay committed.
pub async fn reconcile<R, S>(records: R, store: &mut S) -> Result<SyncStats>
where
    R: Stream<Item = Result<CountryRecord>>,
    S: CountryStore + ?Sized,
{
    let start = Instant::now();
    let mut stats = SyncStats::default();
    pin_mut!(records);

    while let Some(record) = records.try_next().await? {
        let outcome = store
            .upsert(record.iso(), record.fields())
            .await
            .map_err(|source| CountriesError::Persistence {
                iso: record.iso().to_string(),
                source,
            })?;
        match outcome {
            Upsert::Created => stats.num_created += 1,
            Upsert::Updated => stats.num_updated += 1,
        }
        debug!(iso = record.iso(), ?outcome, "upserted");
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

/// Parse `lines` and reconcile the records against `store`.
pub async fn sync_countries<L, S>(lines: L, store: &mut S) -> Result<SyncStats>
where
    L: Stream<Item = io::Result<String>>,
    S: CountryStore + ?Sized,
{
    reconcile(parse_lines(lines), store).await
}

/// Fetch the feed named by `config` and sync it into the Parquet store it
/// points at.
#[instrument(level = "info", skip(config), fields(source = %config.source_url))]
pub async fn update_geonames_data_with(config: &SyncConfig) -> Result<SyncStats> {
    let mut store = ParquetStore::open(&config.store_path).map_err(CountriesError::StoreOpen)?;
    let client = fetch::build_client(config.http_timeout)?;
    let lines = fetch::fetch_lines(&client, &config.source_url).await?;

    let stats = sync_countries(lines, &mut store).await?;
    stats.log_summary();
    Ok(stats)
}

/// Refresh the country table from geonames using environment configuration.
/// Returns `(num_updated, num_created)`.
pub async fn update_geonames_data() -> Result<(usize, usize)> {
    let config = SyncConfig::from_env()?;
    update_geonames_data_with(&config)
        .await
        .map(|stats| stats.as_pair())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse::tests::{header_line, US_ROW};
    use crate::schema::Field;
    use crate::store::{MemoryStore, StoreError, StoredCountry};
    use futures::stream;
    use std::collections::BTreeMap;

    fn feed(rows: &[&str]) -> impl Stream<Item = io::Result<String>> {
        let mut lines = vec![
            "# GeoNames.org Country Information".to_string(),
            header_line(),
        ];
        lines.extend(rows.iter().map(|r| r.to_string()));
        stream::iter(lines.into_iter().map(Ok))
    }

    /// Accepts `limit` upserts, then fails.
    struct FailingStore {
        inner: MemoryStore,
        limit: usize,
    }

    #[async_trait::async_trait]
    impl CountryStore for FailingStore {
        async fn upsert(
            &mut self,
            iso: &str,
            fields: &BTreeMap<Field, String>,
        ) -> std::result::Result<Upsert, StoreError> {
            if self.inner.len() >= self.limit {
                return Err(StoreError::Io {
                    path: "countries.parquet".into(),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                });
            }
            self.inner.upsert(iso, fields).await
        }

        fn get(&self, iso: &str) -> Option<&StoredCountry> {
            self.inner.get(iso)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[tokio::test]
    async fn us_fixture_creates_one_country() {
        let mut store = MemoryStore::new();
        let stats = sync_countries(feed(&[US_ROW]), &mut store).await.unwrap();
        assert_eq!(stats.as_pair(), (0, 1));

        let us = store.get("US").unwrap();
        assert_eq!(us.get(Field::CurrencySymbol), Some("$"));
        assert_eq!(us.get(Field::EquivalentFipsCode), None);
    }

    #[tokio::test]
    async fn second_run_only_updates() {
        let rows = [US_ROW, "AQ\tATA\t010\tAY\tAntarctica\t\t14000000\t0\tAN\t.aq"];
        let mut store = MemoryStore::new();
        let first = sync_countries(feed(&rows), &mut store).await.unwrap();
        let second = sync_countries(feed(&rows), &mut store).await.unwrap();
        assert_eq!(first.as_pair(), (0, 2));
        assert_eq!(second.as_pair(), (2, 0));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn empty_source_values_do_not_blank_stored_data() {
        let mut store = MemoryStore::new();
        sync_countries(feed(&[US_ROW]), &mut store).await.unwrap();

        let capital_blank = US_ROW.replace("Washington", "");
        sync_countries(feed(&[&capital_blank]), &mut store)
            .await
            .unwrap();
        assert_eq!(
            store.get("US").unwrap().get(Field::Capital),
            Some("Washington")
        );
    }

    #[tokio::test]
    async fn schema_mismatch_stops_before_any_upsert() {
        let lines = vec![
            Ok("#ISO\tISO3\tCountry".to_string()),
            Ok(US_ROW.to_string()),
        ];
        let mut store = MemoryStore::new();
        let err = sync_countries(stream::iter(lines), &mut store)
            .await
            .unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn feed_without_header_is_schema_mismatch() {
        let mut store = MemoryStore::new();
        let err = sync_countries(stream::iter(Vec::<io::Result<String>>::new()), &mut store)
            .await
            .unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));

        let comments =
            ["# GeoNames.org Country Information", "#"].map(|l| Ok::<_, io::Error>(l.to_string()));
        let err = sync_countries(stream::iter(comments), &mut store)
            .await
            .unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("no #ISO header line"));
    }

    #[tokio::test]
    async fn mismatched_second_header_aborts_after_earlier_rows() {
        let renamed = header_line().replace("Capital", "Seat");
        let mut store = MemoryStore::new();
        let rows = [US_ROW, renamed.as_str(), "NO\tNOR\t578\tNO\tNorway"];
        let err = sync_countries(feed(&rows), &mut store).await.unwrap_err();
        assert!(matches!(err, CountriesError::SchemaMismatch { .. }));
        assert!(store.get("US").is_some());
        assert!(store.get("NO").is_none());
    }

    #[tokio::test]
    async fn store_failure_aborts_but_keeps_earlier_upserts() {
        let rows = [
            US_ROW,
            "AQ\tATA\t010\tAY\tAntarctica",
            "NO\tNOR\t578\tNO\tNorway",
        ];
        let mut store = FailingStore {
            inner: MemoryStore::new(),
            limit: 1,
        };
        let err = sync_countries(feed(&rows), &mut store).await.unwrap_err();
        match err {
            CountriesError::Persistence { iso, .. } => assert_eq!(iso, "AQ"),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.get("US").is_some());
        assert!(store.get("NO").is_none());
    }
}
