//! Keeps a local country table in step with the geonames `countryInfo.txt`
//! feed: fetch, validate the header, parse rows, upsert by ISO code.

pub mod config;
pub mod error;
pub mod fetch;
pub mod schema;
pub mod store;
pub mod sync;

pub use config::SyncConfig;
pub use error::{CountriesError, Result};
pub use schema::{CountryRecord, Field};
pub use store::{CountryStore, MemoryStore, ParquetStore, StoredCountry, Upsert};
pub use sync::{
    reconcile, sync_countries, update_geonames_data, update_geonames_data_with, SyncStats,
};
