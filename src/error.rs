// src/error.rs

use thiserror::Error;

use crate::store::StoreError;

/// Message carried by every header failure: the feed layout is fixed, so a
/// mismatch nearly always means geonames changed the file.
pub const SCHEMA_HINT: &str = "couldn't parse the geonames country file \
(http://download.geonames.org/export/dump/countryInfo.txt); the format may have changed \
and an updated version of this software may be required";

#[derive(Debug, Error)]
pub enum CountriesError {
    /// Header line missing, malformed or different from the expected columns.
    #[error("{hint}: {detail}", hint = SCHEMA_HINT)]
    SchemaMismatch { detail: String },

    /// A data row that cannot be mapped onto the confirmed header.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Request failed or the server answered with a non-success status.
    #[error("failed to fetch {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body stream broke or a line was not valid UTF-8.
    #[error("failed to read line {line} of the country feed")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("store rejected upsert for {iso}")]
    Persistence {
        iso: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to open country store")]
    StoreOpen(#[source] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CountriesError {
    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            detail: detail.into(),
        }
    }

    /// True for every failure that happened while talking to the remote host.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Read { .. })
    }
}

pub type Result<T> = std::result::Result<T, CountriesError>;
