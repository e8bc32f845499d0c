// src/fetch/mod.rs

use futures::{Stream, TryStreamExt};
use reqwest::Client;
use std::{io, time::Duration};
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;
use tokio_util::io::StreamReader;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{CountriesError, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client used for the feed download.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| CountriesError::Config(format!("building HTTP client: {}", e)))
}

/// Issue one GET for `url` and stream the body back as UTF-8 lines.
///
/// Connection failures and non-success statuses surface here; failures
/// while reading the body (including invalid UTF-8) surface as `Err` items
/// on the returned stream. The stream ends with the body and cannot be
/// restarted.
#[instrument(level = "info", skip(client, url), fields(url = %url))]
pub async fn fetch_lines(
    client: &Client,
    url: &Url,
) -> Result<impl Stream<Item = io::Result<String>>> {
    debug!("requesting");
    let resp = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|source| CountriesError::Transport {
            url: url.to_string(),
            source,
        })?;
    info!(status = %resp.status(), length = ?resp.content_length(), "response");

    let body = resp
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    Ok(LinesStream::new(StreamReader::new(body).lines()))
}
