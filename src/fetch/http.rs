use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use tracing::error;

use crate::types::{ColumnId, DatasetId};

use super::SampleFetcher;

/// Fetches sample ranges over HTTP. The server returns a packed
/// little-endian `f32` buffer for
/// `GET {base}/datasets/{dataset}/columns/{column}/samples?from=..&to=..`.
pub struct HttpSampleFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSampleFetcher {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Attaches static headers (e.g. an authorization token) to every
    /// request. Unparseable entries are logged and skipped.
    pub fn with_headers(base_url: Url, headers: BTreeMap<String, String>) -> Result<Self> {
        let headers: HeaderMap = headers
            .into_iter()
            .filter_map(|(k, v)| {
                let key = match HeaderName::from_str(&k) {
                    Ok(key) => key,
                    Err(err) => {
                        error!("Couldn't parse header name: {}: {err:?}", k);
                        return None;
                    }
                };
                let val = match HeaderValue::from_str(&v) {
                    Ok(val) => val,
                    Err(err) => {
                        error!("Couldn't parse header value: {}: {err:?}", v);
                        return None;
                    }
                };
                Some((key, val))
            })
            .collect();
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Couldn't build HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn samples_url(&self, dataset: &DatasetId, column: &ColumnId) -> Result<Url> {
        self.base_url
            .join(&format!("datasets/{dataset}/columns/{column}/samples"))
            .with_context(|| format!("Couldn't form URL for {dataset}/{column}"))
    }
}

#[async_trait]
impl SampleFetcher for HttpSampleFetcher {
    async fn fetch_range(
        &self,
        dataset: &DatasetId,
        column: &ColumnId,
        from: u64,
        to: u64,
    ) -> Result<Vec<f64>> {
        let url = self.samples_url(dataset, column)?;
        let response = self
            .client
            .get(url)
            .query(&[("from", from), ("to", to)])
            .send()
            .await
            .with_context(|| format!("Couldn't fetch {dataset}/{column}[{from}..{to})"))?
            .error_for_status()?;
        let body = response.bytes().await.context("Couldn't read sample buffer")?;
        decode_samples(&body)
    }
}

/// Decodes a packed little-endian `f32` buffer.
fn decode_samples(body: &[u8]) -> Result<Vec<f64>> {
    ensure!(
        body.len() % 4 == 0,
        "Sample buffer of {} bytes is not a whole number of f32 values",
        body.len()
    );
    Ok(body
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
        .collect())
}
