// src/dataset/source.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Where a dataset document comes from. The service ships a file source;
/// custom datasets can be pulled from a URL instead.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch and parse the raw JSON document.
    async fn fetch(&self) -> Result<Value>;
    /// Human-readable origin for logs and errors.
    fn name(&self) -> String;
}

/// Reads the dataset from a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Value> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read dataset file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parse dataset file {}", self.path.display()))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the dataset from a remote URL.
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Value> {
        let resp = match self.client.get(&self.url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, url = %self.url, "dataset http error");
                return Err(e).context("dataset http get()");
            }
        };
        resp.json::<Value>().await.context("dataset http .json()")
    }

    fn name(&self) -> String {
        self.url.clone()
    }
}
