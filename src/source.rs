//! Where submission records come from.
//!
//! [`SubmissionSource`] is a bulk "fetch every row" read. [`SupabaseSource`]
//! reads the hosted table over PostgREST, [`FileSource`] reads a JSON dump
//! from disk and [`StaticSource`] serves rows held in memory.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::config::SupabaseConfig;
use crate::error::FetchError;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, fetch_json};
use crate::record::RawSubmission;

/// A read-only bulk reader of submission rows.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Returns every row of the submissions table.
    async fn fetch_all(&self) -> Result<Vec<RawSubmission>, FetchError>;
}

type SupabaseClient = ApiKey<ApiKey<BasicClient>>;

#[async_trait]
impl<T: SubmissionSource + ?Sized> SubmissionSource for Box<T> {
    async fn fetch_all(&self) -> Result<Vec<RawSubmission>, FetchError> {
        (**self).fetch_all().await
    }
}

/// Reads the submissions table through Supabase's REST interface.
pub struct SupabaseSource {
    client: SupabaseClient,
    endpoint: String,
}

impl SupabaseSource {
    pub fn new(config: &SupabaseConfig) -> Result<Self, FetchError> {
        let key = &config.service_key;
        let client = ApiKey::new(ApiKey::bearer(BasicClient::new()?, key)?, "apikey", key)?;
        Ok(Self {
            client,
            endpoint: Self::endpoint(config),
        })
    }

    /// `GET {url}/rest/v1/{table}?select=*`
    pub fn endpoint(config: &SupabaseConfig) -> String {
        format!("{}/rest/v1/{}?select=*", config.url, config.table)
    }
}

#[async_trait]
impl SubmissionSource for SupabaseSource {
    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<RawSubmission>, FetchError> {
        let rows: Vec<RawSubmission> = fetch_json(&self.client, &self.endpoint).await?;
        info!(rows = rows.len(), endpoint = %self.endpoint, "Fetched submissions from Supabase");
        Ok(rows)
    }
}

/// Reads a JSON array of submission rows from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SubmissionSource for FileSource {
    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<RawSubmission>, FetchError> {
        let content = tokio::fs::read(&self.path).await?;
        let rows: Vec<RawSubmission> = serde_json::from_slice(&content)?;
        info!(rows = rows.len(), path = %self.path.display(), "Read submissions from file");
        Ok(rows)
    }
}

/// Serves a fixed set of rows, or fails every time.
pub struct StaticSource {
    rows: Vec<RawSubmission>,
    failure: Option<fn() -> FetchError>,
}

impl StaticSource {
    pub fn new(rows: Vec<RawSubmission>) -> Self {
        Self {
            rows,
            failure: None,
        }
    }

    pub fn failing(failure: fn() -> FetchError) -> Self {
        Self {
            rows: Vec::new(),
            failure: Some(failure),
        }
    }
}

#[async_trait]
impl SubmissionSource for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<RawSubmission>, FetchError> {
        match self.failure {
            Some(make_error) => Err(make_error()),
            None => Ok(self.rows.clone()),
        }
    }
}
