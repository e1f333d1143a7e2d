mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;

/// Issues a GET through `client` and decodes the JSON body.
///
/// Non-success statuses become [`FetchError::Status`] with the response body
/// attached, since PostgREST puts the useful message there.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(
    client: &C,
    url: &str,
) -> Result<T, FetchError> {
    let url = url
        .parse::<reqwest::Url>()
        .map_err(|e| FetchError::Request(format!("invalid URL '{url}': {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, url);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = resp.bytes().await?;
    debug!(bytes = bytes.len(), "Response received");
    Ok(serde_json::from_slice(&bytes)?)
}
