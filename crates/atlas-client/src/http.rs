//! Request plumbing shared by both API clients.

use std::time::Duration;

use atlas_common::{AtlasError, AtlasResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub(crate) fn build_client(timeout: Duration) -> AtlasResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| AtlasError::Http(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn transport_error(err: reqwest::Error) -> AtlasError {
    if err.is_timeout() {
        AtlasError::Timeout
    } else if err.is_decode() {
        AtlasError::Decode(err.to_string())
    } else {
        AtlasError::Http(err.to_string())
    }
}

/// Error body sent by both services: `{"error": "..."}`, sometimes `{"message": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

pub(crate) fn status_error(status: u16, body: &str) -> AtlasError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_default();
    AtlasError::Status { status, message }
}

/// Decode a JSON body, or turn a non-2xx response into `AtlasError::Status`.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> AtlasResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status.as_u16(), &body));
    }
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| AtlasError::Decode(e.to_string()))
}
