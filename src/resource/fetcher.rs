//! Resource Fetcher
//!
//! Retrieves a single resource: one GET, a status check and a decode into
//! the shape the request names.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::ResourceRequest;
use crate::broker::error::FetchError;
use crate::broker::http::{BrokerHttpClient, RawResponse};

/// Fetch one resource and decode it.
///
/// Only `200 OK` counts as success. Transport failures, other statuses and
/// bodies that do not match `T` come back as the matching [`FetchError`].
pub async fn fetch<T>(
    http: &BrokerHttpClient,
    request: ResourceRequest<T>,
) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    let RawResponse { status, body } = http.get(request.url()).await?;

    if status != StatusCode::OK {
        return Err(FetchError::Status {
            url: request.url().to_string(),
            status,
        });
    }

    // from_slice rejects bodies that are not valid UTF-8
    let value = serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
        url: request.url().to_string(),
        source,
    })?;

    tracing::trace!("{}: decoded {} bytes", request.resource(), body.len());
    Ok(value)
}
