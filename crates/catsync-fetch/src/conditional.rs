//! Conditional GET keyed on a cached ETag.

use bytes::Bytes;

use crate::error::{FetchError, Result};
use crate::http::{HttpClient, HttpResponse, IF_NONE_MATCH};

/// Result of a conditional request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional {
    /// Status 200 with a fresh body and the server's validator, if any.
    Modified { body: Bytes, etag: Option<String> },
    /// Status 304: the cached copy is still current.
    NotModified,
}

/// Request headers for a revalidation against `etag`.
pub fn conditional_headers(etag: Option<&str>) -> Vec<(String, String)> {
    etag.map(|tag| vec![(IF_NONE_MATCH.to_owned(), tag.to_owned())])
        .unwrap_or_default()
}

/// Map a transport result onto [`Conditional`].
///
/// A 304 is accepted whether the client returned it as a response or as a
/// status error; any status other than 200 or 304 is an error.
pub fn classify(result: Result<HttpResponse>) -> Result<Conditional> {
    match result {
        Ok(resp) => match resp.status {
            200 => {
                let etag = resp.etag().map(str::to_owned);
                Ok(Conditional::Modified {
                    body: resp.body,
                    etag,
                })
            }
            304 => Ok(Conditional::NotModified),
            status => Err(FetchError::Status { status }),
        },
        Err(FetchError::Status { status: 304 }) => Ok(Conditional::NotModified),
        Err(e) => Err(e),
    }
}

/// Issues a single conditional GET through an [`HttpClient`].
pub struct ConditionalFetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> ConditionalFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// GET `url`, sending `If-None-Match` when an `etag` is cached.
    pub async fn fetch(&self, url: &str, etag: Option<&str>) -> Result<Conditional> {
        let headers = conditional_headers(etag);
        tracing::debug!(url, etag, "requesting catalog");

        let result: Result<HttpResponse> = self.client.get(url, &headers).await.map_err(Into::into);
        let outcome = classify(result);

        match &outcome {
            Ok(Conditional::Modified { body, etag }) => {
                tracing::debug!(bytes = body.len(), etag = etag.as_deref(), "received fresh content")
            }
            Ok(Conditional::NotModified) => tracing::debug!("server reported not modified"),
            Err(e) => tracing::debug!(error = %e, "request failed"),
        }
        outcome
    }
}
