use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

use crate::error::FetchError;

pub const IF_NONE_MATCH: &str = "If-None-Match";
pub const ETAG: &str = "ETag";

/// A fully buffered HTTP response.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status:  u16,
    pub headers: Vec<(String, String)>,
    pub body:    Bytes,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn etag(&self) -> Option<&str> {
        self.header(ETAG)
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations handle redirects, TLS and timeouts themselves. A client
/// may surface non-success statuses either as an [`HttpResponse`] or as an
/// error convertible to [`FetchError::Status`]; callers treat both alike.
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: Into<FetchError> + Send + 'static;

    /// Issue a GET for `url` with the extra request `headers`.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = std::result::Result<HttpResponse, Self::Error>> + Send;
}

/// Transport settings for [`ReqwestClient`]. Unset fields keep reqwest's defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub timeout:    Option<Duration>,
    pub user_agent: Option<String>,
}

impl ClientSettings {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use super::*;
    use reqwest::Client;

    /// Production HTTP client implementation using reqwest.
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, FetchError> {
            Self::with_settings(ClientSettings::default())
        }

        pub fn with_settings(settings: ClientSettings) -> Result<Self, FetchError> {
            let mut builder = Client::builder();
            if let Some(timeout) = settings.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(user_agent) = settings.user_agent {
                builder = builder.user_agent(user_agent);
            }
            let client = builder
                .build()
                .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<HttpResponse, Self::Error> {
            let mut request = self.client.get(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
                .collect();
            let body = response.bytes().await?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
