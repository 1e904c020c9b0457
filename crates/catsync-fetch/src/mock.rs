//! Scripted [`HttpClient`] for tests.

use std::sync::Mutex;

use crate::error::FetchError;
use crate::http::{HttpClient, HttpResponse};

/// A request observed by [`MockClient`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url:     String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Replies once with a canned response or error and records every request.
#[derive(Debug)]
pub struct MockClient {
    reply:    Mutex<Option<Result<HttpResponse, FetchError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockClient {
    pub fn respond(response: HttpResponse) -> Self {
        Self::new(Ok(response))
    }

    pub fn fail(error: FetchError) -> Self {
        Self::new(Err(error))
    }

    fn new(reply: Result<HttpResponse, FetchError>) -> Self {
        Self {
            reply:    Mutex::new(Some(reply)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl HttpClient for MockClient {
    type Error = FetchError;

    async fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                url:     url.to_owned(),
                headers: headers.to_vec(),
            });
        self.reply
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .unwrap_or_else(|| Err(FetchError::Network("no scripted reply left".into())))
    }
}
