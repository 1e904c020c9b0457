//! Conditional HTTP GET with ETag revalidation.
//!
//! The transport sits behind [`HttpClient`]; [`ReqwestClient`] is the
//! production implementation and [`MockClient`] a scripted one for tests.
//! [`ConditionalFetcher`] sends `If-None-Match` when a validator is cached
//! and folds the response into [`Conditional`].

mod conditional;
mod error;
mod http;
mod mock;

pub use conditional::{Conditional, ConditionalFetcher, classify, conditional_headers};
pub use error::{FetchError, Result};
pub use http::{ClientSettings, ETAG, HttpClient, HttpResponse, IF_NONE_MATCH};
pub use mock::{MockClient, RecordedRequest};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
