//! The fetch controller: one conditional request, then reconcile and persist.

use std::path::{Path, PathBuf};

use catsync_diff::Difference;
use catsync_fetch::{Conditional, ConditionalFetcher, HttpClient};
use catsync_fs::ByteStore;
use serde_json::Value;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No snapshot existed; the fresh document was stored.
    Created { etag_saved: bool },
    /// The fresh document matches the snapshot after normalization.
    Unchanged { etag_updated: bool },
    /// The server answered 304.
    NotModified,
}

pub struct Syncer<C: HttpClient, S: ByteStore> {
    fetcher:      ConditionalFetcher<C>,
    store:        S,
    url:          String,
    catalog_path: PathBuf,
    etag_path:    PathBuf,
}

impl<C: HttpClient, S: ByteStore> Syncer<C, S> {
    pub fn new(client: C, store: S, config: &SyncConfig) -> Self {
        Self {
            fetcher: ConditionalFetcher::new(client),
            store,
            url: config.url.clone(),
            catalog_path: config.catalog_path.clone(),
            etag_path: config.etag_path.clone(),
        }
    }

    pub fn client(&self) -> &C {
        self.fetcher.client()
    }

    /// Run one sync. Nothing is written unless the run succeeds.
    pub async fn run(&self) -> Result<SyncOutcome> {
        let etag = self.load_etag()?;

        match self.fetcher.fetch(&self.url, etag.as_deref()).await? {
            Conditional::NotModified => {
                tracing::info!(status = 304, "data not modified, no update needed");
                Ok(SyncOutcome::NotModified)
            }
            Conditional::Modified { body, etag } => self.accept(&body, etag.as_deref()),
        }
    }

    fn accept(&self, body: &[u8], etag: Option<&str>) -> Result<SyncOutcome> {
        let fresh: Value = serde_json::from_slice(body).map_err(|source| SyncError::Json {
            what: "response body",
            source,
        })?;

        let Some(existing) = self.load_catalog()? else {
            let pretty = serde_json::to_vec_pretty(&fresh).map_err(|source| SyncError::Json {
                what: "fetched catalog",
                source,
            })?;
            self.store.write(&self.catalog_path, &pretty)?;
            tracing::info!(path = %self.catalog_path.display(), "data fetched and saved successfully");
            let etag_saved = self.save_etag(etag)?;
            return Ok(SyncOutcome::Created { etag_saved });
        };

        let differences = catsync_diff::compare(&existing, &fresh);
        if !differences.is_empty() {
            report_differences(&differences);
            return Err(SyncError::Diverged(differences));
        }

        tracing::info!(status = 200, "data fetched is the same as existing data, no update needed");
        let etag_updated = self.save_etag(etag)?;
        Ok(SyncOutcome::Unchanged { etag_updated })
    }

    fn load_catalog(&self) -> Result<Option<Value>> {
        if !self.store.exists(&self.catalog_path) {
            return Ok(None);
        }
        let Some(bytes) = self.store.read(&self.catalog_path)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SyncError::Json {
                what: "stored catalog",
                source,
            })
    }

    fn load_etag(&self) -> Result<Option<String>> {
        let Some(bytes) = self.store.read(&self.etag_path)? else {
            return Ok(None);
        };
        let etag = String::from_utf8_lossy(&bytes).trim().to_owned();
        Ok((!etag.is_empty()).then_some(etag))
    }

    fn save_etag(&self, etag: Option<&str>) -> Result<bool> {
        let Some(etag) = etag.filter(|tag| !tag.is_empty()) else {
            return Ok(false);
        };
        self.store.write(&self.etag_path, etag.as_bytes())?;
        tracing::info!(etag, "etag updated");
        Ok(true)
    }
}

/// Log one block per difference on the error channel.
pub fn report_differences(differences: &[Difference]) {
    tracing::error!("the pulled response is different from the existing JSON");
    for difference in differences {
        tracing::error!("{difference}");
    }
}

/// Normalize and diff two JSON documents held in `store`.
pub fn compare_files<S: ByteStore>(store: &S, left: &Path, right: &Path) -> Result<Vec<Difference>> {
    let load = |path: &Path, what: &'static str| -> Result<Value> {
        let bytes = store
            .read(path)?
            .ok_or_else(|| SyncError::Missing(path.to_path_buf()))?;
        serde_json::from_slice(&bytes).map_err(|source| SyncError::Json { what, source })
    };
    let existing = load(left, "left document")?;
    let fresh = load(right, "right document")?;
    Ok(catsync_diff::compare(&existing, &fresh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_fetch::{FetchError, HttpResponse, MockClient};
    use catsync_fs::MemoryStore;

    fn config() -> SyncConfig {
        SyncConfig {
            url: "https://example.com/api/v1/apps".into(),
            ..SyncConfig::default()
        }
    }

    #[tokio::test]
    async fn test_blank_etag_file_sends_no_precondition() {
        let store = MemoryStore::new().with_entry("etag.txt", " \n");
        let syncer = Syncer::new(MockClient::respond(HttpResponse::new(304)), &store, &config());

        syncer.run().await.unwrap();

        assert!(syncer.client().requests()[0].header("If-None-Match").is_none());
    }

    #[tokio::test]
    async fn test_etag_is_trimmed() {
        let store = MemoryStore::new().with_entry("etag.txt", "\"v1\"\n");
        let syncer = Syncer::new(MockClient::respond(HttpResponse::new(304)), &store, &config());

        syncer.run().await.unwrap();

        assert_eq!(syncer.client().requests()[0].header("If-None-Match"), Some("\"v1\""));
    }

    #[tokio::test]
    async fn test_empty_etag_header_keeps_live_token() {
        let store = MemoryStore::new();
        let client = MockClient::respond(HttpResponse::new(200).with_header("ETag", "").with_body("{}"));
        let syncer = Syncer::new(client, &store, &config());

        let outcome = syncer.run().await.unwrap();

        assert_eq!(outcome, SyncOutcome::Created { etag_saved: false });
        assert_eq!(store.write_count(), 1);
        assert!(store.get("etag.txt").is_none());
    }

    #[tokio::test]
    async fn test_empty_etag_header_on_unchanged_content() {
        let store = MemoryStore::new()
            .with_entry("live-app-catalog.json", "{}")
            .with_entry("etag.txt", "\"v1\"");
        let client = MockClient::respond(HttpResponse::new(200).with_header("ETag", "").with_body("{}"));
        let syncer = Syncer::new(client, &store, &config());

        let outcome = syncer.run().await.unwrap();

        assert_eq!(outcome, SyncOutcome::Unchanged { etag_updated: false });
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get("etag.txt").unwrap(), b"\"v1\"");
    }

    #[tokio::test]
    async fn test_malformed_body_writes_nothing() {
        let store = MemoryStore::new();
        let client = MockClient::respond(HttpResponse::new(200).with_header("ETag", "x").with_body("{"));
        let syncer = Syncer::new(client, &store, &config());

        let err = syncer.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Json { what: "response body", .. }));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_is_fatal() {
        let store = MemoryStore::new().with_entry("live-app-catalog.json", "not json");
        let client = MockClient::respond(HttpResponse::new(200).with_body("{}"));
        let syncer = Syncer::new(client, &store, &config());

        let err = syncer.run().await.unwrap_err();

        assert!(matches!(err, SyncError::Json { what: "stored catalog", .. }));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_network_error_is_fatal() {
        let store = MemoryStore::new();
        let client = MockClient::fail(FetchError::Network("connection refused".into()));
        let syncer = Syncer::new(client, &store, &config());

        let err = syncer.run().await.unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        assert!(err.differences().is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_compare_files_missing() {
        let store = MemoryStore::new().with_entry("a.json", "{}");
        let err = compare_files(&store, Path::new("a.json"), Path::new("b.json")).unwrap_err();
        assert!(matches!(err, SyncError::Missing(ref p) if p == Path::new("b.json")));
    }

    #[test]
    fn test_compare_files_normalizes() {
        let store = MemoryStore::new()
            .with_entry("a.json", "{\"name\":\"cafe\u{0301}\"}")
            .with_entry("b.json", "{\"name\":\"caf\u{00e9}\"}");
        let diffs = compare_files(&store, Path::new("a.json"), Path::new("b.json")).unwrap();
        assert!(diffs.is_empty());
    }
}
