#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use catsync::SyncConfig;
use tempfile::TempDir;

pub const URL: &str = "https://live-app-catalog.example/api/v1/apps";

/// A scratch directory holding the catalog and etag files of one run.
pub struct Workdir {
    _tmp:        TempDir,
    pub catalog: PathBuf,
    pub etag:    PathBuf,
}

impl Workdir {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let catalog = tmp.path().join("live-app-catalog.json");
        let etag = tmp.path().join("etag.txt");
        Self {
            _tmp: tmp,
            catalog,
            etag,
        }
    }

    pub fn config(&self) -> SyncConfig {
        SyncConfig {
            url: URL.to_owned(),
            catalog_path: self.catalog.clone(),
            etag_path: self.etag.clone(),
            ..SyncConfig::default()
        }
    }

    pub fn with_catalog(self, content: &str) -> Self {
        fs::write(&self.catalog, content).expect("seed catalog");
        self
    }

    pub fn with_etag(self, etag: &str) -> Self {
        fs::write(&self.etag, etag).expect("seed etag");
        self
    }

    pub fn catalog_text(&self) -> Option<String> {
        fs::read_to_string(&self.catalog).ok()
    }

    pub fn etag_text(&self) -> Option<String> {
        fs::read_to_string(&self.etag).ok()
    }

    pub fn dir(&self) -> &std::path::Path {
        self._tmp.path()
    }
}

/// Raw HTTP/1.1 response with a `Content-Length` and `Connection: close`.
pub fn http_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!(
        "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

/// Serve `response` to exactly one connection on a loopback port.
///
/// Returns the catalog URL and a handle yielding the raw request head.
pub fn serve_once(response: String) -> (String, std::thread::JoinHandle<String>) {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        stream.write_all(response.as_bytes()).expect("write response");
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}/api/v1/apps"), handle)
}
