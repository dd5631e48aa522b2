use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use reqwest::blocking::Client;

use super::{DownloadError, Result};

/// Blocking HTTP client that streams response bodies to disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DownloadError::Client)?;
        Ok(Self { client })
    }

    /// Use an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and write the body to `dest`, returning the number of bytes
    /// written. Any non-2xx status is an error and leaves `dest` untouched.
    pub fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<u64> {
        let http_err = |source: reqwest::Error| DownloadError::Http {
            url: url.to_string(),
            source,
        };

        log::debug!("GET {url}");
        let mut response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status,
            });
        }

        let file = File::create(dest).map_err(|e| DownloadError::io(dest, e))?;
        let mut writer = BufWriter::new(file);
        let written = response.copy_to(&mut writer).map_err(http_err)?;
        writer.flush().map_err(|e| DownloadError::io(dest, e))?;

        log::info!("{url} -> {} ({written} bytes)", dest.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::test_server::{fetcher, serve};

    fn server() -> String {
        serve(|path| match path {
            "/stack.tif" => Some(b"II*\0 not really a tiff".to_vec()),
            "/empty.tif" => Some(Vec::new()),
            _ => None,
        })
    }

    #[test]
    fn success_writes_the_body() {
        let base = server();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("stack.tif");

        let written = fetcher().fetch_to_file(&format!("{base}/stack.tif"), &dest).unwrap();

        assert_eq!(written, 22);
        assert_eq!(std::fs::read(&dest).unwrap(), b"II*\0 not really a tiff");
    }

    #[test]
    fn empty_body_gives_an_empty_file() {
        let base = server();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("empty.tif");

        assert_eq!(fetcher().fetch_to_file(&format!("{base}/empty.tif"), &dest).unwrap(), 0);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 0);
    }

    #[test]
    fn not_found_is_an_error_and_creates_nothing() {
        let base = server();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.tif");
        let url = format!("{base}/missing.tif");

        let err = fetcher().fetch_to_file(&url, &dest).unwrap_err();

        match err {
            DownloadError::Status { url: failed, status } => {
                assert_eq!(failed, url);
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!dest.exists());
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("x.tif");

        let err = fetcher()
            .fetch_to_file(&format!("http://127.0.0.1:{port}/x.tif"), &dest)
            .unwrap_err();
        assert!(matches!(err, DownloadError::Http { .. }), "{err:?}");
        assert!(!dest.exists());
    }
}
