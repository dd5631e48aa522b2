//! Dataset downloaders.
//!
//! Each downloader computes its target list, fetches every target over HTTP
//! or anonymous FTP into `<root>/<dataset dir>/<data dir>/`, and records what it fetched in a
//! `metadata.json` beside the files. That file is what the consolidator
//! reads.
//!
//! There is no retry or resume; a failed fetch fails the run.

pub mod empiar;
pub mod epfl;
pub mod ftp;
pub mod http;
pub mod idr;
pub mod metadata;
pub mod openorganelle;

#[cfg(test)]
pub(crate) mod test_server;

use std::path::PathBuf;

use rayon::prelude::*;

pub type Result<T, E = DownloadError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("could not build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("FTP {action} failed")]
    Ftp {
        action: String,
        #[source]
        source: suppaftp::FtpError,
    },
    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("could not start download workers")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Run `fetch` over `items` on a dedicated pool of `threads` workers.
///
/// Results come back in input order regardless of completion order. The first
/// error is returned; fetches already running are not cancelled.
pub fn parallel_map<T, R, F>(threads: usize, items: &[T], fetch: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("download-{i}"))
        .build()?;
    pool.install(|| items.par_iter().map(fetch).collect())
}
