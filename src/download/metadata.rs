use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{DownloadError, Result};

pub const METADATA_FILE: &str = "metadata.json";

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Static description of a dataset, shared by every download run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetInfo {
    pub dataset: &'static str,
    pub technique: &'static str,
    pub sample: &'static str,
    pub resolution_nm: [u64; 3],
    pub format: Option<&'static str>,
    /// Top-level folder for this dataset, relative to the download root.
    pub dataset_dir: &'static str,
    /// Folder inside `dataset_dir` holding files and `metadata.json`.
    pub data_dir: &'static str,
}

impl DatasetInfo {
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(self.dataset_dir).join(self.data_dir)
    }

    pub fn metadata_path(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join(METADATA_FILE)
    }
}

/// Size of a fetched file in the unit its downloader reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ReportedSize {
    #[serde(rename = "size_mb")]
    Megabytes(f64),
    #[serde(rename = "size_kb")]
    Kilobytes(f64),
}

impl ReportedSize {
    pub fn megabytes(bytes: u64) -> Self {
        Self::Megabytes(bytes as f64 / BYTES_PER_MB)
    }

    pub fn kilobytes(bytes: u64) -> Self {
        Self::Kilobytes(bytes as f64 / BYTES_PER_KB)
    }
}

/// One fetched file, as listed under `files` in `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadedFile {
    pub filename: String,
    /// Path on the server, when it differs from `filename`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_type: Option<String>,
    /// Chunk grid position (z, y, x).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[u64; 3]>,
    pub size_bytes: u64,
    #[serde(flatten)]
    pub size: ReportedSize,
}

impl DownloadedFile {
    pub fn new(filename: impl Into<String>, size_bytes: u64, size: ReportedSize) -> Self {
        Self {
            filename: filename.into(),
            remote_path: None,
            chunk_type: None,
            coordinates: None,
            size_bytes,
            size,
        }
    }
}

/// The `metadata.json` a downloader writes next to its files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadMetadata {
    pub dataset: String,
    pub source: String,
    pub technique: String,
    pub sample: String,
    pub resolution_nm: [u64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Matching files on the server, of which the first few were fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_available_files: Option<usize>,
    pub files_downloaded: usize,
    pub total_size_mb: f64,
    pub files: Vec<DownloadedFile>,
    /// Local time of the run, ISO-8601 without offset.
    pub created: String,
}

impl DownloadMetadata {
    pub fn new(info: &DatasetInfo, source: impl Into<String>, files: Vec<DownloadedFile>) -> Self {
        let total_bytes: u64 = files.iter().map(|f| f.size_bytes).sum();
        Self {
            dataset: info.dataset.to_string(),
            source: source.into(),
            technique: info.technique.to_string(),
            sample: info.sample.to_string(),
            resolution_nm: info.resolution_nm,
            format: info.format.map(str::to_string),
            total_available_files: None,
            files_downloaded: files.len(),
            total_size_mb: total_bytes as f64 / BYTES_PER_MB,
            files,
            created: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        }
    }

    pub fn with_total_available(mut self, count: usize) -> Self {
        self.total_available_files = Some(count);
        self
    }

    /// Write `metadata.json` into `dir`, replacing any previous one.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(METADATA_FILE);
        let file = File::create(&path).map_err(|e| DownloadError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| DownloadError::io(&path, e))?;
        Ok(path)
    }
}
