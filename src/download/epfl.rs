//! EPFL CVLab hippocampus mitochondria segmentation stacks (TIFF over HTTPS).

use std::path::{Path, PathBuf};

use super::http::HttpFetcher;
use super::metadata::{DatasetInfo, DownloadMetadata, DownloadedFile, ReportedSize};
use super::{parallel_map, DownloadError, Result};

pub const BASE_URL: &str =
    "https://documents.epfl.ch/groups/c/cv/cvlab-unit/www/data/%20ElectronMicroscopy_Hippocampus/";

/// Training and testing volumes with their ground truth, then reference results.
pub const FILES: [&str; 5] = [
    "training.tif",
    "training_groundtruth.tif",
    "testing.tif",
    "testing_groundtruth.tif",
    "results_test.tif",
];

pub const DEFAULT_FILES: usize = FILES.len();
pub const DEFAULT_THREADS: u16 = 3;

pub const INFO: DatasetInfo = DatasetInfo {
    dataset: "EPFL Hippocampus Mitochondria Segmentation",
    technique: "Transmission Electron Microscopy (TEM)",
    sample: "CA1 hippocampus region",
    resolution_nm: [5, 5, 5],
    format: None,
    dataset_dir: "epfl_hippocampus",
    data_dir: "epfl_data",
};

/// A file to fetch and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub filename: &'static str,
}

/// The first `num_files` files of the dataset under `base_url` (which ends in
/// `/`), in listing order.
pub fn targets(base_url: &str, num_files: usize) -> Vec<Target> {
    FILES
        .iter()
        .take(num_files)
        .map(|&filename| Target {
            url: format!("{base_url}{filename}"),
            filename,
        })
        .collect()
}

pub struct EpflDownloader {
    out_dir: PathBuf,
    base_url: String,
    fetcher: HttpFetcher,
}

impl EpflDownloader {
    /// Prepare `<root>/epfl_hippocampus/epfl_data`.
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_source(root, BASE_URL, HttpFetcher::new()?)
    }

    /// Like [`EpflDownloader::new`], fetching from a mirror of [`BASE_URL`].
    pub fn with_source(root: &Path, base_url: impl Into<String>, fetcher: HttpFetcher) -> Result<Self> {
        let out_dir = INFO.output_dir(root);
        std::fs::create_dir_all(&out_dir).map_err(|e| DownloadError::io(&out_dir, e))?;
        Ok(Self {
            out_dir,
            base_url: base_url.into(),
            fetcher,
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Fetch up to `num_files` TIFF stacks on `threads` workers and write
    /// `metadata.json`.
    pub fn download(&self, num_files: usize, threads: usize) -> Result<DownloadMetadata> {
        let targets = targets(&self.base_url, num_files);
        log::info!(
            "fetching {} EPFL files with {threads} workers",
            targets.len()
        );

        let files = parallel_map(threads, &targets, |target| self.fetch(target))?;

        let metadata = DownloadMetadata::new(&INFO, self.base_url.as_str(), files);
        metadata.write(&self.out_dir)?;
        Ok(metadata)
    }

    fn fetch(&self, target: &Target) -> Result<DownloadedFile> {
        let dest = self.out_dir.join(target.filename);
        let size_bytes = self.fetcher.fetch_to_file(&target.url, &dest)?;
        Ok(DownloadedFile::new(
            target.filename,
            size_bytes,
            ReportedSize::megabytes(size_bytes),
        ))
    }
}
