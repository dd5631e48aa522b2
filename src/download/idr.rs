//! IDR-0086 Miron FIB-SEM chromatin volumes (multi-page TIFF over anonymous
//! FTP).
//!
//! The volumes are split across two upload directories; the processed
//! directory is listed first.

use std::path::{Path, PathBuf};

use super::ftp::{entry_name, FtpFetcher};
use super::metadata::{DatasetInfo, DownloadMetadata, DownloadedFile, ReportedSize};
use super::{parallel_map, DownloadError, Result};

pub const HOST: &str = "ftp.ebi.ac.uk";
pub const BASE_PATH: &str = "/pub/databases/IDR/idr0086-miron-micrographs";

/// Upload directories under [`BASE_PATH`], in listing order.
pub const SOURCE_DIRS: [&str; 2] = [
    "20200610-ftp/experimentD/Miron_FIB-SEM/Miron_FIB-SEM_processed",
    "20200714-dropbox",
];

pub const DEFAULT_FILES: usize = 12;
pub const DEFAULT_THREADS: u16 = 4;

pub const INFO: DatasetInfo = DatasetInfo {
    dataset: "IDR-0086 Human Chromatin Organization",
    technique: "Focused Ion Beam Scanning Electron Microscopy (FIB-SEM)",
    sample: "U2OS human osteosarcoma cells",
    resolution_nm: [20, 20, 20],
    format: Some("Multi-page TIFF (200-500 slices per volume)"),
    dataset_dir: "idr_0086",
    data_dir: "idr_data",
};

/// A TIFF volume and where it sits under [`BASE_PATH`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeTarget {
    pub filename: String,
    pub remote_path: String,
}

fn is_tiff(name: &str) -> bool {
    name.ends_with(".tif") || name.ends_with(".tiff")
}

/// TIFF volumes of one upload directory, in listing order.
pub fn tiff_volumes(dir: &str, listing: &[String]) -> Vec<VolumeTarget> {
    listing
        .iter()
        .map(|entry| entry_name(entry))
        .filter(|name| is_tiff(name))
        .map(|name| VolumeTarget {
            filename: name.to_string(),
            remote_path: format!("{dir}/{name}"),
        })
        .collect()
}

pub struct IdrDownloader {
    out_dir: PathBuf,
    fetcher: FtpFetcher,
}

impl IdrDownloader {
    /// Prepare `<root>/idr_0086/idr_data`.
    pub fn new(root: &Path) -> Result<Self> {
        let out_dir = INFO.output_dir(root);
        std::fs::create_dir_all(&out_dir).map_err(|e| DownloadError::io(&out_dir, e))?;
        Ok(Self {
            out_dir,
            fetcher: FtpFetcher::new(HOST),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// List both upload directories, fetch the first `num_files` volumes on
    /// `threads` workers, and write `metadata.json`.
    pub fn download(&self, num_files: usize, threads: usize) -> Result<DownloadMetadata> {
        let mut available = Vec::new();
        for dir in SOURCE_DIRS {
            let listing = self.fetcher.list(&format!("{BASE_PATH}/{dir}"))?;
            available.extend(tiff_volumes(dir, &listing));
        }
        let selected = &available[..num_files.min(available.len())];
        log::info!(
            "fetching {} of {} IDR volumes with {threads} workers",
            selected.len(),
            available.len()
        );

        let files = parallel_map(threads, selected, |target| self.fetch(target))?;

        let metadata = DownloadMetadata::new(&INFO, self.fetcher.url(BASE_PATH), files)
            .with_total_available(available.len());
        metadata.write(&self.out_dir)?;
        Ok(metadata)
    }

    fn fetch(&self, target: &VolumeTarget) -> Result<DownloadedFile> {
        let dest = self.out_dir.join(&target.filename);
        let size_bytes = self
            .fetcher
            .fetch_to_file(&format!("{BASE_PATH}/{}", target.remote_path), &dest)?;
        Ok(DownloadedFile {
            remote_path: Some(target.remote_path.clone()),
            ..DownloadedFile::new(
                target.filename.as_str(),
                size_bytes,
                ReportedSize::megabytes(size_bytes),
            )
        })
    }
}
