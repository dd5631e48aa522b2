//! EMPIAR-11759 zebrafish retina SBF-SEM slices (DM3 over anonymous FTP).

use std::path::{Path, PathBuf};

use super::ftp::{entry_name, FtpFetcher};
use super::metadata::{DatasetInfo, DownloadMetadata, DownloadedFile, ReportedSize};
use super::{parallel_map, DownloadError, Result};

pub const HOST: &str = "ftp.ebi.ac.uk";
pub const DATA_PATH: &str = "/empiar/world_availability/11759/data";

pub const DEFAULT_FILES: usize = 16;
pub const DEFAULT_THREADS: u16 = 4;

pub const INFO: DatasetInfo = DatasetInfo {
    dataset: "EMPIAR-11759 Zebrafish Retina Development",
    technique: "Serial Block-Face Scanning Electron Microscopy (SBF-SEM)",
    sample: "Zebrafish retina (55 hours post fertilization)",
    resolution_nm: [8, 8, 50],
    format: Some("DM3 (Digital Micrograph)"),
    dataset_dir: "empiar_11759",
    data_dir: "empiar_data",
};

/// DM3 files in a directory listing, sorted by name.
pub fn dm3_files(listing: &[String]) -> Vec<String> {
    let mut files: Vec<String> = listing
        .iter()
        .map(|entry| entry_name(entry))
        .filter(|name| name.ends_with(".dm3"))
        .map(str::to_string)
        .collect();
    files.sort();
    files
}

pub struct EmpiarDownloader {
    out_dir: PathBuf,
    fetcher: FtpFetcher,
}

impl EmpiarDownloader {
    /// Prepare `<root>/empiar_11759/empiar_data`.
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

    /// List the slices, fetch the first `num_files` by name on `threads`
    /// workers, and write `metadata.json`.
    pub fn download(&self, num_files: usize, threads: usize) -> Result<DownloadMetadata> {
        let available = dm3_files(&self.fetcher.list(DATA_PATH)?);
        let selected = &available[..num_files.min(available.len())];
        log::info!(
            "fetching {} of {} EMPIAR slices with {threads} workers",
            selected.len(),
            available.len()
        );

        let files = parallel_map(threads, selected, |name| self.fetch(name))?;

        let metadata = DownloadMetadata::new(&INFO, self.fetcher.url(DATA_PATH), files)
            .with_total_available(available.len());
        metadata.write(&self.out_dir)?;
        Ok(metadata)
    }

    fn fetch(&self, name: &str) -> Result<DownloadedFile> {
        let dest = self.out_dir.join(name);
        let size_bytes = self
            .fetcher
            .fetch_to_file(&format!("{DATA_PATH}/{name}"), &dest)?;
        Ok(DownloadedFile::new(
            name,
            size_bytes,
            ReportedSize::megabytes(size_bytes),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsolidatorConfig;

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn keeps_only_dm3_sorted() {
        let files = dm3_files(&listing(&[
            "slice_010.dm3",
            "README.txt",
            "slice_002.dm3",
            "slice_001.DM3",
            "thumbs",
            "slice_003.dm3.md5",
        ]));
        assert_eq!(files, vec!["slice_002.dm3", "slice_010.dm3"]);
    }

    #[test]
    fn full_paths_in_listing_are_reduced_to_names() {
        let files = dm3_files(&listing(&[
            "/empiar/world_availability/11759/data/b.dm3",
            "/empiar/world_availability/11759/data/a.dm3",
        ]));
        assert_eq!(files, vec!["a.dm3", "b.dm3"]);
    }

    #[test]
    fn source_is_the_ftp_directory() {
        assert_eq!(
            FtpFetcher::new(HOST).url(DATA_PATH),
            "ftp://ftp.ebi.ac.uk/empiar/world_availability/11759/data"
        );
    }

    #[test]
    fn metadata_lands_where_the_consolidator_looks() {
        let config = ConsolidatorConfig::with_root("/data");
        let source = config.sources.iter().find(|s| s.name == "EMPIAR").unwrap();
        assert_eq!(
            INFO.metadata_path(Path::new("/data")),
            config.resolve(&source.path)
        );
    }
}
