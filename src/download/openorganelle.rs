//! OpenOrganelle `jrc_mus-liver` Zarr chunks, sampled at random.
//!
//! Chunks are stored as raw bytes exactly as served; nothing here decodes
//! them.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;

use super::http::HttpFetcher;
use super::metadata::{DatasetInfo, DownloadMetadata, DownloadedFile, ReportedSize};
use super::{DownloadError, Result};

pub const BASE_URL: &str = "https://openorganelle.janelia.org/datasets/jrc_mus-liver/zarr";

pub const DEFAULT_CHUNKS: usize = 4;

pub const INFO: DatasetInfo = DatasetInfo {
    dataset: "OpenOrganelle JRC Mouse Liver",
    technique: "Enhanced Focused Ion Beam Scanning Electron Microscopy (FIB-SEM)",
    sample: "Mouse liver (C57BL/6J)",
    resolution_nm: [4, 4, 4],
    format: Some("Zarr chunks (random sampling)"),
    dataset_dir: "openorganelle_jrc",
    data_dir: "openorganelle_data",
};

/// Which array of the container a chunk belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// 8-bit FIB-SEM intensities, full resolution.
    RawEm,
    /// Connected-component nuclei labels, scale level 2.
    Nuclei,
}

impl ChunkKind {
    /// Number of chunks along (z, y, x).
    pub fn grid(self) -> [u64; 3] {
        match self {
            ChunkKind::RawEm => [9, 40, 41],
            ChunkKind::Nuclei => [2, 5, 6],
        }
    }

    fn array_path(self) -> &'static str {
        match self {
            ChunkKind::RawEm => "jrc_mus-liver.zarr/em/fibsem-uint8/s0",
            ChunkKind::Nuclei => "jrc_mus-liver.zarr/labels/nuclei-cc/s2",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChunkKind::RawEm => "raw_em",
            ChunkKind::Nuclei => "nuclei",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One chunk, addressed by its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTarget {
    pub kind: ChunkKind,
    /// (z, y, x)
    pub coords: [u64; 3],
}

impl ChunkTarget {
    pub fn url(&self, base_url: &str) -> String {
        let [z, y, x] = self.coords;
        format!("{base_url}/{}/{z}/{y}/{x}", self.kind.array_path())
    }

    pub fn filename(&self) -> String {
        let [z, y, x] = self.coords;
        format!("{}_{z}_{y}_{x}.zarr", self.kind)
    }
}

/// Pick chunk positions uniformly at random: about three quarters raw EM,
/// the rest nuclei, and at least one of each.
pub fn random_chunks<R: Rng + ?Sized>(num_chunks: usize, rng: &mut R) -> Vec<ChunkTarget> {
    let raw_count = (num_chunks * 3 / 4).max(1);
    let nuclei_count = num_chunks.saturating_sub(raw_count).max(1);

    let mut pick = |kind: ChunkKind| {
        let grid = kind.grid();
        ChunkTarget {
            kind,
            coords: [
                rng.random_range(0..grid[0]),
                rng.random_range(0..grid[1]),
                rng.random_range(0..grid[2]),
            ],
        }
    };

    let mut chunks = Vec::with_capacity(raw_count + nuclei_count);
    chunks.extend((0..raw_count).map(|_| pick(ChunkKind::RawEm)));
    chunks.extend((0..nuclei_count).map(|_| pick(ChunkKind::Nuclei)));
    chunks
}

pub struct OpenOrganelleDownloader {
    out_dir: PathBuf,
    base_url: String,
    fetcher: HttpFetcher,
}

impl OpenOrganelleDownloader {
    /// Prepare `<root>/openorganelle_jrc/openorganelle_data`.
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_source(root, BASE_URL, HttpFetcher::new()?)
    }

    /// Like [`OpenOrganelleDownloader::new`], reading the container from
    /// `base_url` instead.
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

    /// Fetch randomly chosen chunks one after another and write
    /// `metadata.json`.
    pub fn download<R: Rng + ?Sized>(
        &self,
        num_chunks: usize,
        rng: &mut R,
    ) -> Result<DownloadMetadata> {
        let chunks = random_chunks(num_chunks, rng);
        log::info!("fetching {} OpenOrganelle chunks", chunks.len());

        let files = chunks
            .iter()
            .map(|chunk| self.fetch(chunk))
            .collect::<Result<Vec<_>>>()?;

        let metadata = DownloadMetadata::new(&INFO, self.base_url.as_str(), files);
        metadata.write(&self.out_dir)?;
        Ok(metadata)
    }

    fn fetch(&self, chunk: &ChunkTarget) -> Result<DownloadedFile> {
        let filename = chunk.filename();
        let dest = self.out_dir.join(&filename);
        let size_bytes = self.fetcher.fetch_to_file(&chunk.url(&self.base_url), &dest)?;
        Ok(DownloadedFile {
            chunk_type: Some(chunk.kind.to_string()),
            coordinates: Some(chunk.coords),
            ..DownloadedFile::new(filename, size_bytes, ReportedSize::kilobytes(size_bytes))
        })
    }
}
