use std::path::Path;

use anyhow::{Context, Result};

use super::model::{DatasetMetadata, LoadedDatasets};
use crate::config::ConsolidatorConfig;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the metadata of every configured source that exists on disk.
///
/// Sources whose file is missing are skipped (the dataset simply has not been
/// downloaded yet). A file that exists but does not parse aborts the whole
/// load.
pub fn load_metadata(config: &ConsolidatorConfig) -> Result<LoadedDatasets> {
    let mut datasets = LoadedDatasets::new();

    for source in &config.sources {
        let path = config.resolve(&source.path);
        if !path.exists() {
            log::debug!("{}: no metadata at {}", source.name, path.display());
            continue;
        }
        let meta = load_metadata_file(&path)
            .with_context(|| format!("loading metadata for {}", source.name))?;
        datasets.insert(source.name.clone(), meta);
    }

    log::info!(
        "loaded {} of {} dataset sources",
        datasets.len(),
        config.sources.len()
    );
    Ok(datasets)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Parse one downloader `metadata.json`.
///
/// ```json
/// {
///   "dataset": "EMPIAR-11759 Zebrafish Retina Development",
///   "technique": "Serial Block-Face Scanning Electron Microscopy (SBF-SEM)",
///   "sample": "Zebrafish retina (55 hours post fertilization)",
///   "resolution_nm": [8, 8, 50],
///   "files_downloaded": 16,
///   "total_size_mb": 412.7,
///   ...
/// }
/// ```
pub fn load_metadata_file(path: &Path) -> Result<DatasetMetadata> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing JSON in {}", path.display()))
}
