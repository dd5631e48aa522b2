use std::path::{Path, PathBuf};

/// File the consolidated report is written to, relative to the root.
pub const REPORT_FILE: &str = "metadata_consolidated_report.json";

/// Known dataset sources: display name → metadata path relative to the root.
pub const DEFAULT_SOURCES: [(&str, &str); 5] = [
    ("EPFL", "epfl_hippocampus/epfl_data/metadata.json"),
    ("FlyEM", "flyem_hemibrain/hemibrain_data/metadata.json"),
    ("EMPIAR", "empiar_11759/empiar_data/metadata.json"),
    ("IDR", "idr_0086/idr_data/metadata.json"),
    ("OpenOrganelle", "openorganelle_jrc/openorganelle_data/metadata.json"),
];

/// One dataset whose downloader output the consolidator reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub name: String,
    /// Path of the metadata JSON, relative to [`ConsolidatorConfig::root`].
    pub path: PathBuf,
}

/// Everything the consolidator needs to know about where to read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatorConfig {
    /// Directory the source and output paths are resolved against.
    pub root: PathBuf,
    /// Sources in display order; this order drives every report section.
    pub sources: Vec<DatasetSource>,
    /// Report path, relative to `root`.
    pub output: PathBuf,
}

impl Default for ConsolidatorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sources: DEFAULT_SOURCES
                .iter()
                .map(|(name, path)| DatasetSource {
                    name: name.to_string(),
                    path: PathBuf::from(*path),
                })
                .collect(),
            output: PathBuf::from(REPORT_FILE),
        }
    }
}

impl ConsolidatorConfig {
    /// Default sources and output, resolved against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }
}
