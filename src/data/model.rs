use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

// ---------------------------------------------------------------------------
// DatasetMetadata – one downloader's metadata.json
// ---------------------------------------------------------------------------

/// The subset of a downloader's `metadata.json` the consolidator reads.
///
/// Every field is optional in the source document; missing keys and explicit
/// `null`s both fall back to the field's default. Other keys (`dataset`,
/// `source`, `files`, `created`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetMetadata {
    /// Nanometres per axis. Axis order depends on the source and is not
    /// normalized; length is not validated here.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resolution_nm: Vec<Number>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technique: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sample: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files_downloaded: u64,
    /// Kept as written so `256` is reported back as `256`, not `256.0`.
    #[serde(default = "zero", deserialize_with = "null_as_zero")]
    pub total_size_mb: Number,
}

impl Default for DatasetMetadata {
    fn default() -> Self {
        Self {
            resolution_nm: Vec::new(),
            technique: String::new(),
            sample: String::new(),
            files_downloaded: 0,
            total_size_mb: zero(),
        }
    }
}

fn zero() -> Number {
    Number::from(0)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Number>::deserialize(deserializer)?.unwrap_or_else(zero))
}

/// Parsed metadata keyed by display name, in source-table order.
pub type LoadedDatasets = IndexMap<String, DatasetMetadata>;

// ---------------------------------------------------------------------------
// Derived records
// ---------------------------------------------------------------------------

/// Per-dataset projection of [`DatasetMetadata`] onto the compared fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRecord {
    /// Raw resolution list, kept even when it is not a triple.
    pub resolution_nm: Vec<Number>,
    pub technique: String,
    pub sample: String,
    pub files_count: u64,
    pub size_mb: Number,
}

impl From<&DatasetMetadata> for ExtractedRecord {
    fn from(meta: &DatasetMetadata) -> Self {
        Self {
            resolution_nm: meta.resolution_nm.clone(),
            technique: meta.technique.clone(),
            sample: meta.sample.clone(),
            files_count: meta.files_downloaded,
            size_mb: meta.total_size_mb.clone(),
        }
    }
}

/// Voxel-spacing analysis for a dataset whose resolution is a triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionAnalysis {
    pub resolution: [Number; 3],
    /// All three axes have the same spacing.
    pub isotropic: bool,
    pub min_nm: Number,
    pub max_nm: Number,
}

/// Normalized technique name → dataset names sharing it.
pub type TechniqueGroups = IndexMap<String, Vec<String>>;

// ---------------------------------------------------------------------------
// ConsolidatedReport – the persisted output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_datasets: usize,
    pub datasets: Vec<String>,
}

/// Every name-keyed section follows source-table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedReport {
    pub summary: ReportSummary,
    pub fields: IndexMap<String, ExtractedRecord>,
    pub resolution_analysis: IndexMap<String, ResolutionAnalysis>,
    pub technique_groups: TechniqueGroups,
    /// Rendered comparison table, for humans only.
    pub table: String,
}
