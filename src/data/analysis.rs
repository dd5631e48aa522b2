use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Number;

use super::model::{ExtractedRecord, LoadedDatasets, ResolutionAnalysis, TechniqueGroups};

// ---------------------------------------------------------------------------
// Field extraction + resolution analysis
// ---------------------------------------------------------------------------

/// Project every loaded record onto the compared fields and analyze the
/// resolution of those that carry a triple.
///
/// The extracted map always has exactly the loaded names. The analysis map
/// only has names whose `resolution_nm` has three entries.
pub fn extract_common_fields(
    datasets: &LoadedDatasets,
) -> (
    IndexMap<String, ExtractedRecord>,
    IndexMap<String, ResolutionAnalysis>,
) {
    let mut extracted = IndexMap::new();
    let mut analysis = IndexMap::new();

    for (name, meta) in datasets {
        extracted.insert(name.clone(), ExtractedRecord::from(meta));

        match ResolutionAnalysis::from_resolution(&meta.resolution_nm) {
            Some(res) => {
                analysis.insert(name.clone(), res);
            }
            None => log::debug!(
                "{name}: resolution has {} entries, skipping analysis",
                meta.resolution_nm.len()
            ),
        }
    }

    (extracted, analysis)
}

impl ResolutionAnalysis {
    /// Analyze a resolution list. Returns `None` unless it has exactly three
    /// entries.
    pub fn from_resolution(resolution: &[Number]) -> Option<Self> {
        let [a, b, c] = resolution else {
            return None;
        };
        let isotropic = num_eq(a, b) && num_eq(b, c);
        // First occurrence wins on ties, keeping its JSON spelling.
        let min_nm = [b, c]
            .into_iter()
            .fold(a, |acc, n| if num_cmp(n, acc).is_lt() { n } else { acc });
        let max_nm = [b, c]
            .into_iter()
            .fold(a, |acc, n| if num_cmp(n, acc).is_gt() { n } else { acc });

        Some(Self {
            resolution: [a.clone(), b.clone(), c.clone()],
            isotropic,
            min_nm: min_nm.clone(),
            max_nm: max_nm.clone(),
        })
    }
}

fn num_value(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn num_eq(a: &Number, b: &Number) -> bool {
    num_value(a) == num_value(b)
}

fn num_cmp(a: &Number, b: &Number) -> Ordering {
    num_value(a).total_cmp(&num_value(b))
}

// ---------------------------------------------------------------------------
// Technique grouping
// ---------------------------------------------------------------------------

/// Normalize a free-text technique label: the text before the first `(`,
/// with surrounding whitespace trimmed.
///
/// `"Focused Ion Beam Scanning Electron Microscopy (FIB-SEM)"` becomes
/// `"Focused Ion Beam Scanning Electron Microscopy"`. An empty label stays
/// empty and is still a valid group key.
pub fn normalize_technique(technique: &str) -> &str {
    technique
        .split('(')
        .next()
        .unwrap_or_default()
        .trim()
}

/// Group dataset names by normalized technique. Groups appear in order of
/// their first dataset; names within a group keep loader order.
pub fn group_techniques(datasets: &LoadedDatasets) -> TechniqueGroups {
    let mut groups = TechniqueGroups::new();
    for (name, meta) in datasets {
        groups
            .entry(normalize_technique(&meta.technique).to_string())
            .or_default()
            .push(name.clone());
    }
    groups
}

// ---------------------------------------------------------------------------
// Key findings
// ---------------------------------------------------------------------------

/// Headline numbers printed after the comparison table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFindings {
    /// Global (min, max) resolution over analyzable datasets.
    pub resolution_range: Option<(Number, Number)>,
    pub isotropic_count: usize,
    pub analyzed_count: usize,
    /// (technique, dataset count) in group order.
    pub technique_counts: Vec<(String, usize)>,
}

impl KeyFindings {
    pub fn new(analysis: &IndexMap<String, ResolutionAnalysis>, groups: &TechniqueGroups) -> Self {
        let min = analysis
            .values()
            .map(|a| &a.min_nm)
            .reduce(|acc, n| if num_cmp(n, acc).is_lt() { n } else { acc });
        let max = analysis
            .values()
            .map(|a| &a.max_nm)
            .reduce(|acc, n| if num_cmp(n, acc).is_gt() { n } else { acc });
        let resolution_range = min.zip(max).map(|(lo, hi)| (lo.clone(), hi.clone()));

        Self {
            resolution_range,
            isotropic_count: analysis.values().filter(|a| a.isotropic).count(),
            analyzed_count: analysis.len(),
            technique_counts: groups
                .iter()
                .map(|(tech, names)| (tech.clone(), names.len()))
                .collect(),
        }
    }
}

impl fmt::Display for KeyFindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "KEY FINDINGS:")?;
        if let Some((lo, hi)) = &self.resolution_range {
            writeln!(f, "- Resolution range: {lo}-{hi} nm")?;
            writeln!(
                f,
                "- Isotropic datasets: {}/{}",
                self.isotropic_count, self.analyzed_count
            )?;
        }
        writeln!(f, "- Technique groups: {}", self.technique_counts.len())?;
        for (tech, count) in &self.technique_counts {
            writeln!(f, "  • {tech}: {count} datasets")?;
        }
        Ok(())
    }
}
