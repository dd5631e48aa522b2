use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::analysis::{extract_common_fields, group_techniques, KeyFindings};
use crate::data::model::{ConsolidatedReport, LoadedDatasets, ReportSummary};
use crate::data::table::render_table;

/// Derive every report section from the loaded datasets.
pub fn build_report(datasets: &LoadedDatasets) -> ConsolidatedReport {
    let (fields, resolution_analysis) = extract_common_fields(datasets);
    let technique_groups = group_techniques(datasets);
    let table = render_table(&fields, &resolution_analysis);

    ConsolidatedReport {
        summary: ReportSummary {
            total_datasets: datasets.len(),
            datasets: datasets.keys().cloned().collect(),
        },
        fields,
        resolution_analysis,
        technique_groups,
        table,
    }
}

/// Write the report as 2-space indented JSON, replacing any previous file.
///
/// The file is written in place; a failure part-way leaves it truncated.
pub fn write_report(report: &ConsolidatedReport, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("serializing report to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("writing report {}", path.display()))?;
    log::info!("wrote report for {} datasets to {}", report.summary.total_datasets, path.display());
    Ok(())
}

impl ConsolidatedReport {
    pub fn key_findings(&self) -> KeyFindings {
        KeyFindings::new(&self.resolution_analysis, &self.technique_groups)
    }
}

// ---------------------------------------------------------------------------
// Console output
// ---------------------------------------------------------------------------

/// Printed before anything is loaded.
pub fn console_banner() -> String {
    format!("EM Dataset Metadata Consolidator\n{}\n", "=".repeat(40))
}

/// Progress line, comparison table, then the key findings.
pub fn console_results(report: &ConsolidatedReport) -> String {
    format!(
        "Loaded {} datasets\n{}\n{}",
        report.summary.total_datasets,
        report.table,
        report.key_findings()
    )
}
