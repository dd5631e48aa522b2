use std::fmt::Write;

use indexmap::IndexMap;

use super::model::{ExtractedRecord, ResolutionAnalysis};

/// Width of the leftmost (metric label) column.
pub const LABEL_WIDTH: usize = 20;
/// Width of each dataset column.
pub const CELL_WIDTH: usize = 12;
/// Width of the `=` / `-` rules framing the table.
pub const RULE_WIDTH: usize = 80;

const SEP: &str = " | ";

/// Render the fixed-width comparison table, one column per dataset in the
/// order of `fields`.
///
/// Display only: wide names or values overflow their cell instead of being
/// truncated, and nothing parses this text back.
pub fn render_table(
    fields: &IndexMap<String, ExtractedRecord>,
    analysis: &IndexMap<String, ResolutionAnalysis>,
) -> String {
    let datasets: Vec<&str> = fields.keys().map(String::as_str).collect();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut out = String::from("\n");
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "EM DATASET COMPARISON");
    let _ = writeln!(out, "{heavy}");

    let header: Vec<String> = datasets
        .iter()
        .map(|d| format!("{d:<CELL_WIDTH$}"))
        .collect();
    let _ = writeln!(out, "{:<LABEL_WIDTH$}{SEP}{}", "Field", header.join(SEP));
    let _ = writeln!(out, "{light}");

    push_row(&mut out, "Resolution (nm)", &datasets, |d| {
        analysis
            .get(d)
            .map(|a| {
                let [x, y, z] = &a.resolution;
                format!("{x}×{y}×{z}")
            })
            .unwrap_or_else(|| "N/A".to_string())
    });

    push_row(&mut out, "Isotropic", &datasets, |d| {
        let glyph = if analysis.get(d).is_some_and(|a| a.isotropic) {
            "✓"
        } else {
            "✗"
        };
        glyph.to_string()
    });

    push_row(&mut out, "Files", &datasets, |d| {
        fields.get(d).map_or(0, |r| r.files_count).to_string()
    });

    push_row(&mut out, "Size (MB)", &datasets, |d| {
        let size = fields.get(d).and_then(|r| r.size_mb.as_f64()).unwrap_or(0.0);
        format!("{size:.1}")
    });

    let _ = writeln!(out, "{heavy}");
    out
}

/// One metric row; every cell, including the last, is followed by the
/// column separator.
fn push_row(out: &mut String, label: &str, datasets: &[&str], cell: impl Fn(&str) -> String) {
    let _ = write!(out, "{label:<LABEL_WIDTH$}{SEP}");
    for d in datasets {
        let _ = write!(out, "{:<CELL_WIDTH$}{SEP}", cell(d));
    }
    out.push('\n');
}
