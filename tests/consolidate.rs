use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use em_datasets::config::ConsolidatorConfig;
use em_datasets::data::loader::load_metadata;
use em_datasets::report::{build_report, write_report};

fn init_logging() {
    env_logger::try_init().ok();
}

fn write_source(root: &Path, rel: &str, body: Value) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

/// Metadata as the individual downloaders write it, minus the file lists.
fn populate(root: &Path) {
    write_source(
        root,
        "epfl_hippocampus/epfl_data/metadata.json",
        json!({
            "dataset": "EPFL Hippocampus Mitochondria Segmentation",
            "technique": "Transmission Electron Microscopy (TEM)",
            "sample": "CA1 hippocampus region",
            "resolution_nm": [5, 5, 5],
            "files_downloaded": 5,
            "total_size_mb": 1021.3,
            "created": "2024-05-02T10:11:12.123456"
        }),
    );
    write_source(
        root,
        "flyem_hemibrain/hemibrain_data/metadata.json",
        json!({
            "dataset": "FlyEM Hemibrain Drosophila Connectome",
            "technique": "Focused Ion Beam Scanning Electron Microscopy (FIB-SEM)",
            "sample": "Adult Drosophila brain hemisphere",
            "resolution_nm": [8, 8, 8],
            "crop_size": 1000
        }),
    );
    write_source(
        root,
        "empiar_11759/empiar_data/metadata.json",
        json!({
            "technique": "Serial Block-Face Scanning Electron Microscopy (SBF-SEM)",
            "sample": "Zebrafish retina (55 hours post fertilization)",
            "resolution_nm": [8, 8, 50],
            "files_downloaded": 16,
            "total_size_mb": 256.0
        }),
    );
    write_source(
        root,
        "idr_0086/idr_data/metadata.json",
        json!({
            "technique": "Focused Ion Beam Scanning Electron Microscopy (FIB-SEM)",
            "sample": "U2OS human osteosarcoma cells",
            "resolution_nm": [20, 20],
            "files_downloaded": 12,
            "total_size_mb": 80.4
        }),
    );
}

fn consolidate(root: &Path) -> Value {
    let config = ConsolidatorConfig::with_root(root);
    let datasets = load_metadata(&config).unwrap();
    let report = build_report(&datasets);
    write_report(&report, &config.output_path()).unwrap();
    let text = fs::read_to_string(config.output_path()).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn consolidates_available_datasets() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());

    let report = consolidate(dir.path());

    assert_eq!(
        report["summary"],
        json!({"total_datasets": 4, "datasets": ["EPFL", "FlyEM", "EMPIAR", "IDR"]})
    );

    let mut fields: Vec<&String> = report["fields"].as_object().unwrap().keys().collect();
    fields.sort();
    assert_eq!(fields, vec!["EMPIAR", "EPFL", "FlyEM", "IDR"]);
    assert_eq!(report["fields"]["FlyEM"]["files_count"], 0);
    assert_eq!(report["fields"]["FlyEM"]["size_mb"], 0);
    assert_eq!(report["fields"]["EPFL"]["size_mb"], 1021.3);
    assert_eq!(report["fields"]["IDR"]["resolution_nm"], json!([20, 20]));

    let analysis = report["resolution_analysis"].as_object().unwrap();
    assert_eq!(analysis.len(), 3);
    assert!(!analysis.contains_key("IDR"));
    assert_eq!(
        report["resolution_analysis"]["EMPIAR"],
        json!({"resolution": [8, 8, 50], "isotropic": false, "min_nm": 8, "max_nm": 50})
    );

    assert_eq!(
        report["technique_groups"],
        json!({
            "Transmission Electron Microscopy": ["EPFL"],
            "Focused Ion Beam Scanning Electron Microscopy": ["FlyEM", "IDR"],
            "Serial Block-Face Scanning Electron Microscopy": ["EMPIAR"]
        })
    );

    let table = report["table"].as_str().unwrap();
    assert!(table.contains("Resolution (nm)      | 5×5×5        | 8×8×8        | 8×8×50       | N/A          | "));
    assert!(table.contains("Size (MB)            | 1021.3       | 0.0          | 256.0        | 80.4         | "));
}

#[test]
fn sections_keep_source_order_on_disk() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    consolidate(dir.path());

    let text = fs::read_to_string(dir.path().join("metadata_consolidated_report.json")).unwrap();
    let epfl = text.find("\"EPFL\": {").unwrap();
    let flyem = text.find("\"FlyEM\": {").unwrap();
    let empiar = text.find("\"EMPIAR\": {").unwrap();
    assert!(epfl < flyem && flyem < empiar);
    // Sizes keep their JSON spelling; a missing size is written as 0.
    assert!(text.contains("\"size_mb\": 0\n"));
    assert!(text.contains("\"size_mb\": 256.0\n"));
}

#[test]
fn reruns_are_byte_identical() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path());
    let out = dir.path().join("metadata_consolidated_report.json");

    consolidate(dir.path());
    let first = fs::read(&out).unwrap();
    consolidate(dir.path());
    let second = fs::read(&out).unwrap();
    assert_eq!(first, second);
}

#[test]
fn no_sources_gives_an_empty_report() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let report = consolidate(dir.path());
    assert_eq!(report["summary"]["total_datasets"], 0);
    assert_eq!(report["fields"], json!({}));
    assert_eq!(report["resolution_analysis"], json!({}));
    assert_eq!(report["technique_groups"], json!({}));
    assert!(report["table"].as_str().unwrap().contains("Field                | \n"));
}

#[test]
fn malformed_source_aborts_without_writing() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("idr_0086/idr_data/metadata.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json").unwrap();

    let config = ConsolidatorConfig::with_root(dir.path());
    assert!(load_metadata(&config).is_err());
    assert!(!config.output_path().exists());
}
