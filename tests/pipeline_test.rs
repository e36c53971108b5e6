//! End-to-end tests: raw files and feature table on disk, linear model,
//! CSV export read back with the csv crate.

#![cfg(feature = "mzml")]

mod common;

use std::fs;

use common::{Project, INVALID_BLOCK, MISSING_BLOCK, VALID_BLOCK};
use peakqc::classifier::LinearModel;
use peakqc::experiment::Experiment;
use peakqc::export::{CsvOptions, ExportConfig, ExportError};
use peakqc::feature_table::{FeatureTableError, SchemaIssue};
use peakqc::label::Label;
use peakqc::sample::{SampleError, SampleRegistry};

fn read_csv(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn load(project: &Project) -> Experiment {
    let registry = SampleRegistry::from_mzml_dir(&project.raw_dir).unwrap();
    let mut experiment = Experiment::new(registry);
    experiment.load_feature_table(&project.table).unwrap();
    experiment
}

/// Test the complete load, classify, export cycle
#[test]
fn test_full_pipeline() {
    let project = Project::new(
        &[("S1", 1e5), ("S2", 5e4), ("Blank", 0.0)],
        &[
            vec![VALID_BLOCK, VALID_BLOCK, VALID_BLOCK],
            vec![VALID_BLOCK, INVALID_BLOCK, MISSING_BLOCK],
            vec![MISSING_BLOCK, MISSING_BLOCK, VALID_BLOCK],
        ],
    );

    let mut experiment = load(&project);
    assert_eq!(experiment.registry().len(), 3);
    assert_eq!(experiment.consensus_features().len(), 3);

    let model = LinearModel::from_json_file(&project.model).unwrap();
    let report = experiment.predict(&model, 0.5).unwrap();
    assert!(report.is_complete());
    assert_eq!(report.labeled_peaks, 5);

    let summary = experiment.summary();
    assert_eq!(summary.invalid_peaks, 1);
    assert_eq!(summary.predicted.get(&Label::high_quality()), Some(&3));
    assert_eq!(summary.predicted.get(&Label::noise()), Some(&2));

    let output = project.path("peaks.csv");
    let config = ExportConfig {
        min_group_size: 0.5,
        ..Default::default()
    };
    let export = experiment
        .export_to_csv(&output, &config, &CsvOptions::default())
        .unwrap();
    // Row 0: 2/3 High; row 1: 1/2 High (invalid counts); row 2: only Blank
    assert_eq!(export.retained, 2);
    assert_eq!(export.dropped, 1);

    let (headers, rows) = read_csv(&output);
    assert_eq!(&headers[..3], &["index", "rt", "mz"]);
    assert!(headers.contains(&"S1 height".to_string()));
    assert!(headers.contains(&"Blank label".to_string()));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "0");
    assert_eq!(rows[1][0], "1");

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    assert_eq!(rows[0][col("S1 label")], "High_quality");
    assert_eq!(rows[0][col("Blank label")], "");
    assert_eq!(rows[1][col("S2 height")], "");
    assert_eq!(rows[1][col("S1 area")], "150");
}

#[test]
fn test_annotations_from_file() {
    let project = Project::new(
        &[("S1", 1e5), ("S2", 1e5)],
        &[vec![VALID_BLOCK, VALID_BLOCK]],
    );
    let annotations = project.path("labels.csv");
    fs::write(&annotations, "consensus_index,sample,label\n0,S2.mzML,Low_quality\n").unwrap();

    let mut experiment = load(&project);
    let model = LinearModel::from_json_file(&project.model).unwrap();
    experiment.predict(&model, 0.5).unwrap();
    experiment.load_annotations(&annotations).unwrap();

    let config = ExportConfig {
        use_annotation: true,
        min_group_size: 0.5,
        ..Default::default()
    };
    let table = experiment.export_table(&config).unwrap();
    assert_eq!(table.rows().len(), 1);
    assert_eq!(
        table.value(0, "S2 label").map(|v| v.to_string()),
        Some("Low_quality".to_string())
    );

    // 1 of 2 High_quality fails the default 0.75
    let table = experiment
        .export_table(&ExportConfig {
            use_annotation: true,
            ..Default::default()
        })
        .unwrap();
    assert!(table.rows().is_empty());
}

#[test]
fn test_schema_mismatch_is_fatal() {
    let project = Project::new(&[("S1", 1e5), ("S2", 1e5)], &[vec![VALID_BLOCK, VALID_BLOCK]]);

    // Table mentions a sample without a raw file
    fs::remove_file(project.raw_dir.join("S2.mzML")).unwrap();
    let registry = SampleRegistry::from_mzml_dir(&project.raw_dir).unwrap();
    let mut experiment = Experiment::new(registry);
    let err = experiment.load_feature_table(&project.table).unwrap_err();
    assert!(matches!(
        err,
        FeatureTableError::SchemaMismatch(SchemaIssue::UnknownSample(ref s)) if s == "S2.mzML"
    ));
    assert!(experiment.consensus_features().is_empty());
}

#[test]
fn test_empty_raw_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = SampleRegistry::from_mzml_dir(dir.path()).unwrap_err();
    assert!(matches!(err, SampleError::NoRawFiles(_)));
}

#[test]
fn test_failed_export_keeps_previous_file() {
    let project = Project::new(&[("S1", 1e5)], &[vec![VALID_BLOCK]]);
    let mut experiment = load(&project);
    let model = LinearModel::from_json_file(&project.model).unwrap();
    experiment.predict(&model, 0.5).unwrap();

    let output = project.path("peaks.csv");
    experiment
        .export_to_csv(&output, &ExportConfig::default(), &CsvOptions::default())
        .unwrap();
    let before = fs::read(&output).unwrap();

    let bad = ExportConfig {
        export_properties: vec!["rt".to_string(), "bogus".to_string()],
        ..Default::default()
    };
    let err = experiment
        .export_to_csv(&output, &bad, &CsvOptions::default())
        .unwrap_err();
    assert!(matches!(err, ExportError::FilterConfiguration(_)));
    assert_eq!(fs::read(&output).unwrap(), before);
}
