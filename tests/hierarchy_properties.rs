//! Property-based tests for the hierarchy and the export filters

mod common;

use proptest::prelude::*;

use common::{INVALID_BLOCK, MISSING_BLOCK, VALID_BLOCK};
use peakqc::classifier::LinearModel;
use peakqc::experiment::Experiment;
use peakqc::export::{ExportConfig, ExportProperty};
use peakqc::label::{Label, LabelSet};
use peakqc::sample::{Sample, SampleRegistry, Scan, Trace};

fn trace() -> Trace {
    let scans = (0..=200)
        .map(|i| {
            let rt = i as f64 * 0.05;
            let apex = 1e5 * (-((rt - 5.0) / 0.1).powi(2) / 2.0).exp();
            Scan::new(rt, vec![100.0, 200.0], vec![apex, 1.0])
        })
        .collect();
    Trace::new(scans)
}

fn experiment(samples: usize, rows: &[Vec<u8>]) -> Experiment {
    let names: Vec<String> = (0..samples).map(|i| format!("S{}", i)).collect();
    let mut registry = SampleRegistry::new();
    for name in &names {
        registry.insert(Sample::new(name.clone(), trace())).unwrap();
    }

    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let blocks: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|kind| match kind {
                    0 => MISSING_BLOCK,
                    1 => VALID_BLOCK,
                    _ => INVALID_BLOCK,
                })
                .collect()
        })
        .collect();
    let csv = common::feature_table(&name_refs, &blocks);

    let mut experiment = Experiment::new(registry);
    experiment
        .load_feature_table_from_reader(csv.as_bytes())
        .unwrap();
    experiment
}

/// Flat model: every class equally likely, argmax picks High_quality
fn flat_model() -> LinearModel {
    LinearModel::new(LabelSet::default(), 120, vec![vec![0.0; 120]; 3], vec![0.0; 3]).unwrap()
}

fn table_strategy() -> impl Strategy<Value = (usize, Vec<Vec<u8>>)> {
    (1usize..5).prop_flat_map(|samples| {
        (
            Just(samples),
            prop::collection::vec(prop::collection::vec(0u8..3, samples), 0..25),
        )
    })
}

proptest! {
    /// One consensus feature per row, one feature per present block
    #[test]
    fn test_rows_and_features_preserved((samples, rows) in table_strategy()) {
        let experiment = experiment(samples, &rows);
        prop_assert_eq!(experiment.consensus_features().len(), rows.len());
        for (consensus, row) in experiment.consensus_features().iter().zip(&rows) {
            let present = row.iter().filter(|&&k| k != 0).count();
            prop_assert_eq!(consensus.len(), present);
        }
    }

    /// Permissive filters keep every non-empty consensus feature and every
    /// valid labeled peak
    #[test]
    fn test_permissive_export_loses_nothing((samples, rows) in table_strategy()) {
        let mut experiment = experiment(samples, &rows);
        experiment.predict(&flat_model(), 0.2).unwrap();

        let all = vec![Label::high_quality(), Label::low_quality(), Label::noise()];
        let config = ExportConfig {
            export_classes: all.clone(),
            min_group_classes: all,
            min_group_size: 0.0,
            ..Default::default()
        }
        .with_properties(&[ExportProperty::Label]);
        let table = experiment.export_table(&config).unwrap();

        let non_empty = rows.iter().filter(|r| r.iter().any(|&k| k != 0)).count();
        let valid = rows.iter().flatten().filter(|&&k| k == 1).count();
        let exported = table
            .rows()
            .iter()
            .flat_map(|r| &r.cells)
            .filter(|c| c.is_some())
            .count();

        prop_assert_eq!(table.rows().len(), non_empty);
        prop_assert_eq!(exported, valid);
    }

    /// Retention flips exactly at the group-size boundary
    #[test]
    fn test_group_size_boundary(total in 1usize..8, high in 0usize..8) {
        let high = high.min(total);
        let experiment = {
            let mut experiment = experiment(total, &[vec![1u8; total]]);
            let model = flat_model();
            experiment.predict(&model, 0.2).unwrap();
            experiment
        };
        // Flat scores and a low threshold label everything High_quality;
        // demote the samples beyond `high` via annotations.
        let mut experiment = experiment;
        let csv: String = std::iter::once("consensus_index,sample,label\n".to_string())
            .chain((high..total).map(|i| format!("0,S{},Low_quality\n", i)))
            .collect();
        experiment.load_annotations_from_reader(csv.as_bytes()).unwrap();

        let at = |size: f64| ExportConfig {
            use_annotation: true,
            min_group_size: size,
            ..Default::default()
        };
        let exact = high as f64 / total as f64;
        prop_assert_eq!(experiment.export_table(&at(exact)).unwrap().rows().len(), 1);
        if high < total {
            let above = (high + 1) as f64 / total as f64;
            prop_assert_eq!(experiment.export_table(&at(above)).unwrap().rows().len(), 0);
        }
    }
}
