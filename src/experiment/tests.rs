use super::*;
use crate::label::Label;
use crate::testing::{self, Cell};

#[test]
fn test_row_and_feature_counts() {
    let experiment = testing::experiment(
        &["A", "B", "C"],
        &[
            vec![Cell::Valid, Cell::Valid, Cell::Valid],
            vec![Cell::Valid, Cell::Missing, Cell::Invalid],
            vec![Cell::Missing, Cell::Missing, Cell::Missing],
        ],
    );

    let consensus = experiment.consensus_features();
    assert_eq!(consensus.len(), 3);
    assert_eq!(consensus[0].len(), 3);
    assert_eq!(consensus[1].len(), 2);
    assert!(consensus[2].is_empty());

    // File order is preserved in ids and consensus values
    for (i, c) in consensus.iter().enumerate() {
        assert_eq!(c.id().index(), i);
        assert_eq!(c.mz(), 100.0 + i as f64);
    }
}

#[test]
fn test_missing_block_vs_invalid_peak() {
    let experiment = testing::experiment(&["A", "B", "C"], &[vec![Cell::Valid, Cell::Missing, Cell::Invalid]]);
    let id = ConsensusId::new(0);
    let a = testing::sample(&experiment, "A");
    let b = testing::sample(&experiment, "B");
    let c = testing::sample(&experiment, "C");

    assert!(experiment.feature(id, b).is_none());

    let valid = experiment.feature(id, a).unwrap();
    assert!(valid.peak().is_valid());
    assert!(valid.peak().eic().is_some_and(|eic| eic.apex_intensity() > 0.0));
    assert_eq!(valid.sample(), a);
    assert_eq!(valid.consensus(), id);

    let invalid = experiment.feature(id, c).unwrap();
    assert!(!invalid.peak().is_valid());
    assert!(matches!(
        invalid.peak().signal(),
        PeakSignal::Unresolved(crate::sample::PeakResolutionError::OutsideTrace { .. })
    ));
}

#[test]
fn test_build_report() {
    let mut experiment = Experiment::new(testing::registry(&[("A", 1.0), ("B", 1.0)]));
    let csv = testing::table_csv(
        &["A", "B"],
        &[vec![Cell::Valid, Cell::Invalid], vec![Cell::Missing, Cell::Valid]],
    );
    let report = experiment
        .load_feature_table_from_reader(csv.as_bytes())
        .unwrap();

    assert_eq!(
        report,
        BuildReport {
            consensus_features: 2,
            features: 3,
            valid_peaks: 2,
            invalid_peaks: 1,
        }
    );
}

#[test]
fn test_second_table_appends() {
    let mut experiment = testing::experiment(&["A"], &[vec![Cell::Valid]]);
    let csv = testing::table_csv(&["A"], &[vec![Cell::Valid], vec![Cell::Valid]]);
    experiment
        .load_feature_table_from_reader(csv.as_bytes())
        .unwrap();

    let ids: Vec<usize> = experiment
        .consensus_features()
        .iter()
        .map(|c| c.id().index())
        .collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn test_schema_error_leaves_experiment_untouched() {
    let mut experiment = testing::experiment(&["A"], &[vec![Cell::Valid]]);
    let csv = testing::table_csv(&["Z"], &[vec![Cell::Valid]]);
    assert!(experiment
        .load_feature_table_from_reader(csv.as_bytes())
        .is_err());
    assert_eq!(experiment.consensus_features().len(), 1);
}

#[test]
fn test_effective_label() {
    let mut experiment = testing::experiment(&["A", "B"], &[vec![Cell::Valid, Cell::Invalid]]);
    testing::predict(&mut experiment, 0, "A", "High_quality");
    testing::annotate(&mut experiment, 0, "A", "Low_quality");

    let a = testing::sample(&experiment, "A");
    let peak = experiment.feature(ConsensusId::new(0), a).unwrap().peak();
    assert_eq!(peak.effective_label(false), Some(&Label::high_quality()));
    assert_eq!(peak.effective_label(true), Some(&Label::low_quality()));

    // Invalid peaks never expose a label, even an annotated one
    testing::annotate(&mut experiment, 0, "B", "High_quality");
    testing::predict(&mut experiment, 0, "B", "High_quality");
    let b = testing::sample(&experiment, "B");
    let peak = experiment.feature(ConsensusId::new(0), b).unwrap().peak();
    assert!(peak.prediction().is_none());
    assert_eq!(peak.effective_label(true), None);
}

#[test]
fn test_annotation_falls_back_to_prediction() {
    let mut experiment = testing::experiment(&["A"], &[vec![Cell::Valid]]);
    testing::predict(&mut experiment, 0, "A", "Noise");
    let a = testing::sample(&experiment, "A");
    let peak = experiment.feature(ConsensusId::new(0), a).unwrap().peak();
    assert_eq!(peak.effective_label(true), Some(&Label::noise()));
}

#[test]
fn test_load_annotations() {
    let mut experiment = testing::experiment(
        &["A", "B"],
        &[vec![Cell::Valid, Cell::Valid], vec![Cell::Valid, Cell::Missing]],
    );
    testing::annotate(&mut experiment, 1, "A", "Noise");

    let csv = "consensus_index,sample,label\n0,A,High_quality\n0,B.mzML,Low_quality\n1,A,\n";
    let report = experiment
        .load_annotations_from_reader(csv.as_bytes())
        .unwrap();
    assert_eq!(report, AnnotationReport { annotated: 2, cleared: 1 });

    let a = testing::sample(&experiment, "A");
    let b = testing::sample(&experiment, "B");
    let annotation = |i: usize, s| {
        experiment
            .feature(ConsensusId::new(i), s)
            .unwrap()
            .peak()
            .annotation()
            .cloned()
    };
    assert_eq!(annotation(0, a), Some(Label::high_quality()));
    assert_eq!(annotation(0, b), Some(Label::low_quality()));
    assert_eq!(annotation(1, a), None);
}

#[test]
fn test_annotation_errors_apply_nothing() {
    let mut experiment = testing::experiment(
        &["A", "B"],
        &[vec![Cell::Valid, Cell::Missing]],
    );

    let cases = [
        ("0,A,High_quality\n0,Q,Noise\n", "sample"),
        ("0,A,High_quality\n7,A,Noise\n", "consensus"),
        ("0,A,High_quality\n0,B,Noise\n", "feature"),
        ("0,A,Great\n", "label"),
    ];
    for (body, kind) in cases {
        let csv = format!("consensus_index,sample,label\n{}", body);
        let err = experiment
            .load_annotations_from_reader(csv.as_bytes())
            .unwrap_err();
        let matched = match kind {
            "sample" => matches!(err, AnnotationError::UnknownSample { line: 3, .. }),
            "consensus" => matches!(err, AnnotationError::UnknownConsensus { index: 7, .. }),
            "feature" => matches!(err, AnnotationError::NoFeature { .. }),
            _ => matches!(err, AnnotationError::InvalidLabel { line: 2, .. }),
        };
        assert!(matched, "{kind}: {err}");
    }

    let a = testing::sample(&experiment, "A");
    let peak = experiment.feature(ConsensusId::new(0), a).unwrap().peak();
    assert!(peak.annotation().is_none());
}

#[test]
fn test_summary_counts() {
    let mut experiment = testing::experiment(
        &["A", "B"],
        &[vec![Cell::Valid, Cell::Invalid], vec![Cell::Valid, Cell::Valid]],
    );
    testing::predict(&mut experiment, 0, "A", "High_quality");
    testing::predict(&mut experiment, 1, "A", "Noise");
    testing::annotate(&mut experiment, 1, "A", "Low_quality");

    let summary = experiment.summary();
    assert_eq!(summary.samples, 2);
    assert_eq!(summary.consensus_features, 2);
    assert_eq!(summary.features, 4);
    assert_eq!(summary.valid_peaks, 3);
    assert_eq!(summary.invalid_peaks, 1);
    assert_eq!(summary.unlabeled_peaks, 1);
    assert_eq!(summary.degraded_peaks(), 2);
    assert_eq!(summary.predicted.get(&Label::noise()), Some(&1));
    assert_eq!(summary.annotated.get(&Label::low_quality()), Some(&1));
    assert!(summary.to_string().contains("Invalid peaks:      1"));
}
