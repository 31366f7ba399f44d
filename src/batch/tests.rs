use super::*;
use crate::release::{AnalysisFailure, Outcome, ReleaseOutcome};
use std::path::{Path, PathBuf};

fn released(id: &str, latency: f64) -> ReleaseOutcome {
    ReleaseOutcome {
        vesicle_id: id.to_string(),
        outcome: Outcome::Released {
            iteration: 0,
            time: latency,
            latency,
            pulse: 0,
        },
    }
}

fn outcome(id: &str, outcome: Outcome) -> ReleaseOutcome {
    ReleaseOutcome {
        vesicle_id: id.to_string(),
        outcome,
    }
}

#[test]
fn test_realization_seed_from_file_name() {
    assert_eq!(realization_seed(Path::new("data/run.0042.bin.bz2")), Ok(42));
    assert_eq!(realization_seed(Path::new("seed_7.gz")), Ok(7));
    assert_eq!(realization_seed(Path::new("mouse_3_run.0100.bin")), Ok(100));
    assert_eq!(
        realization_seed(Path::new("output.bin.bz2")),
        Err(SeedError::Missing)
    );
}

#[test]
fn test_realization_seed_out_of_range() {
    assert_eq!(
        realization_seed(Path::new("run.99999999999.bin.bz2")),
        Err(SeedError::OutOfRange("99999999999".to_string()))
    );
    assert_eq!(realization_seed(Path::new("run.4294967295.bin")), Ok(u32::MAX));
}

#[test]
fn test_out_of_range_seed_fails_file() {
    let config = crate::model::presets::mouse_nmj(2).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.99999999999.bin.bz2");
    std::fs::write(&path, b"not read").unwrap();

    let report = BatchRunner::new(&config).run(&[path], 1).unwrap();
    assert_eq!(report.failed_files, 1);
    assert_eq!(report.vesicle_count(), 0);
    match &report.files[0].result {
        FileResult::Failed { error, io } => {
            assert!(!io);
            assert!(error.contains("99999999999"));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_latency_summary() {
    let summary = LatencySummary::from_latencies(&[3.0, 1.0, 2.0, 6.0]).unwrap();
    assert_eq!(summary.count, 4);
    assert_eq!(summary.mean, 3.0);
    assert_eq!(summary.median, 2.5);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.max, 6.0);

    assert!(LatencySummary::from_latencies(&[]).is_none());
}

#[test]
fn test_aggregate_keeps_failures_apart_from_negatives() {
    let ids = vec!["a".to_string(), "b".to_string()];
    let files = vec![
        FileReport {
            path: PathBuf::from("run.0001.bin.bz2"),
            seed: 1,
            result: FileResult::Analyzed(vec![
                released("a", 1e-3),
                outcome("b", Outcome::NotReleased),
            ]),
        },
        FileReport {
            path: PathBuf::from("run.0002.bin.bz2"),
            seed: 2,
            result: FileResult::Failed {
                error: "format error".to_string(),
                io: false,
            },
        },
        FileReport {
            path: PathBuf::from("run.0003.bin.bz2"),
            seed: 3,
            result: FileResult::Analyzed(vec![
                outcome(
                    "a",
                    Outcome::Failed(AnalysisFailure::MissingData {
                        block: "x".to_string(),
                    }),
                ),
                released("b", 2e-3),
            ]),
        },
    ];

    let report = AggregateReport::from_files(&ids, files);
    assert_eq!(report.released, 2);
    assert_eq!(report.not_released, 1);
    assert_eq!(report.failed_vesicles, 1);
    assert_eq!(report.failed_files, 1);
    assert_eq!(report.vesicle_count(), 4);
    assert_eq!(report.latencies, vec![1e-3, 2e-3]);
    assert_eq!(report.per_vesicle[0].latencies, vec![1e-3]);
    assert_eq!(report.per_vesicle[1].latencies, vec![2e-3]);
    assert_eq!(report.release_probability(), Some(2.0 / 3.0));

    let text = report.to_string();
    assert!(text.contains("2 released, 1 not released, 1 failed"));
    assert!(text.contains("run.0002.bin.bz2"));
}

#[test]
fn test_report_serializes_to_json() {
    let ids = vec!["a".to_string()];
    let files = vec![FileReport {
        path: PathBuf::from("run.0001.bin.bz2"),
        seed: 1,
        result: FileResult::Analyzed(vec![released("a", 5e-4)]),
    }];
    let report = AggregateReport::from_files(&ids, files);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["released"], 1);
    assert_eq!(json["files"][0]["analyzed"][0]["vesicle_id"], "a");
    assert_eq!(json["files"][0]["analyzed"][0]["status"], "released");
    assert_eq!(json["per_vesicle"][0]["latencies"][0], 5e-4);
}
