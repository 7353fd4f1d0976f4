use std::fs;
use std::path::Path;

use episweep::temporal::{self, TemporalError};
use tempfile::tempdir;

fn write_realization(dir: &Path, index: u32, body: &str) {
    let lambda = dir.file_name().and_then(|s| s.to_str()).unwrap();
    fs::write(dir.join(format!("{lambda}_real_{index:03}.dat")), body).unwrap();
}

#[test]
fn two_realizations_average_per_step() {
    let base = tempdir().expect("tempdir");
    let lambda = base.path().join("lambda_0.4000");
    fs::create_dir(&lambda).unwrap();
    write_realization(&lambda, 1, "# Step Time S I\n0 0.0 100 5\n");
    write_realization(&lambda, 2, "0 0.0 98 7\n");

    let summaries = temporal::aggregate(base.path()).expect("aggregation succeeds");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].realizations, 2);
    assert_eq!(summaries[0].steps, 1);

    // population stddev of [100, 98] is 1.0, divided by sqrt(2)
    let table = fs::read_to_string(lambda.join(temporal::OUTPUT_NAME)).unwrap();
    let mut lines = table.lines();
    assert_eq!(
        lines.next(),
        Some("# Step\tTime\tmean_S\tstderr_S\tmean_I\tstderr_I")
    );
    assert_eq!(
        lines.next(),
        Some("0\t0.0000\t99.000000\t0.707107\t6.000000\t0.707107")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn missing_base_directory_is_fatal() {
    let err = temporal::aggregate(Path::new("/no/such/base")).unwrap_err();
    assert!(matches!(err, TemporalError::MissingDir(_)));
}

#[test]
fn base_without_lambda_subdirectories_is_fatal() {
    let base = tempdir().unwrap();
    fs::create_dir(base.path().join("other_dir")).unwrap();
    let err = temporal::aggregate(base.path()).unwrap_err();
    assert!(matches!(err, TemporalError::NoLambdaDirs(_)));
}

#[test]
fn empty_lambda_dir_is_skipped_while_siblings_produce_output() {
    let base = tempdir().unwrap();
    let empty = base.path().join("lambda_0.1000");
    let full = base.path().join("lambda_0.2000");
    fs::create_dir(&empty).unwrap();
    fs::create_dir(&full).unwrap();
    write_realization(&full, 1, "0 0.0 50 2\n1 0.5 48 4\n");

    let summaries = temporal::aggregate(base.path()).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].dir, full);
    assert!(!empty.join(temporal::OUTPUT_NAME).exists());
    assert!(full.join(temporal::OUTPUT_NAME).exists());
}

#[test]
fn steps_come_out_ascending_whatever_the_input_order() {
    let base = tempdir().unwrap();
    let lambda = base.path().join("lambda_0.3000");
    fs::create_dir(&lambda).unwrap();
    write_realization(&lambda, 1, "2 1.0 90 10\n0 0.0 100 0\n1 0.5 95 5\n");

    temporal::aggregate(base.path()).unwrap();
    let table = fs::read_to_string(lambda.join(temporal::OUTPUT_NAME)).unwrap();
    let steps: Vec<&str> = table
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap())
        .collect();
    assert_eq!(steps, vec!["0", "1", "2"]);
}

#[test]
fn malformed_and_short_lines_are_dropped_and_counted() {
    let base = tempdir().unwrap();
    let lambda = base.path().join("lambda_0.5000");
    fs::create_dir(&lambda).unwrap();
    write_realization(
        &lambda,
        1,
        "# Step Time S I\n0 0.0 100 5\nbroken line\n1 0.5 99\n1 0.5 99 6\n",
    );

    let summaries = temporal::aggregate(base.path()).unwrap();
    assert_eq!(summaries[0].steps, 2);
    assert_eq!(summaries[0].dropped, 2);
}

#[test]
fn last_seen_time_wins_on_mismatch() {
    let base = tempdir().unwrap();
    let lambda = base.path().join("lambda_0.6000");
    fs::create_dir(&lambda).unwrap();
    write_realization(&lambda, 1, "0 0.0 100 5\n");
    write_realization(&lambda, 2, "0 0.25 98 7\n");

    temporal::aggregate(base.path()).unwrap();
    let table = fs::read_to_string(lambda.join(temporal::OUTPUT_NAME)).unwrap();
    let row = table.lines().nth(1).unwrap();
    assert!(row.starts_with("0\t0.2500\t"));
}

#[test]
fn non_realization_files_are_ignored() {
    let base = tempdir().unwrap();
    let lambda = base.path().join("lambda_0.7000");
    fs::create_dir(&lambda).unwrap();
    write_realization(&lambda, 1, "0 0.0 10 1\n");
    fs::write(lambda.join("lambda_0.7000_summary.dat"), "9 9.9 9 9\n").unwrap();
    fs::write(lambda.join("README"), "not data\n").unwrap();

    let summaries = temporal::aggregate(base.path()).unwrap();
    assert_eq!(summaries[0].realizations, 1);
    assert_eq!(summaries[0].steps, 1);
}

#[test]
fn previous_summary_is_overwritten() {
    let base = tempdir().unwrap();
    let lambda = base.path().join("lambda_0.8000");
    fs::create_dir(&lambda).unwrap();
    fs::write(lambda.join(temporal::OUTPUT_NAME), "stale contents\n").unwrap();
    write_realization(&lambda, 1, "0 0.0 10 1\n");

    temporal::aggregate(base.path()).unwrap();
    let table = fs::read_to_string(lambda.join(temporal::OUTPUT_NAME)).unwrap();
    assert!(!table.contains("stale"));
    assert!(table.starts_with("# Step"));
}
