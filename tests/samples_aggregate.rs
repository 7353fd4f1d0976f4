use std::fs;
use std::path::Path;

use episweep::{figure, sweep, temporal};
use tempfile::tempdir;
use walkdir::WalkDir;

/// Copy the checked-in sample tree into a scratch dir so the aggregators
/// can write their summaries without touching the repository.
fn copy_tree(src: &Path, dst: &Path) {
    for entry in WalkDir::new(src) {
        let entry = entry.expect("walk samples");
        let rel = entry.path().strip_prefix(src).expect("relative path");
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).expect("create dir");
        } else {
            fs::copy(entry.path(), &target).expect("copy sample file");
        }
    }
}

#[test]
fn sample_tree_aggregates_end_to_end() {
    let scratch = tempdir().expect("tempdir");
    copy_tree(Path::new("samples"), scratch.path());

    let summary = sweep::aggregate(&scratch.path().join("R0")).expect("sweep samples");
    assert_eq!(summary.records.len(), 3);
    assert_eq!(summary.skipped, 1);
    let table = fs::read_to_string(&summary.output_path).unwrap();
    assert_eq!(table.lines().count(), 4);

    let summaries = temporal::aggregate(&scratch.path().join("Temp")).expect("temporal samples");
    assert_eq!(summaries.len(), 2);
    for summary in &summaries {
        assert!(summary.output_path.exists());
        assert_eq!(summary.realizations, 2);
        assert_eq!(summary.steps, 4);
        assert_eq!(summary.dropped, 0);
    }
}

#[test]
fn sample_plot_script_names_its_figure() {
    let script = fs::read_to_string("samples/figures/r0_vs_lambda.gp").unwrap();
    assert_eq!(
        figure::embedded_figure_stem(&script).as_deref(),
        Some("r0_vs_lambda")
    );
}
