//! Parameter-sweep aggregation: one summary row per data file.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::datafile::read_last_column;
use crate::params::SweepParams;
use crate::stats::Stats;

/// Summary table written into the aggregated directory.
pub const OUTPUT_NAME: &str = "MEAN_VALUES.dat";

/// One aggregated sweep file.
#[derive(Clone, Debug)]
pub struct SweepRecord {
    pub params: SweepParams,
    pub stats: Stats,
    /// Malformed lines dropped while reading this file.
    pub dropped: usize,
}

#[derive(Clone, Debug)]
pub struct SweepSummary {
    pub records: Vec<SweepRecord>,
    /// Candidates skipped over bad names, unreadable bodies, or empty data.
    pub skipped: usize,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub enum SweepError {
    MissingDir(PathBuf),
    NoDataFiles(PathBuf),
    NothingAggregated(PathBuf),
    Io(io::Error),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::MissingDir(dir) => {
                write!(f, "directory {} does not exist", dir.display())
            }
            SweepError::NoDataFiles(dir) => {
                write!(f, "no data_*.dat files in {}", dir.display())
            }
            SweepError::NothingAggregated(dir) => {
                write!(f, "no file in {} could be aggregated", dir.display())
            }
            SweepError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl Error for SweepError {}

impl From<io::Error> for SweepError {
    fn from(e: io::Error) -> Self {
        SweepError::Io(e)
    }
}

/// Regular files named `data_*.dat` directly under `dir`, sorted by name.
fn candidate_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if name.starts_with("data_") && name.ends_with(".dat") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Aggregate every sweep file in `dir` and write [`OUTPUT_NAME`] there,
/// overwriting any previous summary.
///
/// Files with unparsable names, unreadable bodies, or zero valid samples
/// are skipped with a warning; the run fails only when no candidates exist
/// or nothing at all could be aggregated (no output is written then).
pub fn aggregate(dir: &Path) -> Result<SweepSummary, SweepError> {
    if !dir.is_dir() {
        return Err(SweepError::MissingDir(dir.to_path_buf()));
    }
    let files = candidate_files(dir)?;
    if files.is_empty() {
        return Err(SweepError::NoDataFiles(dir.to_path_buf()));
    }
    info!(count = files.len(), dir = %dir.display(), "aggregating sweep files");

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (i, path) in files.iter().enumerate() {
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        let Some(params) = SweepParams::from_file_name(name) else {
            warn!("{name}: name does not carry the full parameter set, skipping");
            skipped += 1;
            continue;
        };
        let column = match read_last_column(path) {
            Ok(column) => column,
            Err(e) => {
                warn!("{name}: {e}, skipping");
                skipped += 1;
                continue;
            }
        };
        let Some(stats) = Stats::of(&column.values) else {
            warn!("{name}: no valid data lines, skipping");
            skipped += 1;
            continue;
        };
        info!(
            "[{}/{}] {name} -> mean_R0={:.6} stderr_R0={:.6}",
            i + 1,
            files.len(),
            stats.mean,
            stats.stderr
        );
        records.push(SweepRecord {
            params,
            stats,
            dropped: column.dropped,
        });
    }
    if records.is_empty() {
        return Err(SweepError::NothingAggregated(dir.to_path_buf()));
    }
    records.sort_by(|a, b| a.params.cmp(&b.params));

    let output_path = dir.join(OUTPUT_NAME);
    fs::write(&output_path, sweep_table(&records))?;
    Ok(SweepSummary {
        records,
        skipped,
        output_path,
    })
}

/// Render the summary table, header line first, one row per record.
pub fn sweep_table(records: &[SweepRecord]) -> String {
    let mut out = String::from("# phi\trc\tN\talpha\tsigma\tbeta\tlambda\tmean_R0\tstderr_R0\n");
    for rec in records {
        let p = &rec.params;
        out.push_str(&format!(
            "{:.6}\t{:.6}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\n",
            p.phi, p.rc, p.n, p.alpha, p.sigma, p.beta, p.lambda, rec.stats.mean, rec.stats.stderr
        ));
    }
    out
}
