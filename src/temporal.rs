//! Temporal averaging across realizations, one summary per lambda
//! directory.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::datafile::data_tokens;
use crate::stats::Stats;

/// Summary table written into each lambda directory.
pub const OUTPUT_NAME: &str = "MEAN_TEMPORAL.dat";

/// Realizations are assumed to share a time grid; per-step times that
/// disagree by more than this are reported.
const TIME_TOLERANCE: f64 = 1e-9;

/// One parsed realization row: `step time S I`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealizationRow {
    pub step: u64,
    pub time: f64,
    pub s: i64,
    pub i: i64,
}

fn parse_tokens(tokens: &[&str]) -> Option<RealizationRow> {
    if tokens.len() < 4 {
        return None;
    }
    Some(RealizationRow {
        step: tokens[0].parse().ok()?,
        time: tokens[1].parse().ok()?,
        s: tokens[2].parse().ok()?,
        i: tokens[3].parse().ok()?,
    })
}

#[derive(Debug, Default)]
struct FileRead {
    rows: Vec<RealizationRow>,
    dropped: usize,
}

fn read_realization(path: &Path) -> io::Result<FileRead> {
    let text = fs::read_to_string(path)?;
    let mut read = FileRead::default();
    for line in text.lines() {
        let Some(tokens) = data_tokens(line) else {
            continue;
        };
        if tokens.is_empty() {
            continue;
        }
        match parse_tokens(&tokens) {
            Some(row) => read.rows.push(row),
            None => read.dropped += 1,
        }
    }
    Ok(read)
}

#[derive(Debug, Default)]
struct StepAccum {
    time: f64,
    time_set: bool,
    time_warned: bool,
    s: Vec<f64>,
    i: Vec<f64>,
}

/// Per-step record averaged across realizations.
#[derive(Clone, Copy, Debug)]
pub struct StepRecord {
    pub step: u64,
    pub time: f64,
    pub s: Stats,
    pub i: Stats,
}

#[derive(Clone, Debug)]
pub struct LambdaSummary {
    pub dir: PathBuf,
    /// Realization files that contributed at least one row.
    pub realizations: usize,
    pub steps: usize,
    /// Malformed lines dropped across all realizations of this directory.
    pub dropped: usize,
    pub output_path: PathBuf,
}

#[derive(Debug)]
pub enum TemporalError {
    MissingDir(PathBuf),
    NoLambdaDirs(PathBuf),
    Io(io::Error),
}

impl fmt::Display for TemporalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalError::MissingDir(dir) => {
                write!(f, "directory {} does not exist", dir.display())
            }
            TemporalError::NoLambdaDirs(dir) => {
                write!(f, "no lambda_* subdirectories in {}", dir.display())
            }
            TemporalError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl Error for TemporalError {}

impl From<io::Error> for TemporalError {
    fn from(e: io::Error) -> Self {
        TemporalError::Io(e)
    }
}

/// Immediate `lambda_*` subdirectories of `base`, sorted by name.
fn lambda_dirs(base: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(base)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if name.starts_with("lambda_") {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Regular files named `lambda_*_real_*.dat` directly under `dir`, sorted.
fn realization_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if name.starts_with("lambda_") && name.contains("_real_") && name.ends_with(".dat") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Average S and I by step across all realizations of every `lambda_*`
/// subdirectory of `base`, writing one [`OUTPUT_NAME`] per directory.
///
/// Directories with no realization files or no valid rows are skipped with
/// a warning and produce no output; only a missing base directory or a
/// complete absence of lambda subdirectories is fatal.
pub fn aggregate(base: &Path) -> Result<Vec<LambdaSummary>, TemporalError> {
    if !base.is_dir() {
        return Err(TemporalError::MissingDir(base.to_path_buf()));
    }
    let dirs = lambda_dirs(base)?;
    if dirs.is_empty() {
        return Err(TemporalError::NoLambdaDirs(base.to_path_buf()));
    }
    info!(count = dirs.len(), base = %base.display(), "aggregating lambda directories");

    let mut summaries = Vec::new();
    for dir in &dirs {
        match aggregate_lambda_dir(dir) {
            Ok(Some(summary)) => {
                info!(
                    "{} -> {} step(s) from {} realization(s)",
                    summary.output_path.display(),
                    summary.steps,
                    summary.realizations
                );
                summaries.push(summary);
            }
            Ok(None) => {}
            Err(e) => warn!("{}: {e}, skipping", dir.display()),
        }
    }
    Ok(summaries)
}

fn aggregate_lambda_dir(dir: &Path) -> io::Result<Option<LambdaSummary>> {
    let files = realization_files(dir)?;
    if files.is_empty() {
        warn!("{}: no realization files, skipping", dir.display());
        return Ok(None);
    }
    debug!(count = files.len(), dir = %dir.display(), "reading realizations");

    let mut by_step: BTreeMap<u64, StepAccum> = BTreeMap::new();
    let mut realizations = 0usize;
    let mut dropped = 0usize;
    for path in &files {
        let read = match read_realization(path) {
            Ok(read) => read,
            Err(e) => {
                warn!("{}: {e}, skipping", path.display());
                continue;
            }
        };
        dropped += read.dropped;
        if read.rows.is_empty() {
            continue;
        }
        realizations += 1;
        for row in &read.rows {
            let accum = by_step.entry(row.step).or_default();
            if accum.time_set
                && (row.time - accum.time).abs() > TIME_TOLERANCE
                && !accum.time_warned
            {
                warn!(
                    "{}: step {} reports time {} where {} was seen before",
                    path.display(),
                    row.step,
                    row.time,
                    accum.time
                );
                accum.time_warned = true;
            }
            // last write wins, matching the shared-grid assumption
            accum.time = row.time;
            accum.time_set = true;
            accum.s.push(row.s as f64);
            accum.i.push(row.i as f64);
        }
    }
    if by_step.is_empty() {
        warn!("{}: no valid rows in any realization, skipping", dir.display());
        return Ok(None);
    }

    let records: Vec<StepRecord> = by_step
        .iter()
        .map(|(&step, accum)| StepRecord {
            step,
            time: accum.time,
            s: Stats::of(&accum.s).expect("accumulated steps are non-empty"),
            i: Stats::of(&accum.i).expect("accumulated steps are non-empty"),
        })
        .collect();

    let output_path = dir.join(OUTPUT_NAME);
    fs::write(&output_path, temporal_table(&records))?;
    Ok(Some(LambdaSummary {
        dir: dir.to_path_buf(),
        realizations,
        steps: records.len(),
        dropped,
        output_path,
    }))
}

/// Render the per-step table, header line first.
pub fn temporal_table(records: &[StepRecord]) -> String {
    let mut out = String::from("# Step\tTime\tmean_S\tstderr_S\tmean_I\tstderr_I\n");
    for r in records {
        out.push_str(&format!(
            "{}\t{:.4}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\n",
            r.step, r.time, r.s.mean, r.s.stderr, r.i.mean, r.i.stderr
        ));
    }
    out
}
