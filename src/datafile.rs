//! Whitespace-delimited data files: comment handling and column reads.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// Lines starting with this character carry no data.
pub const COMMENT_MARKER: char = '#';

/// Whitespace-delimited tokens of a data line, or `None` for a comment.
pub fn data_tokens(line: &str) -> Option<Vec<&str>> {
    if line.starts_with(COMMENT_MARKER) {
        return None;
    }
    Some(line.split_whitespace().collect())
}

/// Trailing-column scan of one data file.
#[derive(Clone, Debug, Default)]
pub struct ColumnRead {
    pub values: Vec<f64>,
    /// Non-comment lines that carried tokens but no parsable tail.
    pub dropped: usize,
}

/// Collect the last token of every non-comment line that parses as a
/// float. Blank lines are ignored; lines with an unparsable tail are
/// counted in `dropped`.
pub fn read_last_column(path: &Path) -> io::Result<ColumnRead> {
    let text = fs::read_to_string(path)?;
    let mut read = ColumnRead::default();
    for line in text.lines() {
        let Some(tokens) = data_tokens(line) else {
            continue;
        };
        let Some(last) = tokens.last() else {
            continue;
        };
        match last.parse::<f64>() {
            Ok(v) => read.values.push(v),
            Err(_) => read.dropped += 1,
        }
    }
    if read.dropped > 0 {
        debug!(
            path = %path.display(),
            dropped = read.dropped,
            "dropped malformed data lines"
        );
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn comment_lines_carry_no_tokens() {
        assert!(data_tokens("# step time R0").is_none());
        assert_eq!(data_tokens("1 2.0 3.5"), Some(vec!["1", "2.0", "3.5"]));
        assert_eq!(data_tokens(""), Some(vec![]));
    }

    #[test]
    fn last_column_keeps_parsable_tails_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# header\n0 0.0 1.5\n1 0.1 abc\n\n2 0.2 2.5\n").unwrap();
        let read = read_last_column(file.path()).unwrap();
        assert_eq!(read.values, vec![1.5, 2.5]);
        assert_eq!(read.dropped, 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(read_last_column(Path::new("/no/such/file.dat")).is_err());
    }
}
