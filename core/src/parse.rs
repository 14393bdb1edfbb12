//! Extracts the elapsed time from a benchmark's captured stdout.
//!
//! Both executables print a header line followed by `<seconds> s`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// Index of the line holding the elapsed time.
const ELAPSED_LINE: usize = 1;
/// Characters dropped from the end of that line (unit and newline).
const SUFFIX_CHARS: usize = 2;

/// `\r\n` and bare `\r` line endings are read as `\n`, so the suffix is the
/// same two characters whatever platform wrote the file.
pub fn parse_elapsed(contents: &str) -> Result<f64> {
    let contents = contents.replace("\r\n", "\n").replace('\r', "\n");
    let line = contents
        .split_inclusive('\n')
        .nth(ELAPSED_LINE)
        .ok_or_else(|| anyhow!("expected at least {} lines of benchmark output", ELAPSED_LINE + 1))?;
    let keep = line.chars().count().saturating_sub(SUFFIX_CHARS);
    let value: String = line.chars().take(keep).collect();
    let value = value.trim();
    value
        .parse::<f64>()
        .map_err(|_| anyhow!("elapsed time '{}' is not numeric", value))
}

pub fn read_elapsed(path: &Path) -> Result<f64> {
    let contents = fs::read_to_string(path).with_context(|| format!("read result file {}", path.display()))?;
    parse_elapsed(&contents).with_context(|| format!("parse result file {}", path.display()))
}
