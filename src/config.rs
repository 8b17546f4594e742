// ⚙️ Run Configuration - file locations and the target percentile

use crate::aggregator::Percentile;
use crate::error::{AnalyticsError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an optional JSON run-summary path
pub const SUMMARY_ENV: &str = "DONATION_ANALYTICS_SUMMARY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Pipe-delimited contribution records
    pub input: PathBuf,
    /// File holding a single integer percentile
    pub percentile: PathBuf,
    /// Destination for repeat-donor rows
    pub output: PathBuf,
    /// Where to write the JSON run summary, if anywhere
    pub summary: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, percentile: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        RunConfig {
            input: input.into(),
            percentile: percentile.into(),
            output: output.into(),
            summary: None,
        }
    }

    /// Builder pattern: pick up the summary path from the environment
    pub fn with_summary_from_env(mut self) -> Self {
        self.summary = std::env::var_os(SUMMARY_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        self
    }

    pub fn with_summary(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary = Some(path.into());
        self
    }
}

/// Read the percentile file: one integer in 1..=100, surrounding whitespace ignored
pub fn read_percentile(path: &Path) -> Result<Percentile> {
    let content = fs::read_to_string(path).map_err(|e| AnalyticsError::io(path, e))?;
    parse_percentile(&content)
}

pub fn parse_percentile(content: &str) -> Result<Percentile> {
    let trimmed = content.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AnalyticsError::InvalidPercentile {
            raw: trimmed.to_string(),
        });
    }

    // Any integer too wide for u8 is out of range, however many digits it has
    trimmed
        .parse::<u8>()
        .ok()
        .and_then(Percentile::new)
        .ok_or_else(|| AnalyticsError::PercentileOutOfRange(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_percentile_trims_newline() {
        assert_eq!(parse_percentile("30\n").unwrap().value(), 30);
        assert_eq!(parse_percentile("  100 ").unwrap().value(), 100);
    }

    #[test]
    fn test_parse_percentile_rejects_non_integer() {
        assert!(matches!(
            parse_percentile("thirty"),
            Err(AnalyticsError::InvalidPercentile { .. })
        ));
        assert!(matches!(
            parse_percentile("12.5"),
            Err(AnalyticsError::InvalidPercentile { .. })
        ));
        assert!(matches!(
            parse_percentile(""),
            Err(AnalyticsError::InvalidPercentile { .. })
        ));
        assert!(matches!(
            parse_percentile("-"),
            Err(AnalyticsError::InvalidPercentile { .. })
        ));
    }

    #[test]
    fn test_parse_percentile_rejects_out_of_range() {
        for value in ["0", "101", "-5", "100000", "99999999999999999999", "-99999999999999999999"] {
            assert!(matches!(
                parse_percentile(value),
                Err(AnalyticsError::PercentileOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_read_percentile_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "75").unwrap();

        assert_eq!(read_percentile(file.path()).unwrap().value(), 75);
    }

    #[test]
    fn test_read_percentile_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("percentile.txt");

        assert!(matches!(
            read_percentile(&missing),
            Err(AnalyticsError::Io { .. })
        ));
    }
}
