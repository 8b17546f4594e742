// 🔁 Pipeline - Validate → classify → aggregate, one record at a time
// Owns both ledgers for the lifetime of a run. Every repeat-donor record
// produces exactly one output row, written only after all three stages
// have finished with it.

use crate::aggregator::{GroupKey, GroupSnapshot, Percentile, PercentileAggregator};
use crate::config::{read_percentile, RunConfig};
use crate::error::{AnalyticsError, Result};
use crate::ledger::{DonorKey, DonorLedger};
use crate::record::RawRecord;
use crate::validator::validate;
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, trace};

// ============================================================================
// RUN STATISTICS
// ============================================================================

/// RunStats - counters for one pass over the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub records_read: u64,
    pub records_accepted: u64,
    pub repeat_donations: u64,
    pub rows_written: u64,
    pub distinct_donors: usize,
    pub distinct_groups: usize,
    /// Rejection code → count
    pub rejected: BTreeMap<String, u64>,
}

impl RunStats {
    pub fn rejected_total(&self) -> u64 {
        self.rejected.values().sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Read: {}, Accepted: {}, Rejected: {}, Repeat donations: {}, Rows: {}",
            self.records_read,
            self.records_accepted,
            self.rejected_total(),
            self.repeat_donations,
            self.rows_written
        )
    }
}

// ============================================================================
// DONATION ANALYZER
// ============================================================================

pub struct DonationAnalyzer {
    percentile: Percentile,
    ledger: DonorLedger,
    aggregator: PercentileAggregator,
    stats: RunStats,
}

impl DonationAnalyzer {
    pub fn new(percentile: Percentile) -> Self {
        DonationAnalyzer {
            percentile,
            ledger: DonorLedger::new(),
            aggregator: PercentileAggregator::new(),
            stats: RunStats::default(),
        }
    }

    pub fn percentile(&self) -> Percentile {
        self.percentile
    }

    pub fn ledger(&self) -> &DonorLedger {
        &self.ledger
    }

    pub fn aggregator(&self) -> &PercentileAggregator {
        &self.aggregator
    }

    /// Counters so far, with donor and group totals filled in
    pub fn stats(&self) -> RunStats {
        RunStats {
            distinct_donors: self.ledger.len(),
            distinct_groups: self.aggregator.len(),
            ..self.stats.clone()
        }
    }

    /// Process one raw record. Returns the output row for repeat donors.
    ///
    /// Rejected records leave both ledgers untouched.
    pub fn process(&mut self, raw: &RawRecord) -> Option<GroupSnapshot> {
        self.stats.records_read += 1;

        let record = match validate(raw) {
            Ok(record) => record,
            Err(rejection) => {
                trace!(reason = rejection.code(), %rejection, "record rejected");
                *self
                    .stats
                    .rejected
                    .entry(rejection.code().to_string())
                    .or_insert(0) += 1;
                return None;
            }
        };
        self.stats.records_accepted += 1;

        let donor = DonorKey::new(record.name(), record.zip());
        if !self.ledger.classify(donor, record.date()).is_repeat() {
            return None;
        }
        self.stats.repeat_donations += 1;

        let group = GroupKey::new(record.committee_id(), record.zip(), record.year());
        Some(
            self.aggregator
                .record_and_snapshot(group, record.amount(), self.percentile),
        )
    }

    /// Stream pipe-delimited records from `input` to pipe-delimited rows on `output`
    pub fn run<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<RunStats> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut writer = WriterBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(output);

        let mut row = StringRecord::new();
        while reader.read_record(&mut row)? {
            let raw = RawRecord::from_string_record(&row);
            if let Some(snapshot) = self.process(&raw) {
                // One flush per row: output only ever ends on a complete line
                writer.serialize(&snapshot)?;
                writer.flush().map_err(csv::Error::from)?;
                self.stats.rows_written += 1;
            }
        }

        Ok(self.stats())
    }
}

// ============================================================================
// FILE-BASED RUN
// ============================================================================

/// Run end to end from a [`RunConfig`].
///
/// The percentile is read and the input opened before the output file is
/// created, so configuration errors never leave an empty output behind.
pub fn run_files(config: &RunConfig) -> Result<RunStats> {
    let percentile = read_percentile(&config.percentile)?;
    let input = File::open(&config.input).map_err(|e| AnalyticsError::io(&config.input, e))?;
    let output = File::create(&config.output).map_err(|e| AnalyticsError::io(&config.output, e))?;

    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        %percentile,
        "starting run"
    );

    let mut analyzer = DonationAnalyzer::new(percentile);
    let stats = analyzer.run(BufReader::new(input), output)?;

    info!(
        records_read = stats.records_read,
        records_accepted = stats.records_accepted,
        rejected = stats.rejected_total(),
        repeat_donations = stats.repeat_donations,
        rows_written = stats.rows_written,
        distinct_donors = stats.distinct_donors,
        distinct_groups = stats.distinct_groups,
        "run complete"
    );

    if let Some(path) = &config.summary {
        write_summary(path, &stats)?;
    }

    Ok(stats)
}

/// Write run statistics as pretty JSON
pub fn write_summary(path: &Path, stats: &RunStats) -> Result<()> {
    let file = File::create(path).map_err(|e| AnalyticsError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, stats)?;
    writer.flush().map_err(|e| AnalyticsError::io(path, e))?;
    Ok(())
}
