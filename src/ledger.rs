// 🗂️ Donor Ledger - Repeat donor detection
// Tracks the earliest contribution date per (name, zip) and classifies
// each accepted record in arrival order, with no lookahead.

use chrono::NaiveDate;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::trace;

// ============================================================================
// KEYS & CLASSIFICATION
// ============================================================================

/// DonorKey - a donor is identified by name and 5-character zip
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DonorKey {
    pub name: String,
    pub zip: String,
}

impl DonorKey {
    pub fn new(name: &str, zip: &str) -> Self {
        DonorKey {
            name: name.to_string(),
            zip: zip.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No earlier-or-equal contribution on record
    FirstTime,

    /// Donor already contributed on or before this date
    Repeat,
}

impl Classification {
    pub fn is_repeat(&self) -> bool {
        matches!(self, Classification::Repeat)
    }
}

// ============================================================================
// DONOR LEDGER
// ============================================================================

/// DonorLedger - earliest known contribution date per donor
///
/// Entries are created on first sight and only ever move earlier. Nothing is
/// removed for the lifetime of a run.
#[derive(Debug, Default)]
pub struct DonorLedger {
    earliest: HashMap<DonorKey, NaiveDate>,
}

impl DonorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a contribution and record its date if it is the earliest seen.
    ///
    /// A date strictly earlier than the stored one replaces it and counts as
    /// first-time. Rows already emitted for that donor are not revisited.
    pub fn classify(&mut self, key: DonorKey, date: NaiveDate) -> Classification {
        match self.earliest.entry(key) {
            Entry::Occupied(entry) if date >= *entry.get() => {
                trace!(name = %entry.key().name, zip = %entry.key().zip, %date, "repeat donor");
                Classification::Repeat
            }
            Entry::Occupied(mut entry) => {
                trace!(
                    name = %entry.key().name,
                    zip = %entry.key().zip,
                    %date,
                    previous = %entry.get(),
                    "earlier contribution arrived late"
                );
                entry.insert(date);
                Classification::FirstTime
            }
            Entry::Vacant(entry) => {
                entry.insert(date);
                Classification::FirstTime
            }
        }
    }

    /// Earliest date on record for a donor, if any
    pub fn earliest(&self, key: &DonorKey) -> Option<NaiveDate> {
        self.earliest.get(key).copied()
    }

    /// Number of distinct donors seen
    pub fn len(&self) -> usize {
        self.earliest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.earliest.is_empty()
    }
}
