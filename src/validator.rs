// ✅ Validator - Normalize or reject raw contribution records
// Rules run in a fixed order; the first failure wins

use crate::record::RawRecord;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// External transaction date format: MMDDYYYY, no separators
pub const DATE_FORMAT: &str = "%m%d%Y";

/// Zip prefix length kept after truncation
pub const ZIP_PREFIX_LEN: usize = 5;

/// Any Unicode decimal digit (category Nd)
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("digit pattern compiles"));

// ============================================================================
// REJECTION
// ============================================================================

/// Why a raw record was dropped. Rejections are expected, not fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// OTHER_ID set: contribution came from an entity, not an individual
    #[error("other id is set ({0})")]
    NotIndividual(String),

    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    #[error("donor name contains a digit: {0}")]
    MalformedName(String),

    #[error("zip code shorter than 5 characters: {0}")]
    MalformedZip(String),

    #[error("transaction date is not MMDDYYYY: {0}")]
    MalformedDate(String),

    #[error("transaction amount is not a non-negative integer: {0}")]
    MalformedAmount(String),
}

impl Rejection {
    /// Stable short code used as a counter key
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::NotIndividual(_) => "not_individual",
            Rejection::MissingField(_) => "missing_field",
            Rejection::MalformedName(_) => "malformed_name",
            Rejection::MalformedZip(_) => "malformed_zip",
            Rejection::MalformedDate(_) => "malformed_date",
            Rejection::MalformedAmount(_) => "malformed_amount",
        }
    }
}

// ============================================================================
// VALIDATED RECORD
// ============================================================================

/// ValidatedRecord - only produced by [`validate`]
///
/// Fields are private so a record cannot be built or mutated around the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    committee_id: String,
    name: String,
    zip: String,
    date: NaiveDate,
    amount: u64,
}

impl ValidatedRecord {
    pub fn committee_id(&self) -> &str {
        &self.committee_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zip truncated to its first five characters
    pub fn zip(&self) -> &str {
        &self.zip
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate and normalize a raw record. Pure; no side effects.
pub fn validate(raw: &RawRecord) -> Result<ValidatedRecord, Rejection> {
    // Rule 1: individual contributions only
    if !raw.other_id.is_empty() {
        return Err(Rejection::NotIndividual(raw.other_id.clone()));
    }

    // Rule 2: required fields present
    let required = [
        ("committee_id", &raw.committee_id),
        ("name", &raw.name),
        ("zip_code", &raw.zip_code),
        ("transaction_date", &raw.transaction_date),
        ("transaction_amount", &raw.transaction_amount),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(Rejection::MissingField(*field));
    }

    // Rule 3: names never carry digits
    if DIGIT.is_match(&raw.name) {
        return Err(Rejection::MalformedName(raw.name.clone()));
    }

    // Rule 4: zip prefix must be complete
    let zip: String = raw.zip_code.chars().take(ZIP_PREFIX_LEN).collect();
    if zip.chars().count() < ZIP_PREFIX_LEN {
        return Err(Rejection::MalformedZip(raw.zip_code.clone()));
    }

    // Rule 5: date
    let date = parse_date(&raw.transaction_date)
        .ok_or_else(|| Rejection::MalformedDate(raw.transaction_date.clone()))?;

    // Rule 6: amount
    let amount = parse_amount(&raw.transaction_amount)
        .ok_or_else(|| Rejection::MalformedAmount(raw.transaction_amount.clone()))?;

    Ok(ValidatedRecord {
        committee_id: raw.committee_id.clone(),
        name: raw.name.clone(),
        zip,
        date,
        amount,
    })
}

/// Parse MMDDYYYY. Exactly eight ASCII digits, then a real calendar date.
fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

fn parse_amount(text: &str) -> Option<u64> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok()
}
