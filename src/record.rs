// 📄 Raw Records - FEC itemized contribution lines
// Pulls the six consumed fields out of a pipe-delimited row by position

use csv::StringRecord;

// ============================================================================
// FIELD LAYOUT
// ============================================================================

/// Column positions in the FEC individual contributions layout.
///
/// Full layout: CMTE_ID, AMNDT_IND, RPT_TP, TRANSACTION_PGI, IMAGE_NUM,
/// TRANSACTION_TP, ENTITY_TP, NAME, CITY, STATE, ZIP_CODE, EMPLOYER,
/// OCCUPATION, TRANSACTION_DT, TRANSACTION_AMT, OTHER_ID, TRAN_ID, FILE_NUM,
/// MEMO_CD, MEMO_TEXT, SUB_ID. Only the columns below are read.
pub mod field {
    pub const CMTE_ID: usize = 0;
    pub const NAME: usize = 7;
    pub const ZIP_CODE: usize = 10;
    pub const TRANSACTION_DT: usize = 13;
    pub const TRANSACTION_AMT: usize = 14;
    pub const OTHER_ID: usize = 15;
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// RawRecord - one input line before validation
///
/// Every field is opaque text. A row shorter than the layout yields empty
/// strings for the missing columns, which validation then rejects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub committee_id: String,
    pub name: String,
    pub zip_code: String,
    pub transaction_date: String,
    pub transaction_amount: String,
    pub other_id: String,
}

impl RawRecord {
    /// Build a record from already-split fields
    pub fn new(
        committee_id: &str,
        name: &str,
        zip_code: &str,
        transaction_date: &str,
        transaction_amount: &str,
        other_id: &str,
    ) -> Self {
        RawRecord {
            committee_id: committee_id.to_string(),
            name: name.to_string(),
            zip_code: zip_code.to_string(),
            transaction_date: transaction_date.to_string(),
            transaction_amount: transaction_amount.to_string(),
            other_id: other_id.to_string(),
        }
    }

    /// Extract the consumed columns from a full pipe-delimited row
    pub fn from_string_record(row: &StringRecord) -> Self {
        let get = |idx: usize| row.get(idx).unwrap_or("").to_string();

        RawRecord {
            committee_id: get(field::CMTE_ID),
            name: get(field::NAME),
            zip_code: get(field::ZIP_CODE),
            transaction_date: get(field::TRANSACTION_DT),
            transaction_amount: get(field::TRANSACTION_AMT),
            other_id: get(field::OTHER_ID),
        }
    }
}
