// 📊 Percentile Aggregator - Running statistics per (committee, zip, year)
// Each group keeps a sorted multiset of amounts, a running sum and a count.
// After every insertion the nearest-rank percentile is read back in
// logarithmic time, so every emitted row is correct at that point in the stream.

use crate::order_stats::OrderStatisticsTree;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

// ============================================================================
// PERCENTILE
// ============================================================================

/// Percentile - a target percentile in 1..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percentile(u8);

impl Percentile {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// `None` outside 1..=100
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Percentile(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Nearest-rank index: ceil(p * count / 100), clamped to [1, count].
    /// Returns 0 only for an empty group.
    pub fn rank(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let rank = (self.0 as usize * count).div_ceil(100);
        rank.clamp(1, count)
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// GROUPS
// ============================================================================

/// GroupKey - aggregation unit: recipient committee, donor zip, calendar year
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub committee_id: String,
    pub zip: String,
    pub year: i32,
}

impl GroupKey {
    pub fn new(committee_id: &str, zip: &str, year: i32) -> Self {
        GroupKey {
            committee_id: committee_id.to_string(),
            zip: zip.to_string(),
            year,
        }
    }
}

/// GroupState - amounts seen so far for one group
///
/// Invariant: `amounts.len() == count` and the amounts add up to `total`.
#[derive(Debug, Clone, Default)]
pub struct GroupState {
    amounts: OrderStatisticsTree,
    total: u64,
    count: usize,
}

impl GroupState {
    fn insert(&mut self, amount: u64) {
        self.amounts.insert(amount);
        self.total = self.total.saturating_add(amount);
        self.count += 1;
    }

    /// Amount at the nearest-rank position for `percentile`
    pub fn percentile_amount(&self, percentile: Percentile) -> Option<u64> {
        self.amounts.select(percentile.rank(self.count))
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Amounts in ascending order
    pub fn amounts(&self) -> impl Iterator<Item = u64> + '_ {
        self.amounts.iter()
    }
}

/// GroupSnapshot - one output row, the group state right after an insertion
///
/// Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSnapshot {
    pub committee_id: String,
    pub zip: String,
    /// Four-digit calendar year
    pub year: String,
    pub percentile_amount: u64,
    pub total_amount: u64,
    pub contribution_count: usize,
}

impl fmt::Display for GroupSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}",
            self.committee_id,
            self.zip,
            self.year,
            self.percentile_amount,
            self.total_amount,
            self.contribution_count
        )
    }
}

// ============================================================================
// PERCENTILE AGGREGATOR
// ============================================================================

#[derive(Debug, Default)]
pub struct PercentileAggregator {
    groups: HashMap<GroupKey, GroupState>,
}

impl PercentileAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repeat-donor amount to its group and return the updated row
    pub fn record_and_snapshot(
        &mut self,
        key: GroupKey,
        amount: u64,
        percentile: Percentile,
    ) -> GroupSnapshot {
        let state = self.groups.entry(key.clone()).or_insert_with(|| {
            debug!(committee = %key.committee_id, zip = %key.zip, year = key.year, "new group");
            GroupState::default()
        });
        state.insert(amount);

        // count >= 1 here, so the rank always lands inside the tree
        let percentile_amount = state.percentile_amount(percentile).unwrap_or(amount);

        GroupSnapshot {
            year: format!("{:04}", key.year),
            percentile_amount,
            total_amount: state.total(),
            contribution_count: state.count(),
            committee_id: key.committee_id,
            zip: key.zip,
        }
    }

    pub fn group(&self, key: &GroupKey) -> Option<&GroupState> {
        self.groups.get(key)
    }

    /// Number of distinct groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
