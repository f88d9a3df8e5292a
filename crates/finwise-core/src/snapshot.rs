//! The already-fetched data the metrics work on.
//!
//! Persistence lives outside this crate. Whatever loads the records hands
//! over one materialised snapshot; nothing here assumes the three lists
//! were fetched consistently with each other.

use serde::{Deserialize, Serialize};

use crate::analytics::transaction::TransactionRecord;
use crate::metrics::budget::BudgetRecord;
use crate::metrics::goal::GoalRecord;
use crate::FinwiseResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceSnapshot {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default)]
    pub budgets: Vec<BudgetRecord>,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
}

impl FinanceSnapshot {
    pub fn from_json(json: &str) -> FinwiseResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Read side of the external store.
pub trait SnapshotSource {
    fn load_snapshot(&self) -> FinwiseResult<FinanceSnapshot>;
}

/// A snapshot held in memory, for tests and for callers that already
/// fetched everything.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    snapshot: FinanceSnapshot,
}

impl InMemorySnapshot {
    pub fn new(snapshot: FinanceSnapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotSource for InMemorySnapshot {
    fn load_snapshot(&self) -> FinwiseResult<FinanceSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_snapshot_defaults_to_empty_lists() {
        let snap = FinanceSnapshot::from_json(r#"{"goals": []}"#).unwrap();
        assert!(snap.transactions.is_empty());
        assert!(snap.budgets.is_empty());
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = FinanceSnapshot::from_json("{").unwrap_err();
        assert!(matches!(err, crate::FinwiseError::SerializationError(_)));
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySnapshot::new(FinanceSnapshot::default());
        assert_eq!(source.load_snapshot().unwrap(), FinanceSnapshot::default());
    }
}
