use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinwiseError;
use crate::types::Money;

/// Label used when a transaction has no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Chart color for uncategorized or colorless transactions.
pub const DEFAULT_CATEGORY_COLOR: &str = "#8B5CF6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A transaction as read from the store. Amounts are positive; direction
/// comes from `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_color: Option<String>,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Category name, or "Uncategorized".
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Category color, or the default chart color.
    pub fn color_tag(&self) -> &str {
        self.category_color
            .as_deref()
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }
}

/// Which transaction types an aggregation covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    Expenses,
    Income,
    Both,
}

impl TypeFilter {
    pub fn matches(self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::Expenses => kind == TransactionType::Expense,
            TypeFilter::Income => kind == TransactionType::Income,
            TypeFilter::Both => true,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = FinwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expenses" | "expense" => Ok(TypeFilter::Expenses),
            "income" => Ok(TypeFilter::Income),
            "both" | "all" => Ok(TypeFilter::Both),
            other => Err(FinwiseError::InvalidInput {
                field: "view".into(),
                reason: format!("unknown view '{other}', use expenses, income or both"),
            }),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeFilter::Expenses => "expenses",
            TypeFilter::Income => "income",
            TypeFilter::Both => "both",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deserialize_store_row() {
        let json = r#"{
            "amount": "250.50",
            "type": "expense",
            "date": "2024-03-15",
            "category_name": "Food"
        }"#;
        let t: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(t.amount, dec!(250.50));
        assert!(t.is_expense());
        assert_eq!(t.category_label(), "Food");
        assert_eq!(t.color_tag(), DEFAULT_CATEGORY_COLOR);
        assert_eq!(t.id, None);
    }

    #[test]
    fn test_missing_category_is_uncategorized() {
        let json = r#"{"amount": "10", "type": "income", "date": "2024-01-01"}"#;
        let t: TransactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(t.category_label(), UNCATEGORIZED);
    }

    #[test]
    fn test_type_filter_parse_and_match() {
        assert_eq!("expenses".parse::<TypeFilter>().unwrap(), TypeFilter::Expenses);
        assert_eq!("Income".parse::<TypeFilter>().unwrap(), TypeFilter::Income);
        assert_eq!("both".parse::<TypeFilter>().unwrap(), TypeFilter::Both);
        assert!("savings".parse::<TypeFilter>().is_err());

        assert!(TypeFilter::Both.matches(TransactionType::Income));
        assert!(TypeFilter::Expenses.matches(TransactionType::Expense));
        assert!(!TypeFilter::Expenses.matches(TransactionType::Income));
    }
}
