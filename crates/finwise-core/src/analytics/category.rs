use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::{TransactionRecord, TypeFilter};
use crate::types::{percent_of, Money, Percent};

/// Totals for one category across the filtered transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub total_amount: Money,
    /// Color of the first transaction seen in this category
    pub color_tag: String,
    pub percentage_of_total: Percent,
}

/// Group transactions by category.
///
/// Groups keep the color of their first transaction. The result is sorted
/// by total, largest first; equal totals keep first-seen order. When the
/// filtered total is zero every percentage is zero.
pub fn aggregate_by_category(
    transactions: &[TransactionRecord],
    filter: TypeFilter,
) -> Vec<CategorySummary> {
    let mut groups: Vec<CategorySummary> = Vec::new();
    let mut total = Decimal::ZERO;

    for t in transactions.iter().filter(|t| filter.matches(t.kind)) {
        total += t.amount;
        let name = t.category_label();
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.total_amount += t.amount,
            None => groups.push(CategorySummary {
                name: name.to_string(),
                total_amount: t.amount,
                color_tag: t.color_tag().to_string(),
                percentage_of_total: Decimal::ZERO,
            }),
        }
    }

    for group in &mut groups {
        group.percentage_of_total = percent_of(group.total_amount, total);
    }

    // Vec::sort_by is stable
    groups.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    tracing::trace!(%filter, groups = groups.len(), %total, "aggregated by category");
    groups
}
