use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Instant;

use crate::types::{clamp_percent, percent_of, with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Savings goal category. Unknown values read as `General`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    #[default]
    General,
    Emergency,
    Vacation,
    Home,
    Education,
    Retirement,
}

impl GoalCategory {
    pub fn color(self) -> &'static str {
        match self {
            GoalCategory::General => "#3B82F6",
            GoalCategory::Emergency => "#EF4444",
            GoalCategory::Vacation => "#10B981",
            GoalCategory::Home => "#F59E0B",
            GoalCategory::Education => "#8B5CF6",
            GoalCategory::Retirement => "#06B6D4",
        }
    }
}

impl<'de> Deserialize<'de> for GoalCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_lowercase().as_str() {
            "emergency" => GoalCategory::Emergency,
            "vacation" => GoalCategory::Vacation,
            "home" => GoalCategory::Home,
            "education" => GoalCategory::Education,
            "retirement" => GoalCategory::Retirement,
            _ => GoalCategory::General,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: Money,
    #[serde(default)]
    pub current_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub is_completed: bool,
}

/// Where a goal stands against its target date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days", rename_all = "snake_case")]
pub enum DueStatus {
    NoTargetDate,
    DaysLeft(i64),
    DueToday,
    Overdue(i64),
}

impl DueStatus {
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => DueStatus::NoTargetDate,
            Some(0) => DueStatus::DueToday,
            Some(d) if d > 0 => DueStatus::DaysLeft(d),
            Some(d) => DueStatus::Overdue(-d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub current_amount: Money,
    pub target_amount: Money,
    /// Clamped to 0..=100
    pub percentage: Percent,
    pub remaining_amount: Money,
    /// Signed: negative means overdue
    pub days_remaining: Option<i64>,
    pub due: DueStatus,
    /// Progress has reached 100%
    pub can_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalReport {
    pub goal: GoalRecord,
    pub color: String,
    pub progress: GoalProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub active: Vec<GoalReport>,
    pub completed: Vec<GoalReport>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Progress towards a target as a percentage clamped to 0..=100. A
/// non-positive target reports zero.
pub fn goal_progress(current: Money, target: Money) -> Percent {
    clamp_percent(percent_of(current, target))
}

/// Whole days from `today` until `target_date`; `None` without a date.
/// Zero means due today, negative means overdue.
pub fn days_remaining(target_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    target_date.map(|target| (target - today).num_days())
}

pub fn evaluate_goal(goal: &GoalRecord, today: NaiveDate) -> GoalProgress {
    let percentage = goal_progress(goal.current_amount, goal.target_amount);
    let days = days_remaining(goal.target_date, today);
    GoalProgress {
        current_amount: goal.current_amount,
        target_amount: goal.target_amount,
        percentage,
        remaining_amount: goal.target_amount.saturating_sub(goal.current_amount).max(Decimal::ZERO),
        days_remaining: days,
        due: DueStatus::from_days(days),
        can_complete: percentage >= Decimal::ONE_HUNDRED,
    }
}

/// Split goals into active and completed, each with progress attached.
pub fn summarize_goals(goals: &[GoalRecord], today: NaiveDate) -> GoalSummary {
    let (completed, active): (Vec<GoalReport>, Vec<GoalReport>) = goals
        .iter()
        .map(|g| GoalReport {
            goal: g.clone(),
            color: g.category.color().to_string(),
            progress: evaluate_goal(g, today),
        })
        .partition(|r| r.goal.is_completed);
    GoalSummary { active, completed }
}

/// `summarize_goals` in the standard envelope, warning on overdue active
/// goals.
pub fn goal_report(goals: &[GoalRecord], today: NaiveDate) -> ComputationOutput<GoalSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = summarize_goals(goals, today);
    for report in &result.active {
        if let DueStatus::Overdue(days) = report.progress.due {
            warnings.push(format!("Goal '{}' is {} days overdue", report.goal.title, days));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Goal progress = current / target, clamped to 100%; days remaining from the given date",
        &serde_json::json!({ "today": today }),
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
