use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Scenario {
    Baseline,
    IncreasedSavings,
    AggressiveSavings,
    JobLoss,
    EmiPrepayment,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Baseline,
        Scenario::IncreasedSavings,
        Scenario::AggressiveSavings,
        Scenario::JobLoss,
        Scenario::EmiPrepayment,
    ];

    /// Scenarios evaluated side by side by the comparator, in evaluation order.
    pub const COMPARED: [Scenario; 3] = [
        Scenario::Baseline,
        Scenario::IncreasedSavings,
        Scenario::AggressiveSavings,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Scenario::Baseline => "baseline",
            Scenario::IncreasedSavings => "increased_savings",
            Scenario::AggressiveSavings => "aggressive_savings",
            Scenario::JobLoss => "job_loss",
            Scenario::EmiPrepayment => "emi_prepayment",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Scenario::Baseline => 0,
            Scenario::IncreasedSavings => 1,
            Scenario::AggressiveSavings => 2,
            Scenario::JobLoss => 3,
            Scenario::EmiPrepayment => 4,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.id() == s)
            .ok_or_else(|| {
                let known = Scenario::ALL.map(Scenario::id).join(", ");
                format!("unknown scenario '{s}', expected one of: {known}")
            })
    }
}

impl Serialize for Scenario {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Running financial position. `savings` never drops below zero once the
/// engine has applied a month.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialState {
    pub savings: f64,
    pub debt: f64,
    pub assets: f64,
    pub monthly_income: f64,
    pub monthly_needs: f64,
    pub monthly_wants: f64,
    /// Declared EMI outflow from the expense breakdown. Payments charged during a
    /// projection come from the obligation list instead.
    pub monthly_emis: f64,
}

impl FinancialState {
    pub fn net_worth(&self) -> f64 {
        self.savings + self.assets - self.debt
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obligation {
    pub name: String,
    pub monthly_amount: f64,
    pub remaining_months: u32,
    pub annual_rate: f64,
    pub active: bool,
}

impl Obligation {
    pub fn new(
        name: impl Into<String>,
        monthly_amount: f64,
        remaining_months: u32,
        annual_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            monthly_amount,
            remaining_months,
            annual_rate,
            active: remaining_months > 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub deadline: NaiveDate,
    /// 1 is funded first.
    pub priority: u8,
    pub achieved: bool,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target: f64,
        current: f64,
        deadline: NaiveDate,
        priority: u8,
    ) -> Self {
        Self {
            name: name.into(),
            target,
            current,
            deadline,
            priority,
            achieved: current >= target,
        }
    }

    pub fn shortfall(&self) -> f64 {
        (self.target - self.current).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assumptions {
    pub income_growth_rate: f64,
    pub inflation_rate: f64,
    pub savings_return_rate: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            income_growth_rate: 0.08,
            inflation_rate: 0.06,
            savings_return_rate: 0.07,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseBreakdown {
    #[serde(serialize_with = "serialize_currency")]
    pub needs: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub wants: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub emis: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub name: String,
    pub target: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub current: f64,
    pub progress_percent: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub remaining: f64,
    pub achieved: bool,
    pub on_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySnapshot {
    pub month: u32,
    /// Calendar month as `YYYY-MM`.
    pub date: String,
    #[serde(serialize_with = "serialize_currency")]
    pub income: f64,
    pub expenses: ExpenseBreakdown,
    #[serde(serialize_with = "serialize_currency")]
    pub savings_flow: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub cumulative_savings: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub debt_remaining: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub networth: f64,
    pub goal_progress: Vec<GoalProgress>,
    #[serde(skip)]
    pub goals_completed: Vec<String>,
    /// Principal credited against debt this month, before the balance is
    /// floored at zero.
    #[serde(skip)]
    pub principal_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalShortfall {
    pub name: String,
    pub target: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub projected: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub shortfall: f64,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSummary {
    #[serde(serialize_with = "serialize_currency")]
    pub initial_networth: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub final_networth: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub networth_change: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub total_savings_added: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub total_debt_reduced: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub final_savings: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub final_debt: f64,
    pub goals_achieved: Vec<String>,
    pub goals_at_risk: Vec<GoalShortfall>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub priority: RecommendationPriority,
    pub title: String,
    pub message: String,
    pub action: String,
}

/// Rounds half away from zero to two decimal places. Negative zero collapses to zero.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

pub(crate) fn serialize_currency<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_currency(*value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_ids_round_trip_through_from_str() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.id().parse::<Scenario>(), Ok(scenario));
        }
    }

    #[test]
    fn unknown_scenario_lists_known_ids() {
        let err = "lottery_win".parse::<Scenario>().expect_err("must reject");
        assert!(err.contains("lottery_win"));
        assert!(err.contains("emi_prepayment"));
    }

    #[test]
    fn round_currency_rounds_half_away_from_zero() {
        assert_eq!(round_currency(1234.567), 1234.57);
        assert_eq!(round_currency(-2.345_000_1), -2.35);
        assert_eq!(round_currency(0.125), 0.13);
        assert!(round_currency(-0.001).is_sign_positive());
    }

    #[test]
    fn goal_starts_achieved_when_already_funded() {
        let deadline = NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date");
        assert!(Goal::new("car", 100.0, 100.0, deadline, 1).achieved);
        assert!(!Goal::new("car", 100.0, 99.99, deadline, 1).achieved);
    }

    #[test]
    fn obligation_with_no_months_left_starts_inactive() {
        assert!(!Obligation::new("paid off", 5_000.0, 0, 9.0).active);
        assert!(Obligation::new("car", 5_000.0, 1, 9.0).active);
    }

    #[test]
    fn snapshot_serializes_rounded_amounts_and_hides_completions() {
        let snapshot = MonthlySnapshot {
            month: 1,
            date: "2025-01".to_string(),
            income: 100_000.004,
            expenses: ExpenseBreakdown {
                needs: 1.005,
                wants: 0.0,
                emis: 0.0,
                total: 1.005,
            },
            savings_flow: 99_999.0,
            cumulative_savings: 10.0,
            debt_remaining: 0.0,
            networth: 10.0,
            goal_progress: Vec::new(),
            goals_completed: vec!["car".to_string()],
            principal_paid: 0.0,
        };
        let json = serde_json::to_value(&snapshot).expect("snapshot should serialize");
        assert_eq!(json["income"], serde_json::json!(100_000.0));
        assert_eq!(json["date"], serde_json::json!("2025-01"));
        assert!(json.get("goals_completed").is_none());
        assert!(json.get("principal_paid").is_none());
        assert!(json["expenses"].get("emis").is_some());
    }
}
