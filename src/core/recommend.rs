use super::scenario::ScenarioTable;
use super::types::{
    FinancialState, ProjectionSummary, Recommendation, RecommendationPriority, Scenario,
    round_currency,
};

const MAX_GOAL_WARNINGS: usize = 3;

pub fn recommend(
    scenario: Scenario,
    summary: &ProjectionSummary,
    initial: &FinancialState,
    months: u32,
    scenarios: &ScenarioTable,
    currency: &str,
) -> Vec<Recommendation> {
    let money = |value: f64| format!("{currency}{}", format_amount(value));
    let mut out = Vec::new();

    if summary.networth_change > 0.0 {
        let monthly_growth = summary.networth_change / f64::from(months.max(1));
        out.push(Recommendation {
            kind: "positive_trajectory",
            priority: RecommendationPriority::Info,
            title: "Positive Financial Trajectory".to_string(),
            message: format!(
                "Your net worth grows by {} over {months} months",
                money(summary.networth_change)
            ),
            action: format!(
                "Continue current path - averaging {}/month growth",
                money(monthly_growth)
            ),
        });
    } else {
        out.push(Recommendation {
            kind: "negative_trajectory",
            priority: RecommendationPriority::High,
            title: "Net Worth Declining".to_string(),
            message: format!(
                "Projected net worth decreases by {}",
                money(summary.networth_change.abs())
            ),
            action: "Urgent: Reduce expenses or increase income to reverse trend".to_string(),
        });
    }

    for goal in summary.goals_at_risk.iter().take(MAX_GOAL_WARNINGS) {
        out.push(Recommendation {
            kind: "goal_at_risk",
            priority: RecommendationPriority::High,
            title: format!("'{}' May Not Be Met", goal.name),
            message: format!(
                "Shortfall of {} projected by deadline",
                money(goal.shortfall)
            ),
            action: "Increase savings or extend deadline".to_string(),
        });
    }

    match scenario {
        Scenario::Baseline => out.push(Recommendation {
            kind: "scenario_suggestion",
            priority: RecommendationPriority::Medium,
            title: "Consider Increased Savings".to_string(),
            message: "Try the 'increased_savings' scenario to see potential gains".to_string(),
            action: "Small lifestyle changes can significantly improve outcomes".to_string(),
        }),
        Scenario::JobLoss => {
            let runway = runway_months(initial, scenarios);
            out.push(Recommendation {
                kind: "emergency_runway",
                priority: RecommendationPriority::High,
                title: format!("Emergency Runway: {runway} Months"),
                message: format!("Current savings cover {runway} months of essential expenses"),
                action: "Build 6-month emergency fund for security".to_string(),
            });
        }
        _ => {}
    }

    if round_currency(summary.final_debt) == 0.0 && initial.debt > 0.0 {
        out.push(Recommendation {
            kind: "debt_freedom",
            priority: RecommendationPriority::Info,
            title: "Debt-Free by End of Projection!".to_string(),
            message: "All debts will be cleared within this period".to_string(),
            action: "Redirect EMI amounts to investments after payoff".to_string(),
        });
    }

    if summary.final_savings > initial.savings * 2.0 {
        out.push(Recommendation {
            kind: "savings_milestone",
            priority: RecommendationPriority::Info,
            title: "Savings Will Double!".to_string(),
            message: format!("Projected savings: {}", money(summary.final_savings)),
            action: "Consider diversifying into equity for higher returns".to_string(),
        });
    }

    out
}

/// Whole months the opening savings cover at survival-mode needs plus the
/// declared EMI outflow.
pub fn runway_months(initial: &FinancialState, scenarios: &ScenarioTable) -> u32 {
    let burn = initial.monthly_needs * scenarios.lookup(Scenario::JobLoss).needs_multiplier
        + initial.monthly_emis;
    if burn <= 0.0 {
        return 0;
    }
    (initial.savings / burn).floor().min(f64::from(u32::MAX)) as u32
}

/// Whole units with comma thousands separators, e.g. `-1,234,568`. Halves
/// round to even.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round_ties_even();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
