use super::types::{FinancialState, Goal, GoalShortfall, MonthlySnapshot, ProjectionSummary};

/// Reduces a finished run to its headline numbers. `goals` are the goal
/// states after the last simulated month.
pub fn summarize(
    initial: &FinancialState,
    snapshots: &[MonthlySnapshot],
    goals: &[Goal],
) -> ProjectionSummary {
    let initial_networth = initial.net_worth();
    let (final_networth, final_savings, final_debt) = match snapshots.last() {
        Some(last) => (last.networth, last.cumulative_savings, last.debt_remaining),
        None => (initial_networth, initial.savings, initial.debt),
    };

    let total_savings_added: f64 = snapshots
        .iter()
        .map(|snapshot| snapshot.savings_flow)
        .filter(|flow| *flow > 0.0)
        .sum();

    // booked principal; keeps accruing after the balance floors at zero
    let total_debt_reduced: f64 = snapshots
        .iter()
        .map(|snapshot| snapshot.principal_paid)
        .sum();

    let goals_achieved: Vec<String> = snapshots
        .iter()
        .flat_map(|snapshot| snapshot.goals_completed.iter().cloned())
        .collect();

    let goals_at_risk: Vec<GoalShortfall> = goals
        .iter()
        .filter(|goal| !goal.achieved)
        .map(|goal| GoalShortfall {
            name: goal.name.clone(),
            target: goal.target,
            projected: goal.current,
            shortfall: goal.target - goal.current,
            deadline: goal.deadline,
        })
        .collect();

    ProjectionSummary {
        initial_networth,
        final_networth,
        networth_change: final_networth - initial_networth,
        total_savings_added,
        total_debt_reduced,
        final_savings,
        final_debt,
        goals_achieved,
        goals_at_risk,
    }
}
