use chrono::NaiveDate;

use super::types::{Goal, GoalProgress};

/// Share of a month's positive savings flow offered to goals. The remainder
/// stays in free savings.
pub const DEFAULT_GOAL_SHARE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationPolicy {
    pub goal_share: f64,
}

impl AllocationPolicy {
    pub fn available_cash(&self, savings_flow: f64) -> f64 {
        (savings_flow * self.goal_share).max(0.0)
    }
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            goal_share: DEFAULT_GOAL_SHARE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub progress: Vec<GoalProgress>,
    /// Goals that crossed their target this month, in funding order.
    pub completed: Vec<String>,
}

/// Funds unachieved goals in ascending priority (input order breaks ties)
/// until `available_cash` runs out, then reports every goal's position as of
/// `as_of`.
pub fn allocate(goals: &mut [Goal], available_cash: f64, as_of: NaiveDate) -> Allocation {
    let mut order = (0..goals.len())
        .filter(|&idx| !goals[idx].achieved)
        .collect::<Vec<_>>();
    // stable: equal priorities keep input order
    order.sort_by_key(|&idx| goals[idx].priority);

    let mut remaining = available_cash;
    let mut completed = Vec::new();
    for idx in order {
        if remaining <= 0.0 {
            break;
        }
        let goal = &mut goals[idx];
        let needed = goal.target - goal.current;
        if needed <= 0.0 {
            goal.achieved = true;
            completed.push(goal.name.clone());
            continue;
        }

        let contribution = remaining.min(needed);
        if contribution >= needed {
            goal.current = goal.target;
        } else {
            goal.current += contribution;
        }
        remaining -= contribution;

        if goal.current >= goal.target {
            goal.achieved = true;
            tracing::debug!(goal = %goal.name, %as_of, "goal funded");
            completed.push(goal.name.clone());
        }
    }

    Allocation {
        progress: goals.iter().map(|goal| progress_row(goal, as_of)).collect(),
        completed,
    }
}

fn progress_row(goal: &Goal, as_of: NaiveDate) -> GoalProgress {
    let percent = if goal.target > 0.0 {
        goal.current / goal.target * 100.0
    } else {
        0.0
    };
    GoalProgress {
        name: goal.name.clone(),
        target: goal.target,
        current: goal.current,
        progress_percent: (percent.min(100.0) * 100.0).round() / 100.0,
        remaining: goal.shortfall(),
        achieved: goal.achieved,
        on_track: goal.achieved || as_of <= goal.deadline,
    }
}
