use chrono::{Months, NaiveDate};

use super::error::{SimulationError, ValidationErrors};
use super::goals::{AllocationPolicy, allocate};
use super::obligations::advance_month;
use super::scenario::{ScenarioModifiers, ScenarioTable};
use super::summary::summarize;
use super::types::{
    Assumptions, ExpenseBreakdown, FinancialState, Goal, MonthlySnapshot, Obligation,
    ProjectionSummary, Scenario,
};

/// Share of each month's obligation payments booked as principal paydown.
/// This stands in for a real amortization schedule.
pub const DEFAULT_PRINCIPAL_SHARE: f64 = 0.4;
pub const MAX_PROJECTION_MONTHS: u32 = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub scenarios: ScenarioTable,
    pub allocation: AllocationPolicy,
    pub principal_share: f64,
    pub default_assumptions: Assumptions,
    pub max_projection_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scenarios: ScenarioTable::standard(),
            allocation: AllocationPolicy::default(),
            principal_share: DEFAULT_PRINCIPAL_SHARE,
            default_assumptions: Assumptions::default(),
            max_projection_months: MAX_PROJECTION_MONTHS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    pub state: FinancialState,
    pub obligations: Vec<Obligation>,
    pub goals: Vec<Goal>,
    pub assumptions: Assumptions,
    pub scenario: Scenario,
    pub months: u32,
    /// Calendar month labelled as month 1.
    pub start_date: NaiveDate,
}

impl SimulationInput {
    pub fn with_scenario(&self, scenario: Scenario) -> Self {
        Self {
            scenario,
            ..self.clone()
        }
    }
}

/// Everything a finished run leaves behind: the starting position, one
/// snapshot per month, and the goals as they stand after the last month.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub initial: FinancialState,
    pub snapshots: Vec<MonthlySnapshot>,
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub scenario: Scenario,
    pub projection_months: u32,
    pub monthly_snapshots: Vec<MonthlySnapshot>,
    pub summary: ProjectionSummary,
}

pub struct SimulationEngine<'a> {
    config: &'a EngineConfig,
    modifiers: &'a ScenarioModifiers,
    initial: FinancialState,
    state: FinancialState,
    obligations: Vec<Obligation>,
    goals: Vec<Goal>,
    assumptions: Assumptions,
    start_date: NaiveDate,
    months: u32,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(config: &'a EngineConfig, input: SimulationInput) -> Result<Self, SimulationError> {
        let mut errors = ValidationErrors::default();
        if input.months == 0 || input.months > config.max_projection_months {
            errors.push(
                "projection_months",
                format!("must be between 1 and {}", config.max_projection_months),
            );
        }
        errors.into_result(())?;

        Ok(Self {
            config,
            modifiers: config.scenarios.lookup(input.scenario),
            initial: input.state.clone(),
            state: input.state,
            obligations: input.obligations,
            goals: input.goals,
            assumptions: input.assumptions,
            start_date: input.start_date,
            months: input.months,
        })
    }

    pub fn run(mut self) -> Result<SimulationRun, SimulationError> {
        let mut snapshots = Vec::with_capacity(self.months as usize);
        for month in 1..=self.months {
            snapshots.push(self.step(month)?);
            if month % 12 == 0 {
                self.apply_annual_adjustment(month);
            }
        }

        Ok(SimulationRun {
            initial: self.initial,
            snapshots,
            goals: self.goals,
        })
    }

    fn step(&mut self, month: u32) -> Result<MonthlySnapshot, SimulationError> {
        let as_of = calendar_month(self.start_date, month);

        let income = self.state.monthly_income * self.modifiers.income_multiplier;
        let needs = self.state.monthly_needs * self.modifiers.needs_multiplier;
        let wants = self.state.monthly_wants * self.modifiers.wants_multiplier;

        let emis = advance_month(&mut self.obligations);
        let total_expenses = needs + wants + emis;
        let savings_flow = income - total_expenses;

        // return accrues on the balance carried in, before this month's flow
        let savings_return = self.state.savings * (self.assumptions.savings_return_rate / 12.0);
        self.state.savings = (self.state.savings + savings_flow + savings_return).max(0.0);

        let principal_paid = emis * self.config.principal_share;
        self.state.debt = (self.state.debt - principal_paid).max(0.0);

        let networth = self.state.savings + self.state.assets - self.state.debt;

        let available = self.config.allocation.available_cash(savings_flow);
        let allocation = allocate(&mut self.goals, available, as_of);

        let snapshot = MonthlySnapshot {
            month,
            date: as_of.format("%Y-%m").to_string(),
            income,
            expenses: ExpenseBreakdown {
                needs,
                wants,
                emis,
                total: total_expenses,
            },
            savings_flow,
            cumulative_savings: self.state.savings,
            debt_remaining: self.state.debt,
            networth,
            goal_progress: allocation.progress,
            goals_completed: allocation.completed,
            principal_paid,
        };
        ensure_finite(&snapshot)?;
        Ok(snapshot)
    }

    fn apply_annual_adjustment(&mut self, month: u32) {
        self.state.monthly_income *= 1.0 + self.assumptions.income_growth_rate;
        self.state.monthly_needs *= 1.0 + self.assumptions.inflation_rate;
        self.state.monthly_wants *= 1.0 + self.assumptions.inflation_rate;
        tracing::debug!(
            month,
            monthly_income = self.state.monthly_income,
            monthly_needs = self.state.monthly_needs,
            monthly_wants = self.state.monthly_wants,
            "applied annual growth and inflation"
        );
    }
}

pub fn simulate(
    config: &EngineConfig,
    input: SimulationInput,
) -> Result<SimulationRun, SimulationError> {
    SimulationEngine::new(config, input)?.run()
}

pub fn project(config: &EngineConfig, input: SimulationInput) -> Result<Projection, SimulationError> {
    let scenario = input.scenario;
    let projection_months = input.months;
    let run = simulate(config, input)?;
    let summary = summarize(&run.initial, &run.snapshots, &run.goals);
    Ok(Projection {
        scenario,
        projection_months,
        monthly_snapshots: run.snapshots,
        summary,
    })
}

/// Month `n` (1-based) falls `n - 1` calendar months after `start`. Days past
/// the end of a shorter month clamp to its last day.
pub fn calendar_month(start: NaiveDate, month: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .unwrap_or(NaiveDate::MAX)
}

fn ensure_finite(snapshot: &MonthlySnapshot) -> Result<(), SimulationError> {
    let fields = [
        ("income", snapshot.income),
        ("expenses.total", snapshot.expenses.total),
        ("savings_flow", snapshot.savings_flow),
        ("cumulative_savings", snapshot.cumulative_savings),
        ("debt_remaining", snapshot.debt_remaining),
        ("networth", snapshot.networth),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some(&(field, _)) => Err(SimulationError::NonFiniteState {
            month: snapshot.month,
            field,
        }),
        None => Ok(()),
    }
}
