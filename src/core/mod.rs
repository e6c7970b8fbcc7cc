mod compare;
mod engine;
mod error;
mod goals;
mod obligations;
mod recommend;
mod scenario;
mod summary;
mod types;

pub use compare::{ScenarioComparison, ScenarioOutcome, compare_scenarios};
pub use engine::{
    DEFAULT_PRINCIPAL_SHARE, EngineConfig, MAX_PROJECTION_MONTHS, Projection, SimulationEngine,
    SimulationInput, SimulationRun, calendar_month, project, simulate,
};
pub use error::{SimulationError, ValidationError, ValidationErrors};
pub use goals::{Allocation, AllocationPolicy, DEFAULT_GOAL_SHARE, allocate};
pub use obligations::advance_month;
pub use recommend::{format_amount, recommend, runway_months};
pub use scenario::{ScenarioModifiers, ScenarioTable};
pub use summary::summarize;
pub use types::{
    Assumptions, ExpenseBreakdown, FinancialState, Goal, GoalProgress, GoalShortfall,
    MonthlySnapshot, Obligation, ProjectionSummary, Recommendation, RecommendationPriority,
    Scenario, round_currency,
};

pub(crate) use types::serialize_currency;
