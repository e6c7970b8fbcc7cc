use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::{
    Assumptions, EngineConfig, FinancialState, Goal, Obligation, Scenario, SimulationInput,
    ValidationErrors,
};

const MAX_INCOME_GROWTH_RATE: f64 = 0.5;
const MAX_INFLATION_RATE: f64 = 0.3;
const MAX_SAVINGS_RETURN_RATE: f64 = 0.3;
const MIN_PRIORITY: i64 = 1;
const MAX_PRIORITY: i64 = 10;
const DEFAULT_PRIORITY: i64 = 5;
const DEFAULT_PROJECTION_MONTHS: i64 = 12;

/// Request body shared by `/twin/simulate` and `/twin/compare`. Every field is
/// optional at the serde level so that missing and out-of-range values are
/// reported together, per field, by [`build_simulation_input`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SimulatePayload {
    pub current_state: Option<CurrentStatePayload>,
    pub emis: Vec<EmiPayload>,
    pub goals: Vec<GoalPayload>,
    pub projection_months: Option<i64>,
    pub scenario: Option<String>,
    pub assumptions: Option<AssumptionsPayload>,
    /// `YYYY-MM-DD`; defaults to the server's current date.
    pub start_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CurrentStatePayload {
    pub savings: Option<f64>,
    pub debt: Option<f64>,
    pub assets: Option<f64>,
    pub monthly_income: Option<f64>,
    pub monthly_expenses: Option<MonthlyExpensesPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MonthlyExpensesPayload {
    pub needs: Option<f64>,
    pub wants: Option<f64>,
    pub emis: Option<f64>,
    pub savings: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmiPayload {
    pub name: Option<String>,
    pub monthly_amount: Option<f64>,
    pub remaining_months: Option<i64>,
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GoalPayload {
    pub name: Option<String>,
    pub target: Option<f64>,
    pub current: Option<f64>,
    pub deadline: Option<String>,
    pub priority: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssumptionsPayload {
    pub income_growth_rate: Option<f64>,
    pub inflation_rate: Option<f64>,
    pub savings_return_rate: Option<f64>,
}

#[derive(Copy, Clone)]
enum Floor {
    Zero,
    AboveZero,
}

pub fn build_simulation_input(
    payload: SimulatePayload,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<SimulationInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let state = match payload.current_state {
        Some(current) => build_state(&mut errors, current),
        None => {
            errors.push("current_state", "is required");
            None
        }
    };

    let obligations = payload
        .emis
        .into_iter()
        .enumerate()
        .map(|(idx, emi)| build_obligation(&mut errors, idx, emi))
        .collect::<Vec<_>>();

    let goals = payload
        .goals
        .into_iter()
        .enumerate()
        .map(|(idx, goal)| build_goal(&mut errors, idx, goal))
        .collect::<Vec<_>>();

    let months = whole(
        &mut errors,
        "projection_months",
        payload.projection_months.unwrap_or(DEFAULT_PROJECTION_MONTHS),
        1,
        i64::from(config.max_projection_months),
    );

    let scenario = match payload.scenario.as_deref() {
        None => Scenario::Baseline,
        Some(id) => id.parse::<Scenario>().unwrap_or_else(|msg| {
            errors.push("scenario", msg);
            Scenario::Baseline
        }),
    };

    let assumptions = build_assumptions(
        &mut errors,
        payload.assumptions.unwrap_or_default(),
        config.default_assumptions,
    );

    let start_date = match payload.start_date.as_deref() {
        Some(raw) => date(&mut errors, "start_date", raw).unwrap_or(today),
        None => today,
    };

    let (Some(state), Some(obligations), Some(goals)) = (
        state,
        obligations.into_iter().collect::<Option<Vec<_>>>(),
        goals.into_iter().collect::<Option<Vec<_>>>(),
    ) else {
        return Err(errors);
    };

    errors.into_result(SimulationInput {
        state,
        obligations,
        goals,
        assumptions,
        scenario,
        months: months as u32,
        start_date,
    })
}

fn build_state(
    errors: &mut ValidationErrors,
    current: CurrentStatePayload,
) -> Option<FinancialState> {
    let savings = amount(errors, "current_state.savings", current.savings, Floor::Zero);
    let debt = amount(errors, "current_state.debt", current.debt.or(Some(0.0)), Floor::Zero);
    let assets = amount(errors, "current_state.assets", current.assets.or(Some(0.0)), Floor::Zero);
    let monthly_income = amount(
        errors,
        "current_state.monthly_income",
        current.monthly_income,
        Floor::AboveZero,
    );

    let Some(expenses) = current.monthly_expenses else {
        errors.push("current_state.monthly_expenses", "is required");
        return None;
    };
    let monthly_needs = amount(
        errors,
        "current_state.monthly_expenses.needs",
        expenses.needs,
        Floor::Zero,
    );
    let monthly_wants = amount(
        errors,
        "current_state.monthly_expenses.wants",
        expenses.wants,
        Floor::Zero,
    );
    let monthly_emis = amount(
        errors,
        "current_state.monthly_expenses.emis",
        expenses.emis.or(Some(0.0)),
        Floor::Zero,
    );
    // validated only; projected savings come from the monthly flow
    amount(
        errors,
        "current_state.monthly_expenses.savings",
        expenses.savings.or(Some(0.0)),
        Floor::Zero,
    );

    Some(FinancialState {
        savings,
        debt,
        assets,
        monthly_income,
        monthly_needs,
        monthly_wants,
        monthly_emis,
    })
}

fn build_obligation(
    errors: &mut ValidationErrors,
    idx: usize,
    emi: EmiPayload,
) -> Option<Obligation> {
    let prefix = format!("emis[{idx}]");
    let name = required_name(errors, &prefix, emi.name);
    let monthly_amount = amount(
        errors,
        &format!("{prefix}.monthly_amount"),
        emi.monthly_amount,
        Floor::Zero,
    );
    let remaining_months = match emi.remaining_months {
        Some(months) => whole(
            errors,
            &format!("{prefix}.remaining_months"),
            months,
            0,
            i64::from(u32::MAX),
        ),
        None => {
            errors.push(format!("{prefix}.remaining_months"), "is required");
            0
        }
    };
    let interest_rate = amount(
        errors,
        &format!("{prefix}.interest_rate"),
        emi.interest_rate.or(Some(0.0)),
        Floor::Zero,
    );

    Some(Obligation::new(
        name?,
        monthly_amount,
        remaining_months as u32,
        interest_rate,
    ))
}

fn build_goal(errors: &mut ValidationErrors, idx: usize, goal: GoalPayload) -> Option<Goal> {
    let prefix = format!("goals[{idx}]");
    let name = required_name(errors, &prefix, goal.name);
    let target = amount(errors, &format!("{prefix}.target"), goal.target, Floor::AboveZero);
    let current = amount(
        errors,
        &format!("{prefix}.current"),
        goal.current.or(Some(0.0)),
        Floor::Zero,
    );
    let deadline = match goal.deadline.as_deref() {
        Some(raw) => date(errors, &format!("{prefix}.deadline"), raw),
        None => {
            errors.push(format!("{prefix}.deadline"), "is required");
            None
        }
    };
    let priority = whole(
        errors,
        &format!("{prefix}.priority"),
        goal.priority.unwrap_or(DEFAULT_PRIORITY),
        MIN_PRIORITY,
        MAX_PRIORITY,
    );

    Some(Goal::new(name?, target, current, deadline?, priority as u8))
}

fn build_assumptions(
    errors: &mut ValidationErrors,
    payload: AssumptionsPayload,
    defaults: Assumptions,
) -> Assumptions {
    Assumptions {
        income_growth_rate: rate(
            errors,
            "assumptions.income_growth_rate",
            payload.income_growth_rate.unwrap_or(defaults.income_growth_rate),
            MAX_INCOME_GROWTH_RATE,
        ),
        inflation_rate: rate(
            errors,
            "assumptions.inflation_rate",
            payload.inflation_rate.unwrap_or(defaults.inflation_rate),
            MAX_INFLATION_RATE,
        ),
        savings_return_rate: rate(
            errors,
            "assumptions.savings_return_rate",
            payload.savings_return_rate.unwrap_or(defaults.savings_return_rate),
            MAX_SAVINGS_RETURN_RATE,
        ),
    }
}

fn required_name(
    errors: &mut ValidationErrors,
    prefix: &str,
    name: Option<String>,
) -> Option<String> {
    match name {
        Some(name) if !name.trim().is_empty() => Some(name),
        Some(_) => {
            errors.push(format!("{prefix}.name"), "must not be empty");
            None
        }
        None => {
            errors.push(format!("{prefix}.name"), "is required");
            None
        }
    }
}

fn amount(errors: &mut ValidationErrors, field: &str, value: Option<f64>, floor: Floor) -> f64 {
    let Some(value) = value else {
        errors.push(field, "is required");
        return 0.0;
    };
    if !value.is_finite() {
        errors.push(field, "must be a finite number");
        return 0.0;
    }
    match floor {
        Floor::Zero if value < 0.0 => errors.push(field, "must be >= 0"),
        Floor::AboveZero if value <= 0.0 => errors.push(field, "must be > 0"),
        _ => {}
    }
    value
}

fn rate(errors: &mut ValidationErrors, field: &str, value: f64, max: f64) -> f64 {
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        errors.push(field, format!("must be between 0 and {max}"));
    }
    value
}

fn whole(errors: &mut ValidationErrors, field: &str, value: i64, min: i64, max: i64) -> i64 {
    if !(min..=max).contains(&value) {
        errors.push(field, format!("must be between {min} and {max}"));
        return min;
    }
    value
}

fn date(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            errors.push(field, format!("must be a YYYY-MM-DD date ({err})"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn parse(json: &str) -> Result<SimulationInput, ValidationErrors> {
        let payload = serde_json::from_str::<SimulatePayload>(json).expect("payload should parse");
        build_simulation_input(payload, &EngineConfig::default(), today())
    }

    fn fields(errors: &ValidationErrors) -> Vec<&str> {
        errors.errors().iter().map(|e| e.field.as_str()).collect()
    }

    const VALID: &str = r#"{
        "current_state": {
            "savings": 500000,
            "debt": 1000000,
            "assets": 200000,
            "monthly_income": 100000,
            "monthly_expenses": {"needs": 35000, "wants": 20000, "emis": 25000, "savings": 20000}
        },
        "emis": [
            {"name": "Car Loan", "monthly_amount": 25000, "remaining_months": 24, "interest_rate": 9}
        ],
        "goals": [
            {"name": "House Down Payment", "target": 2000000, "current": 500000, "deadline": "2027-01-01", "priority": 1}
        ],
        "projection_months": 24,
        "scenario": "aggressive_savings"
    }"#;

    #[test]
    fn parses_documented_request() {
        let input = parse(VALID).expect("valid request");

        assert_eq!(input.state.savings, 500_000.0);
        assert_eq!(input.state.monthly_emis, 25_000.0);
        assert_eq!(input.obligations.len(), 1);
        assert!(input.obligations[0].active);
        assert_eq!(input.obligations[0].remaining_months, 24);
        assert_eq!(input.goals[0].priority, 1);
        assert_eq!(
            input.goals[0].deadline,
            NaiveDate::from_ymd_opt(2027, 1, 1).expect("valid date")
        );
        assert_eq!(input.months, 24);
        assert_eq!(input.scenario, Scenario::AggressiveSavings);
        assert_eq!(input.assumptions, Assumptions::default());
        assert_eq!(input.start_date, today());
    }

    #[test]
    fn applies_defaults_for_optional_fields() {
        let input = parse(
            r#"{
                "current_state": {
                    "savings": 0,
                    "monthly_income": 50000,
                    "monthly_expenses": {"needs": 20000, "wants": 5000}
                },
                "goals": [{"name": "Trip", "target": 80000, "deadline": "2026-03-31"}],
                "start_date": "2025-02-10"
            }"#,
        )
        .expect("valid request");

        assert_eq!(input.state.debt, 0.0);
        assert_eq!(input.state.assets, 0.0);
        assert_eq!(input.months, 12);
        assert_eq!(input.scenario, Scenario::Baseline);
        assert_eq!(input.goals[0].priority, 5);
        assert_eq!(input.goals[0].current, 0.0);
        assert_eq!(
            input.start_date,
            NaiveDate::from_ymd_opt(2025, 2, 10).expect("valid date")
        );
    }

    #[test]
    fn reports_every_offending_field() {
        let errors = parse(
            r#"{
                "current_state": {
                    "savings": -1,
                    "monthly_income": 0,
                    "monthly_expenses": {"needs": 10, "wants": -5}
                },
                "emis": [{"name": "Loan", "monthly_amount": 100, "remaining_months": -2}],
                "goals": [{"name": "Car", "target": 1000, "deadline": "next year", "priority": 11}],
                "projection_months": 121,
                "scenario": "lottery",
                "assumptions": {"inflation_rate": 0.9}
            }"#,
        )
        .expect_err("invalid request");

        assert_eq!(
            fields(&errors),
            vec![
                "current_state.savings",
                "current_state.monthly_income",
                "current_state.monthly_expenses.wants",
                "emis[0].remaining_months",
                "goals[0].deadline",
                "goals[0].priority",
                "projection_months",
                "scenario",
                "assumptions.inflation_rate",
            ]
        );
    }

    #[test]
    fn missing_state_is_required() {
        let errors = parse(r#"{"projection_months": 6}"#).expect_err("state is required");
        assert_eq!(fields(&errors), vec!["current_state"]);
    }

    #[test]
    fn missing_goal_fields_are_named() {
        let errors = parse(
            r#"{
                "current_state": {"savings": 0, "monthly_income": 1, "monthly_expenses": {"needs": 0, "wants": 0}},
                "goals": [{"target": 0}]
            }"#,
        )
        .expect_err("goal is incomplete");

        assert_eq!(
            fields(&errors),
            vec!["goals[0].name", "goals[0].target", "goals[0].deadline"]
        );
    }

    #[test]
    fn zero_month_obligation_is_accepted_as_finished() {
        let input = parse(
            r#"{
                "current_state": {"savings": 0, "monthly_income": 1, "monthly_expenses": {"needs": 0, "wants": 0}},
                "emis": [{"name": "Paid", "monthly_amount": 5000, "remaining_months": 0}]
            }"#,
        )
        .expect("valid request");

        assert!(!input.obligations[0].active);
        assert_eq!(input.obligations[0].annual_rate, 0.0);
    }
}
