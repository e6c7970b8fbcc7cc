use rayon::prelude::*;

use super::engine::{EngineConfig, Projection, SimulationInput, project};
use super::error::SimulationError;
use super::types::Scenario;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub final_networth: f64,
    pub networth_change: f64,
    pub goals_achieved: usize,
    pub goals_at_risk: usize,
    pub total_savings: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    /// One outcome per compared scenario, in evaluation order.
    pub outcomes: Vec<ScenarioOutcome>,
    /// Scenarios by final net worth, best first. Ties keep evaluation order.
    pub ranking: Vec<Scenario>,
    pub best_scenario: Scenario,
    pub best_networth: f64,
}

/// Projects [`Scenario::COMPARED`] from the same starting input. The scenario
/// carried by `input` is ignored. Each run gets its own copy of the
/// obligations and goals, so the runs are evaluated in parallel.
pub fn compare_scenarios(
    config: &EngineConfig,
    input: &SimulationInput,
) -> Result<ScenarioComparison, SimulationError> {
    let projections = Scenario::COMPARED
        .into_par_iter()
        .map(|scenario| project(config, input.with_scenario(scenario)))
        .collect::<Result<Vec<Projection>, SimulationError>>()?;

    let outcomes = projections
        .into_iter()
        .map(|projection| ScenarioOutcome {
            scenario: projection.scenario,
            final_networth: projection.summary.final_networth,
            networth_change: projection.summary.networth_change,
            goals_achieved: projection.summary.goals_achieved.len(),
            goals_at_risk: projection.summary.goals_at_risk.len(),
            total_savings: projection.summary.total_savings_added,
            description: config
                .scenarios
                .lookup(projection.scenario)
                .description
                .clone(),
        })
        .collect::<Vec<_>>();

    let mut ranked = outcomes.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.final_networth.total_cmp(&a.final_networth));
    let ranking = ranked.iter().map(|outcome| outcome.scenario).collect::<Vec<_>>();
    let (best_scenario, best_networth) = ranked
        .first()
        .map(|outcome| (outcome.scenario, outcome.final_networth))
        .unwrap_or((Scenario::Baseline, 0.0));

    Ok(ScenarioComparison {
        outcomes,
        ranking,
        best_scenario,
        best_networth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Assumptions, FinancialState, Goal, Obligation};
    use chrono::NaiveDate;
    use proptest::prelude::{prop_assert, proptest};

    fn sample_input() -> SimulationInput {
        let deadline = NaiveDate::from_ymd_opt(2027, 1, 1).expect("valid date");
        SimulationInput {
            state: FinancialState {
                savings: 500_000.0,
                debt: 1_000_000.0,
                assets: 200_000.0,
                monthly_income: 100_000.0,
                monthly_needs: 35_000.0,
                monthly_wants: 20_000.0,
                monthly_emis: 25_000.0,
            },
            obligations: vec![Obligation::new("Car Loan", 25_000.0, 24, 9.0)],
            goals: vec![Goal::new("House Down Payment", 2_000_000.0, 500_000.0, deadline, 1)],
            assumptions: Assumptions::default(),
            scenario: Scenario::JobLoss,
            months: 24,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
        }
    }

    #[test]
    fn compares_three_scenarios_and_picks_richest() {
        let config = EngineConfig::default();
        let comparison = compare_scenarios(&config, &sample_input()).expect("comparison should run");

        let scenarios = comparison
            .outcomes
            .iter()
            .map(|outcome| outcome.scenario)
            .collect::<Vec<_>>();
        assert_eq!(scenarios, Scenario::COMPARED.to_vec());
        assert_eq!(comparison.best_scenario, Scenario::AggressiveSavings);
        assert_eq!(
            comparison.ranking,
            vec![
                Scenario::AggressiveSavings,
                Scenario::IncreasedSavings,
                Scenario::Baseline
            ]
        );
        assert_eq!(comparison.best_networth, comparison.outcomes[2].final_networth);
        assert_eq!(
            comparison.outcomes[1].description,
            "10% reduction in discretionary spending"
        );
    }

    #[test]
    fn comparison_matches_individual_projections() {
        let config = EngineConfig::default();
        let input = sample_input();
        let comparison = compare_scenarios(&config, &input).expect("comparison should run");

        for outcome in &comparison.outcomes {
            let single = project(&config, input.with_scenario(outcome.scenario))
                .expect("projection should run");
            assert_eq!(outcome.final_networth, single.summary.final_networth);
            assert_eq!(outcome.total_savings, single.summary.total_savings_added);
        }
    }

    #[test]
    fn ties_keep_evaluation_order() {
        let mut input = sample_input();
        input.state.monthly_wants = 0.0;
        input.state.monthly_needs = 0.0;
        let config = EngineConfig::default();

        let comparison = compare_scenarios(&config, &input).expect("comparison should run");

        assert_eq!(comparison.best_scenario, Scenario::Baseline);
        assert_eq!(comparison.ranking, Scenario::COMPARED.to_vec());
    }

    #[test]
    fn failed_run_fails_the_whole_comparison() {
        let mut input = sample_input();
        input.state.monthly_income = f64::MAX;
        input.state.savings = f64::MAX;

        let err = compare_scenarios(&EngineConfig::default(), &input)
            .err()
            .expect("overflowing runs must fail");

        assert!(matches!(err, SimulationError::NonFiniteState { month: 1, .. }));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_cheaper_scenarios_never_save_less(
            income in 1u32..300_000,
            needs in 0u32..200_000,
            wants in 0u32..200_000,
            emi in 0u32..60_000,
            emi_months in 0u32..36,
            months in 1u32..61,
        ) {
            let mut input = sample_input();
            input.state.monthly_income = income as f64;
            input.state.monthly_needs = needs as f64;
            input.state.monthly_wants = wants as f64;
            input.obligations = vec![Obligation::new("loan", emi as f64, emi_months, 10.0)];
            input.months = months;

            let comparison = compare_scenarios(&EngineConfig::default(), &input)
                .expect("comparison should run");
            let baseline = comparison.outcomes[0].total_savings;
            let increased = comparison.outcomes[1].total_savings;
            let aggressive = comparison.outcomes[2].total_savings;

            prop_assert!(aggressive >= increased);
            prop_assert!(increased >= baseline);
        }
    }
}
