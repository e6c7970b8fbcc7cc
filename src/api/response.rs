use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::{
    MonthlySnapshot, Projection, ProjectionSummary, Recommendation, Scenario, ScenarioComparison,
    ScenarioOutcome, ScenarioTable, serialize_currency,
};

#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub scenario: Scenario,
    pub projection_months: u32,
    pub monthly_snapshots: Vec<MonthlySnapshot>,
    pub summary: ProjectionSummary,
    pub recommendations: Vec<Recommendation>,
}

pub fn build_simulate_response(
    projection: Projection,
    recommendations: Vec<Recommendation>,
) -> SimulateResponse {
    SimulateResponse {
        scenario: projection.scenario,
        projection_months: projection.projection_months,
        monthly_snapshots: projection.monthly_snapshots,
        summary: projection.summary,
        recommendations,
    }
}

#[derive(Debug, Serialize)]
pub struct ScenarioOutcomeBody {
    #[serde(serialize_with = "serialize_currency")]
    pub final_networth: f64,
    #[serde(serialize_with = "serialize_currency")]
    pub networth_change: f64,
    pub goals_achieved: usize,
    pub goals_at_risk: usize,
    #[serde(serialize_with = "serialize_currency")]
    pub total_savings: f64,
    pub description: String,
}

impl From<ScenarioOutcome> for ScenarioOutcomeBody {
    fn from(outcome: ScenarioOutcome) -> Self {
        Self {
            final_networth: outcome.final_networth,
            networth_change: outcome.networth_change,
            goals_achieved: outcome.goals_achieved,
            goals_at_risk: outcome.goals_at_risk,
            total_savings: outcome.total_savings,
            description: outcome.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub scenarios: BTreeMap<Scenario, ScenarioOutcomeBody>,
    pub ranking: Vec<Scenario>,
    pub best_scenario: Scenario,
    #[serde(serialize_with = "serialize_currency")]
    pub best_networth: f64,
    pub recommendation: String,
}

pub fn build_compare_response(comparison: ScenarioComparison) -> CompareResponse {
    let recommendation = format!("'{}' yields highest net worth", comparison.best_scenario);
    CompareResponse {
        scenarios: comparison
            .outcomes
            .into_iter()
            .map(|outcome| (outcome.scenario, outcome.into()))
            .collect(),
        ranking: comparison.ranking,
        best_scenario: comparison.best_scenario,
        best_networth: comparison.best_networth,
        recommendation,
    }
}

#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub scenarios: BTreeMap<Scenario, String>,
    pub default: Scenario,
}

pub fn build_scenarios_response(table: &ScenarioTable) -> ScenariosResponse {
    ScenariosResponse {
        scenarios: table
            .descriptions()
            .map(|(scenario, description)| (scenario, description.to_string()))
            .collect(),
        default: Scenario::Baseline,
    }
}
