use super::types::Scenario;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioModifiers {
    pub income_multiplier: f64,
    pub needs_multiplier: f64,
    pub wants_multiplier: f64,
    pub description: String,
}

impl ScenarioModifiers {
    pub fn new(
        income_multiplier: f64,
        needs_multiplier: f64,
        wants_multiplier: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            income_multiplier,
            needs_multiplier,
            wants_multiplier,
            description: description.into(),
        }
    }
}

/// Immutable modifier rows, one per [`Scenario`]. Built once and handed to the
/// engine through [`super::EngineConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioTable {
    rows: [ScenarioModifiers; 5],
}

impl ScenarioTable {
    pub fn standard() -> Self {
        Self {
            rows: [
                ScenarioModifiers::new(1.0, 1.0, 1.0, "No changes to current behavior"),
                ScenarioModifiers::new(1.0, 1.0, 0.90, "10% reduction in discretionary spending"),
                ScenarioModifiers::new(1.0, 0.95, 0.75, "25% reduction in wants, 5% in needs"),
                ScenarioModifiers::new(0.0, 0.70, 0.30, "Zero income, survival mode spending"),
                ScenarioModifiers::new(1.0, 1.0, 0.85, "Redirect savings to loan prepayment"),
            ],
        }
    }

    pub fn with_modifiers(mut self, scenario: Scenario, modifiers: ScenarioModifiers) -> Self {
        self.rows[scenario.index()] = modifiers;
        self
    }

    pub fn lookup(&self, scenario: Scenario) -> &ScenarioModifiers {
        &self.rows[scenario.index()]
    }

    pub fn descriptions(&self) -> impl Iterator<Item = (Scenario, &str)> + '_ {
        Scenario::ALL
            .into_iter()
            .map(|scenario| (scenario, self.lookup(scenario).description.as_str()))
    }
}

impl Default for ScenarioTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_matches_published_multipliers() {
        let table = ScenarioTable::standard();
        assert_eq!(table.lookup(Scenario::Baseline).wants_multiplier, 1.0);
        assert_eq!(table.lookup(Scenario::IncreasedSavings).wants_multiplier, 0.90);
        assert_eq!(table.lookup(Scenario::AggressiveSavings).wants_multiplier, 0.75);
        assert_eq!(table.lookup(Scenario::AggressiveSavings).needs_multiplier, 0.95);
        assert_eq!(table.lookup(Scenario::JobLoss).income_multiplier, 0.0);
        assert_eq!(table.lookup(Scenario::JobLoss).needs_multiplier, 0.70);
        assert_eq!(table.lookup(Scenario::EmiPrepayment).wants_multiplier, 0.85);
    }

    #[test]
    fn descriptions_cover_every_scenario_in_order() {
        let table = ScenarioTable::standard();
        let ids = table
            .descriptions()
            .map(|(scenario, _)| scenario.id())
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                "baseline",
                "increased_savings",
                "aggressive_savings",
                "job_loss",
                "emi_prepayment"
            ]
        );
    }

    #[test]
    fn injected_row_replaces_only_its_scenario() {
        let table = ScenarioTable::standard().with_modifiers(
            Scenario::JobLoss,
            ScenarioModifiers::new(0.5, 1.0, 1.0, "Half pay"),
        );
        assert_eq!(table.lookup(Scenario::JobLoss).income_multiplier, 0.5);
        assert_eq!(
            table.lookup(Scenario::Baseline),
            ScenarioTable::standard().lookup(Scenario::Baseline)
        );
    }
}
