use std::collections::BTreeMap;

use serde_json::json;

use ibp_core::{DomainAnalysis, DomainInsight, DomainPlan};

/// Placeholder production analyst: fabricates a fixed capacity-planning
/// insight regardless of the query.
#[derive(Debug, Default)]
pub struct ProductionAgent {
    insights: Vec<DomainInsight>,
    plans: Vec<DomainPlan>,
}

impl ProductionAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(
        &mut self,
        _query: &str,
        _data: Option<&[serde_json::Value]>,
    ) -> DomainAnalysis {
        let mut impact = BTreeMap::new();
        impact.insert("output_increase".to_string(), json!(2000));

        let insights = vec![DomainInsight::new(
            "capacity_planning",
            "Increase production capacity to meet demand.",
            0.9,
            impact,
            vec![json!({"action": "increase_capacity", "priority": "HIGH"})],
        )];
        self.insights.extend(insights.clone());

        let mut details = BTreeMap::new();
        details.insert("current_capacity".to_string(), json!(5000));
        details.insert("proposed_capacity".to_string(), json!(7000));
        let plans = vec![DomainPlan::new("increase_capacity", details)];
        self.plans.extend(plans.clone());

        DomainAnalysis { insights, plans }
    }

    /// Insights filtered by exact category match and a confidence floor.
    pub fn historical_insights(
        &self,
        category: Option<&str>,
        min_confidence: f64,
    ) -> Vec<DomainInsight> {
        self.insights
            .iter()
            .filter(|insight| category.map_or(true, |wanted| insight.category == wanted))
            .filter(|insight| insight.confidence >= min_confidence)
            .cloned()
            .collect()
    }
}
