use std::collections::BTreeMap;

use serde_json::json;

use ibp_core::{DomainAnalysis, DomainInsight, DomainPlan};

/// Placeholder logistics analyst: fabricates a fixed delivery-optimization
/// insight regardless of the query, accumulating insights for historical
/// lookup.
#[derive(Debug, Default)]
pub struct LogisticsAgent {
    insights: Vec<DomainInsight>,
    plans: Vec<DomainPlan>,
}

impl LogisticsAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(
        &mut self,
        _query: &str,
        _data: Option<&[serde_json::Value]>,
    ) -> DomainAnalysis {
        let mut impact = BTreeMap::new();
        impact.insert("cost_savings".to_string(), json!(10000));

        let insights = vec![DomainInsight::new(
            "delivery_optimization",
            "Optimize delivery routes to reduce costs.",
            0.85,
            impact,
            vec![json!({"action": "optimize_routes", "priority": "HIGH"})],
        )];
        self.insights.extend(insights.clone());

        let mut details = BTreeMap::new();
        details.insert("current_routes".to_string(), json!(["Route_A", "Route_B"]));
        details.insert("proposed_routes".to_string(), json!(["Route_C"]));
        let plans = vec![DomainPlan::new("optimize_routes", details)];
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
