use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(pub Uuid);

impl PlanId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub Uuid);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub Uuid);

/// Action priority as declared by the model contract (HIGH|MEDIUM|LOW).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("priority must be HIGH, MEDIUM, or LOW, got `{raw}`"))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: ActionId,
    pub description: String,
    pub priority: Priority,
    pub impact: BTreeMap<String, serde_json::Value>,
    pub dependencies: Vec<String>,
    pub timeline: String,
    pub status: String,
}

impl ActionItem {
    pub fn new(
        description: impl Into<String>,
        priority: Priority,
        impact: BTreeMap<String, serde_json::Value>,
        dependencies: Vec<String>,
        timeline: impl Into<String>,
    ) -> Self {
        Self {
            id: ActionId(Uuid::new_v4()),
            description: description.into(),
            priority,
            impact,
            dependencies,
            timeline: timeline.into(),
            status: "pending".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    pub id: ScenarioId,
    pub description: String,
    pub assumptions: BTreeMap<String, serde_json::Value>,
    pub impact_areas: Vec<String>,
    pub probability: f64,
    pub timestamp: DateTime<Utc>,
}

impl WhatIfScenario {
    pub fn new(
        description: impl Into<String>,
        assumptions: BTreeMap<String, serde_json::Value>,
        impact_areas: Vec<String>,
        probability: f64,
    ) -> Self {
        Self {
            id: ScenarioId(Uuid::new_v4()),
            description: description.into(),
            assumptions,
            impact_areas,
            probability,
            timestamp: Utc::now(),
        }
    }
}

/// The agent's current recommendation for one conversation. Every field is
/// replaced on each regular query, but the id survives re-creation so the
/// plan keeps its identity across turns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BusinessPlan {
    pub id: PlanId,
    pub title: String,
    pub summary: String,
    pub actions: Vec<ActionItem>,
    pub metrics: BTreeMap<String, serde_json::Value>,
    pub timeline: DateTime<Utc>,
    pub what_if_scenarios: Vec<WhatIfScenario>,
    pub status: String,
}

impl BusinessPlan {
    pub fn new(
        id: PlanId,
        title: impl Into<String>,
        summary: impl Into<String>,
        actions: Vec<ActionItem>,
        metrics: BTreeMap<String, serde_json::Value>,
        what_if_scenarios: Vec<WhatIfScenario>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            summary: summary.into(),
            actions,
            metrics,
            timeline: Utc::now(),
            what_if_scenarios,
            status: "draft".to_string(),
        }
    }

    /// Deterministic markdown rendering of the plan. Pure; ordering follows
    /// the underlying lists' insertion order. The what-if section is omitted
    /// entirely when no scenarios exist.
    pub fn to_markdown(&self) -> String {
        let mut md = format!(
            "# {}\n## Executive Summary\n{}\n## Action Plan\n",
            self.title, self.summary
        );

        for action in &self.actions {
            md.push_str(&format!(
                "### {}\n- **Priority:** {}\n- **Timeline:** {}\n- **Status:** {}\n- **Impact:**\n",
                action.description, action.priority, action.timeline, action.status
            ));
            for (area, impact) in &action.impact {
                md.push_str(&format!("  - {area}: {}\n", render_value(impact)));
            }
            md.push('\n');
        }

        md.push_str("## Key Metrics\n");
        for (metric, value) in &self.metrics {
            md.push_str(&format!("- **{metric}:** {}\n", render_value(value)));
        }

        if !self.what_if_scenarios.is_empty() {
            md.push_str("\n## What-If Analysis\n");
            for scenario in &self.what_if_scenarios {
                md.push_str(&format!(
                    "### Scenario: {}\n- **Probability:** {:.1}%\n- **Impact Areas:** {}\n- **Assumptions:**\n",
                    scenario.description,
                    scenario.probability * 100.0,
                    scenario.impact_areas.join(", ")
                ));
                for (assumption, value) in &scenario.assumptions {
                    md.push_str(&format!("  - {assumption}: {}\n", render_value(value)));
                }
                md.push('\n');
            }
        }

        md
    }
}

// Bare strings render without JSON quotes; everything else renders as JSON.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::{ActionItem, BusinessPlan, PlanId, Priority, WhatIfScenario};

    fn plan_with_scenarios(scenarios: Vec<WhatIfScenario>) -> BusinessPlan {
        let mut impact = BTreeMap::new();
        impact.insert("revenue".to_string(), json!("+12%"));
        let mut metrics = BTreeMap::new();
        metrics.insert("churn".to_string(), json!(0.03));

        BusinessPlan::new(
            PlanId::generate(),
            "Q3 Expansion",
            "Grow the mid-market segment.",
            vec![ActionItem::new(
                "Hire two account executives",
                Priority::High,
                impact,
                vec!["budget approval".to_string()],
                "6 weeks",
            )],
            metrics,
            scenarios,
        )
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse("Medium"), Some(Priority::Medium));
        assert_eq!(Priority::parse("LOW"), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn markdown_renders_title_actions_and_metrics() {
        let md = plan_with_scenarios(Vec::new()).to_markdown();

        assert!(md.starts_with("# Q3 Expansion\n"));
        assert!(md.contains("## Executive Summary\nGrow the mid-market segment."));
        assert!(md.contains("### Hire two account executives"));
        assert!(md.contains("- **Priority:** HIGH"));
        assert!(md.contains("- **Status:** pending"));
        assert!(md.contains("  - revenue: +12%"));
        assert!(md.contains("- **churn:** 0.03"));
    }

    #[test]
    fn markdown_omits_what_if_section_when_no_scenarios() {
        let md = plan_with_scenarios(Vec::new()).to_markdown();
        assert!(!md.contains("What-If"));
    }

    #[test]
    fn markdown_renders_scenario_probability_as_percentage() {
        let mut assumptions = BTreeMap::new();
        assumptions.insert("demand_drop".to_string(), json!("20%"));
        let scenario = WhatIfScenario::new(
            "Key supplier exits the market",
            assumptions,
            vec!["logistics".to_string(), "production".to_string()],
            0.5,
        );

        let md = plan_with_scenarios(vec![scenario]).to_markdown();

        assert!(md.contains("## What-If Analysis"));
        assert!(md.contains("### Scenario: Key supplier exits the market"));
        assert!(md.contains("- **Probability:** 50.0%"));
        assert!(md.contains("- **Impact Areas:** logistics, production"));
        assert!(md.contains("  - demand_drop: 20%"));
    }

    #[test]
    fn new_plan_defaults_to_draft_status() {
        let plan = plan_with_scenarios(Vec::new());
        assert_eq!(plan.status, "draft");
        assert_eq!(plan.actions[0].status, "pending");
    }
}
