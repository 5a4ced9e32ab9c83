use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsightId(pub Uuid);

/// One observation produced by a domain agent (logistics, production, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainInsight {
    pub id: InsightId,
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub observation: String,
    pub confidence: f64,
    pub impact: BTreeMap<String, serde_json::Value>,
    pub recommendations: Vec<serde_json::Value>,
}

impl DomainInsight {
    pub fn new(
        category: impl Into<String>,
        observation: impl Into<String>,
        confidence: f64,
        impact: BTreeMap<String, serde_json::Value>,
        recommendations: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            id: InsightId(Uuid::new_v4()),
            timestamp: Utc::now(),
            category: category.into(),
            observation: observation.into(),
            confidence,
            impact,
            recommendations,
        }
    }
}

/// A concrete follow-up action proposed by a domain agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainPlan {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub details: BTreeMap<String, serde_json::Value>,
}

impl DomainPlan {
    pub fn new(action: impl Into<String>, details: BTreeMap<String, serde_json::Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action: action.into(),
            details,
        }
    }
}

/// Result shape shared by every domain agent's `analyze` operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub insights: Vec<DomainInsight>,
    pub plans: Vec<DomainPlan>,
}
