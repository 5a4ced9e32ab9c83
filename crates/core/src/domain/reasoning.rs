use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepId(pub Uuid);

impl StepId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// One observation/thought/action/result tuple produced by the model.
/// Immutable once appended to a chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub id: StepId,
    pub observation: String,
    pub thought: String,
    pub action: Option<String>,
    pub result: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ReasoningStep {
    pub fn new(
        observation: impl Into<String>,
        thought: impl Into<String>,
        action: Option<String>,
        result: Option<String>,
    ) -> Self {
        Self {
            id: StepId::generate(),
            observation: observation.into(),
            thought: thought.into(),
            action,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only reasoning trace scoped to one conversation. Steps are kept in
/// insertion order and never mutated, trimmed, or reordered.
#[derive(Clone, Debug, PartialEq)]
pub struct ReasoningChain {
    start_time: DateTime<Utc>,
    steps: Vec<ReasoningStep>,
    context: BTreeMap<String, serde_json::Value>,
}

impl ReasoningChain {
    pub fn new() -> Self {
        Self { start_time: Utc::now(), steps: Vec::new(), context: BTreeMap::new() }
    }

    pub fn add_step(
        &mut self,
        observation: impl Into<String>,
        thought: impl Into<String>,
        action: Option<String>,
        result: Option<String>,
    ) -> StepId {
        let step = ReasoningStep::new(observation, thought, action, result);
        let id = step.id;
        self.steps.push(step);
        id
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    pub fn context_mut(&mut self) -> &mut BTreeMap<String, serde_json::Value> {
        &mut self.context
    }

    /// Read-only projection served to callers and, when reasoning continues,
    /// serialized back into the next prompt.
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            start_time: self.start_time,
            steps: self.steps.clone(),
            context: self.context.clone(),
        }
    }
}

impl Default for ReasoningChain {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub start_time: DateTime<Utc>,
    pub steps: Vec<ReasoningStep>,
    pub context: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::ReasoningChain;

    #[test]
    fn add_step_appends_in_order_and_returns_fresh_ids() {
        let mut chain = ReasoningChain::new();
        let first = chain.add_step("low stock", "reorder soon", None, None);
        let second =
            chain.add_step("supplier delay", "expedite", Some("call supplier".into()), None);

        assert_ne!(first, second);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.steps()[0].id, first);
        assert_eq!(chain.steps()[1].id, second);
        assert_eq!(chain.steps()[0].observation, "low stock");
        assert_eq!(chain.steps()[1].action.as_deref(), Some("call supplier"));
    }

    #[test]
    fn snapshot_reflects_steps_without_mutating_chain() {
        let mut chain = ReasoningChain::new();
        chain.add_step("obs", "thought", None, None);

        let before = chain.snapshot();
        chain.add_step("obs2", "thought2", None, None);
        let after = chain.snapshot();

        assert_eq!(before.steps.len(), 1);
        assert_eq!(after.steps.len(), 2);
        // existing steps are untouched by later appends
        assert_eq!(before.steps[0], after.steps[0]);
        assert_eq!(before.start_time, after.start_time);
    }
}
