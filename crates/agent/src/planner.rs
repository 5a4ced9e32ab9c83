use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use ibp_core::config::MemoryConfig;
use ibp_core::contract::{parse_model_response, ContractViolation, PlanPayload};
use ibp_core::{ActionItem, BusinessPlan, ChainSnapshot, PlanId, WhatIfScenario};

use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::store::ConversationStore;

/// ReAct format contract sent as the system turn of every model request.
const SYSTEM_PROMPT: &str = r#"You are an intelligent business planning agent using the ReAct (Reasoning+Acting) pattern.
For each query:
1. Observe: Analyze the current situation
2. Think: Reason about implications and possibilities
3. Act: Suggest concrete actions
4. Reflect: Evaluate outcomes and adjust
5. If the prompt starts with what if or concludes to be a what-if analysis, analyse the previous original plan proposed based on the prompt of the user. Keep the same format of the output always
Format your response as:
{
    "reasoning_chain": [
        {
            "observation": "what you observe",
            "thought": "your reasoning",
            "action": "suggested action",
            "result": "expected outcome"
        }
    ],
    "business_plan": {
        "title": "plan title",
        "summary": "executive summary",
        "actions": [
            {
                "description": "action description",
                "priority": "HIGH|MEDIUM|LOW",
                "impact": {"area": "impact"},
                "dependencies": ["dependency1"],
                "timeline": "timeline"
            }
        ],
        "metrics": {"metric1": "value1"},
        "what_if_scenarios": [
            {
                "description": "scenario description",
                "assumptions": {"assumption1": "value1"},
                "impact_areas": ["area1", "area2"],
                "probability": 0.8
            }
        ]
    }
}"#;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no active plan found for this conversation")]
    NoActivePlan,
    #[error(transparent)]
    Model(#[from] LlmError),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error("internal serialization failure: {0}")]
    Serialization(String),
}

/// Successful outcome of one agent entry point.
#[derive(Clone, Debug, Serialize)]
pub struct QueryResponse {
    pub conversation_id: Uuid,
    pub reasoning_chain: ChainSnapshot,
    pub plan_markdown: String,
    #[serde(rename = "raw_plan")]
    pub plan: BusinessPlan,
}

/// Typed failure carried back to the boundary instead of raising. Holds the
/// best-effort chain snapshot so callers still see accumulated reasoning.
#[derive(Debug)]
pub struct QueryFailure {
    pub conversation_id: Uuid,
    pub error: AgentError,
    pub chain: Option<ChainSnapshot>,
}

/// The main reasoning agent: owns every conversation's chain, plan, and
/// memory window (through the store) and runs one model round-trip per call.
pub struct PlanningAgent {
    client: Box<dyn LlmClient>,
    store: ConversationStore,
}

impl PlanningAgent {
    pub fn new(client: Box<dyn LlmClient>, memory: &MemoryConfig) -> Self {
        Self {
            client,
            store: ConversationStore::new(memory.max_conversations, memory.window_turns),
        }
    }

    /// Process one natural-language query within a conversation. A missing
    /// conversation id starts a new conversation; `continue_reasoning`
    /// replays the full prior trace into the prompt.
    pub async fn process_query(
        &self,
        query: &str,
        conversation_id: Option<Uuid>,
        continue_reasoning: bool,
    ) -> Result<QueryResponse, QueryFailure> {
        let conversation_id = conversation_id.unwrap_or_else(Uuid::new_v4);
        let entry = self.store.get_or_create(conversation_id).await;
        let mut state = entry.lock().await;

        state.memory.push(ChatMessage::user(query));

        let prompt = if continue_reasoning {
            let snapshot = state.chain.snapshot();
            let serialized = match serde_json::to_string(&snapshot) {
                Ok(serialized) => serialized,
                Err(source) => {
                    return Err(failure(
                        conversation_id,
                        AgentError::Serialization(source.to_string()),
                        Some(snapshot),
                    ));
                }
            };
            format!(
                "Previous reasoning steps: {serialized}\nNew query: {query}\nContinue the reasoning process and update the business plan accordingly."
            )
        } else {
            query.to_string()
        };

        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        messages.extend(state.memory.replay().cloned());
        messages.push(ChatMessage::user(prompt));

        let raw = match self.client.complete(&messages).await {
            Ok(raw) => raw,
            Err(source) => {
                return Err(failure(
                    conversation_id,
                    AgentError::Model(source),
                    Some(state.chain.snapshot()),
                ));
            }
        };

        let response = match parse_model_response(&raw) {
            Ok(response) => response,
            Err(violation) => {
                return Err(failure(
                    conversation_id,
                    AgentError::Contract(violation),
                    Some(state.chain.snapshot()),
                ));
            }
        };

        for step in response.reasoning_chain {
            state.chain.add_step(step.observation, step.thought, step.action, step.result);
        }

        // The plan is fully replaced each turn, but its identity survives:
        // the prior plan's id is reused when one exists.
        let prior = state.plan.take();
        let plan_id = prior.as_ref().map(|plan| plan.id).unwrap_or_else(PlanId::generate);
        if let Some(prior) = &prior {
            if !prior.what_if_scenarios.is_empty() {
                warn!(
                    conversation_id = %conversation_id,
                    dropped_scenarios = prior.what_if_scenarios.len(),
                    "plan replacement discards scenarios accumulated by prior what-if analyses"
                );
            }
        }

        let plan = build_plan(plan_id, response.business_plan);
        let plan_markdown = plan.to_markdown();
        state.plan = Some(plan.clone());

        state.memory.push(ChatMessage::assistant(raw));

        Ok(QueryResponse {
            conversation_id,
            reasoning_chain: state.chain.snapshot(),
            plan_markdown,
            plan,
        })
    }

    /// Append hypothetical scenarios to the conversation's active plan. Fails
    /// with [`AgentError::NoActivePlan`] until `process_query` has produced a
    /// plan for this conversation.
    pub async fn what_if_analysis(
        &self,
        conversation_id: Uuid,
        scenario_description: &str,
        assumptions: &BTreeMap<String, serde_json::Value>,
    ) -> Result<QueryResponse, QueryFailure> {
        let Some(entry) = self.store.get(conversation_id).await else {
            return Err(failure(conversation_id, AgentError::NoActivePlan, None));
        };
        let mut state = entry.lock().await;

        let Some(current_plan) = state.plan.as_ref().map(BusinessPlan::to_markdown) else {
            return Err(failure(
                conversation_id,
                AgentError::NoActivePlan,
                Some(state.chain.snapshot()),
            ));
        };

        let assumptions_json = serde_json::Value::Object(
            assumptions.iter().map(|(key, value)| (key.clone(), value.clone())).collect(),
        )
        .to_string();
        let prompt = format!(
            "Analyze this what-if scenario for the existing plan:\nScenario: {scenario_description}\nAssumptions: {assumptions_json}\nCurrent plan: {current_plan}\nAnalyze the implications and suggest plan adjustments."
        );

        state.memory.push(ChatMessage::user(prompt.clone()));

        let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let raw = match self.client.complete(&messages).await {
            Ok(raw) => raw,
            Err(source) => {
                return Err(failure(
                    conversation_id,
                    AgentError::Model(source),
                    Some(state.chain.snapshot()),
                ));
            }
        };

        let response = match parse_model_response(&raw) {
            Ok(response) => response,
            Err(violation) => {
                return Err(failure(
                    conversation_id,
                    AgentError::Contract(violation),
                    Some(state.chain.snapshot()),
                ));
            }
        };

        for step in response.reasoning_chain {
            state.chain.add_step(step.observation, step.thought, step.action, step.result);
        }

        // Scenarios accumulate; actions, metrics, and the plan id stay as
        // they are.
        let plan = match state.plan.as_mut() {
            Some(plan) => {
                for scenario in response.business_plan.what_if_scenarios {
                    plan.what_if_scenarios.push(WhatIfScenario::new(
                        scenario.description,
                        scenario.assumptions,
                        scenario.impact_areas,
                        scenario.probability,
                    ));
                }
                plan.clone()
            }
            None => {
                return Err(failure(
                    conversation_id,
                    AgentError::NoActivePlan,
                    Some(state.chain.snapshot()),
                ));
            }
        };

        state.memory.push(ChatMessage::assistant(raw));

        Ok(QueryResponse {
            conversation_id,
            reasoning_chain: state.chain.snapshot(),
            plan_markdown: plan.to_markdown(),
            plan,
        })
    }

    pub async fn conversation_count(&self) -> usize {
        self.store.len().await
    }
}

fn failure(
    conversation_id: Uuid,
    error: AgentError,
    chain: Option<ChainSnapshot>,
) -> QueryFailure {
    error!(conversation_id = %conversation_id, error = %error, "query processing failed");
    QueryFailure { conversation_id, error, chain }
}

fn build_plan(id: PlanId, payload: PlanPayload) -> BusinessPlan {
    let actions = payload
        .actions
        .into_iter()
        .map(|action| {
            ActionItem::new(
                action.description,
                action.priority,
                action.impact,
                action.dependencies,
                action.timeline,
            )
        })
        .collect();

    let scenarios = payload
        .what_if_scenarios
        .into_iter()
        .map(|scenario| {
            WhatIfScenario::new(
                scenario.description,
                scenario.assumptions,
                scenario.impact_areas,
                scenario.probability,
            )
        })
        .collect();

    BusinessPlan::new(id, payload.title, payload.summary, actions, payload.metrics, scenarios)
}
