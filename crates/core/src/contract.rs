//! Wire contract with the external model.
//!
//! The model is asked to answer with a single JSON object:
//!
//! ```json
//! {"reasoning_chain": [{"observation", "thought", "action", "result"}, ...],
//!  "business_plan": {"title", "summary", "actions", "metrics", "what_if_scenarios"}}
//! ```
//!
//! Parsing is strict: malformed JSON or a missing required key is a typed
//! [`ContractViolation`], never a raw parse error propagated upward.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::plan::Priority;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ContractViolation {
    #[error("model response is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("model response does not match the expected shape: {0}")]
    SchemaMismatch(String),
    #[error("scenario probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ModelResponse {
    pub reasoning_chain: Vec<StepPayload>,
    pub business_plan: PlanPayload,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StepPayload {
    pub observation: String,
    pub thought: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PlanPayload {
    pub title: String,
    pub summary: String,
    pub actions: Vec<ActionPayload>,
    pub metrics: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub what_if_scenarios: Vec<ScenarioPayload>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ActionPayload {
    pub description: String,
    pub priority: Priority,
    pub impact: BTreeMap<String, serde_json::Value>,
    pub dependencies: Vec<String>,
    pub timeline: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ScenarioPayload {
    pub description: String,
    pub assumptions: BTreeMap<String, serde_json::Value>,
    pub impact_areas: Vec<String>,
    pub probability: f64,
}

/// Parse and validate a raw model completion against the contract.
pub fn parse_model_response(raw: &str) -> Result<ModelResponse, ContractViolation> {
    let body = strip_code_fences(raw);

    let response: ModelResponse = serde_json::from_str(body).map_err(|error| {
        if error.classify() == serde_json::error::Category::Data {
            ContractViolation::SchemaMismatch(error.to_string())
        } else {
            ContractViolation::MalformedJson(error.to_string())
        }
    })?;

    for scenario in &response.business_plan.what_if_scenarios {
        if !(0.0..=1.0).contains(&scenario.probability) || scenario.probability.is_nan() {
            return Err(ContractViolation::ProbabilityOutOfRange(scenario.probability));
        }
    }

    Ok(response)
}

// Models routinely wrap the JSON object in ``` or ```json fences.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_model_response, ContractViolation};

    fn valid_payload() -> String {
        json!({
            "reasoning_chain": [
                {
                    "observation": "Sales dipped 8% in the north region",
                    "thought": "Likely tied to the delayed campaign",
                    "action": "Re-run the campaign",
                    "result": "Recover the lost pipeline"
                }
            ],
            "business_plan": {
                "title": "North Region Recovery",
                "summary": "Recover Q3 pipeline in the north region.",
                "actions": [
                    {
                        "description": "Relaunch regional campaign",
                        "priority": "HIGH",
                        "impact": {"pipeline": "+8%"},
                        "dependencies": ["marketing budget"],
                        "timeline": "4 weeks"
                    }
                ],
                "metrics": {"pipeline_recovered": "8%"},
                "what_if_scenarios": [
                    {
                        "description": "Campaign underperforms",
                        "assumptions": {"uplift": "half of forecast"},
                        "impact_areas": ["sales"],
                        "probability": 0.3
                    }
                ]
            }
        })
        .to_string()
    }

    #[test]
    fn parses_a_contract_conforming_response() {
        let response = parse_model_response(&valid_payload()).expect("payload should parse");

        assert_eq!(response.reasoning_chain.len(), 1);
        assert_eq!(response.reasoning_chain[0].action.as_deref(), Some("Re-run the campaign"));
        assert_eq!(response.business_plan.actions.len(), 1);
        assert_eq!(response.business_plan.what_if_scenarios[0].probability, 0.3);
    }

    #[test]
    fn parses_a_fenced_response() {
        let fenced = format!("```json\n{}\n```", valid_payload());
        assert!(parse_model_response(&fenced).is_ok());
    }

    #[test]
    fn rejects_non_json_as_malformed() {
        let error = parse_model_response("I'd be happy to help with your plan!").unwrap_err();
        assert!(matches!(error, ContractViolation::MalformedJson(_)));
    }

    #[test]
    fn rejects_missing_business_plan_as_schema_mismatch() {
        let error = parse_model_response(r#"{"reasoning_chain": []}"#).unwrap_err();
        assert!(matches!(error, ContractViolation::SchemaMismatch(_)));
    }

    #[test]
    fn rejects_unknown_priority() {
        let payload = valid_payload().replace("\"HIGH\"", "\"URGENT\"");
        let error = parse_model_response(&payload).unwrap_err();
        assert!(matches!(error, ContractViolation::SchemaMismatch(_)));
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let payload = valid_payload().replace("0.3", "1.7");
        let error = parse_model_response(&payload).unwrap_err();
        assert_eq!(error, ContractViolation::ProbabilityOutOfRange(1.7));
    }

    #[test]
    fn missing_scenarios_key_defaults_to_empty() {
        let payload = json!({
            "reasoning_chain": [],
            "business_plan": {
                "title": "T",
                "summary": "S",
                "actions": [],
                "metrics": {}
            }
        })
        .to_string();

        let response = parse_model_response(&payload).expect("scenarios are optional");
        assert!(response.business_plan.what_if_scenarios.is_empty());
    }
}
