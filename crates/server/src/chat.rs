//! Chat boundary in front of the planning agent.
//!
//! - `POST /chat`    — process a natural-language query
//! - `POST /what-if` — run a what-if analysis against the active plan
//!
//! Input validation failures are 400 with a specific message. Upstream model
//! and state-precondition failures come back from the agent as typed payloads
//! and are surfaced inside the `response` envelope with HTTP 200; the
//! transport does not distinguish them from success.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use ibp_agent::{PlanningAgent, QueryFailure, QueryResponse};

#[derive(Clone)]
pub struct ChatState {
    agent: Arc<PlanningAgent>,
}

pub fn router(agent: Arc<PlanningAgent>) -> Router {
    Router::new()
        .route("/chat", post(handle_chat))
        .route("/what-if", post(handle_what_if))
        .with_state(ChatState { agent })
}

async fn handle_chat(
    State(state): State<ChatState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Ok(Json(body)) = payload else {
        return bad_request("No data provided");
    };

    let Some(message_field) = body.get("message") else {
        return bad_request("No message field in request");
    };
    let Some(message) = message_field.as_str() else {
        return bad_request("Message must be a string");
    };
    if message.trim().is_empty() {
        return bad_request("Message cannot be empty");
    }

    let conversation_id = match parse_conversation_id(&body) {
        Ok(conversation_id) => conversation_id,
        Err(response) => return response,
    };
    let continue_reasoning =
        body.get("continue_reasoning").and_then(Value::as_bool).unwrap_or(false);

    info!(
        event_name = "chat.request.received",
        preview = %truncate(message, 100),
        continue_reasoning,
        "received chat request"
    );

    let started = Instant::now();
    let outcome = state.agent.process_query(message, conversation_id, continue_reasoning).await;
    respond(outcome, started)
}

async fn handle_what_if(
    State(state): State<ChatState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Ok(Json(body)) = payload else {
        return bad_request("No data provided");
    };

    let conversation_id = match parse_conversation_id(&body) {
        Ok(Some(conversation_id)) => conversation_id,
        Ok(None) => return bad_request("No conversation_id field in request"),
        Err(response) => return response,
    };

    let Some(scenario) = body.get("scenario").and_then(Value::as_str) else {
        return bad_request("No scenario field in request");
    };
    if scenario.trim().is_empty() {
        return bad_request("Scenario cannot be empty");
    }

    let assumptions: std::collections::BTreeMap<String, Value> = match body.get("assumptions") {
        None => Default::default(),
        Some(Value::Object(map)) => {
            map.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
        }
        Some(_) => return bad_request("Assumptions must be an object"),
    };

    info!(
        event_name = "chat.what_if.received",
        conversation_id = %conversation_id,
        preview = %truncate(scenario, 100),
        "received what-if request"
    );

    let started = Instant::now();
    let outcome = state.agent.what_if_analysis(conversation_id, scenario, &assumptions).await;
    respond(outcome, started)
}

fn respond(
    outcome: Result<QueryResponse, QueryFailure>,
    started: Instant,
) -> (StatusCode, Json<Value>) {
    let processing_time = started.elapsed().as_secs_f64();

    let response = match outcome {
        Ok(response) => {
            info!(
                event_name = "chat.request.processed",
                conversation_id = %response.conversation_id,
                processing_time,
                "request processed"
            );
            match serde_json::to_value(&response) {
                Ok(value) => value,
                Err(error) => return internal_error(&error.to_string()),
            }
        }
        Err(failure) => failure_payload(failure),
    };

    let envelope = json!({
        "response": response,
        "status": "success",
        "processing_time": processing_time,
    });
    (StatusCode::OK, Json(envelope))
}

// The agent already logged the failure; here it only gets rendered.
fn failure_payload(failure: QueryFailure) -> Value {
    let mut payload = json!({
        "conversation_id": failure.conversation_id,
        "error": failure.error.to_string(),
    });
    if let Some(chain) = failure.chain {
        if let Ok(chain) = serde_json::to_value(&chain) {
            payload["reasoning_chain"] = chain;
        }
    }
    payload
}

fn parse_conversation_id(body: &Value) -> Result<Option<Uuid>, (StatusCode, Json<Value>)> {
    match body.get("conversation_id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => match raw.parse::<Uuid>() {
            Ok(conversation_id) => Ok(Some(conversation_id)),
            Err(_) => Err(bad_request("conversation_id must be a valid UUID")),
        },
        Some(_) => Err(bad_request("conversation_id must be a string")),
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    warn!(event_name = "chat.request.rejected", reason = message, "rejected chat request");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message, "status": "error" })))
}

fn internal_error(detail: &str) -> (StatusCode, Json<Value>) {
    tracing::error!(event_name = "chat.request.failed", detail, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "An error occurred processing your request", "status": "error" })),
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
