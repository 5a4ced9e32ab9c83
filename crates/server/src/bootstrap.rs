use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;

use ibp_agent::{OpenAiCompatClient, PlanningAgent};
use ibp_core::AppConfig;

use crate::{chat, health};

pub struct App {
    pub config: AppConfig,
    pub agent: Arc<PlanningAgent>,
}

pub fn bootstrap(config: AppConfig) -> Result<App> {
    config.validate_for_serving()?;

    let client =
        OpenAiCompatClient::new(&config.llm).context("failed to build the model client")?;
    let agent = Arc::new(PlanningAgent::new(Box::new(client), &config.memory));

    Ok(App { config, agent })
}

/// Full application router. The dashboard is served from another origin, so
/// CORS stays permissive like the original deployment.
pub fn build_router(agent: Arc<PlanningAgent>) -> Router {
    chat::router(agent).merge(health::router()).layer(CorsLayer::permissive())
}
