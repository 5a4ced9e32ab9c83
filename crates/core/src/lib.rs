pub mod config;
pub mod contract;
pub mod domain;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LlmConfig, LoadOptions, LogFormat};
pub use contract::{parse_model_response, ContractViolation, ModelResponse};
pub use domain::insight::{DomainAnalysis, DomainInsight, DomainPlan, InsightId};
pub use domain::plan::{
    ActionId, ActionItem, BusinessPlan, PlanId, Priority, ScenarioId, WhatIfScenario,
};
pub use domain::reasoning::{ChainSnapshot, ReasoningChain, ReasoningStep, StepId};
