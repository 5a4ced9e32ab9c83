//! Domain-specific agents. Logistics and production are placeholder
//! implementations that fabricate one fixed insight per analysis; only the
//! contract shape is load-bearing, so a real implementation can be
//! substituted later. Sales wraps an opaque forecasting predictor, and the
//! translator is a no-op pass-through.

pub mod logistics;
pub mod production;
pub mod sales;
pub mod translator;

pub use logistics::LogisticsAgent;
pub use production::ProductionAgent;
pub use sales::{Forecaster, SalesAgent};
pub use translator::TranslatorAgent;
