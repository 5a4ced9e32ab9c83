//! Agent runtime: the main planning agent and its collaborators.
//!
//! The planning agent owns all per-conversation state (reasoning chain,
//! active plan, memory window) through a bounded [`store::ConversationStore`]
//! and runs exactly one model round-trip per query. Failures never raise past
//! the agent; they come back as typed [`planner::QueryFailure`] values for
//! the boundary to render.

pub mod domains;
pub mod llm;
pub mod memory;
pub mod openai;
pub mod planner;
pub mod store;

pub use llm::{ChatMessage, LlmClient, LlmError, Role};
pub use openai::OpenAiCompatClient;
pub use planner::{AgentError, PlanningAgent, QueryFailure, QueryResponse};
pub use store::{ConversationState, ConversationStore};
