//! Search agent: a model node and a tools node looping over shared,
//! per-thread checkpointed state.

pub mod checkpoint;
pub mod guard;
pub mod prompt;
pub mod registry;
pub mod runtime;
pub mod state;

pub use checkpoint::{Checkpointer, MemorySaver};
pub use guard::{apply_step_guard, STEP_REFUSAL};
pub use registry::{get_agent, list_agents, DEFAULT_AGENT, TAVILY_SEARCH_AGENT};
pub use runtime::{tools_condition, InvokeConfig, Next, Node, SearchAgent};
pub use state::{AgentState, StateUpdate, DEFAULT_STEP_BUDGET};
