//! Thread-keyed conversation checkpoints.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::state::AgentState;

/// Storage for per-thread agent state.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Latest saved state for a thread.
    async fn get(&self, thread_id: &str) -> Option<AgentState>;

    /// Replace the saved state for a thread.
    async fn put(&self, thread_id: &str, state: AgentState);

    /// Forget a thread, returning its last state.
    async fn delete(&self, thread_id: &str) -> Option<AgentState>;

    /// Ids of all saved threads.
    async fn thread_ids(&self) -> Vec<String>;
}

/// In-memory checkpointer. State is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySaver {
    threads: RwLock<HashMap<String, AgentState>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn get(&self, thread_id: &str) -> Option<AgentState> {
        self.threads.read().await.get(thread_id).cloned()
    }

    async fn put(&self, thread_id: &str, state: AgentState) {
        self.threads
            .write()
            .await
            .insert(thread_id.to_string(), state);
    }

    async fn delete(&self, thread_id: &str) -> Option<AgentState> {
        self.threads.write().await.remove(thread_id)
    }

    async fn thread_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.threads.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
