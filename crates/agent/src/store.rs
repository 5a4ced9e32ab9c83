use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use ibp_core::{BusinessPlan, ReasoningChain};

use crate::memory::ConversationMemory;

/// Everything the agent tracks for one conversation id. Guarded by a
/// per-conversation mutex so concurrent requests for the same conversation
/// serialize instead of racing on chain-append and plan-replace.
#[derive(Debug)]
pub struct ConversationState {
    pub chain: ReasoningChain,
    pub plan: Option<BusinessPlan>,
    pub memory: ConversationMemory,
}

impl ConversationState {
    fn new(window_turns: usize) -> Self {
        Self {
            chain: ReasoningChain::new(),
            plan: None,
            memory: ConversationMemory::new(window_turns),
        }
    }
}

/// Bounded registry of conversations with least-recently-used eviction.
///
/// The registry lock is held only while resolving an id to its entry; the
/// model round-trip happens under the entry's own lock, so slow requests for
/// one conversation never block the others.
pub struct ConversationStore {
    inner: Mutex<StoreInner>,
    window_turns: usize,
}

struct StoreInner {
    entries: HashMap<Uuid, Arc<Mutex<ConversationState>>>,
    // most recently used at the back
    order: Vec<Uuid>,
    capacity: usize,
}

impl ConversationStore {
    pub fn new(max_conversations: usize, window_turns: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: HashMap::new(),
                order: Vec::new(),
                capacity: max_conversations.max(1),
            }),
            window_turns,
        }
    }

    /// Resolve a conversation, creating empty state on first use. Touching a
    /// conversation marks it most recently used; inserting past capacity
    /// evicts the least recently used conversation wholesale.
    pub async fn get_or_create(&self, id: Uuid) -> Arc<Mutex<ConversationState>> {
        let mut inner = self.inner.lock().await;

        if let Some(entry) = inner.entries.get(&id).cloned() {
            touch(&mut inner.order, id);
            return entry;
        }

        if inner.entries.len() >= inner.capacity {
            if let Some(evicted) = inner.order.first().copied() {
                inner.order.remove(0);
                inner.entries.remove(&evicted);
                tracing::debug!(conversation_id = %evicted, "evicted least recently used conversation");
            }
        }

        let entry = Arc::new(Mutex::new(ConversationState::new(self.window_turns)));
        inner.entries.insert(id, entry.clone());
        inner.order.push(id);
        entry
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<ConversationState>>> {
        let mut inner = self.inner.lock().await;
        let entry = inner.entries.get(&id).cloned();
        if entry.is_some() {
            touch(&mut inner.order, id);
        }
        entry
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.inner.lock().await.entries.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn touch(order: &mut Vec<Uuid>, id: Uuid) {
    if let Some(position) = order.iter().position(|existing| *existing == id) {
        order.remove(position);
    }
    order.push(id);
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::ConversationStore;

    #[tokio::test]
    async fn creates_state_lazily_and_reuses_it() {
        let store = ConversationStore::new(4, 10);
        let id = Uuid::new_v4();
        assert!(!store.contains(id).await);

        let first = store.get_or_create(id).await;
        first.lock().await.chain.add_step("obs", "thought", None, None);

        let second = store.get_or_create(id).await;
        assert_eq!(second.lock().await.chain.len(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn evicts_least_recently_used_conversation() {
        let store = ConversationStore::new(2, 10);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();

        store.get_or_create(first).await;
        store.get_or_create(second).await;
        // touch `first` so `second` becomes the eviction candidate
        store.get(first).await.expect("first should still be resident");
        store.get_or_create(third).await;

        assert_eq!(store.len().await, 2);
        assert!(store.contains(first).await);
        assert!(!store.contains(second).await);
        assert!(store.contains(third).await);
    }

    #[tokio::test]
    async fn get_misses_do_not_create_state() {
        let store = ConversationStore::new(2, 10);
        assert!(store.get(Uuid::new_v4()).await.is_none());
        assert!(store.is_empty().await);
    }
}
