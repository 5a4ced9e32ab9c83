use std::collections::VecDeque;

use crate::llm::ChatMessage;

/// Sliding window over the most recent chat turns of one conversation.
/// Bounds the prompt replayed into each model request; it does not bound the
/// reasoning chain, which is never trimmed.
#[derive(Clone, Debug)]
pub struct ConversationMemory {
    turns: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ConversationMemory {
    /// `window_turns` counts user/assistant exchanges; each exchange is two
    /// messages in the window.
    pub fn new(window_turns: usize) -> Self {
        let capacity = window_turns.max(1) * 2;
        Self { turns: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, message: ChatMessage) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(message);
    }

    pub fn replay(&self) -> impl Iterator<Item = &ChatMessage> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::llm::ChatMessage;

    use super::ConversationMemory;

    #[test]
    fn keeps_messages_in_insertion_order() {
        let mut memory = ConversationMemory::new(5);
        memory.push(ChatMessage::user("first"));
        memory.push(ChatMessage::assistant("second"));

        let contents: Vec<_> = memory.replay().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn drops_oldest_turns_beyond_the_window() {
        let mut memory = ConversationMemory::new(1);
        memory.push(ChatMessage::user("q1"));
        memory.push(ChatMessage::assistant("a1"));
        memory.push(ChatMessage::user("q2"));

        assert_eq!(memory.len(), 2);
        let contents: Vec<_> = memory.replay().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a1", "q2"]);
    }

    #[test]
    fn zero_window_still_holds_one_turn() {
        let mut memory = ConversationMemory::new(0);
        memory.push(ChatMessage::user("q"));
        memory.push(ChatMessage::assistant("a"));
        assert_eq!(memory.len(), 2);
    }
}
