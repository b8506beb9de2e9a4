//! Prompt context assembly.
//!
//! Turns the stored conversation window plus the new user message into the
//! message list sent to the endpoint: the preamble, the agent instruction,
//! then a strictly role-alternating history ending with the user turn.

use lexchat_types::agent::AgentProfile;
use lexchat_types::llm::{Message, MessageRole};

use super::prompt::PREAMBLE;

/// Accumulates messages, merging any message whose role matches the
/// previous one into that previous entry.
#[derive(Debug, Clone, Default)]
pub struct ConversationWindow {
    messages: Vec<Message>,
}

impl ConversationWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `content` under `role`, joining with `"\n"` when the last
    /// entry already has that role.
    pub fn push(&mut self, role: MessageRole, content: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(content);
            }
            _ => self.messages.push(Message::new(role, content)),
        }
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Builds prompts from a bounded slice of history.
#[derive(Debug, Clone, Copy)]
pub struct ContextAssembler {
    window: usize,
}

impl ContextAssembler {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Assemble the endpoint message list.
    ///
    /// `history` is oldest-first; only its last `window` entries are used.
    /// The output starts with exactly two system entries (preamble, agent
    /// instruction) and never has two adjacent entries with the same role
    /// after them. A system entry from history merges into the instruction
    /// entry when it comes first.
    pub fn assemble(
        &self,
        history: &[Message],
        new_message: &str,
        profile: &AgentProfile,
    ) -> Vec<Message> {
        let start = history.len().saturating_sub(self.window);

        let mut folded = ConversationWindow::new();
        folded.push(MessageRole::System, profile.instruction);
        for message in &history[start..] {
            folded.push(message.role, &message.content);
        }
        folded.push(MessageRole::User, new_message);

        let mut messages = Vec::with_capacity(folded.len() + 1);
        messages.push(Message::system(PREAMBLE));
        messages.extend(folded.into_messages());
        messages
    }
}
