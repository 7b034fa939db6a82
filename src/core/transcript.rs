use serde::{Deserialize, Serialize};

use crate::api::ChatMessage;

/// Instructions sent as the leading system message of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a general-purpose AI assistant. \
Answer as concisely as you can. If you do not know the answer, say so \
plainly instead of guessing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: content.into(),
        }
    }
}

/// The ordered conversation log sent to the remote API.
///
/// Always begins with exactly one system message. Mutated only by appending
/// user/assistant turns or by a full reset; turns are never edited in place.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript {
            messages: vec![Message::new(Role::System, SYSTEM_PROMPT)],
        }
    }

    /// Drop all turns and start over from the system message.
    pub fn reset(&mut self) {
        self.messages = vec![Message::new(Role::System, SYSTEM_PROMPT)];
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::new(Role::Assistant, content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The wire-format view handed to the chat-completions request.
    pub fn to_wire(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|msg| ChatMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
