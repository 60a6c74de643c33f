//! Chat session entities - conversations with the DSA assistant
//!
//! Sessions live in the key/value store as one JSON array per user.

use crate::llm::{ChatRole, LlmMessage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SESSION_TITLE: &str = "New chat";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

impl From<&ChatMessage> for LlmMessage {
    fn from(value: &ChatMessage) -> Self {
        LlmMessage {
            role: value.role,
            content: value.content.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message; the first user message names an untitled session
    pub fn push(&mut self, message: ChatMessage) {
        if self.title == DEFAULT_SESSION_TITLE && message.role == ChatRole::User {
            let title: String = message.content.trim().chars().take(40).collect();
            if !title.is_empty() {
                self.title = title;
            }
        }
        self.updated_at = message.timestamp;
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_user_message_names_default_session() {
        let mut session = ChatSession::new(None);
        session.push(ChatMessage::new(ChatRole::User, "How does quicksort partition an array around a pivot?"));
        assert_eq!(session.title, "How does quicksort partition an array ar");
        session.push(ChatMessage::new(ChatRole::User, "second"));
        assert_eq!(session.title.chars().count(), 40);
    }

    #[test]
    fn explicit_title_is_kept() {
        let mut session = ChatSession::new(Some("Heaps".to_string()));
        session.push(ChatMessage::new(ChatRole::User, "hello"));
        assert_eq!(session.title, "Heaps");
    }

    #[test]
    fn blank_title_falls_back_to_default() {
        assert_eq!(ChatSession::new(Some("   ".to_string())).title, DEFAULT_SESSION_TITLE);
    }
}
