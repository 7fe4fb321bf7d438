use chrono::{ DateTime, Utc };
use log::debug;
use uuid::Uuid;

use crate::config::responses::DEFAULT_GREETING;
use crate::models::chat::{ ChatMessage, Conversation, Role };

#[derive(Debug, Clone)]
pub struct ConversationState {
    conversation: Conversation,
}

impl ConversationState {
    pub fn initialize() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            conversation: Conversation {
                id: Uuid::new_v4().to_string(),
                messages: vec![ChatMessage {
                    role: Role::Bot,
                    text: greeting.into(),
                    sent_at: Utc::now(),
                }],
                is_open: false,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.conversation.id
    }

    pub fn is_open(&self) -> bool {
        self.conversation.is_open
    }

    pub fn open(&mut self) {
        self.conversation.is_open = true;
    }

    pub fn close(&mut self) {
        self.conversation.is_open = false;
    }

    pub fn toggle(&mut self) {
        self.conversation.is_open = !self.conversation.is_open;
    }

    pub fn append_user_message(&mut self, text: &str) -> Option<ChatMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("Ignoring blank user message in conversation {}", self.conversation.id);
            return None;
        }
        Some(self.push(Role::User, trimmed.to_string()))
    }

    pub fn append_bot_message(&mut self, text: impl Into<String>) -> ChatMessage {
        self.push(Role::Bot, text.into())
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.conversation.messages
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    fn push(&mut self, role: Role, text: String) -> ChatMessage {
        let message = ChatMessage {
            role,
            text,
            sent_at: self.next_timestamp(),
        };
        self.conversation.messages.push(message.clone());
        message
    }

    // never earlier than the previous entry, even if the wall clock steps back
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.conversation.messages.last() {
            Some(last) if last.sent_at > now => last.sent_at,
            _ => now,
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::initialize()
    }
}

pub fn format_transcript(conversation: &Conversation) -> String {
    let mut result = String::new();
    for msg in &conversation.messages {
        let role_display = match msg.role {
            Role::User => "You",
            Role::Bot => "Assistant",
        };
        result.push_str(
            &format!(
                "[{}] {}: {}\n",
                msg.sent_at.with_timezone(&chrono::Local).format("%H:%M:%S"),
                role_display,
                msg.text
            )
        );
    }
    result
}
