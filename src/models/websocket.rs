use serde::{ Serialize, Deserialize };

use crate::models::chat::{ ChatMessage, Role };

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
    #[serde(rename = "quick_reply")] QuickReply {
        label: String,
    },
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "toggle")]
    Toggle,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "message")] Message {
        role: Role,
        text: String,
        timestamp: i64,
    },
    #[serde(rename = "quick_replies")] QuickReplies {
        labels: Vec<String>,
    },
    #[serde(rename = "visibility")] Visibility {
        is_open: bool,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
}

impl From<&ChatMessage> for ServerMessage {
    fn from(message: &ChatMessage) -> Self {
        ServerMessage::Message {
            role: message.role,
            text: message.text.clone(),
            timestamp: message.sent_at.timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_use_type_tag() {
        let chat: ClientMessage = serde_json
            ::from_value(json!({ "type": "chat", "content": "hi" }))
            .unwrap();
        assert_eq!(chat, ClientMessage::Chat { content: "hi".into() });

        let quick: ClientMessage = serde_json
            ::from_value(json!({ "type": "quick_reply", "label": "Main Menu" }))
            .unwrap();
        assert_eq!(quick, ClientMessage::QuickReply { label: "Main Menu".into() });

        let toggle: ClientMessage = serde_json::from_value(json!({ "type": "toggle" })).unwrap();
        assert_eq!(toggle, ClientMessage::Toggle);
    }

    #[test]
    fn server_message_serializes_role_lowercase() {
        let msg = ServerMessage::Message {
            role: Role::Bot,
            text: "hello".into(),
            timestamp: 42,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "message", "role": "bot", "text": "hello", "timestamp": 42 })
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"dance"}"#).is_err());
    }
}
