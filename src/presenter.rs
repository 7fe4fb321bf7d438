use async_trait::async_trait;

use crate::models::chat::ChatMessage;

/// Display side of a chat session. The session calls it after every change to
/// the conversation; implementations decide how (and whether) to render.
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn display_message(&self, message: &ChatMessage);

    async fn display_quick_replies(&self, labels: &[&'static str]);

    async fn display_visibility(&self, _is_open: bool) {}
}
