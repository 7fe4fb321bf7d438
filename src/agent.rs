use crate::cli::Args;
use crate::config::ConfigError;
use crate::config::links::{ LinkConfig, PlatformLinks };
use crate::config::responses::ResponseCatalog;
use crate::history::ConversationState;
use crate::intent::{ IntentDispatcher, Topic };
use crate::intent::quick_reply::{ self, QuickAction, QUICK_REPLIES };
use crate::models::chat::{ ChatMessage, Conversation };
use crate::presenter::Presenter;

use log::{ info, debug, warn };
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{ mpsc, Mutex };
use tokio::task::JoinHandle;
use tokio::time::{ sleep_until, Instant };

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(500);

/// Shared, read-only assistant configuration. Hands out one [`ChatSession`]
/// per page session.
#[derive(Clone)]
pub struct Assistant {
    dispatcher: Arc<IntentDispatcher>,
    reply_delay: Duration,
}

impl Assistant {
    pub fn new(dispatcher: IntentDispatcher, reply_delay: Duration) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            reply_delay,
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut link_config = match &args.links_path {
            Some(path) => LinkConfig::load(path)?,
            None => LinkConfig::default(),
        };
        if let Some(base_url) = args.base_url.as_ref().filter(|u| !u.trim().is_empty()) {
            link_config.base_url = base_url.clone();
        }
        let links = PlatformLinks::from_config(&link_config)?;
        info!("Platform links resolved against base URL: {}", link_config.base_url);

        let catalog = match &args.responses_path {
            Some(path) => ResponseCatalog::load(path)?,
            None => ResponseCatalog::default(),
        };

        Ok(Self::new(IntentDispatcher::new(links, &catalog), Duration::from_millis(args.reply_delay_ms)))
    }

    pub fn dispatcher(&self) -> &Arc<IntentDispatcher> {
        &self.dispatcher
    }

    pub async fn new_session(&self, presenter: Arc<dyn Presenter>) -> ChatSession {
        ChatSession::start(Arc::clone(&self.dispatcher), presenter, self.reply_delay).await
    }
}

struct PendingReply {
    due: Instant,
    topic: Option<Topic>,
    text: String,
}

/// One conversation wired to one presenter.
///
/// Bot replies are appended `reply_delay` after the user message that caused
/// them, followed by that topic's quick replies. Replies fire in send order
/// and a shut down session still delivers whatever is pending.
pub struct ChatSession {
    id: String,
    state: Arc<Mutex<ConversationState>>,
    dispatcher: Arc<IntentDispatcher>,
    presenter: Arc<dyn Presenter>,
    reply_delay: Duration,
    pending: mpsc::UnboundedSender<PendingReply>,
    worker: JoinHandle<()>,
}

impl ChatSession {
    pub async fn start(
        dispatcher: Arc<IntentDispatcher>,
        presenter: Arc<dyn Presenter>,
        reply_delay: Duration
    ) -> Self {
        let state = ConversationState::with_greeting(dispatcher.greeting());
        let id = state.id().to_string();
        for message in state.messages() {
            presenter.display_message(message).await;
        }
        presenter.display_quick_replies(&quick_reply::labels(&QUICK_REPLIES)).await;

        let state = Arc::new(Mutex::new(state));
        let (pending, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(
            deliver_replies(rx, Arc::clone(&state), Arc::clone(&presenter))
        );
        info!("Started chat session {}", id);

        Self {
            id,
            state,
            dispatcher,
            presenter,
            reply_delay,
            pending,
            worker,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Records a user message and schedules the bot reply. Blank input is a
    /// no-op: nothing is appended and the dispatcher is not consulted.
    pub async fn send(&self, text: &str) -> Option<ChatMessage> {
        let mut state = self.state.lock().await;
        let message = state.append_user_message(text)?;
        self.presenter.display_message(&message).await;
        drop(state);

        let (topic, response) = self.dispatcher.dispatch(&message.text);
        let reply = PendingReply {
            due: Instant::now() + self.reply_delay,
            topic,
            text: response.to_string(),
        };
        if self.pending.send(reply).is_err() {
            warn!("Reply worker for session {} is gone; reply dropped", self.id);
        }
        Some(message)
    }

    /// "Main Menu" shows the main set again and sends nothing.
    pub async fn select_quick_reply(&self, label: &str) -> Option<ChatMessage> {
        match quick_reply::find(label).map(|q| q.action) {
            Some(QuickAction::Ask(_)) => self.send(label).await,
            Some(QuickAction::MainMenu) => {
                let _state = self.state.lock().await;
                self.presenter.display_quick_replies(&quick_reply::labels(&QUICK_REPLIES)).await;
                None
            }
            None => {
                debug!("Session {}: unknown quick reply '{}'", self.id, label);
                None
            }
        }
    }

    pub async fn open(&self) -> bool {
        self.set_visibility(ConversationState::open).await
    }

    pub async fn close(&self) -> bool {
        self.set_visibility(ConversationState::close).await
    }

    pub async fn toggle(&self) -> bool {
        self.set_visibility(ConversationState::toggle).await
    }

    async fn set_visibility(&self, change: fn(&mut ConversationState)) -> bool {
        let mut state = self.state.lock().await;
        change(&mut state);
        let is_open = state.is_open();
        self.presenter.display_visibility(is_open).await;
        is_open
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.is_open()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages().to_vec()
    }

    pub async fn snapshot(&self) -> Conversation {
        self.state.lock().await.conversation().clone()
    }

    /// Stops accepting messages and waits for every pending reply to fire.
    pub async fn shutdown(self) {
        let ChatSession { id, pending, worker, .. } = self;
        drop(pending);
        if let Err(e) = worker.await {
            warn!("Reply worker for session {} ended abnormally: {}", id, e);
        }
        info!("Chat session {} finished", id);
    }
}

async fn deliver_replies(
    mut rx: mpsc::UnboundedReceiver<PendingReply>,
    state: Arc<Mutex<ConversationState>>,
    presenter: Arc<dyn Presenter>
) {
    while let Some(reply) = rx.recv().await {
        sleep_until(reply.due).await;
        let mut state = state.lock().await;
        let message = state.append_bot_message(reply.text);
        presenter.display_message(&message).await;
        let follow_ups = quick_reply::labels(quick_reply::follow_ups(reply.topic));
        presenter.display_quick_replies(&follow_ups).await;
    }
}
