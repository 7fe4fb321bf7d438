use crate::agent::{ Assistant, ChatSession };
use crate::intent::quick_reply;
use crate::models::chat::ChatMessage;
use crate::models::websocket::{ ClientMessage, ServerMessage };
use crate::presenter::Presenter;

use std::error::Error;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::io::{ AsyncRead, AsyncWrite };
use tokio::sync::mpsc;

use tokio_tungstenite::{ accept_async, WebSocketStream };
use tokio_tungstenite::tungstenite::protocol::Message;

use governor::{ RateLimiter, Quota };
use async_trait::async_trait;
use log::{ info, warn, error, debug };
use futures::{ SinkExt, StreamExt };

const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;

type Outbound = mpsc::UnboundedSender<Message>;

fn to_frame(msg: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(Message::Text(json)),
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            None
        }
    }
}

fn send_event(outbound: &Outbound, peer: SocketAddr, msg: &ServerMessage) {
    if let Some(frame) = to_frame(msg) {
        if outbound.send(frame).is_err() {
            debug!("Writer for {} already closed, dropping {:?}", peer, msg);
        }
    }
}

/// Pushes conversation events to the browser widget as JSON frames.
pub struct WebSocketPresenter {
    peer: SocketAddr,
    outbound: Outbound,
}

#[async_trait]
impl Presenter for WebSocketPresenter {
    async fn display_message(&self, message: &ChatMessage) {
        send_event(&self.outbound, self.peer, &ServerMessage::from(message));
    }

    async fn display_quick_replies(&self, labels: &[&'static str]) {
        let msg = ServerMessage::QuickReplies {
            labels: labels
                .iter()
                .map(|l| l.to_string())
                .collect(),
        };
        send_event(&self.outbound, self.peer, &msg);
    }

    async fn display_visibility(&self, is_open: bool) {
        send_event(&self.outbound, self.peer, &ServerMessage::Visibility { is_open });
    }
}

pub async fn start_ws_server(
    addr: &str,
    assistant: Assistant,
    max_connections_per_second: NonZeroU32
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: {}", addr);

    let limiter = RateLimiter::direct(Quota::per_second(max_connections_per_second));

    loop {
        let (stream, peer) = listener.accept().await?;

        if limiter.check().is_err() {
            warn!("Global connection rate limit exceeded for {}. Dropping connection.", peer);
            continue;
        }

        info!("Incoming connection from: {}", peer);
        let assistant = assistant.clone();

        tokio::spawn(async move {
            match accept_async(stream).await {
                Ok(ws) => handle_connection(peer, ws, assistant).await,
                Err(e) => error!("Handshake failed for {}: {}", peer, e),
            }
        });
    }
}

/// Runs one widget session over an accepted WebSocket until the peer leaves.
pub async fn handle_connection<S>(peer: SocketAddr, websocket: WebSocketStream<S>, assistant: Assistant)
    where S: AsyncRead + AsyncWrite + Unpin + Send + 'static
{
    info!("New WebSocket connection: {}", peer);
    let (mut tx, mut rx) = websocket.split();
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if let Err(e) = tx.send(frame).await {
                debug!("Error sending frame to {}: {}", peer, e);
                break;
            }
        }
        let _ = tx.close().await;
    });

    let presenter = Arc::new(WebSocketPresenter { peer, outbound: outbound.clone() });
    let session = assistant.new_session(presenter).await;
    info!("Assigned conversation ID {} to {}", session.id(), peer);

    while let Some(msg) = rx.next().await {
        match msg {
            Ok(message) => {
                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    send_event(&outbound, peer, &(ServerMessage::Error {
                        message: "Message too large".to_string(),
                    }));
                    break;
                }

                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handle_client_message(&session, &outbound, peer, client_msg).await;
                            }
                            Err(e) => {
                                error!("Failed to parse message from {}: {}", peer, e);
                                send_event(&outbound, peer, &(ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                }));
                            }
                        }
                    }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        break;
                    }
                    Message::Ping(ping_data) => {
                        if outbound.send(Message::Pong(ping_data)).is_err() {
                            error!("Failed to send pong to {}", peer);
                            break;
                        }
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {}
                }
            }
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        }
    }

    let conversation_id = session.id().to_string();
    session.shutdown().await;
    drop(outbound);
    if let Err(e) = writer.await {
        error!("Writer task for {} failed: {}", peer, e);
    }
    info!("WebSocket connection closed for {} (Conv ID: {})", peer, conversation_id);
}

async fn handle_client_message(
    session: &ChatSession,
    outbound: &Outbound,
    peer: SocketAddr,
    msg: ClientMessage
) {
    match msg {
        ClientMessage::Chat { content } => {
            if session.send(&content).await.is_none() {
                debug!("Ignored blank chat message from {}", peer);
            }
        }
        ClientMessage::QuickReply { label } => {
            if quick_reply::find(&label).is_none() {
                warn!("Unknown quick reply '{}' from {}", label, peer);
                send_event(outbound, peer, &(ServerMessage::Error {
                    message: format!("Unknown quick reply: {}", label),
                }));
                return;
            }
            session.select_quick_reply(&label).await;
        }
        ClientMessage::Open => {
            session.open().await;
        }
        ClientMessage::Close => {
            session.close().await;
        }
        ClientMessage::Toggle => {
            session.toggle().await;
        }
    }
}
