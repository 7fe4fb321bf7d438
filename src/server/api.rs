use crate::agent::Assistant;
use crate::config::links::PlatformLinks;
use crate::intent::{ classify, quick_reply, IntentDispatcher, Topic };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{ routing::{ get, post }, Router, extract::State, Json };
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error, debug };

#[derive(Deserialize)]
pub struct RespondRequest {
    pub utterance: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct RespondResponse {
    pub topic: Option<Topic>,
    pub response: String,
}

#[derive(Serialize)]
struct QuickRepliesResponse {
    labels: Vec<&'static str>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<IntentDispatcher>,
}

fn router(dispatcher: Arc<IntentDispatcher>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/quick-replies", get(quick_replies_handler))
        .route("/api/links", get(links_handler))
        .route("/api/respond", post(respond_handler))
        .layer(cors)
        .with_state(AppState { dispatcher })
}

pub async fn start_http_server(
    http_port: u16,
    assistant: Assistant
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = router(Arc::clone(assistant.dispatcher()));

    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    error!("HTTP server error: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            }
        }
    });

    info!("HTTP server started");
    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn quick_replies_handler() -> Json<QuickRepliesResponse> {
    Json(QuickRepliesResponse { labels: quick_reply::labels(&quick_reply::QUICK_REPLIES) })
}

async fn links_handler(State(state): State<AppState>) -> Json<PlatformLinks> {
    Json(state.dispatcher.links().clone())
}

async fn respond_handler(
    State(state): State<AppState>,
    Json(req): Json<RespondRequest>
) -> Json<RespondResponse> {
    let topic = classify(&req.utterance);
    debug!("HTTP respond: topic={:?}", topic);
    Json(RespondResponse {
        topic,
        response: state.dispatcher.respond_to(topic).to_string(),
    })
}
