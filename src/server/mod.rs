pub mod api;
pub mod websocket;

use crate::agent::Assistant;
use crate::cli::Args;
use std::error::Error;

pub struct Server {
    addr: String,
    assistant: Assistant,
    args: Args,
}

impl Server {
    pub fn new(addr: String, assistant: Assistant, args: Args) -> Self {
        Self {
            addr,
            assistant,
            args,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(http_port) = self.args.http_port {
            api::start_http_server(http_port, self.assistant.clone()).await?;
        }

        websocket::start_ws_server(
            &self.addr,
            self.assistant.clone(),
            self.args.max_connections_per_second
        ).await
    }
}
