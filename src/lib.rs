pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod cli;
pub mod history;
pub mod intent;
pub mod presenter;
pub mod terminal;

use agent::Assistant;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Base URL: {}", args.base_url.as_deref().unwrap_or("(from links file or default)"));
    info!("Links Path: {}", args.links_path.as_deref().unwrap_or("(built-in)"));
    info!("Responses Path: {}", args.responses_path.as_deref().unwrap_or("(built-in)"));
    info!("Reply Delay: {}ms", args.reply_delay_ms);
    info!("Interactive: {}", args.interactive);
    if !args.interactive {
        info!("Server Address: {}", args.server_addr);
        info!("HTTP Port: {:?}", args.http_port);
        info!("Max Connections/s: {}", args.max_connections_per_second);
    }
    info!("-------------------------");

    let assistant = Assistant::from_args(&args)?;

    if args.interactive {
        return terminal::run_repl(assistant).await;
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, assistant, args);
    server.run().await?;

    Ok(())
}
