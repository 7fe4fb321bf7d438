use clap::Parser;
use std::num::NonZeroU32;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Platform Link Args ---
    /// Base URL of the CapitalX platform; page URLs are built by appending each page path.
    /// Overrides the base_url from --links-path when both are given.
    #[arg(long, env = "PLATFORM_BASE_URL")]
    pub base_url: Option<String>,

    /// Optional JSON file with { "base_url": ..., "paths": { "<page>": "<path>" } }.
    #[arg(long, env = "LINKS_PATH")]
    pub links_path: Option<String>,

    // --- Response Args ---
    /// Optional JSON file overriding the greeting, fallback or per-topic response templates.
    #[arg(long, env = "RESPONSES_PATH")]
    pub responses_path: Option<String>,

    /// Delay in milliseconds before a bot reply is shown.
    #[arg(long, env = "REPLY_DELAY_MS", default_value = "500")]
    pub reply_delay_ms: u64,

    // --- Front-end Args ---
    /// Chat in the terminal instead of starting the servers.
    #[arg(short = 'i', long, env = "INTERACTIVE", default_value = "false")]
    pub interactive: bool,

    /// Host address and port for the WebSocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Port for the HTTP JSON API. The API is disabled when unset.
    #[arg(long, env = "HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Maximum new WebSocket connections accepted per second.
    #[arg(long, env = "MAX_CONNECTIONS_PER_SECOND", default_value = "10")]
    pub max_connections_per_second: NonZeroU32,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
