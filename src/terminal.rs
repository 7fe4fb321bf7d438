use crate::agent::Assistant;
use crate::history::format_transcript;
use crate::models::chat::{ ChatMessage, Role };
use crate::presenter::Presenter;

use async_trait::async_trait;
use chrono::Local;
use log::info;
use std::error::Error;
use std::sync::{ Arc, Mutex };
use tokio::io::{ AsyncBufReadExt, BufReader };

/// Prints the conversation to stdout and remembers the last quick replies
/// shown so `/q <n>` can refer to them by number.
#[derive(Default)]
pub struct TerminalPresenter {
    shown: Mutex<Vec<&'static str>>,
}

impl TerminalPresenter {
    fn shown_label(&self, number: usize) -> Option<&'static str> {
        let shown = self.shown.lock().ok()?;
        number.checked_sub(1).and_then(|i| shown.get(i).copied())
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn display_message(&self, message: &ChatMessage) {
        let who = match message.role {
            Role::User => "You",
            Role::Bot => "Assistant",
        };
        println!(
            "[{}] {}:\n{}\n",
            message.sent_at.with_timezone(&Local).format("%H:%M:%S"),
            who,
            message.text
        );
    }

    async fn display_quick_replies(&self, labels: &[&'static str]) {
        println!("Quick replies (type /q <number>):");
        for (i, label) in labels.iter().enumerate() {
            println!("  {}. {}", i + 1, label);
        }
        println!();
        if let Ok(mut shown) = self.shown.lock() {
            *shown = labels.to_vec();
        }
    }

    async fn display_visibility(&self, is_open: bool) {
        println!("(chat window {})", if is_open { "open" } else { "closed" });
    }
}

const HELP: &str =
    "Commands: /q <n> quick reply, /open, /close, /toggle, /history, /help, /quit";

/// Line-oriented chat on stdin/stdout. Ends on `/quit` or EOF once every
/// pending reply has been shown.
pub async fn run_repl(assistant: Assistant) -> Result<(), Box<dyn Error + Send + Sync>> {
    let presenter = Arc::new(TerminalPresenter::default());
    let session = assistant.new_session(Arc::clone(&presenter) as Arc<dyn Presenter>).await;
    session.open().await;
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/quit", _) | ("/exit", _) => {
                break;
            }
            ("/help", _) => println!("{}", HELP),
            ("/open", _) => {
                session.open().await;
            }
            ("/close", _) => {
                session.close().await;
            }
            ("/toggle", _) => {
                session.toggle().await;
            }
            ("/history", _) => print!("{}", format_transcript(&session.snapshot().await)),
            ("/q", arg) => {
                match arg.parse::<usize>().ok().and_then(|n| presenter.shown_label(n)) {
                    Some(label) => {
                        session.select_quick_reply(label).await;
                    }
                    None => println!("No quick reply '{}'. {}", arg, HELP),
                }
            }
            _ => {
                session.send(line).await;
            }
        }
    }

    info!("Leaving interactive session");
    session.shutdown().await;
    Ok(())
}
