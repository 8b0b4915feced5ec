//! Main chat loop orchestration.
//!
//! Wires the HTTP transport, the two storage tiers, the connectivity monitor
//! and (when a Places key is set) the facility locator, then drives the
//! conversation from stdin until `/exit` or end of input.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use console::style;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use healthsync_core::chat::client::{ChatClient, SubmitError};
use healthsync_core::chat::connectivity::ConnectivityMonitor;
use healthsync_infra::chat::probe::HttpHealthProbe;
use healthsync_infra::chat::transport::HttpChatTransport;
use healthsync_infra::storage::{JsonFileStore, SessionStore, open_conversation_persistence};
use healthsync_types::config::GlobalConfig;
use healthsync_types::message::{Message, MessageRole};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use crate::cli::ChatArgs;
use crate::cli::facilities::{build_locator, print_report};

type TerminalChatClient = ChatClient<HttpChatTransport, SessionStore, JsonFileStore>;

/// Facility requests waiting for the locator.
const FACILITY_QUEUE: usize = 4;

/// Run an interactive chat session.
pub async fn run_chat_loop(args: ChatArgs, config: &GlobalConfig, data_dir: &Path) -> anyhow::Result<()> {
    let mut chat_config = config.chat.clone();
    if let Some(endpoint) = args.endpoint {
        chat_config.endpoint = endpoint;
    }
    if let Some(health_url) = args.health_url {
        chat_config.health_url = health_url;
    }

    let mut transport = HttpChatTransport::new(&chat_config.endpoint, chat_config.request_timeout())
        .context("failed to create chat transport")?;
    if let Some(key) = args.api_key.filter(|k| !k.trim().is_empty()) {
        transport = transport.with_api_key(SecretString::from(key));
    }

    let persistence = open_conversation_persistence(data_dir, chat_config.history_limit).await;

    let cancel = CancellationToken::new();
    let probe = HttpHealthProbe::new(&chat_config.health_url, chat_config.probe_timeout())
        .context("failed to create health probe")?;
    let (connectivity, monitor) = ConnectivityMonitor::spawn(
        probe,
        chat_config.health_interval(),
        chat_config.probe_timeout(),
        cancel.clone(),
    );

    let mut client = ChatClient::new(transport, persistence, &chat_config)
        .await
        .with_connectivity(connectivity);

    let locator = build_locator(&args.places, &config.places)?;
    let facilities_enabled = locator.is_some();
    let facility_task = match locator {
        Some(locator) => {
            let (tx, rx) = mpsc::channel(FACILITY_QUEUE);
            client = client.with_facility_channel(tx);
            Some(tokio::spawn(async move {
                locator.serve_requests(rx, |result| print_report(&result)).await;
            }))
        }
        None => None,
    };

    print_welcome_banner(
        &chat_config.endpoint,
        &chat_config.model,
        client.preferences().remember_conversation,
        facilities_enabled,
    );
    print_messages(client.messages());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = commands::parse(input) {
            if !handle_command(command, &mut client).await {
                break;
            }
            continue;
        }

        let outcome = client.submit(input).await;
        render_outcome(outcome);
    }

    cancel.cancel();
    if let Err(e) = monitor.await {
        tracing::warn!(error = %e, "connectivity monitor task failed");
    }
    // Dropping the client closes the facility channel and ends the locator task.
    drop(client);
    if let Some(task) = facility_task {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "facility locator task failed");
        }
    }

    println!("  {}", style("Take care. Goodbye!").dim());
    Ok(())
}

/// Returns `false` when the session should end.
async fn handle_command(command: ChatCommand, client: &mut TerminalChatClient) -> bool {
    match command {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Retry => {
            let outcome = client.retry_last().await;
            render_outcome(outcome);
        }
        ChatCommand::Remember(remember) => match client.set_remember_conversation(remember).await {
            Ok(()) if remember => print_info("Conversation will be remembered between sessions."),
            Ok(()) => print_info("Conversation memory turned off and saved history cleared."),
            Err(e) => print_warning(&format!("Could not save preference: {e}")),
        },
        ChatCommand::Clear => match client.clear().await {
            Ok(()) => {
                print_info("Started a new conversation.");
                print_messages(client.messages());
            }
            Err(e) => print_warning(&format!("Could not clear saved history: {e}")),
        },
        ChatCommand::History => print_messages(client.messages()),
        ChatCommand::Status => {
            let online = if client.is_online() {
                style("online").green()
            } else {
                style("offline").red()
            };
            let remember = if client.preferences().remember_conversation {
                "on"
            } else {
                "off"
            };
            println!();
            println!("  {}   {}", style("Connection:").bold(), online);
            println!("  {}     {}", style("Remember:").bold(), remember);
            println!("  {}     {}", style("Messages:").bold(), client.messages().len());
            println!(
                "  {}      up to {} attempts",
                style("Retries:").bold(),
                client.retry_policy().max_attempts
            );
            println!();
        }
        ChatCommand::Exit => return false,
        ChatCommand::Unknown(cmd) => {
            print_warning(&format!("Unknown command: {cmd}. Type /help for available commands."));
        }
    }
    true
}

fn render_outcome(outcome: Result<Message, SubmitError>) {
    match outcome {
        Ok(reply) => print_message(&reply),
        Err(SubmitError::Rejected(notice)) => print_warning(&notice.text),
        Err(SubmitError::NothingToRetry) => print_warning("There is no message to retry."),
        Err(SubmitError::Failed(err)) => {
            println!();
            println!("  {} {}", style("!").red().bold(), style(&err.message).red());
            if err.retryable {
                println!("  {}", style("Type /retry to try again.").dim());
            }
            println!();
        }
    }
}

fn print_prompt() {
    print!("{} ", style("you >").green().bold());
    let _ = std::io::stdout().flush();
}

fn print_messages(messages: &[Message]) {
    for message in messages.iter().filter(|m| !m.is_pending()) {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    let time = message.timestamp.format("%H:%M");
    match message.role {
        MessageRole::User => {
            println!("  {} {}", style(format!("[{time}] you:")).green().dim(), message.text);
        }
        MessageRole::Assistant if message.is_error() => {
            println!();
            println!("  {} {}", style(format!("[{time}]")).dim(), style(&message.text).red());
            println!();
        }
        MessageRole::Assistant => {
            println!();
            println!("  {} {}", style(format!("[{time}] HealthSync:")).cyan().bold(), message.text);
            println!();
        }
    }
}

fn print_info(text: &str) {
    println!("\n  {}\n", style(text).dim());
}

fn print_warning(text: &str) {
    println!("\n  {} {}\n", style("!").yellow().bold(), style(text).yellow());
}
