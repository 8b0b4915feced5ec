//! Slash command parsing and help for the chat loop.
//!
//! Commands start with `/`. Anything else is sent to the assistant.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Re-send the last message after a failure.
    Retry,
    /// Turn conversation memory on or off.
    Remember(bool),
    /// Start over with an empty conversation.
    Clear,
    /// Show the conversation so far.
    History,
    /// Show connectivity and memory settings.
    Status,
    /// Exit the chat session.
    Exit,
    /// Unknown or malformed command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(|s| s.trim().to_lowercase());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/retry" | "/r" => ChatCommand::Retry,
        "/remember" => match arg.as_deref() {
            Some("on") => ChatCommand::Remember(true),
            Some("off") => ChatCommand::Remember(false),
            _ => ChatCommand::Unknown("/remember requires 'on' or 'off'".to_string()),
        },
        "/clear" | "/new" => ChatCommand::Clear,
        "/history" => ChatCommand::History,
        "/status" => ChatCommand::Status,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}            Show this help message", style("/help").cyan());
    println!("  {}           Re-send your last message", style("/retry").cyan());
    println!("  {}  Keep the conversation between sessions", style("/remember on|off").cyan());
    println!("  {}           Start a new conversation", style("/clear").cyan());
    println!("  {}         Show the conversation", style("/history").cyan());
    println!("  {}          Show connection and memory status", style("/status").cyan());
    println!("  {}            End the chat session", style("/exit").cyan());
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
