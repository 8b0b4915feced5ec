//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(endpoint: &str, model: &str, remember: bool, facilities_enabled: bool) {
    let on_off = |on: bool| {
        if on {
            style("on").green().to_string()
        } else {
            style("off").dim().to_string()
        }
    };

    println!();
    println!("  {} {}", style("+").red().bold(), style("HealthSync AI").cyan().bold());
    println!("  {}", style("Your virtual health assistant. Not a substitute for a doctor.").dim());
    println!();
    println!("  {}     {}", style("Endpoint:").bold(), style(endpoint).dim());
    println!("  {}        {}", style("Model:").bold(), style(model).dim());
    println!("  {}     {}", style("Remember:").bold(), on_off(remember));
    println!("  {}   {}", style("Facilities:").bold(), on_off(facilities_enabled));
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
