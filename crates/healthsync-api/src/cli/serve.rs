//! `healthsync serve`: the chat proxy server.

use anyhow::Context;
use axum::http::HeaderValue;
use console::style;
use secrecy::SecretString;

use healthsync_core::knowledge::{KnowledgeBase, Responder};
use healthsync_infra::chat::upstream::UpstreamResponder;
use healthsync_types::config::ServerConfig;

use super::ServeArgs;
use crate::http::router::build_router;
use crate::state::{AppState, ChatResponder};

/// Pick the responder: upstream when an API key is set, the knowledge base otherwise.
fn resolve_responder(api_key: Option<String>, upstream_url: &str) -> anyhow::Result<ChatResponder> {
    match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            let upstream = UpstreamResponder::new(upstream_url, SecretString::from(key))
                .context("failed to create upstream client")?;
            Ok(ChatResponder::Upstream(upstream))
        }
        None => Ok(ChatResponder::Knowledge(KnowledgeBase::new())),
    }
}

pub async fn run(args: ServeArgs, config: &ServerConfig) -> anyhow::Result<()> {
    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let frontend_url = args.frontend_url.unwrap_or_else(|| config.frontend_url.clone());
    let upstream_url = args
        .upstream_url
        .unwrap_or_else(|| config.upstream_base_url.clone());

    let origin = HeaderValue::from_str(&frontend_url)
        .with_context(|| format!("invalid frontend origin: {frontend_url}"))?;
    let responder = resolve_responder(args.openai_api_key, &upstream_url)?;
    let responder_name = responder.name().to_string();

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, responder = %responder_name, origin = %frontend_url, "chat proxy starting");

    let base = format!("http://{addr}");
    let line = style("=".repeat(56)).dim();
    println!();
    println!("  {line}");
    println!("  {} {}", style("+").red().bold(), style("HealthSync API Server").bold());
    println!("  {line}");
    println!("  {}     {}", style("Server:").bold(), style(&base).cyan());
    println!("  {}   {}", style("Chat API:").bold(), style(format!("{base}/api/chat")).cyan());
    println!("  {}     {}", style("Health:").bold(), style(format!("{base}/health")).cyan());
    println!("  {}       {}", style("CORS:").bold(), frontend_url);
    println!("  {}  {}", style("Responder:").bold(), responder_name);
    println!("  {line}");
    println!("  {}", style("Press Ctrl+C to stop").dim());
    println!();

    let router = build_router(AppState::new(responder), origin);

    axum::serve(listener, router)
        .with_graceful_shutdown(crate::shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}
