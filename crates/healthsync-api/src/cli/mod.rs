//! CLI command definitions for the `healthsync` binary.
//!
//! Uses clap derive macros for argument parsing. Flags override values from
//! `config.toml`; API keys and a few server settings can also come from the
//! environment.

pub mod chat;
pub mod facilities;
pub mod serve;

use clap::{Args, Parser, Subcommand};
use healthsync_types::facility::{Coordinates, FacilityFilter};

/// HealthSync health-information assistant.
#[derive(Parser)]
#[command(name = "healthsync", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat proxy server.
    Serve(ServeArgs),

    /// Chat with the assistant in the terminal.
    Chat(ChatArgs),

    /// Search for nearby healthcare facilities.
    #[command(alias = "near")]
    Facilities(FacilitiesArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Host to bind to.
    #[arg(long)]
    pub host: Option<String>,

    /// Origin allowed by CORS.
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Forward chats to an OpenAI-compatible API instead of the knowledge base.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    #[arg(long)]
    pub upstream_url: Option<String>,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Chat completions endpoint.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Health probe URL.
    #[arg(long)]
    pub health_url: Option<String>,

    /// Bearer key sent to the chat endpoint (for direct API use).
    #[arg(long)]
    pub api_key: Option<String>,

    #[command(flatten)]
    pub places: PlacesArgs,
}

#[derive(Args)]
pub struct FacilitiesArgs {
    /// Which kinds of facility to include.
    #[arg(short, long, default_value = "all")]
    pub filter: FacilityFilter,

    /// Search radius in meters.
    #[arg(short, long)]
    pub radius: Option<u32>,

    #[command(flatten)]
    pub places: PlacesArgs,
}

#[derive(Args)]
pub struct PlacesArgs {
    /// Google Places API key; enables facility search.
    #[arg(long, env = "GOOGLE_PLACES_API_KEY", hide_env_values = true)]
    pub places_api_key: Option<String>,

    /// Your position as `lat,lng`.
    #[arg(long, value_parser = parse_location)]
    pub location: Option<Coordinates>,
}

fn parse_location(s: &str) -> Result<Coordinates, String> {
    healthsync_infra::location::parse_coordinates(s)
}
