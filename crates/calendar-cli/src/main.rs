// Calendar CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Listing degrades to an empty result when the API is unreachable.

mod client;
mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "calendar")]
#[command(about = "Calendar CLI - Create, update and query events")]
#[command(version)]
pub struct Cli {
    /// API base URL
    #[arg(
        long,
        env = "CALENDAR_API_URL",
        default_value = "http://localhost:5000"
    )]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: commands::events::EventsCommand,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so json/yaml output stays parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = client::Client::new(&cli.api_url);
    let output_format = output::OutputFormat::from_str(&cli.output);

    commands::events::run(cli.command, &client, output_format, cli.quiet).await
}
