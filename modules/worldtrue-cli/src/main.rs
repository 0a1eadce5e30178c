use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use worldtrue_common::{Config, Event};
use worldtrue_research::research_service;
use worldtrue_suggest::{CachePolicy, MapViewController, SuggestionCache, SuggestionOrchestrator};

#[derive(Parser)]
#[command(name = "worldtrue")]
#[command(about = "Explore similar historical events from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up events similar to one event and print the pending suggestions
    Similar {
        #[arg(long)]
        id: String,

        #[arg(long)]
        title: String,

        /// Negative for BCE
        #[arg(long, allow_hyphen_values = true)]
        year: i32,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        lng: f64,
    },

    /// Highlight an event from a JSON file of events and print the camera move
    Zoom {
        /// JSON array of events (id, title, year, latitude, longitude)
        #[arg(long)]
        events: PathBuf,

        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("worldtrue=info".parse()?)
                .add_directive("worldtrue_suggest=info".parse()?)
                .add_directive("worldtrue_research=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Similar {
            id,
            title,
            year,
            lat,
            lng,
        } => similar(Event::new(id, title, year, lat, lng)).await,
        Commands::Zoom { events, id } => zoom(&events, &id),
    }
}

async fn similar(source: Event) -> Result<()> {
    let config = Config::from_env()?;
    config.log_redacted();

    let researcher = research_service(&config)?;
    let cache = Arc::new(SuggestionCache::new(CachePolicy::from_config(&config)));
    let orchestrator = SuggestionOrchestrator::new(researcher, cache);

    let source_id = source.id.clone();
    let mut map = MapViewController::new(vec![source]);
    let found = map
        .explore(&orchestrator, &source_id)
        .await
        .context("similar-event lookup failed")?;
    info!(count = found.len(), "Similar events found");

    let pending: Vec<_> = map.pending().iter().collect();
    println!("{}", serde_json::to_string_pretty(&pending)?);
    Ok(())
}

fn zoom(path: &Path, id: &str) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let events: Vec<Event> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let mut map = MapViewController::new(events);
    let Some(transition) = map.highlight(Some(id)) else {
        bail!("no event with id {id} in {}", path.display());
    };

    println!("{}", serde_json::to_string_pretty(&transition)?);
    Ok(())
}
