//! Command-line entry point for the listing refresher.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use listing_refresh::{load_config, NewProperty, RefreshConfig, Refresher, Store};
use tracing::info;

/// Rewrite and summarize property listings with a local LLM.
#[derive(Parser)]
#[command(
    name = "listing-refresh",
    version,
    about = "Rewrite and summarize property listings with a local LLM.",
    long_about = None,
)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Command {
    /// Rewrite and summarize every stored property.
    Run {
        /// Ollama base URL, overriding the config.
        #[arg(long, env = "LISTING_REFRESH_ENDPOINT")]
        endpoint: Option<String>,

        /// Model name, overriding the config.
        #[arg(long, env = "LISTING_REFRESH_MODEL")]
        model: Option<String>,
    },

    /// Load properties from a JSON file into the database.
    Seed {
        /// JSON file holding an array of properties.
        file: PathBuf,
    },

    /// Print the stored properties and their summaries.
    List,
}

/// Initialize tracing based on CLI flags.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => "listing_refresh=info",
        1 => "listing_refresh=debug",
        _ => "listing_refresh=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    fmt().with_env_filter(env_filter).with_target(false).init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<RefreshConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RefreshConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = resolve_config(&cli)?;

    match cli.command {
        Command::Run { endpoint, model } => {
            if let Some(endpoint) = endpoint {
                config.generation.endpoint = endpoint;
            }
            if let Some(model) = model {
                config.generation.model = model;
            }
            cmd_run(config).await
        }
        Command::Seed { file } => cmd_seed(&config.database.path, &file).await,
        Command::List => cmd_list(&config.database.path).await,
    }
}

async fn cmd_run(config: RefreshConfig) -> anyhow::Result<()> {
    let store = Store::open(&config.database.path).await?;
    let refresher = Refresher::new(config.generation);

    let report = refresher.run(&store).await?;

    println!();
    println!("  Refresh finished.");
    println!("  Processed: {}", report.processed);
    println!("  Updated:   {}", report.updated);
    println!("  Skipped:   {}", report.skipped);
    println!("  Time:      {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_seed(db: &Path, file: &Path) -> anyhow::Result<()> {
    let raw =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let properties: Vec<NewProperty> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let store = Store::open(db).await?;
    let mut inserted = 0usize;
    for property in &properties {
        let id = store.insert_property(property).await?;
        info!(property_id = id, title = %property.title, "seeded property");
        inserted += 1;
    }

    println!("Seeded {inserted} properties into {}", db.display());
    Ok(())
}

async fn cmd_list(db: &Path) -> anyhow::Result<()> {
    let store = Store::open(db).await?;
    let properties = store.list_properties().await?;

    if properties.is_empty() {
        println!("No properties stored yet.");
        return Ok(());
    }

    for property in &properties {
        println!(
            "#{} {} (rating {:.1})",
            property.id, property.title, property.rating
        );
        if let Some(location) = &property.location {
            println!("    location:  {location}");
        }
        if !property.amenities.is_empty() {
            println!("    amenities: {}", property.amenities.join(", "));
        }
        println!("    {}", property.description);
        match store.get_summary(property.id).await? {
            Some(summary) => println!(
                "    summary ({}): {}",
                summary.update_date.format("%Y-%m-%d %H:%M"),
                summary.summary
            ),
            None => println!("    summary: none yet"),
        }
        println!();
    }

    Ok(())
}
