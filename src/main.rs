use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use standings_scraper::config::AppConfig;
use standings_scraper::fetch::{gather_rows, FilePageSource, HttpPageSource, PageSource};
use standings_scraper::logging;
use standings_scraper::notify;
use standings_scraper::pipeline::{build_records, render_block, run_pipeline};
use standings_scraper::schema::Schema;
use standings_scraper::types::RawTable;

#[derive(Parser)]
#[command(name = "standings_scraper")]
#[command(about = "Challonge standings scraper and Slack leaderboard reporter")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the standings page and post the leaderboard to Slack
    Post {
        /// Standings page URL (defaults to STANDINGS_URL)
        #[arg(long)]
        url: Option<String>,
        /// Output schema
        #[arg(long, value_enum)]
        schema: Option<Schema>,
        /// Maximum number of rendered rows
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_rows: Option<u64>,
    },
    /// Scrape and print the leaderboard without posting anywhere
    Preview {
        /// Standings page URL (defaults to STANDINGS_URL)
        #[arg(long)]
        url: Option<String>,
        /// Output schema
        #[arg(long, value_enum)]
        schema: Option<Schema>,
        /// Maximum number of rendered rows
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_rows: Option<u64>,
        /// Read a local HTML file instead of fetching a URL
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Commands::Post {
            url,
            schema,
            max_rows,
        } => {
            apply_overrides(&mut config, url, schema, max_rows);
            let source_url = require_url(&config)?;
            let webhook_url = config
                .webhook_url
                .clone()
                .ok_or("SLACK_WEBHOOK_URL is not set")?;

            println!("🔄 Scraping standings from {}...", source_url);
            let message = scrape_message(&config, &source_url).await?;
            notify::post_to_slack(&webhook_url, &message).await?;
            println!("✅ Leaderboard posted to Slack");
        }
        Commands::Preview {
            url,
            schema,
            max_rows,
            file,
        } => {
            apply_overrides(&mut config, url, schema, max_rows);
            let message = match file {
                Some(path) => {
                    println!("🔄 Reading standings from {}...", path.display());
                    preview_file(&config, &path).await?
                }
                None => {
                    let source_url = require_url(&config)?;
                    println!("🔄 Scraping standings from {}...", source_url);
                    scrape_message(&config, &source_url).await?
                }
            };
            println!("{}", message);
        }
    }

    Ok(())
}

fn apply_overrides(
    config: &mut AppConfig,
    url: Option<String>,
    schema: Option<Schema>,
    max_rows: Option<u64>,
) {
    if url.is_some() {
        config.page_url = url;
    }
    if let Some(schema) = schema {
        config.schema = schema;
    }
    if let Some(max_rows) = max_rows {
        config.max_rows = Some(max_rows as usize);
    }
}

fn require_url(config: &AppConfig) -> Result<String, Box<dyn std::error::Error>> {
    config
        .page_url
        .clone()
        .ok_or_else(|| "No standings URL given (set STANDINGS_URL or pass --url)".into())
}

/// Scrapes the configured URL, following pagination, and assembles the
/// outgoing message.
async fn scrape_message(
    config: &AppConfig,
    source_url: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let source = HttpPageSource::new(config.request_timeout_secs, config.max_frame_depth)?;
    let table = gather_rows(
        &source,
        source_url,
        config.schema,
        &config.heuristics,
        config.max_pages,
    )
    .await?;
    Ok(assemble(config, &table, source_url))
}

/// Runs the pipeline over a local HTML file, no pagination.
async fn preview_file(
    config: &AppConfig,
    path: &Path,
) -> Result<String, Box<dyn std::error::Error>> {
    let location = path.to_string_lossy().into_owned();
    let page = FilePageSource.fetch_page(&location).await?;
    let block = run_pipeline(
        &page.context,
        config.schema,
        &config.heuristics,
        config.effective_max_rows(),
    );
    if block.is_none() {
        println!("⚠️  No standings table found in {}", location);
    }
    Ok(notify::build_message(block.as_deref(), &location))
}

fn assemble(config: &AppConfig, table: &RawTable, source: &str) -> String {
    if table.rows.len() < 2 {
        println!("⚠️  No standings table found at {}", source);
        return notify::build_message(None, source);
    }
    let records = build_records(
        table,
        config.schema,
        &config.heuristics,
        config.effective_max_rows(),
    );
    info!("Rendering {} competitor(s) from {}", records.len(), source);
    println!("📊 Rendering {} competitor(s)", records.len());
    let block = render_block(&records, config.schema);
    notify::build_message(Some(&block), source)
}
