//! mbgap - Main entry point
//!
//! Reports tracks missing from catalogued albums, or albums missing from
//! an artist's discography, by reconciling the local library database
//! against MusicBrainz.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mbgap::config::{load_config, resolve_database_path};
use mbgap::db;
use mbgap::query::AlbumQuery;
use mbgap::services::musicbrainz::MusicBrainzClient;
use mbgap::services::report::{MissingReport, ReportOptions};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mbgap
#[derive(Parser, Debug)]
#[command(name = "mbgap")]
#[command(about = "Report tracks and albums missing from a local music library against MusicBrainz")]
#[command(version)]
struct Args {
    /// Query terms restricting the albums to check (`field:value` or bare text)
    query: Vec<String>,

    /// Count missing tracks per album
    #[arg(short, long)]
    count: bool,

    /// Print only the total number of missing tracks (or albums with -a)
    #[arg(short, long)]
    total: bool,

    /// Report missing albums per artist instead of missing tracks
    #[arg(short, long)]
    album: bool,

    /// Output format template (overrides the configured one)
    #[arg(short, long)]
    format: Option<String>,

    /// Library database path
    #[arg(long, env = "MBGAP_DB")]
    db: Option<PathBuf>,

    /// Config file path
    #[arg(long, env = "MBGAP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mbgap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    debug!("Starting mbgap v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    // CLI switches layer on top of config-file defaults
    let album_mode = args.album || config.album;
    let mut opts = ReportOptions {
        count: args.count || config.count,
        total: args.total || config.total,
        format_item: config.format_item().to_string(),
        format_album: config.format_album().to_string(),
        release_status: config.release_status.clone(),
        release_type: config.release_type.clone(),
    };

    // -f overrides the template the selected mode prints with
    if let Some(format) = args.format {
        if album_mode || opts.count {
            opts.format_album = format;
        } else {
            opts.format_item = format;
        }
    }

    let query = AlbumQuery::parse(&args.query).context("Failed to parse query")?;

    let db_path = resolve_database_path(args.db.as_deref(), &config);
    info!("Library database: {}", db_path.display());

    let pool = db::init_database_pool(&db_path)
        .await
        .context("Failed to open library database")?;

    let client = MusicBrainzClient::new().context("Failed to create MusicBrainz client")?;
    let report = MissingReport::new(pool, client);

    let lines = if album_mode {
        report.missing_albums(&query, &opts).await?
    } else {
        report.missing_tracks(&query, &opts).await?
    };

    for line in lines {
        println!("{}", line);
    }

    Ok(())
}
