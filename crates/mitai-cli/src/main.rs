mod app;
mod input;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use mitai_api::{AniListClient, MediaFormat, MediaSeason};
use mitai_core::config::AppConfig;
use mitai_core::controller::SearchForm;
use mitai_core::error::MitaiError;
use mitai_core::storage::{KeyValueStore, MemoryStore, SqliteStore};
use mitai_core::watchlist::Watchlist;

use crate::app::App;

/// Browse the AniList catalog and keep a local watchlist.
#[derive(Parser)]
#[command(name = "mitai", about, version)]
struct Cli {
    /// Initial search term; without one, popular anime are shown.
    #[arg(short, long)]
    query: Option<String>,

    /// Initial season filter (winter, spring, summer, fall).
    #[arg(long)]
    season: Option<MediaSeason>,

    /// Initial format filter (tv, tv_short, movie, special, ova, ona, music).
    #[arg(long)]
    format: Option<MediaFormat>,

    /// Config file to use instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the watchlist in memory only.
    #[arg(long)]
    ephemeral: bool,

    /// Also log to stderr at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);

    tracing::info!("mitai v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "mitai exited with an error");
            eprintln!("mitai: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), MitaiError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let initial = SearchForm {
        query: cli.query.unwrap_or_default(),
        season: cli.season,
        format: cli.format,
    };
    let catalog = AniListClient::with_endpoint(config.catalog.endpoint.clone());

    if cli.ephemeral {
        launch(MemoryStore::new(), catalog, &config, initial).await
    } else {
        let db_path = config.ensure_db_path()?;
        let store = SqliteStore::open(&db_path)?;
        launch(store, catalog, &config, initial).await
    }
}

async fn launch<S: KeyValueStore>(
    store: S,
    catalog: AniListClient,
    config: &AppConfig,
    initial: SearchForm,
) -> Result<(), MitaiError> {
    let app = App::new(Watchlist::new(store), catalog, config);
    app.run(initial).await
}

/// Daily-rolling file log, plus stderr when `verbose`. The returned guard
/// flushes the file writer on drop.
fn init_logging(verbose: bool) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(AppConfig::log_dir(), "mitai.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "mitai=debug" } else { "mitai=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(stderr)
        .init();

    guard
}
