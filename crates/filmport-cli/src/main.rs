//! filmport - import movies from OMDb into a local content store.

/// Application configuration (TOML).
mod config;
/// User-facing output.
mod report;
/// Tracing subscriber setup.
mod telemetry;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::config::{
    AppConfig, mask_api_key, resolve_config_path, validate_api_key, validate_term, validate_year,
};
use filmport_api::omdb::{OmdbClient, SearchQuery, fetch_movies};
use filmport_db::{GENRE_VOCABULARY, load_genre_terms, load_movie_genres, load_movies, open_db};
use filmport_import::run_import;

/// Environment variable overriding the stored API key.
const API_KEY_ENV: &str = "OMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Manage the API key and default search.
    Config(ConfigCommand),
    /// Search OMDb without importing.
    Search(SearchArgs),
    /// Search OMDb and import every match.
    Import(SearchArgs),
    /// Inspect imported movies.
    Movies(MoviesCommand),
    /// Inspect genre terms.
    Genres(GenresCommand),
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Store the API key and default search parameters.
    Set(ConfigSetArgs),
    /// Show the current settings (API key masked).
    Show,
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct ConfigSetArgs {
    /// OMDb API key.
    #[arg(long)]
    api_key: Option<String>,
    /// Default search term.
    #[arg(long)]
    term: Option<String>,
    /// Default release year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `search` and `import` subcommands.
#[derive(clap::Args)]
struct SearchArgs {
    /// Release year (default: configured year).
    #[arg(long)]
    year: Option<u32>,
    /// Search term (default: configured term).
    #[arg(long)]
    term: Option<String>,
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: ListSubcommands,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresCommand {
    /// Genres subcommand to run.
    #[command(subcommand)]
    command: ListSubcommands,
}

/// Listing subcommands.
#[derive(Subcommand)]
enum ListSubcommands {
    /// List stored entries.
    List,
}

/// Returns the current calendar year.
fn current_year() -> u32 {
    u32::try_from(chrono::Local::now().year()).unwrap_or(u32::MAX)
}

/// Loads the config file for `dir`.
fn load_config(dir: Option<&PathBuf>) -> Result<(PathBuf, AppConfig)> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    Ok((path, config))
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if nothing is given, a value is invalid, or the
/// config file cannot be written.
#[instrument(skip_all)]
fn run_config_set(args: ConfigSetArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.api_key.is_none() && args.term.is_none() && args.year.is_none() {
        bail!("nothing to set; pass --api-key, --term, or --year");
    }

    let (path, mut config) = load_config(dir)?;
    if let Some(key) = args.api_key {
        config.omdb.api_key = Some(validate_api_key(&key)?);
    }
    if let Some(term) = args.term {
        config.search.term = Some(validate_term(&term)?);
    }
    if let Some(year) = args.year {
        config.search.year = Some(validate_year(year, current_year())?);
    }

    config.save(&path)?;
    tracing::info!("Configuration saved to {}", path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let (path, config) = load_config(dir)?;
    let env_key = std::env::var(API_KEY_ENV).ok();
    let from_env = env_key.as_deref().is_some_and(|k| !k.trim().is_empty());

    tracing::info!("Config file: {}", path.display());
    match config.effective_api_key(env_key) {
        Some(key) if from_env => {
            tracing::info!("API key: {} (from {API_KEY_ENV})", mask_api_key(&key));
        }
        Some(key) => tracing::info!("API key: {}", mask_api_key(&key)),
        None => tracing::info!("API key: (not set)"),
    }
    tracing::info!("Timeout: {}s", config.omdb.timeout_secs);
    tracing::info!(
        "Search term: {}",
        config.search.term.as_deref().unwrap_or("(not set)")
    );
    match config.search.year {
        Some(year) => tracing::info!("Search year: {year}"),
        None => tracing::info!("Search year: (not set)"),
    }
    Ok(())
}

/// Builds an `OmdbClient` from `OMDB_API_KEY` or the stored key.
///
/// # Errors
///
/// Returns an error if no API key is available or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &AppConfig) -> Result<OmdbClient> {
    let api_key = config
        .effective_api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!("no API key; set {API_KEY_ENV} or run `filmport config set --api-key`")
        })?;

    OmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(config.omdb.timeout_secs))
        .build()
        .context("failed to build OMDb client")
}

/// Combines command-line search arguments with the configured defaults.
///
/// # Errors
///
/// Returns an error if the term or year is missing or invalid.
fn resolve_query(args: SearchArgs, config: &AppConfig) -> Result<SearchQuery> {
    let term = args
        .term
        .or_else(|| config.search.term.clone())
        .context("no search term; pass --term or run `filmport config set --term`")?;
    let year = args
        .year
        .or(config.search.year)
        .context("no search year; pass --year or run `filmport config set --year`")?;

    Ok(SearchQuery::new(
        validate_year(year, current_year())?,
        validate_term(&term)?,
    ))
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is incomplete or the search fails.
#[instrument(skip_all)]
async fn run_search(args: SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let query = resolve_query(args, &config)?;
    let client = build_omdb_client(&config)?;

    let outcome = fetch_movies(&client, &query)
        .await
        .context("OMDb search failed")?;
    report::log_search(&outcome);
    Ok(())
}

/// Runs the `import` subcommand.
///
/// Ctrl-C cancels the batch; movies imported so far are kept.
///
/// # Errors
///
/// Returns an error if the query is incomplete, the database cannot be
/// opened, or the search fails.
#[instrument(skip_all)]
async fn run_import_command(args: SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let (_, config) = load_config(dir)?;
    let query = resolve_query(args, &config)?;
    let client = build_omdb_client(&config)?;
    let conn = open_db(dir).context("failed to open database")?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling import");
            signal_token.cancel();
        }
    });

    tracing::info!(
        "Importing movies matching {:?} from {}...",
        query.term,
        query.year
    );
    let result = run_import(&client, &conn, &query, &cancel, report::log_progress).await;
    cancel.cancel();

    let run_report = result.context("OMDb search failed")?;
    report::log_run_report(&run_report);
    Ok(())
}

/// Runs the `movies list` subcommand.
///
/// # Errors
///
/// Returns an error if DB operations fail.
#[instrument(skip_all)]
fn run_movies_list(dir: Option<&PathBuf>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;
    let movies = load_movies(&conn).context("failed to load movies")?;

    if movies.is_empty() {
        tracing::info!("No movies in database. Run `filmport import` first.");
        return Ok(());
    }

    tracing::info!("IMDb ID\t\tYear\tPoster\tTitle\tGenres");
    for movie in &movies {
        let genres = load_movie_genres(&conn, movie.id)
            .with_context(|| format!("failed to load genres of {}", movie.external_id))?;
        tracing::info!("{}", report::movie_line(movie, &genres));
    }
    tracing::info!("Total: {} movies", movies.len());
    Ok(())
}

/// Runs the `genres list` subcommand.
///
/// # Errors
///
/// Returns an error if DB operations fail.
#[instrument(skip_all)]
fn run_genres_list(dir: Option<&PathBuf>) -> Result<()> {
    let conn = open_db(dir).context("failed to open database")?;
    let terms = load_genre_terms(&conn, GENRE_VOCABULARY).context("failed to load genres")?;

    if terms.is_empty() {
        tracing::info!("No genres in database. Run `filmport import` first.");
        return Ok(());
    }

    for term in &terms {
        tracing::info!("{:>4}  {}", term.id, term.name);
    }
    tracing::info!("Total: {} genres", terms.len());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Set(args) => run_config_set(args, dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
        Commands::Search(args) => run_search(args, dir).await,
        Commands::Import(args) => run_import_command(args, dir).await,
        Commands::Movies(cmd) => match cmd.command {
            ListSubcommands::List => run_movies_list(dir),
        },
        Commands::Genres(cmd) => match cmd.command {
            ListSubcommands::List => run_genres_list(dir),
        },
    }
}
