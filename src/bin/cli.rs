//! saberdl CLI
//!
//! Finds custom songs on the catalog and downloads their archives.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgGroup, Parser};
use saberdl::{
    error::Result,
    models::{Config, Mode, Query},
    pipeline::{self, Batch, Source},
    services::{Prompt, Selector, SpotifyPlaylist, StdinPrompt},
    storage::LocalStorage,
    utils::{
        http::{HttpTransport, create_async_client},
        log::ConsoleReporter,
    },
};

/// saberdl - custom song downloader
#[derive(Parser, Debug)]
#[command(name = "saberdl", version, about = "Search and download custom songs")]
#[command(group(
    ArgGroup::new("source")
        .args(["song", "file", "playlist"])
        .multiple(false)
))]
struct Cli {
    /// Single song to look up (append `#code` to pin a catalog entry)
    #[arg(short, long)]
    song: Option<String>,

    /// File with one song per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Playlist link, URI or id
    #[arg(long)]
    playlist: Option<String>,

    /// Destination root directory (must exist)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Batch name: sub-folder for archives and name of the run log
    #[arg(short = 'p', long)]
    name: Option<String>,

    /// Selection mode (asked when omitted on a terminal, else auto)
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Enable debug logging and the run log
    #[arg(short, long)]
    verbose: bool,

    /// Only print warnings, errors and candidate tables
    #[arg(short, long)]
    quiet: bool,

    /// Path to the TOML configuration
    #[arg(short, long, default_value = "saberdl.toml")]
    config: PathBuf,

    /// Validate configuration and exit
    #[arg(long)]
    check_config: bool,

    /// Ask for Spotify credentials, save them to the config and test them
    #[arg(long)]
    configure: bool,
}

impl Cli {
    fn source(&self) -> Option<Source> {
        if let Some(song) = &self.song {
            return Some(Source::Song(song.clone()));
        }
        if let Some(file) = &self.file {
            return Some(Source::File(file.clone()));
        }
        self.playlist.clone().map(Source::Playlist)
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn load_queries(source: &Source, config: &Config, client: &reqwest::Client) -> Result<Vec<Query>> {
    match source {
        Source::Song(song) => Ok(vec![Query::normalize(song)]),
        Source::File(file) => pipeline::queries_from_file(file).await,
        Source::Playlist(reference) => {
            let provider = SpotifyPlaylist::new(client.clone(), config.spotify.clone());
            pipeline::queries_from_playlist(&provider, reference).await
        }
    }
}

/// Save Spotify credentials and check them with a token request.
async fn configure(cli: &Cli) -> Result<()> {
    let config = pipeline::configure_spotify(&cli.config, &mut StdinPrompt)?;
    let client = create_async_client(&config.catalog)?;

    match SpotifyPlaylist::new(client, config.spotify).access_token().await {
        Ok(_) => {
            log::info!("✓ Configuration successful");
            Ok(())
        }
        Err(e) => {
            log::error!("Configuration failed: {}", e);
            Err(e)
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.configure {
        return configure(&cli).await;
    }

    let config = Config::load_or_default(&cli.config);

    if cli.check_config {
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("✓ Config OK ({})", cli.config.display());
        return Ok(());
    }
    config.validate()?;

    LocalStorage::new(&cli.dir, None).check_root().await?;

    let mut stdin = StdinPrompt;
    let prompt = std::io::stdin()
        .is_terminal()
        .then_some(&mut stdin as &mut dyn Prompt);
    let params = pipeline::resolve_params(cli.source(), cli.name.clone(), cli.mode, prompt)?;

    let transport = Arc::new(HttpTransport::new(&config.catalog)?);

    let queries = load_queries(&params.source, &config, transport.client()).await?;
    if queries.is_empty() {
        log::warn!("No songs to look up");
        return Ok(());
    }

    let storage = LocalStorage::new(&cli.dir, params.name);
    let reporter = ConsoleReporter::new().quiet(cli.quiet);
    let selector = Selector::new(params.mode, Box::new(StdinPrompt));

    let result = Batch::new(&config, transport, selector, storage, &reporter)?
        .with_run_log(cli.verbose)
        .run(&queries)
        .await;

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            if e.is_fatal() {
                log::error!("Batch aborted: {}", e);
            }
            return Err(e);
        }
    };

    log::debug!("{:?}", stats);
    Ok(())
}
