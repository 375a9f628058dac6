//! Subcommand implementations shared by the argument parser and the
//! interactive menu.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use case_lookup_case_models::{SearchResponse, case_types};
use case_lookup_cli_utils::{MultiProgress, StageSpinner};
use case_lookup_history::SearchHistory;
use case_lookup_scraper::{
    PortalConfig, ReqwestTransport, SearchService, SessionPipeline, download::download_document,
};
use case_lookup_server::ServerConfig;

use crate::output;

/// Origin recorded in the history for searches run from the terminal.
const CLI_ORIGIN: &str = "cli";

/// Settings shared by every subcommand.
pub struct Context {
    pub db_path: PathBuf,
    pub portal: PortalConfig,
    pub multi: MultiProgress,
}

/// Maps a display name or code to the portal code, passing unknown input
/// through uppercased so validation can report it.
pub fn resolve_case_type(input: &str) -> String {
    case_types::resolve(input).map_or_else(|| input.trim().to_uppercase(), ToString::to_string)
}

/// Runs one search with a stage spinner and records it in the history.
///
/// # Errors
///
/// Returns an error if the history database or HTTP client cannot be set
/// up. Search failures are reported in the returned response.
pub async fn search(
    ctx: &Context,
    case_type: &str,
    case_number: &str,
    year: &str,
) -> Result<SearchResponse, Box<dyn std::error::Error>> {
    let history = Arc::new(SearchHistory::open(&ctx.db_path).await?);
    let transport = Arc::new(ReqwestTransport::new(&ctx.portal)?);

    let spinner = StageSpinner::new(&ctx.multi, "Starting search");
    let pipeline = SessionPipeline::new(ctx.portal.clone(), transport)?.with_observer(spinner);
    let service = SearchService::new(pipeline).with_log(history);

    let case_type = resolve_case_type(case_type);
    Ok(service
        .search(&case_type, case_number, year, Some(CLI_ORIGIN))
        .await)
}

/// Prints the most recent searches.
///
/// # Errors
///
/// Returns an error if the history database cannot be read.
pub async fn list_history(ctx: &Context, limit: u32) -> Result<(), Box<dyn std::error::Error>> {
    let history = SearchHistory::open(&ctx.db_path).await?;
    let entries = history.recent(limit).await?;

    if entries.is_empty() {
        println!("No searches logged yet.");
        return Ok(());
    }

    print!("{}", output::format_history(&entries));
    Ok(())
}

/// Deletes every logged search.
///
/// # Errors
///
/// Returns an error if the history database cannot be cleared.
pub async fn clear_history(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let history = SearchHistory::open(&ctx.db_path).await?;
    let deleted = history.clear().await?;
    println!("Deleted {deleted} search(es).");
    Ok(())
}

/// Saves a linked document under `dir`.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the download fails.
pub async fn download(
    ctx: &Context,
    url: &str,
    case_id: &str,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = download_document(&ctx.portal, url, dir, case_id).await?;
    println!("Saved {}", path.display());
    Ok(())
}

/// Starts the API server and blocks until it shuts down.
///
/// # Errors
///
/// Returns an error if the server fails to start or exits with an error.
pub async fn serve(
    ctx: &Context,
    bind_addr: String,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig {
        bind_addr,
        port,
        db_path: ctx.db_path.clone(),
        portal: ctx.portal.clone(),
        ..ServerConfig::from_env()
    };

    // actix-web runs its own runtime; don't nest it inside tokio's.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(case_lookup_server::run_server(config))
    })
    .await??;

    Ok(())
}
