#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for court case-status lookups.
//!
//! ```text
//! case_lookup search <case-type> <number> <year> [--json]
//! case_lookup history list [--limit 10]
//! case_lookup history clear
//! case_lookup case-types
//! case_lookup download <url> [--case-id ID] [--dir DIR]
//! case_lookup serve [--bind 127.0.0.1] [--port 8080]
//! ```
//!
//! Running `case_lookup` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`case_lookup_cli_utils::init_logger`])
//! so log lines and the search spinner never fight for the terminal.

mod commands;
mod interactive;
mod output;

use std::path::PathBuf;

use case_lookup_case_models::SearchStatus;
use case_lookup_history::{DB_PATH_ENV, DEFAULT_DB_PATH, DEFAULT_RECENT_LIMIT};
use case_lookup_scraper::PortalConfig;
use case_lookup_server::DEFAULT_DOWNLOADS_DIR;
use clap::{Parser, Subcommand};

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "case_lookup", about = "Look up Delhi High Court case status")]
struct Cli {
    /// Path to the search history database (overrides `CASE_LOOKUP_DB`)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Portal origin (overrides `CASE_LOOKUP_BASE_URL`)
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds (overrides `CASE_LOOKUP_TIMEOUT_SECS`)
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a case
    Search {
        /// Case type display name (e.g. "W.P.(C)") or portal code
        case_type: String,
        /// Case number
        case_number: String,
        /// Four-digit filing year
        year: String,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Inspect or clear the search history
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// List every supported case type
    CaseTypes,
    /// Download a judgment or order document
    Download {
        /// Document URL from a search result
        url: String,
        /// Case identifier used to name the file
        #[arg(long, default_value = "document")]
        case_id: String,
        /// Destination directory
        #[arg(long, default_value = DEFAULT_DOWNLOADS_DIR)]
        dir: PathBuf,
    },
    /// Start the JSON API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recent searches, newest first
    List {
        /// Maximum number of searches to show
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: u32,
    },
    /// Delete every logged search
    Clear,
}

impl Cli {
    fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .or_else(|| std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    fn portal(&self) -> PortalConfig {
        let mut portal = self
            .base_url
            .as_deref()
            .map_or_else(PortalConfig::from_env, PortalConfig::new);
        if let Some(secs) = self.timeout_secs.filter(|s| *s > 0) {
            portal = portal.with_timeout(std::time::Duration::from_secs(secs));
        }
        portal
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = case_lookup_cli_utils::init_logger();
    let cli = Cli::parse();

    let ctx = Context {
        db_path: cli.db_path(),
        portal: cli.portal(),
        multi,
    };
    log::debug!(
        "Using history at {} and portal {}",
        ctx.db_path.display(),
        ctx.portal.base_url
    );

    let Some(command) = cli.command else {
        return interactive::run(&ctx).await;
    };

    match command {
        Commands::Search {
            case_type,
            case_number,
            year,
            json,
        } => {
            let response = commands::search(&ctx, &case_type, &case_number, &year).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", output::format_response(&response));
            }
            if response.status == SearchStatus::Error {
                std::process::exit(1);
            }
        }
        Commands::History { action } => match action {
            HistoryCommand::List { limit } => commands::list_history(&ctx, limit).await?,
            HistoryCommand::Clear => commands::clear_history(&ctx).await?,
        },
        Commands::CaseTypes => print!("{}", output::format_case_types()),
        Commands::Download { url, case_id, dir } => {
            commands::download(&ctx, &url, &case_id, &dir).await?;
        }
        Commands::Serve { bind, port } => commands::serve(&ctx, bind, port).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_arguments() {
        let cli = Cli::try_parse_from(["case_lookup", "search", "W.P.(C)", "11180", "2025", "--json"])
            .unwrap();

        let Some(Commands::Search {
            case_type,
            case_number,
            year,
            json,
        }) = cli.command
        else {
            panic!("expected search");
        };
        assert_eq!(case_type, "W.P.(C)");
        assert_eq!(case_number, "11180");
        assert_eq!(year, "2025");
        assert!(json);
        assert!(cli.db_path.is_none());
    }

    #[test]
    fn history_list_defaults_limit() {
        let cli = Cli::try_parse_from(["case_lookup", "history", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History {
                action: HistoryCommand::List { limit: DEFAULT_RECENT_LIMIT }
            })
        ));
    }

    #[test]
    fn base_url_and_timeout_override_portal() {
        let cli = Cli::try_parse_from([
            "case_lookup",
            "--base-url",
            "https://portal.example/",
            "--timeout-secs",
            "5",
            "case-types",
        ])
        .unwrap();

        let portal = cli.portal();
        assert_eq!(portal.base_url, "https://portal.example");
        assert_eq!(portal.timeout, std::time::Duration::from_secs(5));
    }

    #[test]
    fn db_path_flag_wins() {
        let cli = Cli::try_parse_from(["case_lookup", "--db-path", "/tmp/x.db", "case-types"]).unwrap();
        assert_eq!(cli.db_path(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["case_lookup"]).unwrap();
        assert!(cli.command.is_none());
    }
}
