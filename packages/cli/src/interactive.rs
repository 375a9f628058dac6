//! Interactive menu for running searches and browsing history.
//!
//! Entered when the binary runs without a subcommand. Case types are picked
//! from the portal's list with `dialoguer`, so users never need to know the
//! portal codes.

use std::path::PathBuf;

use case_lookup_case_models::{CaseQuery, case_types};
use case_lookup_history::DEFAULT_RECENT_LIMIT;
use case_lookup_server::DEFAULT_DOWNLOADS_DIR;
use dialoguer::{Confirm, Input, Select};

use crate::{commands, commands::Context, output};

/// Case types visible at once in the picker.
const PICKER_PAGE_SIZE: usize = 15;

/// Top-level actions in the interactive menu.
enum Action {
    Search,
    History,
    ClearHistory,
    CaseTypes,
    Download,
    Serve,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Search,
        Self::History,
        Self::ClearHistory,
        Self::CaseTypes,
        Self::Download,
        Self::Serve,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search for a case",
            Self::History => "Show recent searches",
            Self::ClearHistory => "Clear search history",
            Self::CaseTypes => "List case types",
            Self::Download => "Download a document",
            Self::Serve => "Start API server",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt or the chosen operation fails.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    println!("Delhi High Court Case Lookup");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Search => handle_search(ctx).await?,
        Action::History => handle_history(ctx).await?,
        Action::ClearHistory => handle_clear(ctx).await?,
        Action::CaseTypes => print!("{}", output::format_case_types()),
        Action::Download => handle_download(ctx).await?,
        Action::Serve => handle_serve(ctx).await?,
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Collects a search from prompts and prints the result.
async fn handle_search(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let types = case_types::all();
    let names: Vec<&str> = types.iter().map(|t| t.name).collect();

    let idx = Select::new()
        .with_prompt("Case type")
        .items(&names)
        .default(0)
        .max_length(PICKER_PAGE_SIZE)
        .interact()?;
    let case_type = types[idx].code;

    let case_number: String = Input::new()
        .with_prompt("Case number")
        .validate_with(|input: &String| -> Result<(), String> {
            CaseQuery::new(case_type, input, "2000")
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let year: String = Input::new()
        .with_prompt("Year")
        .validate_with(|input: &String| -> Result<(), String> {
            CaseQuery::new(case_type, &case_number, input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    let response = commands::search(ctx, case_type, &case_number, &year).await?;
    println!();
    print!("{}", output::format_response(&response));

    Ok(())
}

/// Prompts for a limit and lists recent searches.
async fn handle_history(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let limit_str: String = Input::new()
        .with_prompt("Max searches to show")
        .default(DEFAULT_RECENT_LIMIT.to_string())
        .interact_text()?;
    let limit: u32 = limit_str.trim().parse().unwrap_or(DEFAULT_RECENT_LIMIT);

    commands::list_history(ctx, limit).await
}

/// Clears the history after confirmation.
async fn handle_clear(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let confirmed = Confirm::new()
        .with_prompt("Delete every logged search?")
        .default(false)
        .interact()?;

    if confirmed {
        commands::clear_history(ctx).await?;
    } else {
        println!("Cancelled.");
    }

    Ok(())
}

/// Prompts for a document URL and saves it.
async fn handle_download(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let url: String = Input::new().with_prompt("Document URL").interact_text()?;

    let case_id: String = Input::new()
        .with_prompt("Case identifier (used in the file name)")
        .default("document".to_string())
        .interact_text()?;

    let dir: String = Input::new()
        .with_prompt("Save to directory")
        .default(DEFAULT_DOWNLOADS_DIR.to_string())
        .interact_text()?;

    commands::download(ctx, &url, &case_id, &PathBuf::from(dir)).await
}

/// Prompts for a bind address and port and starts the server.
async fn handle_serve(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()?;

    commands::serve(ctx, bind_addr, port).await
}
