#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for court case-status lookups.
//!
//! Exposes case searches, the case-type list, search history, and judgment
//! document downloads over a JSON API. Every search is recorded in the
//! `SQLite` history database at `data/case_searches.db`.

mod handlers;
pub mod interactive;

use std::{path::PathBuf, sync::Arc};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use case_lookup_history::{DB_PATH_ENV, DEFAULT_DB_PATH, SearchHistory};
use case_lookup_scraper::{
    PortalConfig, ReqwestTransport, SearchService, SessionPipeline, Transport,
};

/// Default directory for downloaded documents.
pub const DEFAULT_DOWNLOADS_DIR: &str = "data/downloads";

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub downloads_dir: PathBuf,
    pub portal: PortalConfig,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `CASE_LOOKUP_DB`, `CASE_LOOKUP_DOWNLOADS`,
    /// and the portal variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            db_path: std::env::var(DB_PATH_ENV)
                .map_or_else(|_| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from),
            downloads_dir: std::env::var("CASE_LOOKUP_DOWNLOADS")
                .map_or_else(|_| PathBuf::from(DEFAULT_DOWNLOADS_DIR), PathBuf::from),
            portal: PortalConfig::from_env(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Runs searches and records them in `history`.
    pub service: Arc<SearchService>,
    /// Search history store.
    pub history: Arc<SearchHistory>,
    /// Portal settings, used for downloads.
    pub portal: PortalConfig,
    /// Where downloaded documents are saved.
    pub downloads_dir: PathBuf,
}

impl AppState {
    /// Opens the history database and wires a search service that logs to
    /// it and reaches the portal over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the database cannot be opened or the HTTP
    /// client cannot be built.
    pub async fn open(config: &ServerConfig) -> std::io::Result<Self> {
        let transport = ReqwestTransport::new(&config.portal).map_err(std::io::Error::other)?;
        Self::with_transport(config, Arc::new(transport)).await
    }

    /// Like [`Self::open`], with a caller-supplied portal transport.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the database cannot be opened or the portal
    /// base URL is malformed.
    pub async fn with_transport(
        config: &ServerConfig,
        transport: Arc<dyn Transport>,
    ) -> std::io::Result<Self> {
        log::info!("Opening search history at {}...", config.db_path.display());
        let history = Arc::new(
            SearchHistory::open(&config.db_path)
                .await
                .map_err(std::io::Error::other)?,
        );

        let pipeline = SessionPipeline::new(config.portal.clone(), transport)
            .map_err(std::io::Error::other)?;
        let service = SearchService::new(pipeline).with_log(history.clone());

        Ok(Self {
            service: Arc::new(service),
            history,
            portal: config.portal.clone(),
            downloads_dir: config.downloads_dir.clone(),
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/case-types", web::get().to(handlers::list_case_types))
            .route("/search", web::post().to(handlers::search))
            .route("/history", web::get().to(handlers::history))
            .route("/history", web::delete().to(handlers::clear_history))
            .route("/download", web::get().to(handlers::download)),
    );
}

/// Starts the case lookup API server.
///
/// Opens the history database, builds the portal client, and runs the
/// Actix-Web HTTP server until shutdown. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if startup fails, the server fails
/// to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::open(&config).await?);

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
