#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the case lookup API server.
//!
//! Reads its configuration from the environment. Pass `--interactive` to be
//! prompted for the bind address and port instead.

use case_lookup_server::{ServerConfig, interactive, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    if std::env::args().any(|arg| arg == "--interactive") {
        interactive::run().await
    } else {
        run_server(ServerConfig::from_env()).await
    }
}
