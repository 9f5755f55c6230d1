#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Urban alerts API server binary.

use urban_alerts_server::{ServerConfig, config, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // `.env` may set `RUST_LOG`, and config parsing logs, so the order is
    // dotenv, logger, config.
    let dotenv = config::load_dotenv();
    pretty_env_logger::init_custom_env("RUST_LOG");

    if let Some(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    run_server(ServerConfig::from_env()).await
}
