#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for urban incident alerts.
//!
//! Serves the `/alertas` REST API (CRUD, status transition and dashboard
//! statistics) over a `SQLite` record store opened at startup and shared
//! through [`AppState`].

pub mod config;
mod error;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, middleware, web};
use switchy_database::Database;
use urban_alerts_database::db;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared application state.
pub struct AppState {
    /// Alert record store.
    pub db: Arc<dyn Database>,
}

/// Registers the API routes.
///
/// `/alertas/estatisticas` is registered before `/alertas/{id}` so it is not
/// captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
    .service(
        web::scope("/alertas")
            .route("", web::get().to(handlers::list))
            .route("", web::post().to(handlers::create))
            .route("/estatisticas", web::get().to(handlers::stats))
            .route("/{id}", web::get().to(handlers::show))
            .route("/{id}", web::put().to(handlers::update))
            .route("/{id}", web::patch().to(handlers::update_status))
            .route("/{id}", web::delete().to(handlers::destroy)),
    );
}

fn cors(origin: Option<&str>) -> Cors {
    origin.map_or_else(Cors::permissive, |origin| {
        Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_header(header::CONTENT_TYPE)
    })
}

/// Starts the urban alerts API server.
///
/// Opens the record store at `config.database_path` (creating the schema if
/// needed) and runs the Actix-Web HTTP server until it is stopped. The
/// caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`) and for initialising logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the database cannot be opened, or
/// if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Opening database at {}...", config.database_path.display());
    let db_conn = db::open(&config.database_path)
        .await
        .map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
    });

    match &config.cors_origin {
        Some(origin) => log::info!("CORS restricted to {origin}"),
        None => log::info!("CORS is permissive"),
    }

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    let cors_origin = config.cors_origin.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors(cors_origin.as_deref()))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
