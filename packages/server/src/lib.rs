#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the site map application.
//!
//! Serves the REST API for the crowd-voted school site directory: the
//! viewport-aware view pipeline (city bubbles below the zoom threshold,
//! ranked location cards above it), suggestion and vote endpoints, and
//! the admin approve/reject/release workflow mutations. Location data
//! lives in an in-memory store seeded from TOML; the real persistence
//! layer, auth, and map rendering are external collaborators.

mod handlers;
pub mod interactive;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use site_map_engine::config::EngineConfig;
use site_map_metro::{Gazetteer, gazetteer::parse_gazetteer_toml};

use crate::store::SiteStore;

/// Shared application state.
pub struct AppState {
    /// In-memory location store standing in for the persistence
    /// collaborator.
    pub store: Arc<SiteStore>,
    /// Engine constants (page size, zoom threshold, catchment radius).
    pub config: EngineConfig,
    /// Metro gazetteer for city bubble consolidation.
    pub gazetteer: Gazetteer,
}

/// Starts the site map API server.
///
/// Reads `BIND_ADDR` and `PORT` for the listen address, and optionally
/// `SITE_MAP_CONFIG`, `SITE_MAP_GAZETTEER`, and `SITE_MAP_SEED` for
/// engine config, gazetteer, and seed data overrides. This is a regular
/// async function — the caller provides the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if an override file cannot be read or parsed; the embedded
/// defaults cannot fail.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = match env_path("SITE_MAP_CONFIG") {
        Some(path) => {
            log::info!("Loading engine config from {}", path.display());
            let contents =
                std::fs::read_to_string(&path).expect("Failed to read SITE_MAP_CONFIG file");
            EngineConfig::from_toml(&contents).expect("Failed to parse SITE_MAP_CONFIG file")
        }
        None => EngineConfig::default(),
    };

    let gazetteer = match env_path("SITE_MAP_GAZETTEER") {
        Some(path) => {
            log::info!("Loading metro gazetteer from {}", path.display());
            let contents =
                std::fs::read_to_string(&path).expect("Failed to read SITE_MAP_GAZETTEER file");
            parse_gazetteer_toml(&contents, config.metro_radius_miles)
                .expect("Failed to parse SITE_MAP_GAZETTEER file")
        }
        None => Gazetteer::us_default(),
    };
    log::info!("Gazetteer has {} metro centers", gazetteer.metros().len());

    let store =
        SiteStore::load(env_path("SITE_MAP_SEED").as_deref()).expect("Failed to load seed data");
    log::info!("Store seeded with {} locations", store.count());

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        config,
        gazetteer,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/view", web::get().to(handlers::view))
                    .route("/cities", web::get().to(handlers::cities))
                    .route("/locations", web::get().to(handlers::locations))
                    .route("/locations", web::post().to(handlers::suggest_location))
                    .route("/locations/{id}/vote", web::post().to(handlers::vote))
                    .route("/locations/{id}/approve", web::post().to(handlers::approve))
                    .route("/locations/{id}/reject", web::post().to(handlers::reject))
                    .route("/locations/{id}/release", web::post().to(handlers::release)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

/// Reads an optional path from an environment variable.
fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var(var).ok().map(PathBuf::from)
}
