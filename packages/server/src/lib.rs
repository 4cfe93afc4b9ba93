#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the burglary map dashboard.
//!
//! Serves the dashboard computation API and the boundary document for the
//! choropleth frontend. All state is loaded once at startup and shared
//! read-only; every request recomputes its view synchronously from the
//! full dataset.

pub mod handlers;

use std::sync::Arc;

use actix_web::web;
use burglary_map_ingest::boundaries::Boundaries;
use burglary_map_models::Dataset;

/// Shared application state: the immutable dataset and the parsed
/// boundary document. Each browser session owns its own transient filter
/// values; nothing here changes after startup.
pub struct AppState {
    /// The merged dataset.
    pub dataset: Arc<Dataset>,
    /// The boundary document served to the map renderer.
    pub boundaries: Arc<Boundaries>,
}

/// Registers the API routes on a service config.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/meta", web::get().to(handlers::meta))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/boundaries", web::get().to(handlers::boundaries)),
    );
}
