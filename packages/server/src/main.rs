#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Server binary: loads and merges the input files once, runs the boundary
//! validation pass, then serves the dashboard API.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use burglary_map_ingest::boundaries::{load_boundaries, validate_boundaries};
use burglary_map_ingest::load_dataset;
use burglary_map_server::{AppState, configure_api};
use clap::Parser;

#[derive(Parser)]
#[command(name = "burglary_map_server", about = "Burglary map dashboard server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8110)]
    port: u16,

    /// Bind address
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
    bind: String,

    /// Burglary incidents CSV
    #[arg(long, default_value = "data/1_Zurich_Einbrueche_2009-2023.csv")]
    incidents: PathBuf,

    /// Population CSV
    #[arg(long, default_value = "data/Bevoelkerungsanzahl.csv")]
    population: PathBuf,

    /// GeoJSON boundary document
    #[arg(long, default_value = "data/stzh.adm_stadtkreise_a.json")]
    boundaries: PathBuf,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let args = Args::parse();

    log::info!("Loading dataset...");
    let dataset = load_dataset(&args.incidents, &args.population)
        .expect("Failed to load and merge the input tables");
    log::info!(
        "Dataset ready: {} records, {} districts, years {:?}",
        dataset.records().len(),
        dataset.districts().len(),
        dataset.year_range()
    );

    let boundaries =
        load_boundaries(&args.boundaries).expect("Failed to load the boundary document");

    let mismatches = validate_boundaries(&dataset, &boundaries);
    if mismatches > 0 {
        log::warn!("{mismatches} district name mismatch(es) between dataset and boundaries");
    }

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
        boundaries: Arc::new(boundaries),
    });

    log::info!("Starting server on {}:{}", args.bind, args.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((args.bind, args.port))?
    .run()
    .await
}
