mod assistant;
mod cart;
mod catalog;
mod demo;
mod filters;
mod loyalty;
mod models;
mod reports;
mod routes;
mod schedule;
mod state;
mod store;
mod templates;
mod wizard;

use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};
use std::collections::HashMap;
use std::env;
use std::sync::atomic::AtomicU32;
use std::sync::{Arc, Mutex};

use crate::assistant::Assistant;
use crate::catalog::Catalog;
use crate::demo::{seeded_bookings, DEFAULT_SEED, DEMO_BOOKINGS, SEED_VISITS};
use crate::state::AppState;
use crate::store::BookingLedger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let catalog = Arc::new(Catalog::zero_um());

    let seed = env::var("DEMO_SEED")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let reports = Arc::new(seeded_bookings(&catalog, seed, DEMO_BOOKINGS));

    let ledger_path =
        env::var("BOOKINGS_PATH").unwrap_or_else(|_| "./data/bookings.json".to_string());

    let api_key = env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    if api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set; the assistant will answer offline");
    }
    let assistant = Assistant::new(&catalog, api_key)?;

    let state = AppState {
        catalog,
        reports,
        visits: Arc::new(AtomicU32::new(SEED_VISITS)),
        sessions: Arc::new(Mutex::new(HashMap::new())),
        ledger: BookingLedger::new(ledger_path),
        assistant,
    };

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    let address = format!("0.0.0.0:{port}");
    log::info!("Starting Zero Um booking on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "./static").prefer_utf8(true))
            .configure(routes::public::configure)
            .configure(routes::admin::configure)
            .configure(routes::assistant::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
