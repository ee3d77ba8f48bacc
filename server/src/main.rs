use std::sync::Arc;

use minefield_server::{build, config::Config, store::MemoryStore};
use rocket::{Build, Rocket};
use tracing::info;

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt::init();
    info!("🚀 Starting minefield server");

    let config = Config::from_env();
    let rocket = build(config, Arc::new(MemoryStore::new()));

    info!("📡 Endpoints: POST /games, POST /games/<id>/join, POST /games/<id>/moves, GET /games/<id>, GET /games/<id>/players");
    rocket
}
