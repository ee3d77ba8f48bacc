use std::sync::Arc;

use rocket::{Build, Rocket, routes};
use tracing::info;

use crate::{
    config::Config,
    cors::create_cors,
    logic::{Engine, EngineSettings},
    rate_limit::RateLimiter,
    store::GameStore,
};

pub mod config;
pub mod cors;
pub mod data;
pub mod error;
pub mod identity;
pub mod logic;
pub mod notify;
pub mod rate_limit;
pub mod routes;
pub mod store;

/// Assembles the HTTP server around `store`.
pub fn build(config: Config, store: Arc<dyn GameStore>) -> Rocket<Build> {
    let engine = Engine::new(store, EngineSettings::from(&config));
    let rate_limiter = RateLimiter::per_minute(config.games_per_minute);

    let mut rocket = rocket::build()
        .manage(engine)
        .manage(rate_limiter)
        .mount(
            "/",
            routes![
                routes::new_game,
                routes::join_game,
                routes::play_move,
                routes::get_game,
                routes::get_players
            ],
        );

    if let Some(cors) = create_cors(&config) {
        rocket = rocket.attach(cors);
    }

    info!(
        "Configured with retry limit {}, max board {} cells, {} games/minute",
        config.move_retry_limit, config.max_board_cells, config.games_per_minute
    );
    rocket
}
