use minefield_common::models::{
    GameIdResponse, GameParams, GameView, PlayMoveRequest, PlayMoveResponse, PlayerView,
};
use rocket::{Responder, State, get, http::Status, post, serde::json::Json};
use tracing::{info, instrument, warn};

use crate::{error::GameError, identity::Identity, logic::Engine, rate_limit::RateLimiter};

#[derive(Responder)]
pub enum ApiError {
    Game(GameError),
    Status(Status),
}

impl From<GameError> for ApiError {
    fn from(error: GameError) -> Self {
        match &error {
            GameError::Internal(message) => warn!("Internal error: {}", message),
            other => info!("Rejected request: {}", other),
        }
        ApiError::Game(error)
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

#[post("/games", data = "<params>")]
#[instrument(level = "trace", skip(engine, rate_limiter, identity), fields(uid = %identity.uid))]
pub async fn new_game(
    params: Json<GameParams>,
    identity: Identity,
    engine: &State<Engine>,
    rate_limiter: &State<RateLimiter>,
) -> ApiResult<GameIdResponse> {
    info!(
        "Game creation request from {}: {}x{} with {} mines",
        identity.uid, params.height, params.width, params.mines
    );

    engine.check_params(&params)?;
    if let Err(status) = rate_limiter.check(&identity) {
        warn!("Rate limit exceeded for {}", identity.uid);
        return Err(ApiError::Status(status));
    }

    let game_id = engine.new_game(&identity, params.0).await?;
    Ok(Json(GameIdResponse { game_id }))
}

#[post("/games/<id>/join")]
#[instrument(level = "trace", skip(engine, identity), fields(uid = %identity.uid))]
pub async fn join_game(
    id: &str,
    identity: Identity,
    engine: &State<Engine>,
) -> ApiResult<GameIdResponse> {
    engine.join_game(id, &identity).await?;
    Ok(Json(GameIdResponse {
        game_id: id.to_string(),
    }))
}

#[post("/games/<id>/moves", data = "<request>")]
#[instrument(level = "trace", skip(engine, identity, request), fields(uid = %identity.uid))]
pub async fn play_move(
    id: &str,
    request: Json<PlayMoveRequest>,
    identity: Identity,
    engine: &State<Engine>,
) -> ApiResult<PlayMoveResponse> {
    let moves = engine.play_move(id, &identity.uid, &request).await?;
    Ok(Json(PlayMoveResponse { moves }))
}

#[get("/games/<id>")]
pub async fn get_game(id: &str, identity: Identity, engine: &State<Engine>) -> ApiResult<GameView> {
    Ok(Json(engine.game_view(id, &identity.uid).await?))
}

#[get("/games/<id>/players")]
pub async fn get_players(
    id: &str,
    identity: Identity,
    engine: &State<Engine>,
) -> ApiResult<Vec<PlayerView>> {
    Ok(Json(engine.players(id, &identity.uid).await?))
}
