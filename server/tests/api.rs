mod common;

use std::sync::Arc;

use minefield_common::models::{
    ErrorBody, ErrorKind, GameIdResponse, GameView, PlayMoveResponse, PlayerView, Tile,
};
use minefield_server::{build, config::Config, data::HiddenBoard, store::MemoryStore};
use rocket::{
    http::{Header, Status},
    local::asynchronous::{Client, LocalResponse},
};
use serde_json::json;

use common::{pos, seed_game};

fn user(uid: &str) -> Header<'static> {
    Header::new("X-User-Id", uid.to_string())
}

async fn client_with(config: Config) -> (Client, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let client = Client::tracked(build(config, store.clone())).await.unwrap();
    (client, store)
}

async fn error_kind(response: LocalResponse<'_>) -> ErrorKind {
    response.into_json::<ErrorBody>().await.unwrap().code
}

#[rocket::async_test]
async fn create_join_and_play() {
    let (client, _) = client_with(Config::default()).await;

    let response = client
        .post("/games")
        .header(user("alice"))
        .header(Header::new("X-User-Name", "Alice"))
        .json(&json!({"height": 5, "width": 5, "mines": 3}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let game_id = response.into_json::<GameIdResponse>().await.unwrap().game_id;

    let response = client
        .post(format!("/games/{}/join", game_id))
        .header(user("bob"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post(format!("/games/{}/moves", game_id))
        .header(user("bob"))
        .json(&json!({"reveal": {"row": 2, "col": 2}}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let moves = response.into_json::<PlayMoveResponse>().await.unwrap().moves;
    assert!(!moves.is_empty());
    assert_eq!(moves[0].pos(), pos(2, 2));

    let view = client
        .get(format!("/games/{}", game_id))
        .header(user("alice"))
        .dispatch()
        .await
        .into_json::<GameView>()
        .await
        .unwrap();
    assert_eq!(view.mines, 3);
    assert_eq!(view.moves, vec![pos(2, 2)]);
    let shown = view.board.iter().flatten().filter(|t| !t.is_hidden()).count();
    assert_eq!(shown, moves.len());

    let players = client
        .get(format!("/games/{}/players", game_id))
        .header(user("bob"))
        .dispatch()
        .await
        .into_json::<Vec<PlayerView>>()
        .await
        .unwrap();
    assert_eq!(players.len(), 2);
    let alice = players.iter().find(|p| p.uid == "alice").unwrap();
    assert_eq!(alice.name.as_deref(), Some("Alice"));
    assert_eq!(alice.score, 0);
}

#[rocket::async_test]
async fn errors_carry_stable_kinds() {
    let (client, store) = client_with(Config::default()).await;
    let id = seed_game(
        store.as_ref(),
        HiddenBoard::from_mines(3, 3, &[pos(0, 0)]),
        "alice",
    )
    .await;

    let response = client
        .post("/games/missing/join")
        .header(user("bob"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(error_kind(response).await, ErrorKind::NotFound);

    let response = client
        .post(format!("/games/{}/moves", id))
        .header(user("bob"))
        .json(&json!({"reveal": {"row": 0, "col": 0}}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    assert_eq!(error_kind(response).await, ErrorKind::PermissionDenied);

    let response = client
        .post(format!("/games/{}/moves", id))
        .header(user("alice"))
        .json(&json!({"reveal": {"row": 9, "col": 0}}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(error_kind(response).await, ErrorKind::InvalidArgument);

    let response = client
        .post("/games")
        .header(user("alice"))
        .json(&json!({"height": 0, "width": 5, "mines": 1}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(error_kind(response).await, ErrorKind::InvalidArgument);
}

#[rocket::async_test]
async fn mine_reveal_over_http() {
    let (client, store) = client_with(Config::default()).await;
    let id = seed_game(
        store.as_ref(),
        HiddenBoard::from_mines(3, 3, &[pos(0, 0)]),
        "alice",
    )
    .await;

    let moves = client
        .post(format!("/games/{}/moves", id))
        .header(user("alice"))
        .json(&json!({"reveal": {"row": 0, "col": 0}}))
        .dispatch()
        .await
        .into_json::<PlayMoveResponse>()
        .await
        .unwrap()
        .moves;
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].value, Tile::Mine);

    let players = client
        .get(format!("/games/{}/players", id))
        .header(user("alice"))
        .dispatch()
        .await
        .into_json::<Vec<PlayerView>>()
        .await
        .unwrap();
    assert_eq!(players[0].score, -10);
}

#[rocket::async_test]
async fn identity_is_required() {
    let (client, _) = client_with(Config::default()).await;
    let response = client
        .post("/games")
        .json(&json!({"height": 3, "width": 3, "mines": 1}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Unauthorized);
}

#[rocket::async_test]
async fn game_creation_is_rate_limited() {
    let config = Config {
        games_per_minute: 1,
        ..Config::default()
    };
    let (client, store) = client_with(config).await;
    let body = json!({"height": 3, "width": 3, "mines": 1});

    let first = client
        .post("/games")
        .header(user("alice"))
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(first.status(), Status::Ok);

    let second = client
        .post("/games")
        .header(user("alice"))
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(second.status(), Status::TooManyRequests);

    let other = client
        .post("/games")
        .header(user("bob"))
        .json(&body)
        .dispatch()
        .await;
    assert_eq!(other.status(), Status::Ok);
    assert_eq!(store.len(), 2);
}

#[rocket::async_test]
async fn game_params_are_all_required() {
    let (client, store) = client_with(Config::default()).await;

    for body in [json!({}), json!({"height": 4, "width": 4})] {
        let response = client
            .post("/games")
            .header(user("alice"))
            .json(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
    }
    assert!(store.is_empty());
}

#[rocket::async_test]
async fn rejected_params_do_not_spend_the_rate_limit() {
    let config = Config {
        games_per_minute: 1,
        ..Config::default()
    };
    let (client, store) = client_with(config).await;

    for bad in [
        json!({"height": 0, "width": 3, "mines": 1}),
        json!({"height": 3, "width": 3, "mines": 9}),
    ] {
        let response = client
            .post("/games")
            .header(user("alice"))
            .json(&bad)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        assert_eq!(error_kind(response).await, ErrorKind::InvalidArgument);
    }

    let response = client
        .post("/games")
        .header(user("alice"))
        .json(&json!({"height": 3, "width": 3, "mines": 1}))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(store.len(), 1);
}
