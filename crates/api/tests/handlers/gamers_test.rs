use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use pubgames_core::models::game::{GamerGamesResponse, JoinGameRequest};

use crate::test_utils::{create_event, host_game, host_request, test_server};

#[test_log::test(tokio::test)]
async fn test_gamer_games_lists_hosted_and_joined() {
    let server = test_server();
    let event = create_event(&server, 6).await;

    let mut request = host_request("19:00-20:00", "19:00-20:00", 3);
    request.host_id = "ana".to_string();
    let hosted = host_game(&server, event.id, &request).await;

    let mut request = host_request("20:00-21:00", "21:00-22:00", 3);
    request.host_id = "bo".to_string();
    let joined = host_game(&server, event.id, &request).await;
    let response = server
        .post("/api/games/join")
        .json(&JoinGameRequest {
            game_code: joined.game_code.clone(),
            gamer_id: "ana".to_string(),
            access_code: None,
        })
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let mut request = host_request("22:00-23:00", "22:00-23:00", 2);
    request.host_id = "cy".to_string();
    host_game(&server, event.id, &request).await;

    let games = server
        .get("/api/gamers/ana/games")
        .await
        .json::<GamerGamesResponse>();

    assert_eq!(games.gamer_id, "ana");
    assert_eq!(
        games.hosted.iter().map(|game| game.id).collect::<Vec<_>>(),
        vec![hosted.id]
    );
    assert_eq!(
        games.joined.iter().map(|game| game.id).collect::<Vec<_>>(),
        vec![joined.id]
    );
}

#[test_log::test(tokio::test)]
async fn test_gamer_without_games_gets_empty_lists() {
    let server = test_server();

    let response = server.get("/api/gamers/nobody/games").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let games = response.json::<GamerGamesResponse>();
    assert!(games.hosted.is_empty());
    assert!(games.joined.is_empty());
}
