use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use mockall::predicate;
use pretty_assertions::assert_eq;
use pubgames_core::models::{
    calendar::AvailabilityCalendar,
    event::{Event, EventResponse, SEAT_BASED},
    game::{CancelGameRequest, Game, GameResponse, JoinGameRequest, LeaveGameRequest},
};
use pubgames_db::{MembershipChange, SwapOutcome, mock::store::MockStore};
use serde_json::Value;
use uuid::Uuid;

use crate::test_utils::{
    capacities, create_event, get_event, host_game, host_request, post_game, server_with_store,
    test_server,
};

fn join(game: &GameResponse, gamer_id: &str, access_code: Option<&str>) -> JoinGameRequest {
    JoinGameRequest {
        game_code: game.game_code.clone(),
        gamer_id: gamer_id.to_string(),
        access_code: access_code.map(str::to_string),
    }
}

#[test_log::test(tokio::test)]
async fn test_host_game_books_selected_slots() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let request = host_request("19:00-20:00", "20:00-21:00", 2);

    let response = post_game(&server, event.id, &request).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let game = response.json::<GameResponse>();
    assert_eq!(game.slots, vec!["19:00-20:00", "20:00-21:00"]);
    assert_eq!(game.max_players, 2);
    assert_eq!(game.participants, vec![request.host_id.clone()]);
    assert_eq!(game.game_code.len(), 6);
    assert!(!game.is_private);

    let event = get_event(&server, event.id).await;
    assert_eq!(capacities(&event), vec![2, 2, 4, 4]);
    assert_eq!(event.version, 1);
}

#[test_log::test(tokio::test)]
async fn test_host_game_accepts_reversed_range() {
    let server = test_server();
    let event = create_event(&server, 4).await;

    let game = host_game(&server, event.id, &host_request("22:00-23:00", "21:00-22:00", 1)).await;

    assert_eq!(game.slots, vec!["21:00-22:00", "22:00-23:00"]);
    assert_eq!(capacities(&get_event(&server, event.id).await), vec![4, 4, 3, 3]);
}

#[test_log::test(tokio::test)]
async fn test_host_game_reports_full_slots() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    host_game(&server, event.id, &host_request("20:00-21:00", "20:00-21:00", 3)).await;

    let response = post_game(&server, event.id, &host_request("19:00-20:00", "21:00-22:00", 2)).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["slots"], serde_json::json!(["20:00-21:00"]));

    // The rejected booking leaves the calendar untouched
    assert_eq!(capacities(&get_event(&server, event.id).await), vec![4, 1, 4, 4]);
}

#[test_log::test(tokio::test)]
async fn test_host_game_rejects_bad_requests() {
    let server = test_server();
    let event = create_event(&server, 4).await;

    let response = post_game(&server, event.id, &host_request("19:00-20:00", "19:00-20:00", 0)).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_game(&server, event.id, &host_request("18:00-19:00", "19:00-20:00", 1)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let mut nameless = host_request("19:00-20:00", "19:00-20:00", 1);
    nameless.game_name = "  ".to_string();
    let response = post_game(&server, event.id, &nameless).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = post_game(&server, Uuid::new_v4(), &host_request("19:00-20:00", "19:00-20:00", 1)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    assert_eq!(capacities(&get_event(&server, event.id).await), vec![4, 4, 4, 4]);
}

#[test_log::test(tokio::test)]
async fn test_lookup_game_by_id_and_code() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let game = host_game(&server, event.id, &host_request("19:00-20:00", "19:00-20:00", 2)).await;

    let by_id = server.get(&format!("/api/games/{}", game.id)).await.json::<GameResponse>();
    assert_eq!(by_id.game_code, game.game_code);

    let by_code = server
        .get(&format!("/api/games/code/{}", game.game_code.to_ascii_lowercase()))
        .await
        .json::<GameResponse>();
    assert_eq!(by_code.id, game.id);

    let games = server
        .get(&format!("/api/events/{}/games", event.id))
        .await
        .json::<Vec<GameResponse>>();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].id, game.id);

    let response = server.get("/api/games/code/NOPE42").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_private_game_requires_access_code() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let mut request = host_request("19:00-20:00", "19:00-20:00", 3);
    request.access_code = Some("meeple".to_string());

    let response = post_game(&server, event.id, &request).await;
    let raw = response.json::<Value>();
    assert_eq!(raw["is_private"], true);
    assert!(raw.get("access_code_hash").is_none());
    let game = response.json::<GameResponse>();

    let response = server.post("/api/games/join").json(&join(&game, "ana", None)).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/games/join")
        .json(&join(&game, "ana", Some("dice")))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let joined = server
        .post("/api/games/join")
        .json(&join(&game, "ana", Some("meeple")))
        .await
        .json::<GameResponse>();
    assert_eq!(joined.participants, vec![request.host_id.clone(), "ana".to_string()]);
}

#[test_log::test(tokio::test)]
async fn test_join_rejects_duplicates_and_full_games() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let game = host_game(&server, event.id, &host_request("19:00-20:00", "19:00-20:00", 2)).await;

    let response = server.post("/api/games/join").json(&join(&game, "ana", None)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server.post("/api/games/join").json(&join(&game, "ana", None)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server.post("/api/games/join").json(&join(&game, "bo", None)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("full"));
}

#[test_log::test(tokio::test)]
async fn test_simultaneous_joins_both_land() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let request = host_request("19:00-20:00", "19:00-20:00", 3);
    let game = host_game(&server, event.id, &request).await;

    let (ana, bo) = tokio::join!(
        server.post("/api/games/join").json(&join(&game, "ana", None)),
        server.post("/api/games/join").json(&join(&game, "bo", None)),
    );
    assert_eq!(ana.status_code(), StatusCode::OK);
    assert_eq!(bo.status_code(), StatusCode::OK);

    let stored = server
        .get(&format!("/api/games/{}", game.id))
        .await
        .json::<GameResponse>();
    assert_eq!(stored.participants.len(), 3);
    assert!(stored.participants.contains(&"ana".to_string()));
    assert!(stored.participants.contains(&"bo".to_string()));
}

#[test_log::test(tokio::test)]
async fn test_refused_join_reports_rule_of_stored_game() {
    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        publican_id: "the-crown".to_string(),
        game_type: SEAT_BASED.to_string(),
        start_time: now,
        end_time: now,
        expires: now,
        num_seats: 4,
        available_slots: AvailabilityCalendar::from_iter([("19:00-20:00", 2)]),
        version: 2,
        created_at: now,
    };
    let game = Game {
        id: Uuid::new_v4(),
        event_id: event.id,
        host_id: "host".to_string(),
        game_name: "Catan".to_string(),
        game_desc: String::new(),
        game_type: SEAT_BASED.to_string(),
        slots: vec!["19:00-20:00".to_string()],
        max_players: 2,
        game_code: "FULL22".to_string(),
        access_code_hash: None,
        participants: vec!["host".to_string()],
        created_at: now,
    };
    let mut full = game.clone();
    full.participants.push("bo".to_string());

    let mut store = MockStore::new();
    let by_code = game.clone();
    store
        .expect_get_game_by_code()
        .returning(move |_| Ok(Some(by_code.clone())));
    store
        .expect_get_event()
        .returning(move |_| Ok(Some(event.clone())));
    store.expect_is_banned().returning(|_, _| Ok(false));
    store
        .expect_add_participant()
        .with(predicate::eq(game.id), predicate::eq("ana".to_string()))
        .times(1)
        .returning(move |_, _| Ok(MembershipChange::Refused(Some(full.clone()))));

    let server = server_with_store(Arc::new(store), 1);
    let response = server
        .post("/api/games/join")
        .json(&JoinGameRequest {
            game_code: "FULL22".to_string(),
            gamer_id: "ana".to_string(),
            access_code: None,
        })
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("full"));
}

#[test_log::test(tokio::test)]
async fn test_leave_game() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let request = host_request("19:00-20:00", "19:00-20:00", 3);
    let game = host_game(&server, event.id, &request).await;
    server.post("/api/games/join").json(&join(&game, "ana", None)).await;

    let left = server
        .post(&format!("/api/games/{}/leave", game.id))
        .json(&LeaveGameRequest { gamer_id: "ana".to_string() })
        .await
        .json::<GameResponse>();
    assert_eq!(left.participants, vec![request.host_id.clone()]);

    let response = server
        .post(&format!("/api/games/{}/leave", game.id))
        .json(&LeaveGameRequest { gamer_id: "ana".to_string() })
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .post(&format!("/api/games/{}/leave", game.id))
        .json(&LeaveGameRequest { gamer_id: request.host_id.clone() })
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Leaving never gives seats back, only cancelling does
    assert_eq!(capacities(&get_event(&server, event.id).await), vec![1, 4, 4, 4]);
}

#[test_log::test(tokio::test)]
async fn test_cancel_game_releases_seats_once() {
    let server = test_server();
    let event = create_event(&server, 4).await;
    let request = host_request("19:00-20:00", "21:00-22:00", 2);
    let game = host_game(&server, event.id, &request).await;
    host_game(&server, event.id, &host_request("20:00-21:00", "20:00-21:00", 1)).await;

    let response = server
        .post(&format!("/api/games/{}/cancel", game.id))
        .json(&CancelGameRequest { host_id: "someone else".to_string() })
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let event = server
        .post(&format!("/api/games/{}/cancel", game.id))
        .json(&CancelGameRequest { host_id: request.host_id.clone() })
        .await
        .json::<EventResponse>();
    assert_eq!(capacities(&event), vec![4, 3, 4, 4]);

    let response = server
        .post(&format!("/api/games/{}/cancel", game.id))
        .json(&CancelGameRequest { host_id: request.host_id.clone() })
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(capacities(&get_event(&server, event.id).await), vec![4, 3, 4, 4]);
}

#[test_log::test(tokio::test)]
async fn test_host_game_gives_up_after_repeated_conflicts() {
    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        publican_id: "pub".to_string(),
        game_type: SEAT_BASED.to_string(),
        start_time: now,
        end_time: now,
        expires: now,
        num_seats: 4,
        available_slots: AvailabilityCalendar::from_iter([("19:00-20:00", 4)]),
        version: 7,
        created_at: now,
    };
    let event_id = event.id;

    let mut store = MockStore::new();
    store
        .expect_get_event()
        .with(predicate::eq(event_id))
        .times(2)
        .returning(move |_| Ok(Some(event.clone())));
    store
        .expect_compare_and_swap_slots()
        .withf(move |id, version, calendar, _| {
            *id == event_id && *version == 7 && calendar.capacity("19:00-20:00") == Some(2)
        })
        .times(2)
        .returning(|_, _, _, _| Ok(SwapOutcome::Stale));

    let server = server_with_store(Arc::new(store), 2);
    let response = post_game(&server, event_id, &host_request("19:00-20:00", "19:00-20:00", 2)).await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}
