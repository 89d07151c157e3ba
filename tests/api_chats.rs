//! Integration tests for chat rooms and messages

mod common;

#[cfg(test)]
mod chat_tests {
    use super::common::{auth_header, create_test_server, create_test_state};
    use futures_util::future::join_all;
    use serde_json::json;
    use sqlx::SqlitePool;
    use std::future::IntoFuture;

    // ============================================================
    // GET /chats
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_list_rooms_for_both_participants(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        let (name, value) = auth_header(3, "carol");
        let rooms: Vec<serde_json::Value> = server.get("/chats").add_header(name, value).await.json();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["room_id"], 1);
        assert_eq!(rooms[0]["destination"], "Kerala");
        assert_eq!(rooms[0]["peer_id"], 4);
        assert_eq!(rooms[0]["peer_name"], "dave");

        let (name, value) = auth_header(4, "dave");
        let rooms: Vec<serde_json::Value> = server.get("/chats").add_header(name, value).await.json();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0]["peer_name"], "carol");

        let (name, value) = auth_header(1, "alice");
        let rooms: Vec<serde_json::Value> = server.get("/chats").add_header(name, value).await.json();
        assert!(rooms.is_empty());

        Ok(())
    }

    // ============================================================
    // GET/POST /chats/{room_id}/messages
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_messages_are_listed_in_send_order(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (dave, dave_token) = auth_header(4, "dave");
        let (carol, carol_token) = auth_header(3, "carol");

        let response = server
            .post("/chats/1/messages")
            .add_header(dave.clone(), dave_token.clone())
            .json(&json!({"content": "a"}))
            .await;
        response.assert_status(axum_test::http::StatusCode::CREATED);
        let sent: serde_json::Value = response.json();
        assert_eq!(sent["sender_id"], 4);
        assert_eq!(sent["sender_name"], "dave");
        assert_eq!(sent["room_id"], 1);

        server
            .post("/chats/1/messages")
            .add_header(carol.clone(), carol_token.clone())
            .json(&json!({"content": "b"}))
            .await
            .assert_status(axum_test::http::StatusCode::CREATED);

        for (name, value) in [(dave, dave_token), (carol, carol_token)] {
            let response = server.get("/chats/1/messages").add_header(name, value).await;
            response.assert_status_ok();

            let messages: Vec<serde_json::Value> = response.json();
            let contents: Vec<&str> = messages.iter().map(|m| m["content"].as_str().unwrap()).collect();
            assert_eq!(contents, vec!["a", "b"]);
            assert_eq!(messages[0]["sender_name"], "dave");
            assert_eq!(messages[1]["sender_name"], "carol");
        }

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_non_participants_are_forbidden(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));

        for (id, username) in [(1, "alice"), (2, "bob")] {
            let (name, value) = auth_header(id, username);

            let response = server
                .get("/chats/1/messages")
                .add_header(name.clone(), value.clone())
                .await;
            response.assert_status_forbidden();
            assert_eq!(response.json::<serde_json::Value>()["code"], "FORBIDDEN");

            server
                .post("/chats/1/messages")
                .add_header(name, value)
                .json(&json!({"content": "hi"}))
                .await
                .assert_status_forbidden();
        }

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_unknown_room(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(3, "carol");

        server
            .get("/chats/999/messages")
            .add_header(name, value)
            .await
            .assert_status_not_found();

        server.get("/chats/1/messages").await.assert_status_unauthorized();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_blank_message_is_rejected(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        for content in ["", "   ", "\n\t"] {
            server
                .post("/chats/1/messages")
                .add_header(name.clone(), value.clone())
                .json(&json!({"content": content}))
                .await
                .assert_status_bad_request();
        }

        let messages: Vec<serde_json::Value> = server
            .get("/chats/1/messages")
            .add_header(name, value)
            .await
            .json();
        assert!(messages.is_empty());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_message_text_is_stored_as_sent(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        server
            .post("/chats/1/messages")
            .add_header(name.clone(), value.clone())
            .json(&json!({"content": "  see you at the station  "}))
            .await
            .assert_status(axum_test::http::StatusCode::CREATED);

        let messages: Vec<serde_json::Value> = server
            .get("/chats/1/messages")
            .add_header(name, value)
            .await
            .json();
        assert_eq!(messages[0]["content"], "  see you at the station  ");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_concurrent_sends_reach_subscribers_in_history_order(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let mut live = state.rooms_online.subscribe(&1);
        let server = create_test_server(state.clone());

        let senders = [auth_header(4, "dave"), auth_header(3, "carol")];
        let sends = (0..40).map(|i| {
            let (name, value) = senders[i % 2].clone();
            server
                .post("/chats/1/messages")
                .add_header(name, value)
                .json(&json!({"content": format!("message {}", i)}))
                .into_future()
        });
        for response in join_all(sends).await {
            response.assert_status(axum_test::http::StatusCode::CREATED);
        }

        let mut live_ids = Vec::new();
        while let Ok(msg) = live.try_recv() {
            live_ids.push(msg.message_id as i64);
        }

        let (name, value) = auth_header(4, "dave");
        let history: Vec<serde_json::Value> = server
            .get("/chats/1/messages")
            .add_header(name, value)
            .await
            .json();
        let history_ids: Vec<i64> = history.iter().map(|m| m["message_id"].as_i64().unwrap()).collect();

        assert_eq!(history_ids.len(), 40);
        assert!(history_ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(live_ids, history_ids);

        Ok(())
    }
}
