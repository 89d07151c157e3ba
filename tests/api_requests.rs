//! Integration tests for the join-request workflow

mod common;

#[cfg(test)]
mod request_tests {
    use super::common::{
        auth_header, count_participants, count_rooms, create_test_server, create_test_state,
    };
    use axum_test::http::StatusCode;
    use serde_json::json;
    use sqlx::SqlitePool;
    use std::future::IntoFuture;

    // ============================================================
    // POST /trips/{trip_id}/requests
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips")))]
    async fn test_submit_join_request(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        let response = server
            .post("/trips/1/requests")
            .add_header(name, value)
            .json(&json!({"message": "let's go"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let request: serde_json::Value = response.json();
        assert_eq!(request["status"], "pending");
        assert_eq!(request["trip_id"], 1);
        assert_eq!(request["requester_id"], 4);
        assert_eq!(request["host_id"], 1);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips")))]
    async fn test_submit_join_request_errors(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        server
            .post("/trips/999/requests")
            .add_header(name.clone(), value.clone())
            .json(&json!({"message": "hello"}))
            .await
            .assert_status_not_found();

        server
            .post("/trips/1/requests")
            .add_header(name.clone(), value.clone())
            .json(&json!({"message": "   "}))
            .await
            .assert_status_bad_request();

        server
            .post("/trips/1/requests")
            .add_header(name, value)
            .json(&json!({"message": ""}))
            .await
            .assert_status_bad_request();

        server
            .post("/trips/1/requests")
            .json(&json!({"message": "anonymous"}))
            .await
            .assert_status_unauthorized();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips")))]
    async fn test_host_cannot_request_own_trip(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(1, "alice");

        server
            .post("/trips/1/requests")
            .add_header(name, value)
            .json(&json!({"message": "my own trip"}))
            .await
            .assert_status_bad_request();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_duplicate_pending_request_conflicts(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(2, "bob");

        let response = server
            .post("/trips/1/requests")
            .add_header(name, value)
            .json(&json!({"message": "asking again"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_rejected_requester_may_ask_again(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        server
            .post("/trips/2/requests")
            .add_header(name, value)
            .json(&json!({"message": "second try"}))
            .await
            .assert_status(StatusCode::CREATED);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "rooms")))]
    async fn test_participant_cannot_request_again(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        server
            .post("/trips/4/requests")
            .add_header(name, value)
            .json(&json!({"message": "again"}))
            .await
            .assert_status(StatusCode::CONFLICT);

        Ok(())
    }

    // ============================================================
    // GET /requests/pending
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_pending_inbox_of_host(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(1, "alice");

        let response = server.get("/requests/pending").add_header(name, value).await;
        response.assert_status_ok();

        let requests: Vec<serde_json::Value> = response.json();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["request_id"], 1);
        assert_eq!(requests[0]["requester_name"], "bob");
        assert_eq!(requests[0]["destination"], "Goa");
        assert_eq!(requests[1]["requester_name"], "carol");
        assert!(requests.iter().all(|r| r["status"] == "pending"));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_pending_inbox_is_per_host(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(4, "dave");

        let requests: Vec<serde_json::Value> = server
            .get("/requests/pending")
            .add_header(name, value)
            .await
            .json();
        assert!(requests.is_empty());

        Ok(())
    }

    // ============================================================
    // POST /requests/{request_id}/{action}
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_accept_provisions_participant_and_room(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (name, value) = auth_header(1, "alice");

        let response = server
            .post("/requests/1/accept")
            .add_header(name, value)
            .await;
        response.assert_status_ok();

        let outcome: serde_json::Value = response.json();
        assert_eq!(outcome["status"], "accepted");
        assert_eq!(outcome["room"]["trip_id"], 1);
        assert_eq!(outcome["room"]["host_id"], 1);
        assert_eq!(outcome["room"]["requester_id"], 2);

        assert_eq!(count_participants(&pool, 1, 2).await, 1);
        assert_eq!(count_rooms(&pool, 1, 1, 2).await, 1);

        let trip: serde_json::Value = server.get("/trips/1").await.json();
        let participants = trip["participants"].as_array().unwrap();
        assert_eq!(participants[0]["username"], "alice (host)");
        assert_eq!(participants[1]["username"], "bob");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_accept_twice_is_invalid_state(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (name, value) = auth_header(1, "alice");

        server
            .post("/requests/1/accept")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status_ok();

        let response = server
            .post("/requests/1/accept")
            .add_header(name, value)
            .await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_STATE");

        assert_eq!(count_participants(&pool, 1, 2).await, 1);
        assert_eq!(count_rooms(&pool, 1, 1, 2).await, 1);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_concurrent_accepts_have_one_winner(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (name, value) = auth_header(1, "alice");

        let first = server
            .post("/requests/2/accept")
            .add_header(name.clone(), value.clone())
            .into_future();
        let second = server
            .post("/requests/2/accepted")
            .add_header(name, value)
            .into_future();
        let (first, second) = tokio::join!(first, second);

        // the loser either lost the conditional update or saw the request already accepted
        let statuses = [first.status_code(), second.status_code()];
        assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
        assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 1);

        assert_eq!(count_participants(&pool, 1, 3).await, 1);
        assert_eq!(count_rooms(&pool, 1, 1, 3).await, 1);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_reject_provisions_nothing(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));
        let (name, value) = auth_header(1, "alice");

        let response = server
            .post("/requests/1/reject")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();

        let outcome: serde_json::Value = response.json();
        assert_eq!(outcome["status"], "rejected");
        assert!(outcome["room"].is_null());

        assert_eq!(count_participants(&pool, 1, 2).await, 0);
        assert_eq!(count_rooms(&pool, 1, 1, 2).await, 0);

        // rejected is permanent
        server
            .post("/requests/1/accept")
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::CONFLICT);

        let status: String =
            sqlx::query_scalar("SELECT status FROM join_requests WHERE request_id = 1")
                .fetch_one(&pool)
                .await?;
        assert_eq!(status, "rejected");

        let inbox: Vec<serde_json::Value> = server
            .get("/requests/pending")
            .add_header(name, value)
            .await
            .json();
        assert!(inbox.iter().all(|r| r["request_id"] != 1));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_only_host_can_resolve(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool.clone()));

        // bob is the requester, carol is unrelated
        for (id, username) in [(2, "bob"), (3, "carol")] {
            let (name, value) = auth_header(id, username);
            let response = server
                .post("/requests/1/accept")
                .add_header(name, value)
                .await;
            response.assert_status_forbidden();
        }

        assert_eq!(count_participants(&pool, 1, 2).await, 0);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "trips", "requests")))]
    async fn test_resolve_unknown_action_or_request(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(1, "alice");

        let response = server
            .post("/requests/1/maybe")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_ARGUMENT");

        server
            .post("/requests/999/accept")
            .add_header(name, value)
            .await
            .assert_status_not_found();

        Ok(())
    }
}
