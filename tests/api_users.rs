//! Integration tests for profile, user directory and matches

mod common;

#[cfg(test)]
mod user_tests {
    use super::common::{auth_header, create_test_server, create_test_state};
    use serde_json::json;
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_get_profile(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(1, "alice");

        let response = server.get("/profile").add_header(name, value).await;
        response.assert_status_ok();

        let profile: serde_json::Value = response.json();
        assert_eq!(profile["id"], 1);
        assert_eq!(profile["username"], "alice");
        assert_eq!(profile["email"], "alice@example.com");
        assert_eq!(profile["dob"], "1994-03-12");
        assert_eq!(profile["travel_styles"], json!(["backpacking", "roadtrip"]));
        assert!(profile.get("password").is_none());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_profile_partial(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(3, "carol");

        let response = server
            .put("/profile")
            .add_header(name.clone(), value.clone())
            .json(&json!({"language": "ml", "interests": ["food", "boating"]}))
            .await;
        response.assert_status_ok();

        let profile: serde_json::Value = response.json();
        assert_eq!(profile["language"], "ml");
        assert_eq!(profile["interests"], json!(["boating", "food"]));
        assert_eq!(profile["email"], "carol@example.com");

        // the session survives a rename because users are resolved by id
        let response = server
            .put("/profile")
            .add_header(name.clone(), value.clone())
            .json(&json!({"username": "caroline"}))
            .await;
        response.assert_status_ok();

        let response = server.get("/auth/me").add_header(name, value).await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["username"], "caroline");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_profile_taken_username(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(3, "carol");

        let response = server
            .put("/profile")
            .add_header(name, value)
            .json(&json!({"username": "bob"}))
            .await;
        response.assert_status(axum_test::http::StatusCode::CONFLICT);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_update_profile_invalid_email(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(3, "carol");

        server
            .put("/profile")
            .add_header(name, value)
            .json(&json!({"email": "nope"}))
            .await
            .assert_status_bad_request();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_list_users_excludes_caller(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(2, "bob");

        let response = server.get("/users").add_header(name, value).await;
        response.assert_status_ok();

        let users: Vec<serde_json::Value> = response.json();
        let names: Vec<&str> = users.iter().map(|u| u["username"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["alice", "carol", "dave"]);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users")))]
    async fn test_matches_ranked_by_shared_preferences(pool: SqlitePool) -> sqlx::Result<()> {
        let server = create_test_server(create_test_state(pool));
        let (name, value) = auth_header(1, "alice");

        let response = server.get("/users/matches").add_header(name, value).await;
        response.assert_status_ok();

        // alice: styles {backpacking, roadtrip}, interests {food, music}
        // bob shares roadtrip + music, carol shares food, dave shares nothing
        let matches: Vec<serde_json::Value> = response.json();
        let ranked: Vec<(i64, i64)> = matches
            .iter()
            .map(|m| (m["id"].as_i64().unwrap(), m["score"].as_i64().unwrap()))
            .collect();
        assert_eq!(ranked, vec![(2, 2), (3, 1), (4, 0)]);

        Ok(())
    }
}
