use hedgelayer_client::{ApiClient, ApiError, MarketSearchResponse, UserProfile};

#[tokio::test]
async fn get_deserializes_and_sends_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/profile")
        .match_header("authorization", "Bearer hl_test")
        .with_status(200)
        .with_body(
            r#"{
                "user_id": "u1",
                "handle": "storm-chaser",
                "created_at": "2026-01-15T12:00:00Z",
                "updated_at": "2026-01-16T08:30:00Z"
            }"#,
        )
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), Some("hl_test")).unwrap();
    let profile: UserProfile = client.get("/api/profile", &[]).await.unwrap();

    assert_eq!(profile.handle, "storm-chaser");
    mock.assert_async().await;
}

#[tokio::test]
async fn get_skips_empty_query_params() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/markets")
        .match_query(mockito::Matcher::UrlEncoded("q".into(), "flood".into()))
        .with_status(200)
        .with_body(r#"{"markets": [], "total": 0}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), None).unwrap();
    let response: MarketSearchResponse = client
        .get("/api/markets", &[("q", "flood"), ("status", "")])
        .await
        .unwrap();

    assert_eq!(response.total, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn non_2xx_surfaces_server_error_field() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/profile")
        .with_status(401)
        .with_body(r#"{"error": "invalid token"}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), Some("hl_bad")).unwrap();
    let err = client
        .get::<UserProfile>("/api/profile", &[])
        .await
        .unwrap_err();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid token");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_passed_through() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/api/assessments/a1")
        .with_status(500)
        .with_body("upstream blew up")
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), None).unwrap();
    let err = client.delete("/api/assessments/a1").await.unwrap_err();

    assert_eq!(err.to_string(), "API error 500: upstream blew up");
}

#[tokio::test]
async fn post_without_body_and_patch_roundtrip() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/api/assessments")
        .with_status(200)
        .with_body(r#"{"id": "a9"}"#)
        .create_async()
        .await;
    let update = server
        .mock("PATCH", "/api/assessments/a9")
        .match_body(mockito::Matcher::Json(
            serde_json::json!({"status": "abandoned"}),
        ))
        .with_status(200)
        .with_body(r#"{"id": "a9"}"#)
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), None).unwrap();

    let created: hedgelayer_client::CreatedAssessment = client
        .post("/api/assessments", None::<&serde_json::Value>)
        .await
        .unwrap();
    assert_eq!(created.id, "a9");

    let _: hedgelayer_client::CreatedAssessment = client
        .patch(
            "/api/assessments/a9",
            &serde_json::json!({"status": "abandoned"}),
        )
        .await
        .unwrap();

    create.assert_async().await;
    update.assert_async().await;
}

#[tokio::test]
async fn stream_sets_event_stream_accept_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("accept", "text/event-stream")
        .with_status(200)
        .with_body("data: [DONE]\n")
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), None).unwrap();
    let response = client
        .stream("/api/chat", &serde_json::json!({"messages": []}))
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert_eq!(body, "data: [DONE]\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_normalized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/markets")
        .with_status(200)
        .with_body(r#"{"markets": [], "total": 0}"#)
        .create_async()
        .await;

    let base = format!("{}/", server.url());
    let client = ApiClient::new(base, None).unwrap();
    let response: MarketSearchResponse = client.get("/api/markets", &[]).await.unwrap();

    assert_eq!(response.total, 0);
}
