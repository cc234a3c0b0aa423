#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use dockgate::domain::containers::models::operation::DEFAULT_TIMEOUT_SECS;
    use dockgate::domain::containers::models::outcome::{BulkOutcome, OperationOutcome};
    use dockgate::domain::containers::models::record::GenericRecord;
    use dockgate::domain::containers::service::Service;
    use dockgate::domain::system::info::SystemInfoSummary;
    use dockgate::inbound::server::{ApiResponse, AppState, create_app};
    use dockgate::outbound::memory::{BackendCall, MemoryBackend};
    use serde::de::DeserializeOwned;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    // for `oneshot`

    const SECRET: &str = "tests-secret";

    async fn setup_test_app() -> (Router, MemoryBackend) {
        let backend = MemoryBackend::new();
        for (id, state) in [("a", "running"), ("b", "running"), ("idle", "exited")] {
            let mut record = GenericRecord::new();
            record.insert("state".to_string(), json!(state));
            backend.insert(id, record).await;
        }
        backend.insert("blank", GenericRecord::new()).await;

        let state = AppState {
            container_service: Arc::new(Service::new(backend.clone())),
            api_secret: Some(SECRET.to_string()),
        };
        (create_app(state).await, backend)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Authorization", format!("Bearer {SECRET}"))
            .body(Body::empty())
            .unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {SECRET}"))
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint_no_auth_required() {
        let (app, _backend) = setup_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_containers_require_auth() {
        let (app, _backend) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/containers")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/containers")
                    .header("Authorization", SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_containers_is_normalized() {
        let (app, _backend) = setup_test_app().await;

        let response = app.oneshot(get("/api/v1/containers")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response: ApiResponse<Vec<Value>> = read_json(response).await;
        assert!(response.success);
        let containers = response.data.unwrap();
        assert_eq!(containers.len(), 4);
        for container in containers {
            assert_eq!(container["mounts"], json!([]));
            assert_eq!(container["ports"], json!([]));
            assert_eq!(container["networks"], json!([]));
            assert_eq!(container["labels"], json!({}));
        }
    }

    #[tokio::test]
    async fn test_get_unknown_container_is_not_found() {
        let (app, _backend) = setup_test_app().await;

        let response = app.oneshot(get("/api/v1/containers/ghost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response: ApiResponse<Value> = read_json(response).await;
        assert!(!response.success);
        assert!(response.error.unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_stop_with_timeout_body() {
        let (app, backend) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(post("/api/v1/containers/a/stop", r#"{"timeout": 45}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome: OperationOutcome = read_json(response).await;
        assert!(outcome.success);
        assert_eq!(outcome.id, "a");

        let response = app
            .oneshot(post("/api/v1/containers/b/stop", r#"{"timeout": 0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(
            backend.calls().await,
            vec![
                BackendCall::Stop {
                    id: "a".to_string(),
                    timeout_secs: 45,
                },
                BackendCall::Stop {
                    id: "b".to_string(),
                    timeout_secs: DEFAULT_TIMEOUT_SECS,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stop_with_string_timeout_uses_default() {
        let (app, backend) = setup_test_app().await;

        let response = app
            .oneshot(post("/api/v1/containers/a/stop", r#"{"timeout": "30"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            backend.calls().await,
            vec![BackendCall::Stop {
                id: "a".to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            }]
        );
    }

    #[tokio::test]
    async fn test_start_without_body_on_running_container() {
        let (app, backend) = setup_test_app().await;

        let response = app
            .oneshot(post("/api/v1/containers/a/start", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let outcome: OperationOutcome = read_json(response).await;
        assert!(outcome.success);
        assert_eq!(backend.calls().await, vec![BackendCall::Start("a".to_string())]);
    }

    #[tokio::test]
    async fn test_unknown_operation_is_client_error() {
        let (app, backend) = setup_test_app().await;

        let response = app
            .oneshot(post("/api/v1/containers/a/pause", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_stop_body_is_rejected() {
        let (app, backend) = setup_test_app().await;

        let response = app
            .oneshot(post("/api/v1/containers/a/stop", "{timeout:"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_operation_on_undeterminable_container() {
        let (app, backend) = setup_test_app().await;

        let response = app
            .clone()
            .oneshot(post("/api/v1/containers/blank/restart", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let outcome: OperationOutcome = read_json(response).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("could not be determined"));

        let response = app
            .oneshot(post("/api/v1/containers/ghost/start", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_stop_with_partial_failure() {
        let (app, backend) = setup_test_app().await;
        backend.fail_on("b").await;

        let response = app
            .oneshot(post(
                "/api/v1/containers/bulk/stop",
                r#"{"container_ids": ["a", "b"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let outcomes: Vec<BulkOutcome> = read_json(response).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].id, "a");
        assert!(outcomes[0].success);
        assert!(outcomes[0].error.is_none());
        assert_eq!(outcomes[1].id, "b");
        assert!(!outcomes[1].success);
        assert!(outcomes[1].error.is_some());
        assert!(outcomes[1].message.is_none());
    }

    #[tokio::test]
    async fn test_bulk_rejects_empty_and_malformed_requests() {
        let (app, backend) = setup_test_app().await;

        for body in [r#"{"container_ids": []}"#, "[", r#"{"force": true}"#] {
            let response = app
                .clone()
                .oneshot(post("/api/v1/containers/bulk/restart", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        }

        let response = app
            .oneshot(post(
                "/api/v1/containers/bulk/explode",
                r#"{"container_ids": ["a"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_system_info() {
        let (app, backend) = setup_test_app().await;
        backend
            .set_system_info(json!({"Containers": "4", "Images": 9.7, "ServerVersion": "27.1"}))
            .await;

        let response = app.oneshot(get("/api/v1/system/info")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response: ApiResponse<SystemInfoSummary> = read_json(response).await;
        let summary = response.data.unwrap();
        assert_eq!(summary.containers, 4);
        assert_eq!(summary.containers_running, 0);
        assert_eq!(summary.images, 9);
        assert_eq!(summary.server_version.as_deref(), Some("27.1"));
    }
}
