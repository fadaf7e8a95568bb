//! # Gateway Scenarios
//!
//! Each test drives one documented behaviour through the complete router:
//! request in, exactly one envelope and one status out.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use admin_gateway::adapters::StubReply;
    use admin_gateway::dispatch::status_for;
    use admin_gateway::domain::error::codes;
    use admin_gateway::TransportError;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::{Duration, Instant};
    use tower::ServiceExt;

    // =============================================================================
    // SUCCESS PATH
    // =============================================================================

    #[tokio::test]
    async fn test_ban_user() {
        let payload = json!({"userId": "u1", "status": "banned"});
        let gw = TestGateway::new(StubReply::Success(payload.clone()));

        let res = gw
            .send(Method::POST, "/users/ban", r#"{"userId":"u1","reason":"spam"}"#)
            .await;

        assert_eq!(res.status, StatusCode::OK);
        assert!(res.envelope.message.contains("banned"));
        assert_eq!(res.envelope.data, Some(payload));
        assert!(res.envelope.error_body.is_none());
        assert_eq!(
            gw.backend.last_call(),
            Some(("admin.banUser", json!({"userId": "u1", "reason": "spam"})))
        );
    }

    #[tokio::test]
    async fn test_payload_round_trips_unmodified() {
        let payloads = [
            json!(null),
            json!([]),
            json!({"users": [{"id": "u1", "role": "super-admin", "uploadsBlocked": false}]}),
            json!({"unicode": "ünïcödé ✓", "big": 18446744073709551615u64, "float": 0.5}),
        ];
        for payload in payloads {
            let gw = TestGateway::new(StubReply::Success(payload.clone()));
            let res = gw.send(Method::GET, "/users", "").await;
            assert_eq!(res.status, StatusCode::OK);
            assert_eq!(res.envelope.data, Some(payload));
        }
    }

    #[tokio::test]
    async fn test_freeze_and_unfreeze_forward_channel_id() {
        let gw = TestGateway::new(StubReply::Success(json!({})));

        gw.send(
            Method::POST,
            "/channels/freeze",
            r#"{"channelId":"c-42","reason":"raid"}"#,
        )
        .await;
        assert_eq!(
            gw.backend.last_call(),
            Some((
                "admin.freezeChannel",
                json!({"channelId": "c-42", "reason": "raid"})
            ))
        );

        let res = gw
            .send(Method::POST, "/channels/unfreeze", r#"{"channelId":"c-42"}"#)
            .await;
        assert_eq!(res.envelope.message, "channel unfrozen");
        assert_eq!(
            gw.backend.last_call(),
            Some(("admin.unfreezeChannel", json!({"channelId": "c-42"})))
        );
    }

    #[tokio::test]
    async fn test_empty_identifier_forwarded() {
        let gw = TestGateway::new(StubReply::domain(codes::NOT_FOUND, "user  not found"));
        let res = gw
            .send(Method::POST, "/users/unban", r#"{"userId":"","reason":""}"#)
            .await;
        // Semantic validation belongs to the backend
        assert_eq!(gw.backend.call_count(), 1);
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    // =============================================================================
    // BINDING ERRORS
    // =============================================================================

    #[tokio::test]
    async fn test_malformed_bodies_never_reach_backend() {
        let gw = TestGateway::new(StubReply::Success(json!({})));
        let bodies = [
            "",
            "not json",
            r#"{"userId":"u1""#,
            r#"["u1","admin"]"#,
            r#"{"userId":"u1"}"#,
            r#"{"userId":42,"role":"admin"}"#,
        ];

        for body in bodies {
            let res = gw.send(Method::POST, "/users/change-role", body).await;
            assert_eq!(res.status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(res.envelope.message, "invalid request body");
            assert_eq!(res.envelope.error_code, Some(400));
        }
        assert_eq!(gw.backend.call_count(), 0);
        assert_eq!(
            gw.metrics.binding_rejected.load(Ordering::Relaxed),
            bodies.len() as u64
        );
    }

    #[tokio::test]
    async fn test_missing_identity_is_contract_error() {
        let gw = TestGateway::new(StubReply::Success(json!({})));

        for (method, path, body) in [
            (Method::POST, "/users/uploads-block", r#"{"userId":"u1","block":true}"#),
            (Method::DELETE, "/users/delete", r#"{"userId":"u1","reason":"gdpr"}"#),
            (Method::DELETE, "/channels/delete", r#"{"channelId":"c1"}"#),
            (Method::DELETE, "/files/delete", r#"{"fileId":"f1"}"#),
        ] {
            let res = gw.send(method, path, body).await;
            assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR, "{path}");
            assert_ne!(res.status, StatusCode::OK);
            assert_eq!(res.envelope.error_body.unwrap().code, codes::INTERNAL);
        }
        assert_eq!(gw.backend.call_count(), 0);
        assert_eq!(gw.metrics.contract_violations.load(Ordering::Relaxed), 4);
    }

    // =============================================================================
    // DOMAIN ERRORS
    // =============================================================================

    #[tokio::test]
    async fn test_every_contract_code_maps_to_its_status() {
        let gw = TestGateway::new(StubReply::Success(json!({})));
        for code in codes::ALL {
            gw.backend
                .set_reply(StubReply::domain(code, format!("rejected with {code}")));
            let res = gw.send(Method::GET, "/channels", "").await;

            assert_eq!(res.status, status_for(code), "{code}");
            assert_eq!(res.envelope.error_code, Some(res.status.as_u16()));
            let body = res.envelope.error_body.unwrap();
            assert_eq!(body.code, code);
            assert_eq!(body.message, format!("rejected with {code}"));
        }
    }

    #[tokio::test]
    async fn test_unknown_domain_code_keeps_message() {
        let gw = TestGateway::new(StubReply::domain(
            "QUOTA_EXCEEDED",
            "moderator quota of 500 bans per day reached",
        ));
        let res = gw
            .send(Method::POST, "/users/ban", r#"{"userId":"u1","reason":"spam"}"#)
            .await;

        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = res.envelope.error_body.unwrap();
        assert_eq!(body.code, "QUOTA_EXCEEDED");
        assert_eq!(body.message, "moderator quota of 500 bans per day reached");
    }

    // =============================================================================
    // TRANSPORT ERRORS
    // =============================================================================

    #[tokio::test]
    async fn test_hanging_backend_resolves_504_within_deadline() {
        let timeout = Duration::from_millis(150);
        let gw = TestGateway::with_config(config(timeout), StubReply::Hang);

        let started = Instant::now();
        let res = gw.send(Method::GET, "/files", "").await;
        let elapsed = started.elapsed();

        assert_eq!(res.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(res.envelope.message, "upstream timed out");
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_millis(300), "{elapsed:?}");
        assert!(gw.backend.was_cancelled().await);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_503_without_cause() {
        let gw = TestGateway::new(StubReply::Transport(TransportError::Unreachable(
            "tcp connect error: Connection refused (os error 111) 10.1.2.3:50051".into(),
        )));
        let res = gw.send(Method::GET, "/channels/c1", "").await;

        assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(res.envelope.message, "upstream unavailable");
        let rendered = serde_json::to_string(&res.envelope).unwrap();
        assert!(!rendered.contains("10.1.2.3"));
    }

    #[tokio::test]
    async fn test_client_disconnect_cancels_backend_call() {
        let gw = TestGateway::with_config(config(Duration::from_secs(30)), StubReply::Hang);

        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("{PREFIX}/users?filter=active"))
            .body(Body::empty())
            .unwrap();
        // Dropping the response future is what the server does when the
        // connection goes away
        let in_flight = tokio::spawn(gw.router.clone().oneshot(req));

        assert!(gw.backend.wait_for_call().await);
        in_flight.abort();

        assert!(gw.backend.was_cancelled().await);
        assert_eq!(gw.metrics.cancelled.load(Ordering::Relaxed), 1);
        assert_eq!(gw.metrics.in_flight.load(Ordering::Relaxed), 0);
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test]
    async fn test_concurrent_requests_do_not_serialize() {
        let gw = std::sync::Arc::new(TestGateway::new(StubReply::Delayed(
            Duration::from_millis(100),
            json!({"ok": true}),
        )));

        let started = Instant::now();
        let mut handles = Vec::new();
        for i in 0..20 {
            let gw = gw.clone();
            handles.push(tokio::spawn(async move {
                let body = format!(r#"{{"userId":"u{i}","reason":"spam"}}"#);
                gw.send(Method::POST, "/users/ban", &body).await.status
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        assert!(started.elapsed() < Duration::from_millis(1000));
        assert_eq!(gw.backend.call_count(), 20);
    }

    // =============================================================================
    // SURFACE
    // =============================================================================

    #[tokio::test]
    async fn test_delete_file_path_alias() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        let res = gw
            .send_as(OPERATOR_TOKEN, Method::DELETE, "/files/f-77", "")
            .await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.envelope.message, "file deleted");
        assert_eq!(
            gw.backend.last_call(),
            Some((
                "admin.deleteFile",
                json!({"fileId": "f-77", "actorId": OPERATOR_ID})
            ))
        );
    }

    #[tokio::test]
    async fn test_prometheus_export() {
        let gw = TestGateway::new(StubReply::Success(json!({})));
        gw.send(Method::GET, "/files", "").await;

        let req = Request::builder()
            .uri("/metrics/prometheus")
            .body(Body::empty())
            .unwrap();
        let response = gw.router.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(text.to_vec()).unwrap();
        assert!(text.contains("admin_gateway_requests_success_total 1"));
    }
}
