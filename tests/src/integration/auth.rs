//! # Operator Authentication
//!
//! Token resolution through the full router and the actor it attaches to
//! attributable actions.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::*;
    use admin_gateway::adapters::StubReply;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        let res = gw.send(Method::GET, "/users", "").await;

        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(res.envelope.error_body.unwrap().code, "UNAUTHORIZED");
        assert_eq!(gw.backend.call_count(), 0);
        assert_eq!(gw.metrics.auth_rejected.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_wrong_token_rejected() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        let res = gw
            .send_as("tok-7f3a9d", Method::DELETE, "/files/delete", r#"{"fileId":"f1"}"#)
            .await;

        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(gw.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_operator_becomes_actor() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        let res = gw
            .send_as(
                OPERATOR_TOKEN,
                Method::DELETE,
                "/files/delete",
                r#"{"fileId":"f1"}"#,
            )
            .await;

        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            gw.backend.last_call(),
            Some((
                "admin.deleteFile",
                json!({"fileId": "f1", "actorId": OPERATOR_ID})
            ))
        );
    }

    #[tokio::test]
    async fn test_actor_not_forwarded_for_plain_actions() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        gw.send_as(
            OPERATOR_TOKEN,
            Method::POST,
            "/users/ban",
            r#"{"userId":"u1","reason":"spam"}"#,
        )
        .await;

        let (_, params) = gw.backend.last_call().unwrap();
        assert!(params.get("actorId").is_none());
    }

    #[tokio::test]
    async fn test_body_cannot_spoof_actor() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        gw.send_as(
            OPERATOR_TOKEN,
            Method::DELETE,
            "/channels/delete",
            r#"{"channelId":"c1","actorId":"someone-else"}"#,
        )
        .await;

        let (_, params) = gw.backend.last_call().unwrap();
        assert_eq!(params["actorId"], OPERATOR_ID);
    }

    #[tokio::test]
    async fn test_api_key_header_accepted() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!([])));
        let req = Request::builder()
            .method(Method::GET)
            .uri(format!("{PREFIX}/channels"))
            .header("x-api-key", OPERATOR_TOKEN)
            .body(Body::empty())
            .unwrap();

        let res = gw.send_request(req).await;
        assert_eq!(res.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_open_without_token() {
        let gw = TestGateway::with_config(authenticated_config(), StubReply::Success(json!({})));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = gw.router.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
