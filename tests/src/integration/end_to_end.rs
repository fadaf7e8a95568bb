//! # End to End
//!
//! A served gateway on a real socket, talking JSON-RPC over HTTP to a fake
//! backend. Exercises the pooled client, the wire format and graceful
//! shutdown together.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{config, PREFIX};
    use admin_gateway::{AdminGatewayService, JsonRpcBackend, ResponseEnvelope};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    async fn fake_rpc(Json(req): Json<Value>) -> Response {
        let id = req["id"].clone();
        match req["method"].as_str().unwrap_or_default() {
            "admin.listChannels" => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {"channels": [{"id": "c1", "frozen": false}]}
            }))
            .into_response(),
            "admin.getChannel" => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": -32000,
                    "message": format!("channel {} not found", req["params"]["channelId"].as_str().unwrap_or("?")),
                    "data": {"status": "NOT_FOUND"}
                }
            }))
            .into_response(),
            "admin.freezeChannel" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"jsonrpc": "2.0", "id": id, "result": {}})).into_response()
            }
            _ => Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": -32601, "message": "method not found"}
            }))
            .into_response(),
        }
    }

    async fn spawn_backend() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/rpc", post(fake_rpc));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    struct Served {
        base: String,
        stop: oneshot::Sender<()>,
        handle: tokio::task::JoinHandle<()>,
    }

    impl Served {
        async fn shutdown(self) {
            self.stop.send(()).unwrap();
            tokio::time::timeout(Duration::from_secs(5), self.handle)
                .await
                .expect("gateway drains within 5s")
                .unwrap();
        }
    }

    async fn spawn_gateway(call_timeout: Duration) -> Served {
        let backend_addr = spawn_backend().await;
        let mut config = config(call_timeout);
        config.backend.endpoint = format!("http://{backend_addr}/rpc");

        let backend = JsonRpcBackend::new(&config.backend).unwrap();
        let service = AdminGatewayService::new(config, Arc::new(backend)).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            service
                .serve(listener, async {
                    let _ = stopped.await;
                })
                .await
                .unwrap();
        });

        Served {
            base: format!("http://{addr}{PREFIX}"),
            stop,
            handle,
        }
    }

    #[tokio::test]
    async fn test_list_channels_over_the_wire() {
        let gw = spawn_gateway(Duration::from_secs(2)).await;

        let res = reqwest::get(format!("{}/channels", gw.base)).await.unwrap();
        assert_eq!(res.status(), 200);
        assert!(res.headers().contains_key("x-request-id"));
        let envelope: ResponseEnvelope = res.json().await.unwrap();
        assert_eq!(
            envelope.data,
            Some(json!({"channels": [{"id": "c1", "frozen": false}]}))
        );

        gw.shutdown().await;
    }

    #[tokio::test]
    async fn test_domain_error_over_the_wire() {
        let gw = spawn_gateway(Duration::from_secs(2)).await;

        let res = reqwest::get(format!("{}/channels/c-404", gw.base))
            .await
            .unwrap();
        assert_eq!(res.status(), 404);
        let envelope: ResponseEnvelope = res.json().await.unwrap();
        assert_eq!(envelope.error_code, Some(404));
        let body = envelope.error_body.unwrap();
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.message, "channel c-404 not found");

        gw.shutdown().await;
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_over_the_wire() {
        let gw = spawn_gateway(Duration::from_millis(200)).await;

        let started = std::time::Instant::now();
        let res = reqwest::Client::new()
            .post(format!("{}/channels/freeze", gw.base))
            .json(&json!({"channelId": "c1", "reason": "raid"}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 504);
        assert!(started.elapsed() < Duration::from_secs(2));
        drop(res);

        gw.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_route_envelope() {
        let gw = spawn_gateway(Duration::from_secs(2)).await;

        let res = reqwest::get(format!("{}/users/promote", gw.base))
            .await
            .unwrap();
        assert_eq!(res.status(), 404);
        let envelope: ResponseEnvelope = res.json().await.unwrap();
        assert_eq!(envelope.error_body.unwrap().code, "NOT_FOUND");

        gw.shutdown().await;
    }

    #[tokio::test]
    async fn test_oversized_body_over_the_wire() {
        let gw = spawn_gateway(Duration::from_secs(2)).await;

        // Just past the 64 KiB default so the body fits in loopback buffers
        let reason = "x".repeat(70 * 1024);
        let res = reqwest::Client::new()
            .post(format!("{}/users/ban", gw.base))
            .json(&json!({"userId": "u1", "reason": reason}))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 400);
        let envelope: ResponseEnvelope = res.json().await.unwrap();
        assert_eq!(envelope.message, "invalid request body");
        assert_eq!(envelope.error_body.unwrap().code, "INVALID_REQUEST_BODY");

        gw.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_method_over_the_wire() {
        let gw = spawn_gateway(Duration::from_secs(2)).await;

        let res = reqwest::get(format!("{}/users/ban", gw.base)).await.unwrap();
        assert_eq!(res.status(), 404);
        let envelope: ResponseEnvelope = res.json().await.unwrap();
        assert_eq!(envelope.error_code, Some(404));

        gw.shutdown().await;
    }
}
