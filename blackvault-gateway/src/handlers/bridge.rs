use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use blackvault_core::Data;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct BridgeRequest {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

/// `POST /chatbridge`: authenticated entry point for typed submissions from
/// the external chat tooling.
///
/// The token is checked before the payload is looked at. An unrecognized
/// `type` is acknowledged, not treated as an error, so new submission kinds
/// can be rolled out caller-first.
pub async fn chatbridge(
    State(data): State<Data>,
    Json(body): Json<BridgeRequest>,
) -> Result<Json<Value>, ApiError> {
    let authorized = match (&data.bridge_secret, &body.token) {
        (Some(secret), Some(token)) => token == secret,
        _ => false,
    };

    if !authorized {
        return Err(ApiError::InvalidToken);
    }

    let kind = body.kind.unwrap_or_default();
    info!(kind = %kind, "chatbridge submission received");

    if kind == "layout" {
        let room_count = body
            .payload
            .as_ref()
            .and_then(|payload| payload.get("rooms"))
            .and_then(Value::as_array)
            .map(Vec::len);

        let mut response = json!({ "status": "layout received" });
        if let Some(count) = room_count {
            response["roomCount"] = count.into();
        }

        return Ok(Json(response));
    }

    Ok(Json(json!({ "status": "unknown type", "type": kind })))
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use tower::ServiceExt;

    use super::chatbridge;
    use crate::handlers::test_support::test_data;

    fn app(secret: Option<&str>) -> Router {
        Router::new()
            .route("/chatbridge", post(chatbridge))
            .with_state(test_data(secret))
    }

    async fn send(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/chatbridge")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();

        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn wrong_token_is_rejected_before_payload_inspection() {
        let bodies = [
            serde_json::json!({ "token": "nope", "type": "layout", "payload": { "rooms": [1, 2] } }),
            serde_json::json!({ "type": "layout" }),
            serde_json::json!({ "token": "nope", "payload": 42 }),
        ];

        for body in bodies {
            let (status, json) = send(app(Some("s3cret")), body.clone()).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "body: {body}");
            assert_eq!(json["error"], "Invalid token.");
        }
    }

    #[tokio::test]
    async fn unconfigured_secret_rejects_everything() {
        let (status, _) = send(
            app(None),
            serde_json::json!({ "token": "anything", "type": "layout" }),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn layout_submission_reports_room_count() {
        let (status, json) = send(
            app(Some("s3cret")),
            serde_json::json!({
                "token": "s3cret",
                "type": "layout",
                "payload": { "rooms": [{}, {}, {}] }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "layout received");
        assert_eq!(json["roomCount"], 3);
    }

    #[tokio::test]
    async fn layout_without_rooms_omits_the_count() {
        let (status, json) = send(
            app(Some("s3cret")),
            serde_json::json!({ "token": "s3cret", "type": "layout", "payload": {} }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "layout received");
        assert!(json.get("roomCount").is_none());
    }

    #[tokio::test]
    async fn unknown_type_is_acknowledged_not_rejected() {
        let (status, json) = send(
            app(Some("s3cret")),
            serde_json::json!({ "token": "s3cret", "type": "ping", "payload": {} }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "unknown type");
        assert_eq!(json["type"], "ping");
    }
}
