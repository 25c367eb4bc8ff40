use crate::{
    abstract_trait::DynCallbackService,
    domain::{
        requests::callback::{
            CallbackItem, CallbackMetadata, StkCallback, StkCallbackBody, StkCallbackEnvelope,
        },
        response::callback::CallbackResponse,
    },
};
use axum::{
    Extension, Json, Router,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use shared::errors::{ErrorResponse, HttpError};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::warn;
use utoipa::OpenApi;

const MAX_CALLBACK_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(handle_callback),
    components(schemas(
        StkCallbackEnvelope,
        StkCallbackBody,
        StkCallback,
        CallbackMetadata,
        CallbackItem,
        CallbackResponse,
        ErrorResponse
    )),
    tags((name = "Callback", description = "M-Pesa STK push result webhook"))
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/callback",
    tag = "Callback",
    request_body = StkCallbackEnvelope,
    responses(
        (status = 200, description = "Payment completed", body = CallbackResponse),
        (status = 400, description = "Malformed callback body", body = CallbackResponse),
        (status = 402, description = "Payment canceled or failed", body = CallbackResponse),
        (status = 404, description = "Unknown merchant request id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn handle_callback(
    Extension(service): Extension<DynCallbackService>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let envelope: StkCallbackEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!("⚠️ Rejecting malformed callback body: {err}");
            return Ok((StatusCode::BAD_REQUEST, Json(json!({"status": "failed"}))).into_response());
        }
    };

    let outcome = service.handle_callback(&envelope.body.stk_callback).await?;

    Ok((outcome.status_code(), Json(CallbackResponse::from(outcome))).into_response())
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

pub fn callback_router(service: DynCallbackService) -> Router {
    Router::new()
        .route("/callback", post(handle_callback))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(RequestBodyLimitLayer::new(MAX_CALLBACK_BYTES))
        .layer(Extension(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::{CallbackService, CallbackServiceDeps},
        test_support::{MockOrderClient, MockPaymentRepository},
    };
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use prometheus_client::registry::Registry;
    use serde_json::Value;
    use shared::utils::SagaMetrics;
    use std::{
        sync::{Arc, atomic::Ordering},
        time::Duration,
    };
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MockPaymentRepository>, Arc<MockOrderClient>) {
        let repo = Arc::new(MockPaymentRepository::default());
        let orders = Arc::new(MockOrderClient::default());

        let service = CallbackService::new(
            CallbackServiceDeps {
                query: repo.clone(),
                command: repo.clone(),
                order_client: orders.clone(),
                order_rpc_timeout: Duration::from_secs(1),
                saga: SagaMetrics::default(),
            },
            &mut Registry::default(),
        );

        (callback_router(Arc::new(service)), repo, orders)
    }

    fn body(merchant_request_id: &str, result_code: i64) -> String {
        json!({
            "Body": {
                "stkCallback": {
                    "MerchantRequestID": merchant_request_id,
                    "CheckoutRequestID": "ws_CO_1",
                    "ResultCode": result_code,
                    "ResultDesc": "desc"
                }
            }
        })
        .to_string()
    }

    async fn post_callback(app: &Router, payload: String) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/callback")
                    .header("content-type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn success_callback_returns_200() {
        let (app, repo, orders) = app();
        let id = repo.insert_pending("o1", "MR1");

        let (status, json) = post_callback(&app, body("MR1", 0)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "payment successful");
        assert_eq!(repo.status_of(id), "COMPLETED");
        assert_eq!(orders.calls().len(), 1);
    }

    #[tokio::test]
    async fn order_rpc_failure_returns_500() {
        let (app, repo, orders) = app();
        let id = repo.insert_pending("o1", "MR1");
        orders.fail.store(true, Ordering::SeqCst);

        let (status, json) = post_callback(&app, body("MR1", 0)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], "error");
        assert_eq!(repo.status_of(id), "PENDING");
    }

    #[tokio::test]
    async fn cancellation_returns_402() {
        let (app, repo, orders) = app();
        let id = repo.insert_pending("o1", "MR1");

        let (status, json) = post_callback(&app, body("MR1", 1032)).await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(json["status"], "payment canceled");
        assert_eq!(repo.status_of(id), "CANCELED");
        assert!(orders.calls().is_empty());
    }

    #[tokio::test]
    async fn other_codes_return_402_failed() {
        let (app, repo, _) = app();
        let id = repo.insert_pending("o1", "MR1");

        let (status, json) = post_callback(&app, body("MR1", 1037)).await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(json["status"], "payment failed");
        assert_eq!(repo.status_of(id), "FAILED");
    }

    #[tokio::test]
    async fn unknown_merchant_request_id_returns_404() {
        let (app, _, _) = app();

        let (status, _) = post_callback(&app, body("nope", 0)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_body_returns_400_without_side_effects() {
        let (app, repo, orders) = app();
        let id = repo.insert_pending("o1", "MR1");

        for payload in ["{not json", r#"{"Body":{}}"#, ""] {
            let (status, json) = post_callback(&app, payload.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json, json!({"status": "failed"}));
        }

        assert_eq!(repo.status_of(id), "PENDING");
        assert!(orders.calls().is_empty());
    }

    #[tokio::test]
    async fn redelivery_answers_the_same_without_a_second_rpc() {
        let (app, repo, orders) = app();
        repo.insert_pending("o1", "MR1");

        let first = post_callback(&app, body("MR1", 0)).await;
        let second = post_callback(&app, body("MR1", 0)).await;

        assert_eq!(first, second);
        assert_eq!(orders.calls().len(), 1);
    }
}
