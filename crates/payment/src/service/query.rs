use crate::{
    abstract_trait::payment::{DynPaymentQueryRepository, PaymentQueryServiceTrait},
    domain::response::{api::ApiResponse, payment::PaymentResponse},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentQueryService {
    query: DynPaymentQueryRepository,
    tracer: OperationTracer,
}

impl PaymentQueryService {
    pub fn new(query: DynPaymentQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("payment_query_service", registry);

        Self {
            query,
            tracer: OperationTracer::new("payment-query-service", metrics),
        }
    }
}

fn parse_payment_id(id: &str) -> Result<Uuid, ServiceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::Validation(vec!["id: is required".into()]));
    }
    Uuid::parse_str(id)
        .map_err(|_| ServiceError::Validation(vec![format!("id: {id} is not a valid UUID")]))
}

#[async_trait]
impl PaymentQueryServiceTrait for PaymentQueryService {
    async fn find_by_id(&self, id: &str) -> Result<ApiResponse<PaymentResponse>, ServiceError> {
        info!("🔍 Finding payment id={id}");

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_payment_by_id",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("payment.id", id.to_string()),
            ],
        );

        let result = async {
            let payment_id = parse_payment_id(id)?;
            let payment = self
                .query
                .find_by_id(payment_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Payment {payment_id} not found")))?;
            Ok::<_, ServiceError>(PaymentResponse::try_from(payment)?)
        }
        .await;

        match result {
            Ok(payment) => {
                self.tracer
                    .success(&tracing_ctx, method, "Payment retrieved");
                Ok(ApiResponse::success("Payment retrieved successfully", payment))
            }
            Err(err) => {
                self.tracer.error(&tracing_ctx, method, &err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockPaymentRepository;
    use std::sync::Arc;

    fn service(repo: Arc<MockPaymentRepository>) -> PaymentQueryService {
        PaymentQueryService::new(repo, &mut Registry::default())
    }

    #[tokio::test]
    async fn finds_stored_payment() {
        let repo = Arc::new(MockPaymentRepository::default());
        let id = repo.insert_pending("o1", "MR1");

        let response = service(repo).find_by_id(&id.to_string()).await.unwrap();
        assert_eq!(response.data.id, id.to_string());
        assert_eq!(response.data.order_id, "o1");
    }

    #[tokio::test]
    async fn rejects_blank_and_malformed_ids() {
        let svc = service(Arc::new(MockPaymentRepository::default()));

        assert!(matches!(
            svc.find_by_id("  ").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            svc.find_by_id("not-a-uuid").await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let svc = service(Arc::new(MockPaymentRepository::default()));
        assert!(matches!(
            svc.find_by_id(&Uuid::new_v4().to_string()).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
