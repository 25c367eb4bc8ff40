use super::parse_order_id;
use crate::{
    abstract_trait::order::{DynOrderQueryRepository, OrderQueryServiceTrait},
    domain::response::{api::ApiResponse, order::OrderResponse},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer},
};
use tracing::info;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    tracer: OperationTracer,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register("order_query_service", registry);

        Self {
            query,
            tracer: OperationTracer::new("order-query-service", metrics),
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn get_order(&self, id: &str) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🔍 Finding order id={id}");

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "get_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result = async {
            let order_id = parse_order_id(id)?;
            let order = self
                .query
                .find_by_id(order_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;
            Ok::<_, ServiceError>(OrderResponse::try_from(order)?)
        }
        .await;

        match result {
            Ok(order) => {
                self.tracer.success(&tracing_ctx, method, "Order retrieved");
                Ok(ApiResponse::success("Order retrieved successfully", order))
            }
            Err(err) => {
                self.tracer.error(&tracing_ctx, method, &err.to_string());
                Err(err)
            }
        }
    }
}
