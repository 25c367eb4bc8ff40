use super::parse_order_id;
use crate::{
    abstract_trait::{
        DynCustomerQueryRepository, DynPaymentGrpcClient, DynPaymentIntentRepository,
        DynProductQueryRepository,
        order::{DynOrderCommandRepository, DynOrderQueryRepository, OrderCommandServiceTrait},
    },
    domain::{
        requests::{
            order::{
                CreateOrderRecordRequest, CreateOrderRequest, UpdateOrderRecordRequest,
                UpdateOrderRequest,
            },
            payment::PaymentInitiation,
        },
        response::{
            api::ApiResponse,
            order::{CreateOrderResponse, OrderResponse},
        },
    },
};
use async_trait::async_trait;
use opentelemetry::{Context, KeyValue};
use prometheus_client::registry::Registry;
use shared::{
    domain::{EnumMapping, OrderStatus},
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer, SagaIncident, SagaMetrics},
};
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct OrderCommandService {
    product: DynProductQueryRepository,
    customer: DynCustomerQueryRepository,
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    intents: DynPaymentIntentRepository,
    payment_client: DynPaymentGrpcClient,
    tracer: OperationTracer,
    saga: SagaMetrics,
}

pub struct OrderCommandServiceDeps {
    pub product: DynProductQueryRepository,
    pub customer: DynCustomerQueryRepository,
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub intents: DynPaymentIntentRepository,
    pub payment_client: DynPaymentGrpcClient,
    pub saga: SagaMetrics,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            product,
            customer,
            query,
            command,
            intents,
            payment_client,
            saga,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("order_command_service", registry);

        Self {
            product,
            customer,
            query,
            command,
            intents,
            payment_client,
            tracer: OperationTracer::new("order-command-service", metrics),
            saga,
        }
    }

    async fn place_order(
        &self,
        req: &CreateOrderRequest,
        cx: &Context,
    ) -> Result<CreateOrderResponse, ServiceError> {
        req.validate()?;
        let record = CreateOrderRecordRequest::try_from(req)?;

        let product = self
            .product
            .find_by_id(record.product_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", record.product_id))
            })?;

        if !product.is_available {
            return Err(ServiceError::Validation(vec![format!(
                "product_id: {} is not available",
                product.id
            )]));
        }

        let customer = self
            .customer
            .find_by_id(record.customer_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", record.customer_id))
            })?;

        let (order, details) = self.command.create_order_with_details(&record).await?;

        let initiation =
            PaymentInitiation::for_order(&order, &product, &customer, record.payment_method);

        match self.payment_client.create_payment(&initiation, cx).await {
            Ok(payment) => {
                info!(
                    "✅ Payment {} ({}) pending for order {}",
                    payment.id, payment.merchant_request_id, order.id
                );
                if let Err(err) = self.intents.mark_initiated(order.id, &payment.id).await {
                    warn!(
                        "⚠️ Payment {} started but the marker of order {} was not updated: {err}",
                        payment.id, order.id
                    );
                }
            }
            Err(err) if !err.is_rejection() => {
                // The payment may still have been created; the marker stays
                // PENDING so the reconciler reports it instead of cancelling.
                warn!(
                    target: "saga",
                    order_id = %order.id,
                    amount = initiation.amount,
                    "⚠️ Payment outcome unknown for stored order: {err}"
                );
                return Err(err);
            }
            Err(err) => {
                error!(
                    target: "saga",
                    order_id = %order.id,
                    amount = initiation.amount,
                    "❌ Order stored but no payment was created: {err}"
                );
                self.saga.record(SagaIncident::OrderWithoutPayment);

                if let Err(mark_err) = self.intents.mark_failed(order.id, &err.to_string()).await
                {
                    error!(
                        target: "saga",
                        order_id = %order.id,
                        "❌ Could not flag the payment marker as failed: {mark_err}"
                    );
                }
                return Err(err);
            }
        }

        Ok(CreateOrderResponse {
            order: OrderResponse::try_from(order)?,
            order_details: details.into(),
        })
    }

    async fn apply_update(&self, req: &UpdateOrderRequest) -> Result<OrderResponse, ServiceError> {
        req.validate()?;
        let order_id = parse_order_id(&req.order_id)?;

        let current = self
            .query
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;
        let current_status = OrderStatus::from_storage(&current.order_status)?;

        if let Some(next) = req.patch.order_status {
            if !current_status.can_transition_to(next) {
                return Err(ServiceError::InvalidTransition(format!(
                    "order {order_id} cannot move from {} to {}",
                    current_status.as_storage(),
                    next.as_storage()
                )));
            }
        }

        let record = UpdateOrderRecordRequest {
            order_id,
            expected_status: current_status,
            patch: req.patch.clone(),
        };

        let updated = self.command.update_order(&record).await?.ok_or_else(|| {
            ServiceError::Conflict(format!(
                "order {order_id} left {} while being updated",
                current_status.as_storage()
            ))
        })?;

        Ok(OrderResponse::try_from(updated)?)
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreateOrderResponse>, ServiceError> {
        info!(
            "🛒 Creating order for customer {} (product {} x{})",
            req.order.customer_id, req.product_id, req.product_quantity
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.customer_id", req.order.customer_id.clone()),
                KeyValue::new("order.product_id", req.product_id.clone()),
            ],
        );

        match self.place_order(req, &tracing_ctx.cx).await {
            Ok(created) => {
                self.tracer.success(
                    &tracing_ctx,
                    method,
                    &format!("Order {} created", created.order.id),
                );
                Ok(ApiResponse::success("Order created successfully", created))
            }
            Err(err) => {
                self.tracer.error(&tracing_ctx, method, &err.to_string());
                Err(err)
            }
        }
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🔄 Updating order {}", req.order_id);

        let method = Method::Put;
        let tracing_ctx = self.tracer.start(
            "update_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update"),
                KeyValue::new("order.id", req.order_id.clone()),
            ],
        );

        match self.apply_update(req).await {
            Ok(order) => {
                self.tracer.success(
                    &tracing_ctx,
                    method,
                    &format!("Order {} is {:?}", order.id, order.order_status),
                );
                Ok(ApiResponse::success("Order updated successfully", order))
            }
            Err(err) => {
                self.tracer.error(&tracing_ctx, method, &err.to_string());
                Err(err)
            }
        }
    }
}
