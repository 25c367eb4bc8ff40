use crate::{
    abstract_trait::{
        DynPaymentGateway,
        payment::{DynPaymentCommandRepository, PaymentCommandServiceTrait},
    },
    domain::{
        requests::payment::{CreatePaymentRecordRequest, CreatePaymentRequest},
        response::{api::ApiResponse, payment::PaymentResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::CURRENCY_KES,
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer, SagaIncident, SagaMetrics},
};
use tracing::{error, info};
use validator::Validate;

#[derive(Clone)]
pub struct PaymentCommandService {
    gateway: DynPaymentGateway,
    command: DynPaymentCommandRepository,
    tracer: OperationTracer,
    saga: SagaMetrics,
}

pub struct PaymentCommandServiceDeps {
    pub gateway: DynPaymentGateway,
    pub command: DynPaymentCommandRepository,
    pub saga: SagaMetrics,
}

impl PaymentCommandService {
    pub fn new(deps: PaymentCommandServiceDeps, registry: &mut Registry) -> Self {
        let PaymentCommandServiceDeps {
            gateway,
            command,
            saga,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("payment_command_service", registry);

        Self {
            gateway,
            command,
            tracer: OperationTracer::new("payment-command-service", metrics),
            saga,
        }
    }
}

#[async_trait]
impl PaymentCommandServiceTrait for PaymentCommandService {
    async fn create_payment(
        &self,
        req: &CreatePaymentRequest,
    ) -> Result<ApiResponse<PaymentResponse>, ServiceError> {
        info!("💳 Creating payment for order_id={}", req.order_id);

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "create_payment",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("operation", "create"),
                KeyValue::new("payment.order_id", req.order_id.clone()),
            ],
        );

        if let Err(errors) = req.validate() {
            self.tracer
                .error(&tracing_ctx, method, "Payment request failed validation");
            return Err(ServiceError::from(errors));
        }

        let receipt = match self
            .gateway
            .initiate_stk_push(&req.order_id, &req.customer_phone, req.amount)
            .await
        {
            Ok(receipt) => receipt,
            Err(err) => {
                error!("❌ STK push for order {} failed: {err}", req.order_id);
                self.tracer
                    .error(&tracing_ctx, method, "Payment gateway call failed");
                return Err(ServiceError::from(err));
            }
        };

        let record = CreatePaymentRecordRequest {
            order_id: req.order_id.clone(),
            customer_id: req.customer_id.clone(),
            payment_method: req.payment_method,
            merchant_request_id: receipt.merchant_request_id.clone(),
            checkout_request_id: receipt.checkout_request_id.clone(),
            amount: req.amount,
            currency: CURRENCY_KES.to_string(),
            description: format!("Payment for order {}", req.order_id),
            shipping_cost: req.shipping_fee,
            product_cost: req.product_cost,
        };

        let payment = match self.command.create_payment(&record).await {
            Ok(payment) => payment,
            Err(err) => {
                error!(
                    target: "saga",
                    order_id = %req.order_id,
                    merchant_request_id = %receipt.merchant_request_id,
                    "❌ STK push accepted by provider but the payment was not stored: {err}"
                );
                self.saga.record(SagaIncident::PaymentWithoutRecord);
                self.tracer
                    .error(&tracing_ctx, method, "Failed to store payment");
                return Err(ServiceError::Repo(err));
            }
        };

        let response = match PaymentResponse::try_from(payment) {
            Ok(response) => response,
            Err(err) => {
                self.tracer
                    .error(&tracing_ctx, method, "Stored payment is unreadable");
                return Err(ServiceError::from(err));
            }
        };

        self.tracer.success(
            &tracing_ctx,
            method,
            &format!("Payment {} pending for order {}", response.id, response.order_id),
        );

        Ok(ApiResponse::success("Payment initiated successfully", response))
    }
}
