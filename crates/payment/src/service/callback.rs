use crate::{
    abstract_trait::{
        CallbackServiceTrait, DynOrderGrpcClient,
        payment::{DynPaymentCommandRepository, DynPaymentQueryRepository},
    },
    domain::{
        requests::callback::{RESULT_CODE_CANCELLED_BY_USER, RESULT_CODE_SUCCESS, StkCallback},
        response::callback::CallbackOutcome,
    },
    model::payment::Payment,
};
use async_trait::async_trait;
use opentelemetry::{Context, KeyValue};
use prometheus_client::registry::Registry;
use shared::{
    domain::{EnumMapping, OrderStatus, PaymentStatus},
    errors::ServiceError,
    utils::{Method, Metrics, OperationTracer, SagaIncident, SagaMetrics},
};
use std::time::Duration;
use tracing::{error, info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct CallbackService {
    query: DynPaymentQueryRepository,
    command: DynPaymentCommandRepository,
    order_client: DynOrderGrpcClient,
    order_rpc_timeout: Duration,
    tracer: OperationTracer,
    saga: SagaMetrics,
}

pub struct CallbackServiceDeps {
    pub query: DynPaymentQueryRepository,
    pub command: DynPaymentCommandRepository,
    pub order_client: DynOrderGrpcClient,
    pub order_rpc_timeout: Duration,
    pub saga: SagaMetrics,
}

impl CallbackService {
    pub fn new(deps: CallbackServiceDeps, registry: &mut Registry) -> Self {
        let CallbackServiceDeps {
            query,
            command,
            order_client,
            order_rpc_timeout,
            saga,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("payment_callback_service", registry);

        Self {
            query,
            command,
            order_client,
            order_rpc_timeout,
            tracer: OperationTracer::new("payment-callback-service", metrics),
            saga,
        }
    }

    /// Applies one provider callback. A redelivery after settlement sends no
    /// order RPC. Deliveries racing on the same pending payment may each
    /// send `processing` to the order; only one of them settles the payment
    /// and the rest report the winner.
    async fn reconcile(
        &self,
        callback: &StkCallback,
        cx: &Context,
    ) -> Result<CallbackOutcome, ServiceError> {
        callback.validate()?;

        let payment = self
            .query
            .find_by_merchant_request_id(&callback.merchant_request_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No payment for merchant_request_id {}",
                    callback.merchant_request_id
                ))
            })?;

        let current = PaymentStatus::from_storage(&payment.status)?;
        if current.is_terminal() {
            info!(
                "🔁 Callback for {} repeats a settled payment ({current:?}), ignoring",
                callback.merchant_request_id
            );
            return Ok(CallbackOutcome::Duplicate(current));
        }
        if current != PaymentStatus::Pending {
            return Err(ServiceError::Internal(format!(
                "Payment {} is in unexpected status {current:?}",
                payment.id
            )));
        }

        let target = match callback.result_code {
            RESULT_CODE_SUCCESS => {
                self.advance_order(&payment, cx).await?;
                PaymentStatus::Completed
            }
            RESULT_CODE_CANCELLED_BY_USER => PaymentStatus::Canceled,
            code => {
                warn!(
                    "⚠️ Payment {} failed with result code {code}: {}",
                    payment.id, callback.result_desc
                );
                PaymentStatus::Failed
            }
        };

        let receipt = match target {
            PaymentStatus::Completed => callback.receipt_number(),
            _ => None,
        };

        self.settle(&payment, target, receipt).await
    }

    async fn advance_order(&self, payment: &Payment, cx: &Context) -> Result<(), ServiceError> {
        let change = self
            .order_client
            .update_order_status(
                &payment.order_id,
                OrderStatus::Processing,
                self.order_rpc_timeout,
                cx,
            )
            .wait()
            .await
            .map_err(|err| {
                error!(
                    "❌ Order {} could not be moved to processing, payment {} stays pending: {err}",
                    payment.order_id, payment.id
                );
                ServiceError::Internal(format!("Order status update failed: {err}"))
            })?;

        info!("✅ Order {} is now {:?}", change.order_id, change.status);
        Ok(())
    }

    async fn settle(
        &self,
        payment: &Payment,
        target: PaymentStatus,
        receipt: Option<&str>,
    ) -> Result<CallbackOutcome, ServiceError> {
        match self
            .command
            .transition_status(payment.id, PaymentStatus::Pending, target, receipt)
            .await
        {
            Ok(Some(_)) => {
                info!(
                    "✅ Payment {} settled as {target:?} (receipt {})",
                    payment.id,
                    receipt.unwrap_or("-")
                );
                Ok(CallbackOutcome::applied(target))
            }
            Ok(None) => {
                let latest = self
                    .query
                    .find_by_id(payment.id)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Payment {} disappeared", payment.id))
                    })?;
                let status = PaymentStatus::from_storage(&latest.status)?;

                if status.is_terminal() {
                    info!(
                        "🔁 Payment {} was settled as {status:?} by a concurrent delivery",
                        payment.id
                    );
                    Ok(CallbackOutcome::Duplicate(status))
                } else {
                    Err(ServiceError::Conflict(format!(
                        "Payment {} changed while settling",
                        payment.id
                    )))
                }
            }
            Err(err) => {
                if target == PaymentStatus::Completed {
                    error!(
                        target: "saga",
                        order_id = %payment.order_id,
                        payment_id = %payment.id,
                        merchant_request_id = %payment.merchant_request_id,
                        "❌ Order advanced to processing but payment could not be completed: {err}"
                    );
                    self.saga.record(SagaIncident::OrderAdvancedPaymentUnsettled);
                }
                Err(ServiceError::Repo(err))
            }
        }
    }
}

#[async_trait]
impl CallbackServiceTrait for CallbackService {
    async fn handle_callback(
        &self,
        callback: &StkCallback,
    ) -> Result<CallbackOutcome, ServiceError> {
        info!(
            "📥 Callback for merchant_request_id={} result_code={}",
            callback.merchant_request_id, callback.result_code
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "handle_callback",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("operation", "callback"),
                KeyValue::new(
                    "payment.merchant_request_id",
                    callback.merchant_request_id.clone(),
                ),
                KeyValue::new("payment.result_code", callback.result_code),
            ],
        );

        let result = self.reconcile(callback, &tracing_ctx.cx).await;

        match &result {
            Ok(outcome) => {
                self.tracer
                    .success(&tracing_ctx, method, &format!("Callback handled: {outcome:?}"))
            }
            Err(err) => self.tracer.error(&tracing_ctx, method, &err.to_string()),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::requests::callback::{CallbackItem, CallbackMetadata},
        test_support::{MockOrderClient, MockPaymentRepository},
    };
    use std::sync::{Arc, atomic::Ordering};

    struct Fixture {
        service: CallbackService,
        repo: Arc<MockPaymentRepository>,
        orders: Arc<MockOrderClient>,
        saga: SagaMetrics,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MockPaymentRepository::default());
        let orders = Arc::new(MockOrderClient::default());
        let saga = SagaMetrics::default();

        let service = CallbackService::new(
            CallbackServiceDeps {
                query: repo.clone(),
                command: repo.clone(),
                order_client: orders.clone(),
                order_rpc_timeout: Duration::from_secs(1),
                saga: saga.clone(),
            },
            &mut Registry::default(),
        );

        Fixture {
            service,
            repo,
            orders,
            saga,
        }
    }

    fn callback(merchant_request_id: &str, result_code: i64) -> StkCallback {
        StkCallback {
            merchant_request_id: merchant_request_id.into(),
            checkout_request_id: "CR1".into(),
            result_code,
            result_desc: "desc".into(),
            callback_metadata: None,
        }
    }

    #[tokio::test]
    async fn success_advances_order_then_completes_payment() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        let outcome = f.service.handle_callback(&callback("MR1", 0)).await.unwrap();

        assert_eq!(outcome, CallbackOutcome::Completed);
        assert_eq!(
            f.orders.calls(),
            vec![("o1".to_string(), OrderStatus::Processing)]
        );
        assert_eq!(f.repo.status_of(id), "COMPLETED");
    }

    #[tokio::test]
    async fn receipt_number_is_stored_on_completion() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        let mut paid = callback("MR1", 0);
        paid.callback_metadata = Some(CallbackMetadata {
            items: vec![
                CallbackItem {
                    name: "Amount".into(),
                    value: Some(serde_json::json!(10)),
                },
                CallbackItem {
                    name: "MpesaReceiptNumber".into(),
                    value: Some(serde_json::json!("NLJ7RT61SV")),
                },
            ],
        });

        f.service.handle_callback(&paid).await.unwrap();

        assert_eq!(f.repo.status_of(id), "COMPLETED");
        assert_eq!(f.repo.receipt_of(id), Some("NLJ7RT61SV".to_string()));
    }

    #[tokio::test]
    async fn cancellation_stores_no_receipt() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        f.service
            .handle_callback(&callback("MR1", RESULT_CODE_CANCELLED_BY_USER))
            .await
            .unwrap();

        assert_eq!(f.repo.receipt_of(id), None);
    }

    #[tokio::test]
    async fn concurrent_deliveries_settle_the_payment_once() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");
        let first = callback("MR1", 0);
        let second = callback("MR1", 0);

        let (a, b) = tokio::join!(
            f.service.handle_callback(&first),
            f.service.handle_callback(&second)
        );
        let mut outcomes = vec![a.unwrap(), b.unwrap()];
        outcomes.sort_by_key(|outcome| format!("{outcome:?}"));

        assert_eq!(
            outcomes,
            vec![
                CallbackOutcome::Completed,
                CallbackOutcome::Duplicate(PaymentStatus::Completed)
            ]
        );
        assert!(
            f.orders
                .calls()
                .iter()
                .all(|(order_id, status)| order_id == "o1" && *status == OrderStatus::Processing)
        );
        assert_eq!(f.repo.status_of(id), "COMPLETED");
    }

    #[tokio::test]
    async fn order_rpc_failure_leaves_payment_pending() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");
        f.orders.fail.store(true, Ordering::SeqCst);

        let err = f.service.handle_callback(&callback("MR1", 0)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Internal(_)));
        assert_eq!(f.repo.status_of(id), "PENDING");
        assert_eq!(f.saga.count(SagaIncident::OrderAdvancedPaymentUnsettled), 0);
    }

    #[tokio::test]
    async fn user_cancellation_skips_the_order_rpc() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        let outcome = f
            .service
            .handle_callback(&callback("MR1", RESULT_CODE_CANCELLED_BY_USER))
            .await
            .unwrap();

        assert_eq!(outcome, CallbackOutcome::Canceled);
        assert!(f.orders.calls().is_empty());
        assert_eq!(f.repo.status_of(id), "CANCELED");
    }

    #[tokio::test]
    async fn unrecognised_code_fails_the_payment() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        let outcome = f.service.handle_callback(&callback("MR1", 2001)).await.unwrap();

        assert_eq!(outcome, CallbackOutcome::Failed);
        assert!(f.orders.calls().is_empty());
        assert_eq!(f.repo.status_of(id), "FAILED");
    }

    #[tokio::test]
    async fn redelivered_success_is_applied_once() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        let first = f.service.handle_callback(&callback("MR1", 0)).await.unwrap();
        let second = f.service.handle_callback(&callback("MR1", 0)).await.unwrap();

        assert_eq!(first, CallbackOutcome::Completed);
        assert_eq!(second, CallbackOutcome::Duplicate(PaymentStatus::Completed));
        assert_eq!(f.orders.calls().len(), 1);
        assert_eq!(f.repo.status_of(id), "COMPLETED");
    }

    #[tokio::test]
    async fn late_failure_does_not_undo_a_completed_payment() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");

        f.service.handle_callback(&callback("MR1", 0)).await.unwrap();
        let outcome = f.service.handle_callback(&callback("MR1", 1)).await.unwrap();

        assert_eq!(outcome, CallbackOutcome::Duplicate(PaymentStatus::Completed));
        assert_eq!(f.repo.status_of(id), "COMPLETED");
    }

    #[tokio::test]
    async fn unknown_merchant_request_id_is_not_found() {
        let f = fixture();

        let err = f.service.handle_callback(&callback("MR404", 0)).await.unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(f.orders.calls().is_empty());
    }

    #[tokio::test]
    async fn lost_race_reports_the_winner() {
        let f = fixture();
        f.repo.insert_pending("o1", "MR1");
        *f.repo.race_to.lock().unwrap() = Some(PaymentStatus::Canceled);

        let outcome = f.service.handle_callback(&callback("MR1", 0)).await.unwrap();

        assert_eq!(outcome, CallbackOutcome::Duplicate(PaymentStatus::Canceled));
    }

    #[tokio::test]
    async fn failed_completion_write_is_counted_as_saga_incident() {
        let f = fixture();
        let id = f.repo.insert_pending("o1", "MR1");
        f.repo.fail_transition.store(true, Ordering::SeqCst);

        let err = f.service.handle_callback(&callback("MR1", 0)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Repo(_)));
        assert_eq!(f.orders.calls().len(), 1);
        assert_eq!(f.repo.status_of(id), "PENDING");
        assert_eq!(f.saga.count(SagaIncident::OrderAdvancedPaymentUnsettled), 1);
    }
}
