use crate::{
    abstract_trait::{DynPaymentIntentRepository, order::DynOrderCommandRepository},
    domain::requests::order::{OrderPatch, UpdateOrderRecordRequest},
    model::payment_intent::{PaymentIntent, PaymentIntentState},
};
use chrono::{NaiveDateTime, TimeDelta, Utc};
use shared::{
    domain::OrderStatus,
    errors::ServiceError,
    utils::{SagaIncident, SagaMetrics},
};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

const BATCH_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub compensated: usize,
    pub stale: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct PaymentIntentReconcilerDeps {
    pub intents: DynPaymentIntentRepository,
    pub command: DynOrderCommandRepository,
    pub saga: SagaMetrics,
    pub interval: Duration,
    pub grace: Duration,
}

/// Repairs orders whose payment was never created.
///
/// A `FAILED` marker means the payment service refused the request, so the
/// order is cancelled once the grace period has passed. A `PENDING` marker
/// that outlives the grace period means the call timed out, was lost in
/// transport, or the process stopped mid-call. The payment may or may not
/// exist, so it is only reported.
#[derive(Clone)]
pub struct PaymentIntentReconciler {
    intents: DynPaymentIntentRepository,
    command: DynOrderCommandRepository,
    saga: SagaMetrics,
    interval: Duration,
    grace: Duration,
}

impl PaymentIntentReconciler {
    pub fn new(deps: PaymentIntentReconcilerDeps) -> Self {
        let PaymentIntentReconcilerDeps {
            intents,
            command,
            saga,
            interval,
            grace,
        } = deps;

        Self {
            intents,
            command,
            saga,
            interval,
            grace,
        }
    }

    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            "🔁 Payment reconciler running every {:?} (grace {:?})",
            self.interval, self.grace
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.run_once(Utc::now().naive_utc()).await {
                        Ok(report) if report != ReconcileReport::default() => {
                            info!("🔁 Reconciliation pass finished: {report:?}");
                        }
                        Ok(_) => {}
                        Err(err) => error!("❌ Reconciliation pass failed: {err}"),
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("🛑 Payment reconciler stopped");
                    break;
                }
            }
        }
    }

    pub async fn run_once(&self, now: NaiveDateTime) -> Result<ReconcileReport, ServiceError> {
        let grace = TimeDelta::from_std(self.grace)
            .map_err(|err| ServiceError::Internal(format!("invalid grace period: {err}")))?;
        let cutoff = now - grace;

        let mut report = ReconcileReport::default();

        let failed = self
            .intents
            .find_stale(PaymentIntentState::Failed, cutoff, BATCH_SIZE)
            .await?;
        for intent in failed {
            self.compensate(&intent, &mut report).await;
        }

        let pending = self
            .intents
            .find_stale(PaymentIntentState::Pending, cutoff, BATCH_SIZE)
            .await?;
        for intent in pending {
            warn!(
                target: "saga",
                order_id = %intent.order_id,
                since = %intent.updated_at,
                "⚠️ Payment outcome unknown for pending order"
            );
            self.saga.record(SagaIncident::StalePaymentIntent);
            report.stale += 1;
        }

        Ok(report)
    }

    async fn compensate(&self, intent: &PaymentIntent, report: &mut ReconcileReport) {
        let order_id = intent.order_id;
        let cancel = UpdateOrderRecordRequest {
            order_id,
            expected_status: OrderStatus::Pending,
            patch: OrderPatch {
                order_status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        };

        match self.command.update_order(&cancel).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                info!("Order {order_id} is no longer pending, leaving it as is");
                report.skipped += 1;
                return;
            }
            Err(err) => {
                error!("❌ Failed to cancel orphaned order {order_id}: {err}");
                report.failed += 1;
                return;
            }
        }

        if let Err(err) = self.intents.mark_compensated(order_id).await {
            error!("❌ Order {order_id} cancelled but its payment marker was not closed: {err}");
            report.failed += 1;
            return;
        }

        warn!(
            target: "saga",
            order_id = %order_id,
            reason = intent.last_error.as_deref().unwrap_or_default(),
            "⚠️ Cancelled order left without a payment"
        );
        self.saga.record(SagaIncident::OrphanedOrderCompensated);
        report.compensated += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockOrderStore;
    use std::sync::Arc;

    fn reconciler(store: Arc<MockOrderStore>, saga: SagaMetrics) -> PaymentIntentReconciler {
        PaymentIntentReconciler::new(PaymentIntentReconcilerDeps {
            intents: store.clone(),
            command: store,
            saga,
            interval: Duration::from_secs(60),
            grace: Duration::from_secs(300),
        })
    }

    #[tokio::test]
    async fn old_failed_markers_cancel_their_order() {
        let store = Arc::new(MockOrderStore::default());
        let saga = SagaMetrics::default();
        let now = Utc::now().naive_utc();

        let orphan = store.insert_order(OrderStatus::Pending);
        store.set_intent(orphan, PaymentIntentState::Failed, now - TimeDelta::minutes(10));

        let fresh = store.insert_order(OrderStatus::Pending);
        store.set_intent(fresh, PaymentIntentState::Failed, now - TimeDelta::minutes(1));

        let report = reconciler(store.clone(), saga.clone())
            .run_once(now)
            .await
            .unwrap();

        assert_eq!(report.compensated, 1);
        assert_eq!(store.order_status(orphan), "CANCELLED");
        assert_eq!(
            store.intent_state(orphan),
            Some(PaymentIntentState::Compensated)
        );
        assert_eq!(store.order_status(fresh), "PENDING");
        assert_eq!(store.intent_state(fresh), Some(PaymentIntentState::Failed));
        assert_eq!(saga.count(SagaIncident::OrphanedOrderCompensated), 1);
    }

    #[tokio::test]
    async fn stale_pending_markers_are_only_reported() {
        let store = Arc::new(MockOrderStore::default());
        let saga = SagaMetrics::default();
        let now = Utc::now().naive_utc();

        let id = store.insert_order(OrderStatus::Pending);
        store.set_intent(id, PaymentIntentState::Pending, now - TimeDelta::hours(1));

        let report = reconciler(store.clone(), saga.clone())
            .run_once(now)
            .await
            .unwrap();

        assert_eq!(
            report,
            ReconcileReport {
                stale: 1,
                ..Default::default()
            }
        );
        assert_eq!(store.order_status(id), "PENDING");
        assert_eq!(store.intent_state(id), Some(PaymentIntentState::Pending));
        assert_eq!(saga.count(SagaIncident::StalePaymentIntent), 1);
    }

    #[tokio::test]
    async fn orders_that_moved_on_are_skipped() {
        let store = Arc::new(MockOrderStore::default());
        let saga = SagaMetrics::default();
        let now = Utc::now().naive_utc();

        let id = store.insert_order(OrderStatus::Pending);
        store.set_intent(id, PaymentIntentState::Failed, now - TimeDelta::hours(1));
        *store.race_to.lock().unwrap() = Some(OrderStatus::Processing);

        let report = reconciler(store.clone(), saga.clone())
            .run_once(now)
            .await
            .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(store.order_status(id), "PROCESSING");
        assert_eq!(store.intent_state(id), Some(PaymentIntentState::Failed));
        assert_eq!(saga.count(SagaIncident::OrphanedOrderCompensated), 0);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let store = Arc::new(MockOrderStore::default());
        let reconciler = reconciler(store, SagaMetrics::default());
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(async move { reconciler.run(rx).await });
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
