use crate::model::payment_intent::{PaymentIntent, PaymentIntentState};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynPaymentIntentRepository = Arc<dyn PaymentIntentRepositoryTrait + Send + Sync>;

/// Every `mark_*` only moves a marker out of the state it is expected to be
/// in, and returns `None` when the marker was somewhere else.
#[async_trait]
pub trait PaymentIntentRepositoryTrait {
    async fn mark_initiated(
        &self,
        order_id: Uuid,
        payment_id: &str,
    ) -> Result<Option<PaymentIntent>, RepositoryError>;

    async fn mark_failed(
        &self,
        order_id: Uuid,
        reason: &str,
    ) -> Result<Option<PaymentIntent>, RepositoryError>;

    async fn mark_compensated(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PaymentIntent>, RepositoryError>;

    /// Markers in `state`, untouched since `older_than`, whose order is still pending.
    async fn find_stale(
        &self,
        state: PaymentIntentState,
        older_than: NaiveDateTime,
        limit: i64,
    ) -> Result<Vec<PaymentIntent>, RepositoryError>;
}
