use crate::{
    abstract_trait::PaymentIntentRepositoryTrait,
    model::payment_intent::{PaymentIntent, PaymentIntentState},
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{
    config::ConnectionPool,
    domain::{EnumMapping, OrderStatus},
    errors::RepositoryError,
};
use tracing::error;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentIntentRepository {
    db: ConnectionPool,
}

impl PaymentIntentRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn transition(
        &self,
        order_id: Uuid,
        from: PaymentIntentState,
        to: PaymentIntentState,
        payment_id: Option<&str>,
        reason: Option<&str>,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {err:?}");
            RepositoryError::from(err)
        })?;

        let intent = sqlx::query_as::<_, PaymentIntent>(
            r#"
            UPDATE order_payment_intents
            SET state = $3,
                payment_id = COALESCE($4, payment_id),
                last_error = COALESCE($5, last_error),
                attempts = attempts + 1,
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1 AND state = $2
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(payment_id)
        .bind(reason)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to move payment marker of order {order_id} from {from:?} to {to:?}: {err:?}");
            RepositoryError::from(err)
        })?;

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit payment marker of order {order_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(intent)
    }
}

#[async_trait]
impl PaymentIntentRepositoryTrait for PaymentIntentRepository {
    async fn mark_initiated(
        &self,
        order_id: Uuid,
        payment_id: &str,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        self.transition(
            order_id,
            PaymentIntentState::Pending,
            PaymentIntentState::Initiated,
            Some(payment_id),
            None,
        )
        .await
    }

    async fn mark_failed(
        &self,
        order_id: Uuid,
        reason: &str,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        self.transition(
            order_id,
            PaymentIntentState::Pending,
            PaymentIntentState::Failed,
            None,
            Some(reason),
        )
        .await
    }

    async fn mark_compensated(
        &self,
        order_id: Uuid,
    ) -> Result<Option<PaymentIntent>, RepositoryError> {
        self.transition(
            order_id,
            PaymentIntentState::Failed,
            PaymentIntentState::Compensated,
            None,
            None,
        )
        .await
    }

    async fn find_stale(
        &self,
        state: PaymentIntentState,
        older_than: NaiveDateTime,
        limit: i64,
    ) -> Result<Vec<PaymentIntent>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|err| {
            error!("❌ Failed to acquire DB connection: {err:?}");
            RepositoryError::from(err)
        })?;

        sqlx::query_as::<_, PaymentIntent>(
            r#"
            SELECT i.*
            FROM order_payment_intents i
            JOIN orders o ON o.id = i.order_id
            WHERE i.state = $1
              AND i.updated_at < $2
              AND o.order_status = $3
              AND o.deleted_at IS NULL
            ORDER BY i.updated_at
            LIMIT $4
            "#,
        )
        .bind(state.as_str())
        .bind(older_than)
        .bind(OrderStatus::Pending.as_storage())
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to scan {state:?} payment markers: {err:?}");
            RepositoryError::from(err)
        })
    }
}
