use crate::{
    abstract_trait::payment::PaymentCommandRepositoryTrait,
    domain::requests::payment::CreatePaymentRecordRequest, model::payment::Payment,
};
use async_trait::async_trait;
use shared::{
    config::ConnectionPool,
    domain::{EnumMapping, PaymentStatus},
    errors::RepositoryError,
};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentCommandRepository {
    db: ConnectionPool,
}

impl PaymentCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentCommandRepositoryTrait for PaymentCommandRepository {
    async fn create_payment(
        &self,
        req: &CreatePaymentRecordRequest,
    ) -> Result<Payment, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {err:?}");
            RepositoryError::from(err)
        })?;

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                id,
                order_id,
                customer_id,
                payment_method,
                merchant_request_id,
                checkout_request_id,
                amount,
                currency,
                status,
                description,
                shipping_cost,
                product_cost,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.order_id)
        .bind(&req.customer_id)
        .bind(req.payment_method.as_storage())
        .bind(&req.merchant_request_id)
        .bind(&req.checkout_request_id)
        .bind(req.amount)
        .bind(&req.currency)
        .bind(PaymentStatus::Pending.as_storage())
        .bind(&req.description)
        .bind(req.shipping_cost)
        .bind(req.product_cost)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert payment for order {}: {err:?}",
                req.order_id
            );
            RepositoryError::from(err)
        })?;

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit payment insert: {err:?}");
            RepositoryError::from(err)
        })?;

        info!("✅ Payment {} stored for order {}", payment.id, payment.order_id);

        Ok(payment)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        receipt_number: Option<&str>,
    ) -> Result<Option<Payment>, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {err:?}");
            RepositoryError::from(err)
        })?;

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = $3,
                mpesa_receipt_number = COALESCE($4, mpesa_receipt_number),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from.as_storage())
        .bind(to.as_storage())
        .bind(receipt_number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to move payment {id} from {from:?} to {to:?}: {err:?}");
            RepositoryError::from(err)
        })?;

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit payment {id} status change: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(payment)
    }
}
