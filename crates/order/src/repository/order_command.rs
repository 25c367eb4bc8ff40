use crate::{
    abstract_trait::order::OrderCommandRepositoryTrait,
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::{
        order::{Order, OrderDetails},
        payment_intent::PaymentIntentState,
    },
};
use async_trait::async_trait;
use shared::{
    config::ConnectionPool,
    domain::{EnumMapping, OrderStatus},
    errors::RepositoryError,
};
use sqlx::{Postgres, QueryBuilder, types::Json};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order_with_details(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(Order, OrderDetails), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {err:?}");
            RepositoryError::from(err)
        })?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                id,
                customer_id,
                pickup_address,
                delivery_address,
                shipping_method,
                order_status,
                scheduled_pickup_datetime,
                scheduled_delivery_datetime,
                tracking_number,
                payment_method,
                invoice_number,
                special_instructions,
                shipping_cost,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.customer_id)
        .bind(Json(&req.pickup_address))
        .bind(Json(&req.delivery_address))
        .bind(&req.shipping_method)
        .bind(OrderStatus::Pending.as_storage())
        .bind(req.scheduled_pickup_datetime)
        .bind(req.scheduled_delivery_datetime)
        .bind(&req.tracking_number)
        .bind(req.payment_method.as_storage())
        .bind(&req.invoice_number)
        .bind(&req.special_instructions)
        .bind(req.shipping_cost)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert order for customer {}: {err:?}",
                req.customer_id
            );
            RepositoryError::from(err)
        })?;

        let details = sqlx::query_as::<_, OrderDetails>(
            r#"
            INSERT INTO order_details (id, order_id, product_id, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order.id)
        .bind(req.product_id)
        .bind(req.quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to insert details for order {}: {err:?}", order.id);
            RepositoryError::from(err)
        })?;

        sqlx::query(
            r#"
            INSERT INTO order_payment_intents (order_id, state, attempts, created_at, updated_at)
            VALUES ($1, $2, 0, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(order.id)
        .bind(PaymentIntentState::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to insert payment marker for order {}: {err:?}",
                order.id
            );
            RepositoryError::from(err)
        })?;

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit order {}: {err:?}", order.id);
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Created order {} for customer {}",
            order.id, order.customer_id
        );

        Ok((order, details))
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<Option<Order>, RepositoryError> {
        let patch = &req.patch;

        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE orders SET updated_at = CURRENT_TIMESTAMP");

        if let Some(status) = patch.order_status {
            builder
                .push(", order_status = ")
                .push_bind(status.as_storage());
        }
        if let Some(tracking_number) = &patch.tracking_number {
            builder
                .push(", tracking_number = ")
                .push_bind(tracking_number.clone());
        }
        if let Some(shipping_method) = &patch.shipping_method {
            builder
                .push(", shipping_method = ")
                .push_bind(shipping_method.clone());
        }
        if let Some(special_instructions) = &patch.special_instructions {
            builder
                .push(", special_instructions = ")
                .push_bind(special_instructions.clone());
        }
        if let Some(invoice_number) = &patch.invoice_number {
            builder
                .push(", invoice_number = ")
                .push_bind(invoice_number.clone());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(req.order_id)
            .push(" AND order_status = ")
            .push_bind(req.expected_status.as_storage())
            .push(" AND deleted_at IS NULL RETURNING *");

        let mut tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to begin transaction: {err:?}");
            RepositoryError::from(err)
        })?;

        let order = builder
            .build_query_as::<Order>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|err| {
                error!("❌ Failed to update order {}: {err:?}", req.order_id);
                RepositoryError::from(err)
            })?;

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit order {} update: {err:?}", req.order_id);
            RepositoryError::from(err)
        })?;

        if let Some(order) = &order {
            info!("🔄 Updated order {} ({})", order.id, order.order_status);
        }

        Ok(order)
    }
}
