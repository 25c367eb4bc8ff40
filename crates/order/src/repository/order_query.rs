use crate::{abstract_trait::order::OrderQueryRepositoryTrait, model::order::Order};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|err| {
            error!("❌ Failed to acquire DB connection: {err:?}");
            RepositoryError::from(err)
        })?;

        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch order {id}: {err:?}");
                RepositoryError::from(err)
            })
    }
}
