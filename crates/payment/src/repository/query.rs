use crate::{abstract_trait::payment::PaymentQueryRepositoryTrait, model::payment::Payment};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentQueryRepository {
    db: ConnectionPool,
}

impl PaymentQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentQueryRepositoryTrait for PaymentQueryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|err| {
            error!("❌ Failed to acquire DB connection: {err:?}");
            RepositoryError::from(err)
        })?;

        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch payment {id}: {err:?}");
                RepositoryError::from(err)
            })
    }

    async fn find_by_merchant_request_id(
        &self,
        merchant_request_id: &str,
    ) -> Result<Option<Payment>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|err| {
            error!("❌ Failed to acquire DB connection: {err:?}");
            RepositoryError::from(err)
        })?;

        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE merchant_request_id = $1")
            .bind(merchant_request_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch payment by merchant_request_id={merchant_request_id}: {err:?}");
                RepositoryError::from(err)
            })
    }
}
