use crate::{
    abstract_trait::{CustomerQueryRepositoryTrait, ProductQueryRepositoryTrait},
    model::catalog::{Customer, Product},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;
use uuid::Uuid;

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|err| {
            error!("❌ Failed to acquire DB connection: {err:?}");
            RepositoryError::from(err)
        })?;

        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch product {id}: {err:?}");
                RepositoryError::from(err)
            })
    }
}

#[derive(Clone)]
pub struct CustomerQueryRepository {
    db: ConnectionPool,
}

impl CustomerQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerQueryRepositoryTrait for CustomerQueryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|err| {
            error!("❌ Failed to acquire DB connection: {err:?}");
            RepositoryError::from(err)
        })?;

        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch customer {id}: {err:?}");
                RepositoryError::from(err)
            })
    }
}
