use crate::model::catalog::{Customer, Product};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynCustomerQueryRepository = Arc<dyn CustomerQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, RepositoryError>;
}

#[async_trait]
pub trait CustomerQueryRepositoryTrait {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError>;
}
