use crate::{
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::order::{Order, OrderDetails},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;
use uuid::Uuid;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;
pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError>;
}

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Writes the order, its details row and a pending payment marker in one
    /// transaction.
    async fn create_order_with_details(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(Order, OrderDetails), RepositoryError>;

    /// Applies the patch only while the order still has `expected_status`.
    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<Option<Order>, RepositoryError>;
}
