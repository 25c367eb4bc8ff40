use crate::domain::{
    requests::order::{CreateOrderRequest, UpdateOrderRequest},
    response::{
        api::ApiResponse,
        order::{CreateOrderResponse, OrderResponse},
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;
pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreateOrderResponse>, ServiceError>;

    async fn update_order(
        &self,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn get_order(&self, id: &str) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
