use crate::domain::{
    requests::payment::CreatePaymentRequest,
    response::{api::ApiResponse, payment::PaymentResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentCommandService = Arc<dyn PaymentCommandServiceTrait + Send + Sync>;
pub type DynPaymentQueryService = Arc<dyn PaymentQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait PaymentCommandServiceTrait {
    async fn create_payment(
        &self,
        req: &CreatePaymentRequest,
    ) -> Result<ApiResponse<PaymentResponse>, ServiceError>;
}

#[async_trait]
pub trait PaymentQueryServiceTrait {
    async fn find_by_id(&self, id: &str) -> Result<ApiResponse<PaymentResponse>, ServiceError>;
}
