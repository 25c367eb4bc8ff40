use crate::domain::{requests::payment::PaymentInitiation, response::payment::PaymentResponse};
use async_trait::async_trait;
use opentelemetry::Context;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentGrpcClient = Arc<dyn PaymentGrpcClientTrait + Send + Sync>;

#[async_trait]
pub trait PaymentGrpcClientTrait {
    async fn create_payment(
        &self,
        req: &PaymentInitiation,
        cx: &Context,
    ) -> Result<PaymentResponse, ServiceError>;
}
