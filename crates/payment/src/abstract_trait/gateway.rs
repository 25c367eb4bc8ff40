use crate::gateway::{GatewayError, StkPushReceipt};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;

#[async_trait]
pub trait PaymentGatewayTrait {
    async fn initiate_stk_push(
        &self,
        order_id: &str,
        phone: &str,
        amount: f64,
    ) -> Result<StkPushReceipt, GatewayError>;
}
