use crate::model::payment::Payment as PaymentModel;
use genproto::payment::Payment as ProtoPayment;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{EnumMapping, EnumMappingError, PaymentMethod, PaymentStatus},
    utils::format_naive_utc,
};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub payment_method: PaymentMethod,
    pub merchant_request_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub description: String,
    pub shipping_fee: f64,
    pub product_cost: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<PaymentModel> for PaymentResponse {
    type Error = EnumMappingError;

    fn try_from(value: PaymentModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.to_string(),
            payment_method: PaymentMethod::from_storage(&value.payment_method)?,
            status: PaymentStatus::from_storage(&value.status)?,
            order_id: value.order_id,
            customer_id: value.customer_id,
            merchant_request_id: value.merchant_request_id,
            amount: value.amount,
            currency: value.currency,
            description: value.description,
            shipping_fee: value.shipping_cost,
            product_cost: value.product_cost,
            created_at: format_naive_utc(value.created_at),
            updated_at: format_naive_utc(value.updated_at),
        })
    }
}

impl From<PaymentResponse> for ProtoPayment {
    fn from(value: PaymentResponse) -> Self {
        ProtoPayment {
            id: value.id,
            order_id: value.order_id,
            customer_id: value.customer_id,
            payment_method: value.payment_method.wire_value(),
            merchant_request_id: value.merchant_request_id,
            amount: value.amount,
            currency: value.currency,
            status: value.status.wire_value(),
            description: value.description,
            shipping_fee: value.shipping_fee,
            product_cost: value.product_cost,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
