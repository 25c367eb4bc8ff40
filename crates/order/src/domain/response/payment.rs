use genproto::payment::Payment as ProtoPayment;
use shared::domain::{EnumMapping, EnumMappingError, PaymentMethod, PaymentStatus};

/// What the order service keeps from a `CreatePayment` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResponse {
    pub id: String,
    pub order_id: String,
    pub merchant_request_id: String,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub amount: f64,
    pub currency: String,
}

impl TryFrom<ProtoPayment> for PaymentResponse {
    type Error = EnumMappingError;

    fn try_from(value: ProtoPayment) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_method: PaymentMethod::from_wire(value.payment_method)?,
            status: PaymentStatus::from_wire(value.status)?,
            id: value.id,
            order_id: value.order_id,
            merchant_request_id: value.merchant_request_id,
            amount: value.amount,
            currency: value.currency,
        })
    }
}
