use genproto::payment::CreatePaymentRequest as ProtoCreatePaymentRequest;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{EnumMapping, PaymentMethod},
    errors::ServiceError,
    utils::{field_error, into_result, require_non_empty},
};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub order_id: String,
    pub customer_id: String,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub shipping_fee: f64,
    pub product_cost: f64,
    pub customer_phone: String,
}

impl Validate for CreatePaymentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require_non_empty(&mut errors, "order_id", &self.order_id);
        require_non_empty(&mut errors, "customer_phone", &self.customer_phone);

        if !self.payment_method.is_collectable() {
            errors.add(
                "payment_method",
                field_error(
                    "unsupported",
                    format!("{} is not accepted", self.payment_method.as_storage()),
                ),
            );
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            errors.add("amount", field_error("range", "must be greater than zero"));
        } else if self.amount.ceil() != (self.shipping_fee + self.product_cost).ceil() {
            errors.add(
                "amount",
                field_error(
                    "mismatch",
                    format!(
                        "{} does not match shipping fee {} plus product cost {}",
                        self.amount, self.shipping_fee, self.product_cost
                    ),
                ),
            );
        }

        into_result(errors)
    }
}

impl TryFrom<ProtoCreatePaymentRequest> for CreatePaymentRequest {
    type Error = ServiceError;

    fn try_from(value: ProtoCreatePaymentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_method: PaymentMethod::from_wire(value.payment_method)?,
            order_id: value.order_id,
            customer_id: value.customer_id,
            amount: value.amount,
            shipping_fee: value.shipping_fee,
            product_cost: value.product_cost,
            customer_phone: value.customer_phone,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreatePaymentRecordRequest {
    pub order_id: String,
    pub customer_id: String,
    pub payment_method: PaymentMethod,
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub shipping_cost: f64,
    pub product_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::utils::validation_messages;

    fn request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            order_id: "o1".into(),
            customer_id: "c1".into(),
            payment_method: PaymentMethod::Mpesa,
            amount: 10.0,
            shipping_fee: 5.0,
            product_cost: 5.0,
            customer_phone: "+254700000000".into(),
        }
    }

    #[test]
    fn accepts_matching_amount() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn amount_is_compared_after_rounding_up() {
        let req = CreatePaymentRequest {
            amount: 10.0,
            shipping_fee: 4.5,
            product_cost: 5.4,
            ..request()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn amount_rounding_into_the_next_unit_is_a_mismatch() {
        let req = CreatePaymentRequest {
            amount: 10.2,
            shipping_fee: 4.5,
            product_cost: 5.4,
            ..request()
        };
        let messages = validation_messages(&req.validate().unwrap_err());
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("amount: 10.2 does not match"));
    }

    #[test]
    fn reports_every_violation() {
        let req = CreatePaymentRequest {
            order_id: "".into(),
            payment_method: PaymentMethod::Paypal,
            amount: 12.0,
            customer_phone: " ".into(),
            ..request()
        };

        let errors = req.validate().unwrap_err();
        let messages = validation_messages(&errors);

        assert_eq!(messages.len(), 4);
        assert!(messages[0].starts_with("amount: 12 does not match"));
        assert_eq!(messages[1], "customer_phone: is required");
        assert_eq!(messages[2], "order_id: is required");
        assert_eq!(messages[3], "payment_method: PAYPAL is not accepted");
    }

    #[test]
    fn rejects_non_positive_amount() {
        let req = CreatePaymentRequest {
            amount: 0.0,
            shipping_fee: 0.0,
            product_cost: 0.0,
            ..request()
        };
        let messages = validation_messages(&req.validate().unwrap_err());
        assert_eq!(messages, vec!["amount: must be greater than zero".to_string()]);
    }

    #[test]
    fn unknown_wire_method_is_a_validation_error() {
        let proto = ProtoCreatePaymentRequest {
            order_id: "o1".into(),
            payment_method: 42,
            ..Default::default()
        };

        let err = CreatePaymentRequest::try_from(proto).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
