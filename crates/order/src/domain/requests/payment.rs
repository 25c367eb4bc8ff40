use crate::model::{
    catalog::{Customer, Product},
    order::Order,
};
use genproto::payment::CreatePaymentRequest as ProtoCreatePaymentRequest;
use shared::domain::{EnumMapping, PaymentMethod};

/// Payload sent to the payment service for a freshly stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInitiation {
    pub order_id: String,
    pub customer_id: String,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub shipping_fee: f64,
    pub product_cost: f64,
    pub customer_phone: String,
}

impl PaymentInitiation {
    /// The charge covers shipping plus one unit price. Quantity is not applied.
    pub fn for_order(
        order: &Order,
        product: &Product,
        customer: &Customer,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            order_id: order.id.to_string(),
            customer_id: customer.id.to_string(),
            payment_method,
            amount: order.shipping_cost + product.price,
            shipping_fee: order.shipping_cost,
            product_cost: product.price,
            customer_phone: normalize_phone(&customer.phone_number),
        }
    }
}

pub fn normalize_phone(phone: &str) -> String {
    let phone = phone.trim();
    phone.strip_prefix('+').unwrap_or(phone).to_string()
}

impl From<&PaymentInitiation> for ProtoCreatePaymentRequest {
    fn from(value: &PaymentInitiation) -> Self {
        ProtoCreatePaymentRequest {
            order_id: value.order_id.clone(),
            customer_id: value.customer_id.clone(),
            payment_method: value.payment_method.wire_value(),
            amount: value.amount,
            shipping_fee: value.shipping_fee,
            product_cost: value.product_cost,
            customer_phone: value.customer_phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::order::Address;
    use sqlx::types::Json;
    use uuid::Uuid;

    #[test]
    fn leading_plus_is_stripped() {
        assert_eq!(normalize_phone("+254700000000"), "254700000000");
        assert_eq!(normalize_phone("254700000000"), "254700000000");
        assert_eq!(normalize_phone(" +254711 "), "254711");
    }

    #[test]
    fn amount_is_shipping_plus_unit_price() {
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            pickup_address: Json(Address::default()),
            delivery_address: Json(Address::default()),
            shipping_method: "express".into(),
            order_status: "PENDING".into(),
            scheduled_pickup_datetime: None,
            scheduled_delivery_datetime: None,
            tracking_number: String::new(),
            payment_method: "MPESA".into(),
            invoice_number: "INV-1".into(),
            special_instructions: String::new(),
            shipping_cost: 150.0,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        };
        let product = Product {
            id: Uuid::new_v4(),
            name: "Kettle".into(),
            sku: "KT-1".into(),
            category: "kitchen".into(),
            brand: "Ramtons".into(),
            model: "RM-1".into(),
            price: 2_500.0,
            stock_quantity: 4,
            is_available: true,
            created_at: None,
            updated_at: None,
        };
        let customer = Customer {
            id: order.customer_id,
            name: "Wanjiru".into(),
            email: "wanjiru@example.com".into(),
            phone_number: "+254700000000".into(),
            address: Json(Address::default()),
            created_at: None,
            updated_at: None,
        };

        let init = PaymentInitiation::for_order(&order, &product, &customer, PaymentMethod::Mpesa);
        let proto = ProtoCreatePaymentRequest::from(&init);

        assert_eq!(init.amount, 2_650.0);
        assert_eq!(init.shipping_fee, 150.0);
        assert_eq!(init.product_cost, 2_500.0);
        assert_eq!(init.customer_phone, "254700000000");
        assert_eq!(proto.order_id, order.id.to_string());
        assert_eq!(proto.payment_method, PaymentMethod::Mpesa.wire_value());
    }
}
