use crate::model::order::{Address, Order as OrderModel, OrderDetails as OrderDetailsModel};
use genproto::order::{
    Address as ProtoAddress, Order as ProtoOrder, OrderDetails as ProtoOrderDetails,
};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{EnumMapping, EnumMappingError, OrderStatus, PaymentMethod},
    utils::format_naive_utc,
};

impl From<Address> for ProtoAddress {
    fn from(value: Address) -> Self {
        ProtoAddress {
            street: value.street,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
            country: value.country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub customer_id: String,
    pub pickup_address: Address,
    pub delivery_address: Address,
    pub shipping_method: String,
    pub order_status: OrderStatus,
    pub scheduled_pickup_datetime: String,
    pub scheduled_delivery_datetime: String,
    pub tracking_number: String,
    pub payment_method: PaymentMethod,
    pub invoice_number: String,
    pub special_instructions: String,
    pub shipping_cost: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<OrderModel> for OrderResponse {
    type Error = EnumMappingError;

    fn try_from(value: OrderModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.to_string(),
            customer_id: value.customer_id.to_string(),
            order_status: OrderStatus::from_storage(&value.order_status)?,
            payment_method: PaymentMethod::from_storage(&value.payment_method)?,
            pickup_address: value.pickup_address.0,
            delivery_address: value.delivery_address.0,
            shipping_method: value.shipping_method,
            scheduled_pickup_datetime: format_naive_utc(value.scheduled_pickup_datetime),
            scheduled_delivery_datetime: format_naive_utc(value.scheduled_delivery_datetime),
            tracking_number: value.tracking_number,
            invoice_number: value.invoice_number,
            special_instructions: value.special_instructions,
            shipping_cost: value.shipping_cost,
            created_at: format_naive_utc(value.created_at),
            updated_at: format_naive_utc(value.updated_at),
        })
    }
}

impl From<OrderResponse> for ProtoOrder {
    fn from(value: OrderResponse) -> Self {
        ProtoOrder {
            order_id: value.id,
            customer_id: value.customer_id,
            pickup_address: Some(value.pickup_address.into()),
            delivery_address: Some(value.delivery_address.into()),
            shipping_method: value.shipping_method,
            order_status: value.order_status.wire_value(),
            scheduled_pickup_datetime: value.scheduled_pickup_datetime,
            scheduled_delivery_datetime: value.scheduled_delivery_datetime,
            tracking_number: value.tracking_number,
            payment_method: value.payment_method.wire_value(),
            invoice_number: value.invoice_number,
            special_instructions: value.special_instructions,
            shipping_cost: value.shipping_cost,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetailsResponse {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderDetailsModel> for OrderDetailsResponse {
    fn from(value: OrderDetailsModel) -> Self {
        Self {
            id: value.id.to_string(),
            order_id: value.order_id.to_string(),
            product_id: value.product_id.to_string(),
            quantity: value.quantity,
            created_at: format_naive_utc(value.created_at),
            updated_at: format_naive_utc(value.updated_at),
        }
    }
}

impl From<OrderDetailsResponse> for ProtoOrderDetails {
    fn from(value: OrderDetailsResponse) -> Self {
        ProtoOrderDetails {
            order_details_id: value.id,
            order_id: value.order_id,
            product_id: value.product_id,
            quantity: value.quantity,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order: OrderResponse,
    pub order_details: OrderDetailsResponse,
}
