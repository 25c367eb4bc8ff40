use crate::model::order::Address;
use chrono::NaiveDateTime;
use genproto::order::{
    Address as ProtoAddress, CreateOrderRequest as ProtoCreateOrderRequest,
    UpdateOrderRequest as ProtoUpdateOrderRequest,
};
use shared::{
    domain::{EnumMapping, OrderStatus, PaymentMethod},
    errors::ServiceError,
    utils::{field_error, into_result, parse_rfc3339_utc, require_non_empty},
};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

impl From<ProtoAddress> for Address {
    fn from(value: ProtoAddress) -> Self {
        Self {
            street: value.street,
            city: value.city,
            state: value.state,
            postal_code: value.postal_code,
            country: value.country,
        }
    }
}

const PICKUP_FIELDS: [&str; 5] = [
    "pickup_address.street",
    "pickup_address.city",
    "pickup_address.state",
    "pickup_address.postal_code",
    "pickup_address.country",
];

const DELIVERY_FIELDS: [&str; 5] = [
    "delivery_address.street",
    "delivery_address.city",
    "delivery_address.state",
    "delivery_address.postal_code",
    "delivery_address.country",
];

fn check_address(errors: &mut ValidationErrors, fields: [&'static str; 5], address: &Address) {
    let values = [
        &address.street,
        &address.city,
        &address.state,
        &address.postal_code,
        &address.country,
    ];
    for (field, value) in fields.into_iter().zip(values) {
        require_non_empty(errors, field, value);
    }
}

fn check_uuid(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, field_error("required", "is required"));
    } else if Uuid::parse_str(value.trim()).is_err() {
        errors.add(field, field_error("format", "must be a UUID"));
    }
}

fn check_datetime(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if !value.is_empty() && parse_rfc3339_utc(value).is_none() {
        errors.add(field, field_error("format", "must be an RFC 3339 timestamp"));
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| ServiceError::Validation(vec![format!("{field}: must be a UUID")]))
}

fn optional_datetime(value: &str) -> Option<NaiveDateTime> {
    if value.is_empty() {
        None
    } else {
        parse_rfc3339_utc(value)
    }
}

/// The order half of a `CreateOrder` call.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderInput {
    pub customer_id: String,
    pub pickup_address: Address,
    pub delivery_address: Address,
    pub shipping_method: String,
    pub payment_method: PaymentMethod,
    pub scheduled_pickup_datetime: String,
    pub scheduled_delivery_datetime: String,
    pub tracking_number: String,
    pub invoice_number: String,
    pub special_instructions: String,
    pub shipping_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub order: OrderInput,
    pub product_id: String,
    pub product_quantity: i32,
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let order = &self.order;

        check_uuid(&mut errors, "product_id", &self.product_id);
        if self.product_quantity <= 0 {
            errors.add(
                "product_quantity",
                field_error("range", "must be greater than zero"),
            );
        }

        check_uuid(&mut errors, "customer_id", &order.customer_id);
        require_non_empty(&mut errors, "shipping_method", &order.shipping_method);
        require_non_empty(&mut errors, "invoice_number", &order.invoice_number);
        check_address(&mut errors, PICKUP_FIELDS, &order.pickup_address);
        check_address(&mut errors, DELIVERY_FIELDS, &order.delivery_address);

        if !order.payment_method.is_collectable() {
            errors.add(
                "payment_method",
                field_error(
                    "unsupported",
                    format!("{} is not accepted", order.payment_method.as_storage()),
                ),
            );
        }

        check_datetime(
            &mut errors,
            "scheduled_pickup_datetime",
            &order.scheduled_pickup_datetime,
        );
        check_datetime(
            &mut errors,
            "scheduled_delivery_datetime",
            &order.scheduled_delivery_datetime,
        );

        if !order.shipping_cost.is_finite() || order.shipping_cost < 0.0 {
            errors.add("shipping_cost", field_error("range", "must not be negative"));
        }

        into_result(errors)
    }
}

impl TryFrom<ProtoCreateOrderRequest> for CreateOrderRequest {
    type Error = ServiceError;

    fn try_from(value: ProtoCreateOrderRequest) -> Result<Self, Self::Error> {
        let order = value
            .order
            .ok_or_else(|| ServiceError::Validation(vec!["order: is required".into()]))?;

        Ok(Self {
            order: OrderInput {
                payment_method: PaymentMethod::from_wire(order.payment_method)?,
                customer_id: order.customer_id,
                pickup_address: order.pickup_address.map(Address::from).unwrap_or_default(),
                delivery_address: order.delivery_address.map(Address::from).unwrap_or_default(),
                shipping_method: order.shipping_method,
                scheduled_pickup_datetime: order.scheduled_pickup_datetime,
                scheduled_delivery_datetime: order.scheduled_delivery_datetime,
                tracking_number: order.tracking_number,
                invoice_number: order.invoice_number,
                special_instructions: order.special_instructions,
                shipping_cost: order.shipping_cost,
            },
            product_id: value.product_id,
            product_quantity: value.product_quantity,
        })
    }
}

/// Row values for one new order and its single details line.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub pickup_address: Address,
    pub delivery_address: Address,
    pub shipping_method: String,
    pub payment_method: PaymentMethod,
    pub scheduled_pickup_datetime: Option<NaiveDateTime>,
    pub scheduled_delivery_datetime: Option<NaiveDateTime>,
    pub tracking_number: String,
    pub invoice_number: String,
    pub special_instructions: String,
    pub shipping_cost: f64,
}

impl TryFrom<&CreateOrderRequest> for CreateOrderRecordRequest {
    type Error = ServiceError;

    fn try_from(value: &CreateOrderRequest) -> Result<Self, Self::Error> {
        let order = &value.order;

        Ok(Self {
            customer_id: parse_uuid("customer_id", &order.customer_id)?,
            product_id: parse_uuid("product_id", &value.product_id)?,
            quantity: value.product_quantity,
            pickup_address: order.pickup_address.clone(),
            delivery_address: order.delivery_address.clone(),
            shipping_method: order.shipping_method.clone(),
            payment_method: order.payment_method,
            scheduled_pickup_datetime: optional_datetime(&order.scheduled_pickup_datetime),
            scheduled_delivery_datetime: optional_datetime(&order.scheduled_delivery_datetime),
            tracking_number: order.tracking_number.clone(),
            invoice_number: order.invoice_number.clone(),
            special_instructions: order.special_instructions.clone(),
            shipping_cost: order.shipping_cost,
        })
    }
}

/// Columns an `UpdateOrder` mask may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    OrderStatus,
    TrackingNumber,
    ShippingMethod,
    SpecialInstructions,
    InvoiceNumber,
}

impl OrderField {
    /// Accepts both `order_status` and `orderStatus`.
    pub fn from_path(path: &str) -> Option<Self> {
        let mut normalized = String::with_capacity(path.len() + 4);
        for ch in path.trim().chars() {
            if ch.is_ascii_uppercase() {
                normalized.push('_');
                normalized.push(ch.to_ascii_lowercase());
            } else {
                normalized.push(ch);
            }
        }

        match normalized.as_str() {
            "order_status" => Some(Self::OrderStatus),
            "tracking_number" => Some(Self::TrackingNumber),
            "shipping_method" => Some(Self::ShippingMethod),
            "special_instructions" => Some(Self::SpecialInstructions),
            "invoice_number" => Some(Self::InvoiceNumber),
            _ => None,
        }
    }
}

/// Only the masked fields are `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub order_status: Option<OrderStatus>,
    pub tracking_number: Option<String>,
    pub shipping_method: Option<String>,
    pub special_instructions: Option<String>,
    pub invoice_number: Option<String>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrderRequest {
    pub order_id: String,
    pub patch: OrderPatch,
}

impl Validate for UpdateOrderRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_uuid(&mut errors, "order_id", &self.order_id);

        if self.patch.is_empty() {
            errors.add("update_mask", field_error("required", "is required"));
        }
        if self.patch.order_status == Some(OrderStatus::Unspecified) {
            errors.add(
                "order_status",
                field_error("unsupported", "UNSPECIFIED is not a valid target"),
            );
        }
        if let Some(shipping_method) = &self.patch.shipping_method {
            require_non_empty(&mut errors, "shipping_method", shipping_method);
        }
        if let Some(invoice_number) = &self.patch.invoice_number {
            require_non_empty(&mut errors, "invoice_number", invoice_number);
        }

        into_result(errors)
    }
}

impl TryFrom<ProtoUpdateOrderRequest> for UpdateOrderRequest {
    type Error = ServiceError;

    fn try_from(value: ProtoUpdateOrderRequest) -> Result<Self, Self::Error> {
        let order = value
            .order
            .ok_or_else(|| ServiceError::Validation(vec!["order: is required".into()]))?;
        let mask = value
            .update_mask
            .filter(|mask| !mask.paths.is_empty())
            .ok_or_else(|| ServiceError::Validation(vec!["update_mask: is required".into()]))?;

        let mut patch = OrderPatch::default();
        let mut unknown = Vec::new();

        for path in &mask.paths {
            match OrderField::from_path(path) {
                Some(OrderField::OrderStatus) => {
                    patch.order_status = Some(OrderStatus::from_wire(order.order_status)?)
                }
                Some(OrderField::TrackingNumber) => {
                    patch.tracking_number = Some(order.tracking_number.clone())
                }
                Some(OrderField::ShippingMethod) => {
                    patch.shipping_method = Some(order.shipping_method.clone())
                }
                Some(OrderField::SpecialInstructions) => {
                    patch.special_instructions = Some(order.special_instructions.clone())
                }
                Some(OrderField::InvoiceNumber) => {
                    patch.invoice_number = Some(order.invoice_number.clone())
                }
                None => unknown.push(format!("update_mask: {path} cannot be updated")),
            }
        }

        if !unknown.is_empty() {
            return Err(ServiceError::Validation(unknown));
        }

        Ok(Self {
            order_id: order.order_id,
            patch,
        })
    }
}

/// Conditional write: applied only while the order is still in `expected_status`.
#[derive(Debug, Clone)]
pub struct UpdateOrderRecordRequest {
    pub order_id: Uuid,
    pub expected_status: OrderStatus,
    pub patch: OrderPatch,
}
