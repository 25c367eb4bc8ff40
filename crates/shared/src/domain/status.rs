use crate::domain::mapping::{EnumMapping, EnumMappingError, verify_mapping};
use genproto::{
    order::OrderStatus as ProtoOrderStatus,
    payment::{PaymentMethod as ProtoPaymentMethod, PaymentStatus as ProtoPaymentStatus},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Unspecified,
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl EnumMapping for OrderStatus {
    type Wire = ProtoOrderStatus;

    const NAME: &'static str = "OrderStatus";
    const VARIANTS: &'static [Self] = &[
        Self::Unspecified,
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    fn mapping(self) -> (ProtoOrderStatus, &'static str) {
        match self {
            Self::Unspecified => (ProtoOrderStatus::Unspecified, "UNSPECIFIED"),
            Self::Pending => (ProtoOrderStatus::Pending, "PENDING"),
            Self::Processing => (ProtoOrderStatus::Processing, "PROCESSING"),
            Self::Shipped => (ProtoOrderStatus::Shipped, "SHIPPED"),
            Self::Delivered => (ProtoOrderStatus::Delivered, "DELIVERED"),
            Self::Cancelled => (ProtoOrderStatus::Cancelled, "CANCELLED"),
        }
    }
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Pending => 1,
            Self::Processing => 2,
            Self::Shipped => 3,
            Self::Delivered => 4,
            Self::Cancelled => 5,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Orders only move forward. Re-applying the current status is accepted
    /// so redelivered payment callbacks stay harmless.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if next == Self::Unspecified {
            return false;
        }
        if self == next {
            return true;
        }
        match next {
            Self::Cancelled => matches!(self, Self::Pending | Self::Processing),
            _ => !self.is_terminal() && next.rank() > self.rank(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unspecified,
    Pending,
    Completed,
    Failed,
    Canceled,
}

impl EnumMapping for PaymentStatus {
    type Wire = ProtoPaymentStatus;

    const NAME: &'static str = "PaymentStatus";
    const VARIANTS: &'static [Self] = &[
        Self::Unspecified,
        Self::Pending,
        Self::Completed,
        Self::Failed,
        Self::Canceled,
    ];

    fn mapping(self) -> (ProtoPaymentStatus, &'static str) {
        match self {
            Self::Unspecified => (ProtoPaymentStatus::Unspecified, "UNSPECIFIED"),
            Self::Pending => (ProtoPaymentStatus::Pending, "PENDING"),
            Self::Completed => (ProtoPaymentStatus::Completed, "COMPLETED"),
            Self::Failed => (ProtoPaymentStatus::Failed, "FAILED"),
            Self::Canceled => (ProtoPaymentStatus::Canceled, "CANCELED"),
        }
    }
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Unspecified,
    CreditCard,
    Paypal,
    Mpesa,
}

impl EnumMapping for PaymentMethod {
    type Wire = ProtoPaymentMethod;

    const NAME: &'static str = "PaymentMethod";
    const VARIANTS: &'static [Self] = &[
        Self::Unspecified,
        Self::CreditCard,
        Self::Paypal,
        Self::Mpesa,
    ];

    fn mapping(self) -> (ProtoPaymentMethod, &'static str) {
        match self {
            Self::Unspecified => (ProtoPaymentMethod::Unspecified, "UNSPECIFIED"),
            Self::CreditCard => (ProtoPaymentMethod::CreditCard, "CREDIT_CARD"),
            Self::Paypal => (ProtoPaymentMethod::Paypal, "PAYPAL"),
            Self::Mpesa => (ProtoPaymentMethod::Mpesa, "MPESA"),
        }
    }
}

impl PaymentMethod {
    /// Methods the payment service can actually collect.
    pub fn is_collectable(self) -> bool {
        matches!(self, Self::CreditCard | Self::Mpesa)
    }
}

pub fn verify_enum_mappings() -> Result<(), EnumMappingError> {
    verify_mapping::<OrderStatus>()?;
    verify_mapping::<PaymentStatus>()?;
    verify_mapping::<PaymentMethod>()?;
    Ok(())
}
