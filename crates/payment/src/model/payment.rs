use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: String,
    pub customer_id: String,
    pub payment_method: String,
    pub merchant_request_id: String,
    pub checkout_request_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub description: String,
    pub shipping_cost: f64,
    pub product_cost: f64,
    pub mpesa_receipt_number: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
