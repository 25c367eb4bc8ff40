use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::errors::RepositoryError;
use sqlx::FromRow;
use uuid::Uuid;

/// Marker written next to every new order until its payment outcome is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentIntentState {
    Pending,
    Initiated,
    Failed,
    Compensated,
}

impl PaymentIntentState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Initiated => "INITIATED",
            Self::Failed => "FAILED",
            Self::Compensated => "COMPENSATED",
        }
    }
}

impl TryFrom<&str> for PaymentIntentState {
    type Error = RepositoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "INITIATED" => Ok(Self::Initiated),
            "FAILED" => Ok(Self::Failed),
            "COMPENSATED" => Ok(Self::Compensated),
            other => Err(RepositoryError::Custom(format!(
                "unknown payment intent state {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PaymentIntent {
    pub order_id: Uuid,
    pub state: String,
    pub payment_id: Option<String>,
    pub last_error: Option<String>,
    pub attempts: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PaymentIntent {
    pub fn state(&self) -> Result<PaymentIntentState, RepositoryError> {
        PaymentIntentState::try_from(self.state.as_str())
    }
}
