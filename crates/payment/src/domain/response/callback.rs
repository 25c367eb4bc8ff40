use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::domain::PaymentStatus;
use utoipa::ToSchema;

/// How a callback delivery left the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOutcome {
    Completed,
    Canceled,
    Failed,
    /// The payment was already settled; nothing was changed.
    Duplicate(PaymentStatus),
}

impl CallbackOutcome {
    /// Outcome of a delivery that moved the payment to `status` itself.
    pub fn applied(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Completed => Self::Completed,
            PaymentStatus::Canceled => Self::Canceled,
            PaymentStatus::Failed => Self::Failed,
            other => Self::Duplicate(other),
        }
    }

    fn settled_status(self) -> PaymentStatus {
        match self {
            Self::Completed => PaymentStatus::Completed,
            Self::Canceled => PaymentStatus::Canceled,
            Self::Failed => PaymentStatus::Failed,
            Self::Duplicate(status) => status,
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self.settled_status() {
            PaymentStatus::Completed => StatusCode::OK,
            _ => StatusCode::PAYMENT_REQUIRED,
        }
    }

    pub fn message(self) -> &'static str {
        match self.settled_status() {
            PaymentStatus::Completed => "payment successful",
            PaymentStatus::Canceled => "payment canceled",
            _ => "payment failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CallbackResponse {
    pub status: String,
}

impl From<CallbackOutcome> for CallbackResponse {
    fn from(outcome: CallbackOutcome) -> Self {
        Self {
            status: outcome.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_repeat_the_original_answer() {
        let first = CallbackOutcome::Canceled;
        let again = CallbackOutcome::Duplicate(PaymentStatus::Canceled);

        assert_eq!(first.status_code(), again.status_code());
        assert_eq!(first.message(), again.message());
        assert_eq!(
            CallbackOutcome::Duplicate(PaymentStatus::Completed).status_code(),
            StatusCode::OK
        );
        assert_eq!(CallbackOutcome::Failed.message(), "payment failed");
    }
}
