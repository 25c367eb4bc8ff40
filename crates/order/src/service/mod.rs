mod command;
mod query;
mod reconciler;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::query::OrderQueryService;
pub use self::reconciler::{PaymentIntentReconciler, PaymentIntentReconcilerDeps, ReconcileReport};

use shared::errors::ServiceError;
use uuid::Uuid;

fn parse_order_id(id: &str) -> Result<Uuid, ServiceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::Validation(vec!["order_id: is required".into()]));
    }
    Uuid::parse_str(id)
        .map_err(|_| ServiceError::Validation(vec![format!("order_id: {id} is not a valid UUID")]))
}
