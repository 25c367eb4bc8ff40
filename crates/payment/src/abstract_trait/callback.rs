use crate::domain::{requests::callback::StkCallback, response::callback::CallbackOutcome};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynCallbackService = Arc<dyn CallbackServiceTrait + Send + Sync>;

#[async_trait]
pub trait CallbackServiceTrait {
    async fn handle_callback(&self, callback: &StkCallback)
    -> Result<CallbackOutcome, ServiceError>;
}
