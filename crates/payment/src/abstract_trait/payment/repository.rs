use crate::{
    domain::requests::payment::CreatePaymentRecordRequest, model::payment::Payment as PaymentModel,
};
use async_trait::async_trait;
use shared::{domain::PaymentStatus, errors::RepositoryError};
use std::sync::Arc;
use uuid::Uuid;

pub type DynPaymentQueryRepository = Arc<dyn PaymentQueryRepositoryTrait + Send + Sync>;
pub type DynPaymentCommandRepository = Arc<dyn PaymentCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait PaymentQueryRepositoryTrait {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PaymentModel>, RepositoryError>;
    async fn find_by_merchant_request_id(
        &self,
        merchant_request_id: &str,
    ) -> Result<Option<PaymentModel>, RepositoryError>;
}

#[async_trait]
pub trait PaymentCommandRepositoryTrait {
    async fn create_payment(
        &self,
        req: &CreatePaymentRecordRequest,
    ) -> Result<PaymentModel, RepositoryError>;

    /// Moves the payment to `to` only while it is still in `from`.
    /// `None` means another writer got there first. A receipt number, when
    /// given, is stored with the new status.
    async fn transition_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
        receipt_number: Option<&str>,
    ) -> Result<Option<PaymentModel>, RepositoryError>;
}
