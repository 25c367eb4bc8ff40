use crate::{
    abstract_trait::PaymentGrpcClientTrait,
    domain::{requests::payment::PaymentInitiation, response::payment::PaymentResponse},
};
use async_trait::async_trait;
use genproto::payment::{CreatePaymentRequest, payment_service_client::PaymentServiceClient};
use opentelemetry::{Context, global};
use shared::{
    errors::{ServiceError, grpc_status_to_service_error},
    utils::MetadataInjector,
};
use tonic::{Request, transport::Channel};
use tracing::{error, info};

#[derive(Clone)]
pub struct PaymentGrpcClientService {
    client: PaymentServiceClient<Channel>,
}

impl PaymentGrpcClientService {
    pub fn new(client: PaymentServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGrpcClientTrait for PaymentGrpcClientService {
    async fn create_payment(
        &self,
        req: &PaymentInitiation,
        cx: &Context,
    ) -> Result<PaymentResponse, ServiceError> {
        info!(
            "📤 Requesting payment of {} for order {}",
            req.amount, req.order_id
        );

        let mut request = Request::new(CreatePaymentRequest::from(req));
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(cx, &mut MetadataInjector(request.metadata_mut()))
        });

        let response = self
            .client
            .clone()
            .create_payment(request)
            .await
            .map_err(|status| {
                error!(
                    "❌ Payment service rejected order {}: {status}",
                    req.order_id
                );
                grpc_status_to_service_error(status)
            })?;

        let payment = response.into_inner().data.ok_or_else(|| {
            ServiceError::Internal(format!(
                "Payment service returned no payment for order {}",
                req.order_id
            ))
        })?;

        PaymentResponse::try_from(payment).map_err(|err| ServiceError::Internal(err.to_string()))
    }
}
