use crate::{
    abstract_trait::payment::{DynPaymentCommandService, DynPaymentQueryService},
    domain::requests::payment::CreatePaymentRequest as DomainCreatePaymentRequest,
};
use genproto::payment::{
    ApiResponsePayment, CreatePaymentRequest, GetPaymentByIdRequest,
    payment_service_server::PaymentService,
};
use shared::errors::AppErrorGrpc;
use std::fmt;
use tonic::{Request, Response, Status};
use tracing::info;

#[derive(Clone)]
pub struct PaymentGrpcServiceImpl {
    pub command: DynPaymentCommandService,
    pub query: DynPaymentQueryService,
}

impl fmt::Debug for PaymentGrpcServiceImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentGrpcServiceImpl")
            .field("command", &"DynPaymentCommandService")
            .field("query", &"DynPaymentQueryService")
            .finish()
    }
}

impl PaymentGrpcServiceImpl {
    pub fn new(command: DynPaymentCommandService, query: DynPaymentQueryService) -> Self {
        Self { command, query }
    }
}

#[tonic::async_trait]
impl PaymentService for PaymentGrpcServiceImpl {
    async fn create_payment(
        &self,
        request: Request<CreatePaymentRequest>,
    ) -> Result<Response<ApiResponsePayment>, Status> {
        info!("Creating new payment");

        let domain_req =
            DomainCreatePaymentRequest::try_from(request.into_inner()).map_err(AppErrorGrpc::from)?;

        let api_response = self
            .command
            .create_payment(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponsePayment {
            status: "success".into(),
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        info!("Payment created for order {}", domain_req.order_id);
        Ok(Response::new(reply))
    }

    async fn get_payment_by_id(
        &self,
        request: Request<GetPaymentByIdRequest>,
    ) -> Result<Response<ApiResponsePayment>, Status> {
        let req = request.into_inner();
        info!("Fetching payment id={}", req.id);

        let api_response = self
            .query
            .find_by_id(&req.id)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponsePayment {
            status: "success".into(),
            message: api_response.message,
            data: Some(api_response.data.into()),
        };

        Ok(Response::new(reply))
    }
}
