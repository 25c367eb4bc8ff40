use crate::{
    abstract_trait::order::{DynOrderCommandService, DynOrderQueryService},
    domain::requests::order::{
        CreateOrderRequest as DomainCreateOrderRequest,
        UpdateOrderRequest as DomainUpdateOrderRequest,
    },
};
use genproto::order::{
    ApiResponseCreateOrder, ApiResponseOrder, CreateOrderRequest, GetOrderRequest,
    UpdateOrderRequest, order_service_server::OrderService,
};
use shared::errors::AppErrorGrpc;
use std::fmt;
use tonic::{Request, Response, Status};
use tracing::info;

#[derive(Clone)]
pub struct OrderGrpcServiceImpl {
    pub command: DynOrderCommandService,
    pub query: DynOrderQueryService,
}

impl fmt::Debug for OrderGrpcServiceImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderGrpcServiceImpl")
            .field("command", &"DynOrderCommandService")
            .field("query", &"DynOrderQueryService")
            .finish()
    }
}

impl OrderGrpcServiceImpl {
    pub fn new(command: DynOrderCommandService, query: DynOrderQueryService) -> Self {
        Self { command, query }
    }
}

#[tonic::async_trait]
impl OrderService for OrderGrpcServiceImpl {
    async fn create_order(
        &self,
        request: Request<CreateOrderRequest>,
    ) -> Result<Response<ApiResponseCreateOrder>, Status> {
        info!("Creating new order");

        let domain_req =
            DomainCreateOrderRequest::try_from(request.into_inner()).map_err(AppErrorGrpc::from)?;

        let api_response = self
            .command
            .create_order(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        let reply = ApiResponseCreateOrder {
            status: "success".into(),
            message: api_response.message,
            order: Some(api_response.data.order.into()),
            order_details: Some(api_response.data.order_details.into()),
        };

        Ok(Response::new(reply))
    }

    async fn get_order(
        &self,
        request: Request<GetOrderRequest>,
    ) -> Result<Response<ApiResponseOrder>, Status> {
        let req = request.into_inner();
        info!("Fetching order id={}", req.order_id);

        let api_response = self
            .query
            .get_order(&req.order_id)
            .await
            .map_err(AppErrorGrpc::from)?;

        Ok(Response::new(ApiResponseOrder {
            status: "success".into(),
            message: api_response.message,
            data: Some(api_response.data.into()),
        }))
    }

    async fn update_order(
        &self,
        request: Request<UpdateOrderRequest>,
    ) -> Result<Response<ApiResponseOrder>, Status> {
        let domain_req =
            DomainUpdateOrderRequest::try_from(request.into_inner()).map_err(AppErrorGrpc::from)?;
        info!("Updating order id={}", domain_req.order_id);

        let api_response = self
            .command
            .update_order(&domain_req)
            .await
            .map_err(AppErrorGrpc::from)?;

        Ok(Response::new(ApiResponseOrder {
            status: "success".into(),
            message: api_response.message,
            data: Some(api_response.data.into()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService},
        test_support::{MockOrderStore, MockPaymentClient},
    };
    use genproto::{
        order::{Address, Order, OrderStatus as ProtoOrderStatus},
        payment::PaymentMethod as ProtoPaymentMethod,
    };
    use prometheus_client::registry::Registry;
    use prost_types::FieldMask;
    use shared::{domain::OrderStatus, utils::SagaMetrics};
    use std::sync::Arc;
    use tonic::Code;

    fn handler() -> (OrderGrpcServiceImpl, Arc<MockOrderStore>, Arc<MockPaymentClient>) {
        let store = Arc::new(MockOrderStore::default());
        let payments = Arc::new(MockPaymentClient::default());
        let mut registry = Registry::default();

        let command = OrderCommandService::new(
            OrderCommandServiceDeps {
                product: store.clone(),
                customer: store.clone(),
                query: store.clone(),
                command: store.clone(),
                intents: store.clone(),
                payment_client: payments.clone(),
                saga: SagaMetrics::default(),
            },
            &mut registry,
        );
        let query = OrderQueryService::new(store.clone(), &mut registry);

        (
            OrderGrpcServiceImpl::new(Arc::new(command), Arc::new(query)),
            store,
            payments,
        )
    }

    fn address() -> Address {
        Address {
            street: "Moi Avenue 1".into(),
            city: "Nairobi".into(),
            state: "Nairobi".into(),
            postal_code: "00100".into(),
            country: "KE".into(),
        }
    }

    fn create_request(store: &MockOrderStore) -> CreateOrderRequest {
        CreateOrderRequest {
            order: Some(Order {
                customer_id: store.add_customer("+254700000000").to_string(),
                pickup_address: Some(address()),
                delivery_address: Some(address()),
                shipping_method: "express".into(),
                payment_method: ProtoPaymentMethod::Mpesa.into(),
                invoice_number: "INV-1".into(),
                shipping_cost: 5.0,
                ..Default::default()
            }),
            product_id: store.add_product(5.0, true).to_string(),
            product_quantity: 1,
        }
    }

    fn status_update(order_id: &str, status: ProtoOrderStatus, path: &str) -> UpdateOrderRequest {
        UpdateOrderRequest {
            order: Some(Order {
                order_id: order_id.into(),
                order_status: status.into(),
                ..Default::default()
            }),
            update_mask: Some(FieldMask {
                paths: vec![path.into()],
            }),
        }
    }

    #[tokio::test]
    async fn created_order_can_be_fetched_and_advanced() {
        let (handler, store, _) = handler();

        let created = handler
            .create_order(Request::new(create_request(&store)))
            .await
            .unwrap()
            .into_inner();
        let order = created.order.unwrap();
        assert_eq!(created.status, "success");
        assert_eq!(order.order_status, ProtoOrderStatus::Pending as i32);
        assert_eq!(created.order_details.unwrap().order_id, order.order_id);

        let updated = handler
            .update_order(Request::new(status_update(
                &order.order_id,
                ProtoOrderStatus::Processing,
                "orderStatus",
            )))
            .await
            .unwrap()
            .into_inner()
            .data
            .unwrap();
        assert_eq!(updated.order_status, ProtoOrderStatus::Processing as i32);

        let fetched = handler
            .get_order(Request::new(GetOrderRequest {
                order_id: order.order_id.clone(),
            }))
            .await
            .unwrap()
            .into_inner()
            .data
            .unwrap();
        assert_eq!(fetched.order_status, ProtoOrderStatus::Processing as i32);
        assert_eq!(fetched.invoice_number, "INV-1");
    }

    #[tokio::test]
    async fn payment_failure_surfaces_but_keeps_the_order() {
        let (handler, store, payments) = handler();
        payments.fail_with(Code::Unavailable);

        let status = handler
            .create_order(Request::new(create_request(&store)))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::Unavailable);
        assert_eq!(store.order_count(), 1);
    }

    #[tokio::test]
    async fn missing_payload_and_unknown_method_are_invalid() {
        let (handler, store, payments) = handler();

        let mut missing = create_request(&store);
        missing.order = None;
        let status = handler.create_order(Request::new(missing)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let mut unknown = create_request(&store);
        if let Some(order) = unknown.order.as_mut() {
            order.payment_method = 42;
        }
        let status = handler.create_order(Request::new(unknown)).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        assert!(payments.calls().is_empty());
    }

    #[tokio::test]
    async fn update_status_codes() {
        let (handler, store, _) = handler();

        let shipped = store.insert_order(OrderStatus::Shipped).to_string();
        let backwards = handler
            .update_order(Request::new(status_update(
                &shipped,
                ProtoOrderStatus::Processing,
                "order_status",
            )))
            .await
            .unwrap_err();
        assert_eq!(backwards.code(), Code::FailedPrecondition);

        let pending = store.insert_order(OrderStatus::Pending).to_string();
        *store.race_to.lock().unwrap() = Some(OrderStatus::Cancelled);
        let raced = handler
            .update_order(Request::new(status_update(
                &pending,
                ProtoOrderStatus::Processing,
                "order_status",
            )))
            .await
            .unwrap_err();
        assert_eq!(raced.code(), Code::Aborted);

        let bad_mask = handler
            .update_order(Request::new(status_update(
                &pending,
                ProtoOrderStatus::Processing,
                "customer_id",
            )))
            .await
            .unwrap_err();
        assert_eq!(bad_mask.code(), Code::InvalidArgument);

        let missing = handler
            .get_order(Request::new(GetOrderRequest {
                order_id: uuid::Uuid::new_v4().to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(missing.code(), Code::NotFound);
    }
}
