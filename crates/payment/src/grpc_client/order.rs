use crate::{
    abstract_trait::OrderGrpcClientTrait,
    grpc_client::pending::{OrderClientError, OrderStatusChange, PendingOrderUpdate},
};
use genproto::order::{
    Order as ProtoOrder, UpdateOrderRequest, order_service_client::OrderServiceClient,
};
use opentelemetry::{Context, global};
use prost_types::FieldMask;
use shared::{
    domain::{EnumMapping, OrderStatus},
    errors::grpc_status_to_service_error,
    utils::MetadataInjector,
};
use std::time::Duration;
use tonic::{Request, transport::Channel};
use tracing::{info, warn};

pub const ORDER_STATUS_PATH: &str = "order_status";

#[derive(Clone)]
pub struct OrderGrpcClientService {
    client: OrderServiceClient<Channel>,
}

impl OrderGrpcClientService {
    pub fn new(client: OrderServiceClient<Channel>) -> Self {
        Self { client }
    }
}

pub fn status_update_request(order_id: &str, status: OrderStatus) -> UpdateOrderRequest {
    UpdateOrderRequest {
        order: Some(ProtoOrder {
            order_id: order_id.to_string(),
            order_status: status.wire_value(),
            ..Default::default()
        }),
        update_mask: Some(FieldMask {
            paths: vec![ORDER_STATUS_PATH.to_string()],
        }),
    }
}

impl OrderGrpcClientTrait for OrderGrpcClientService {
    fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        deadline: Duration,
        cx: &Context,
    ) -> PendingOrderUpdate {
        let mut client = self.client.clone();

        let mut request = Request::new(status_update_request(order_id, status));
        request.set_timeout(deadline);
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(cx, &mut MetadataInjector(request.metadata_mut()))
        });

        let order_id = order_id.to_string();

        PendingOrderUpdate::spawn(deadline, async move {
            info!("📤 Asking order service to move {order_id} to {status:?}");

            let response = client.update_order(request).await.map_err(|err| {
                warn!("⚠️ Order status RPC for {order_id} failed: {err}");
                OrderClientError::Transport(grpc_status_to_service_error(err))
            })?;

            let order = response
                .into_inner()
                .data
                .ok_or(OrderClientError::MissingData)?;
            let returned = OrderStatus::from_wire(order.order_status)?;

            if returned != status {
                return Err(OrderClientError::StatusMismatch {
                    requested: status,
                    returned,
                });
            }

            Ok(OrderStatusChange {
                order_id: order.order_id,
                status: returned,
            })
        })
    }
}
