use crate::grpc_client::PendingOrderUpdate;
use opentelemetry::Context;
use shared::domain::OrderStatus;
use std::{sync::Arc, time::Duration};

pub type DynOrderGrpcClient = Arc<dyn OrderGrpcClientTrait + Send + Sync>;

pub trait OrderGrpcClientTrait {
    /// Starts the status change in the background and hands back its
    /// handle right away. Dropping the handle cancels the call.
    fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        deadline: Duration,
        cx: &Context,
    ) -> PendingOrderUpdate;
}
