pub mod order;
pub mod pending;

pub use self::order::OrderGrpcClientService;
pub use self::pending::{OrderClientError, OrderStatusChange, PendingOrderUpdate};

use anyhow::{Context, Result};
use genproto::order::order_service_client::OrderServiceClient;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

#[derive(Clone)]
pub struct GrpcClients {
    pub order_client: OrderServiceClient<Channel>,
}

impl GrpcClients {
    /// Channels connect on first use, so the order service does not have
    /// to be up when this one starts.
    pub fn init(order_addr: &str) -> Result<Self> {
        let order_channel = Self::connect_lazy(order_addr, "order-service")?;

        Ok(Self {
            order_client: OrderServiceClient::new(order_channel),
        })
    }

    fn connect_lazy(addr: &str, service: &str) -> Result<Channel> {
        let endpoint = Endpoint::from_shared(addr.to_string())
            .with_context(|| format!("Invalid gRPC address for {service}: {addr}"))?
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(10));

        Ok(endpoint.connect_lazy())
    }
}
